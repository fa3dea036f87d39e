//! The poll-render loop

use std::future::Future;
use std::time::Duration;

use gpuwatch_core::{
    Classifier, MemoryProvider, RenderSink, TelemetrySource, ThresholdSet, DEFAULT_BAR_WIDTH,
    DEFAULT_REFRESH_INTERVAL, DEFAULT_SAMPLE_INTERVAL,
};
use gpuwatch_types::{DisplayRow, TableSpec};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::bootstrap::{bootstrap, MonitorError, SourceGuard};
use super::rows::RowBuilder;
use super::snapshot::{build_gpu_snapshot, build_ram_snapshot};

/// Lifecycle of a [`Monitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Stopped,
}

/// Why the loop stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future resolved (Ctrl+C)
    Interrupted,
    /// The requested number of ticks was reached
    Completed,
}

/// Settings for one monitor run; both intervals must be non-zero
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOptions {
    pub sample_interval: Duration,
    pub refresh_interval: Duration,
    /// Requested device indices; `None` monitors every device
    pub gpu_indices: Option<Vec<i64>>,
    /// Stop normally after this many ticks
    pub max_ticks: Option<u64>,
    pub bar_width: usize,
    pub thresholds: ThresholdSet,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            gpu_indices: None,
            max_ticks: None,
            bar_width: DEFAULT_BAR_WIDTH,
            thresholds: ThresholdSet::default(),
        }
    }
}

/// Samples telemetry on one cadence and redraws the sink on another
pub struct Monitor<S, M, K>
where
    S: TelemetrySource,
    M: MemoryProvider,
    K: RenderSink,
{
    guard: SourceGuard<S>,
    memory: M,
    sink: K,
    rows: RowBuilder,
    options: MonitorOptions,
    state: LoopState,
    indices: Vec<u32>,
    ticks: u64,
}

impl<S, M, K> Monitor<S, M, K>
where
    S: TelemetrySource,
    M: MemoryProvider,
    K: RenderSink,
{
    pub fn new(source: S, memory: M, sink: K, options: MonitorOptions) -> Self {
        let rows = RowBuilder::new(Classifier::new(options.thresholds), options.bar_width);
        Self {
            guard: SourceGuard::new(source),
            memory,
            sink,
            rows,
            options,
            state: LoopState::Initializing,
            indices: Vec::new(),
            ticks: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Device indices being monitored, in row order
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Completed ticks so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Run until `shutdown` resolves, `max_ticks` is reached or an error stops
    /// the loop. The telemetry source is released before this returns.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<StopReason, MonitorError>
    where
        F: Future<Output = ()>,
    {
        let result = self.run_until_stopped(shutdown).await;
        self.state = LoopState::Stopped;

        let finished = self.sink.finish();
        if let Err(e) = self.guard.release() {
            log::error!("Error shutting down telemetry source: {}", e);
        }

        match (result, finished) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e.into()),
            (Ok(reason), Ok(())) => Ok(reason),
        }
    }

    async fn run_until_stopped<F>(&mut self, shutdown: F) -> Result<StopReason, MonitorError>
    where
        F: Future<Output = ()>,
    {
        self.state = LoopState::Initializing;
        self.indices = bootstrap(&mut self.guard, self.options.gpu_indices.as_deref())?;
        self.sink.begin(&TableSpec::monitor())?;
        self.state = LoopState::Running;
        log::info!("Monitoring GPU(s) {:?}", self.indices);

        let mut sample = time::interval(self.options.sample_interval);
        sample.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut refresh = time::interval(self.options.refresh_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    log::info!("Monitoring stopped by user");
                    return Ok(StopReason::Interrupted);
                }
                _ = sample.tick() => {
                    self.tick()?;
                    if self.options.max_ticks.is_some_and(|max| self.ticks >= max) {
                        self.sink.refresh()?;
                        log::info!("Monitoring finished after {} sample(s)", self.ticks);
                        return Ok(StopReason::Completed);
                    }
                }
                _ = refresh.tick() => {
                    self.sink.refresh()?;
                }
            }
        }
    }

    /// Collect one row per monitored device followed by the RAM row.
    ///
    /// Fetch failures become error rows; nothing here can fail the tick.
    pub fn collect_rows(&mut self) -> Vec<DisplayRow> {
        let mut rows = Vec::with_capacity(self.indices.len() + 1);
        for &index in &self.indices {
            let outcome = build_gpu_snapshot(self.guard.source(), index);
            rows.push(self.rows.gpu_outcome(&outcome));
        }
        let ram = build_ram_snapshot(&mut self.memory);
        rows.push(self.rows.ram_outcome(&ram));
        rows
    }

    fn tick(&mut self) -> Result<(), MonitorError> {
        let started = Instant::now();
        let rows = self.collect_rows();
        self.ticks += 1;

        let elapsed = started.elapsed();
        if elapsed > self.options.sample_interval {
            log::warn!(
                "Sample {} took {:.2}s, longer than the {:.2}s interval",
                self.ticks,
                elapsed.as_secs_f64(),
                self.options.sample_interval.as_secs_f64()
            );
        }

        self.sink.update(rows)?;
        Ok(())
    }
}
