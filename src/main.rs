use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gpuwatch::{ConfigOverrides, Monitor, MonitorConfig, StopReason};
use gpuwatch_core::TelemetrySource;
use gpuwatch_render::StdoutSink;
use gpuwatch_sources::{NvmlSource, SimulatedSource, SysinfoMemory};
use log::{info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gpuwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sampling interval in seconds [default: 2.0]
    #[arg(short = 'i', long = "interval", value_name = "SECONDS")]
    interval: Option<f64>,

    /// GPU indices to monitor [default: all]
    #[arg(
        short = 'g',
        long = "gpu-indices",
        value_name = "INDEX",
        num_args = 1..,
        allow_negative_numbers = true
    )]
    gpu_indices: Option<Vec<i64>>,

    /// Display refresh interval in seconds [default: 1.0]
    #[arg(short = 'r', long = "refresh-rate", value_name = "SECONDS")]
    refresh_rate: Option<f64>,

    /// Stop after this many samples
    #[arg(short = 'n', long = "count", value_name = "N")]
    count: Option<u64>,

    /// Number of cells in each status bar [default: 15]
    #[arg(long = "bar-width", value_name = "CELLS")]
    bar_width: Option<usize>,

    /// Configuration file [default: platform config dir]
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file [default: platform data dir]/logs/gpu_monitor.log
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Show simulated GPUs instead of querying NVML
    #[arg(long = "demo")]
    demo: bool,

    /// Debug verbosity level (0/1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            interval_secs: self.interval,
            refresh_secs: self.refresh_rate,
            gpu_indices: self.gpu_indices.clone(),
            bar_width: self.bar_width,
            log_file: self.log_file.clone(),
        }
    }
}

/// Install the Ctrl+C handler now and return a future that resolves on the
/// signal. Signals that arrive before the future is first polled are kept.
/// Must be called inside the runtime.
#[cfg(unix)]
fn interrupted() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    Ok(async move {
        sigint.recv().await;
    })
}

#[cfg(windows)]
fn interrupted() -> io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
    })
}

fn run(cli: &Cli) -> Result<StopReason> {
    let config = MonitorConfig::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    let options = config.monitor_options(cli.count)?;

    gpuwatch::logging::init(&config.log_path(), cli.debug)?;
    info!("Starting gpuwatch v{}", env!("CARGO_PKG_VERSION"));

    let source: Box<dyn TelemetrySource> = if cli.demo {
        info!("Using simulated GPUs");
        Box::new(SimulatedSource::demo())
    } else {
        if !NvmlSource::is_supported() {
            warn!("Built without NVIDIA support; NVML will be unavailable");
        }
        Box::new(NvmlSource::new())
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let sink = StdoutSink::stdout(&config.thresholds)?;
    let mut monitor = Monitor::new(source, SysinfoMemory::new(), sink, options);
    let reason = runtime.block_on(async {
        // Before the source is initialised, so Ctrl+C during startup still
        // reaches the release path
        let shutdown = interrupted().context("Failed to install Ctrl+C handler")?;
        anyhow::Ok(monitor.run(shutdown).await?)
    })?;
    Ok(reason)
}

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    match run(&cli) {
        Ok(StopReason::Interrupted) => {
            println!("Monitoring stopped.");
            ExitCode::SUCCESS
        }
        Ok(StopReason::Completed) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
