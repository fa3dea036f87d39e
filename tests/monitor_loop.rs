//! Poll-render loop behavior on tokio's paused clock

mod common;

use std::future::pending;
use std::time::Duration;

use common::{gpu, labels, options, ram, rtx_3090, RecordingSink};
use gpuwatch::{LoopState, Monitor, MonitorError, MonitorOptions, StopReason};
use gpuwatch_core::{Query, PLACEHOLDER};
use gpuwatch_sources::{ScriptedMemory, ScriptedSource};
use gpuwatch_types::{Accent, Target};
use tokio::sync::oneshot;
use tokio::time::{self, sleep};

#[tokio::test(start_paused = true)]
async fn test_rtx_3090_end_to_end() {
    let source = ScriptedSource::new(vec![rtx_3090()]);
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(1)));

    let reason = monitor.run(pending()).await.unwrap();
    assert_eq!(reason, StopReason::Completed);

    let rows = monitor.sink().last_rows();
    assert_eq!(labels(rows), ["GeForce RTX 3090", "System RAM"]);

    let gpu = &rows[0];
    assert_eq!(gpu.utilization.plain_text(), "███████░░░░░░░░  50.0%");
    assert_eq!(gpu.utilization.accents(), vec![Accent::Ok]);
    assert_eq!(gpu.memory.plain_text(), "███░░░░░░░░░░░░  20.8%\n5.0/24.0 GB");
    assert_eq!(gpu.temperature.plain_text(), "65°C");
    assert_eq!(gpu.temperature.accents(), vec![Accent::Warning]);
    assert_eq!(gpu.power.plain_text(), "250.0W");
    assert_eq!(gpu.pcie.plain_text(), "Gen 4 x16");
}

#[tokio::test(start_paused = true)]
async fn test_one_failing_device_does_not_affect_others() {
    let source = ScriptedSource::new(vec![
        gpu("A"),
        gpu("B").failing(Query::Temperature),
        gpu("C"),
    ]);
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(1)));
    monitor.run(pending()).await.unwrap();

    let rows = monitor.sink().last_rows();
    assert_eq!(labels(rows), ["A", "GPU 1 (Error)", "C", "System RAM"]);
    assert!(rows[1].is_failed());
    assert_eq!(rows[1].device.accents(), vec![Accent::Danger]);
    assert_eq!(rows[1].temperature.plain_text(), PLACEHOLDER);
    assert!(!rows[0].is_failed());
    assert!(!rows[2].is_failed());
    assert_eq!(rows[3].target, Target::SystemRam);
}

#[tokio::test(start_paused = true)]
async fn test_ram_failure_only_affects_ram_row() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let memory = ScriptedMemory::failing("meminfo unreadable");
    let mut monitor = Monitor::new(source, memory, RecordingSink::default(), options(Some(1)));
    monitor.run(pending()).await.unwrap();

    let rows = monitor.sink().last_rows();
    assert_eq!(labels(rows), ["A", "System RAM (Error)"]);
    assert!(rows[1].is_failed());
}

#[tokio::test(start_paused = true)]
async fn test_rows_follow_requested_order() {
    let source = ScriptedSource::new(vec![gpu("A"), gpu("B"), gpu("C")]);
    let control = source.control();
    let opts = MonitorOptions {
        gpu_indices: Some(vec![2, 0, 9, 2]),
        ..options(Some(2))
    };
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), opts);
    monitor.run(pending()).await.unwrap();

    assert_eq!(monitor.indices(), &[2, 0]);
    for rows in &monitor.sink().updates {
        assert_eq!(labels(rows), ["C", "A", "System RAM"]);
    }
    assert_eq!(control.name_queries(), vec![2, 0, 2, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_follow_sampling_interval() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(None));

    // Samples at 0s, 2s and 4s; redraws every second in between
    let reason = monitor.run(sleep(Duration::from_millis(4500))).await.unwrap();
    assert_eq!(reason, StopReason::Interrupted);
    assert_eq!(monitor.ticks(), 3);
    assert_eq!(monitor.sink().updates.len(), 3);
    assert_eq!(monitor.sink().refreshes, 5);
    assert_eq!(monitor.state(), LoopState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_failures_recover_between_ticks() {
    let source = ScriptedSource::new(vec![gpu("A"), gpu("B")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(3)));

    let script = async {
        sleep(Duration::from_secs(1)).await;
        control.set_failure(0, Some(Query::PowerUsage));
        control.set_utilization(1, 95);
        sleep(Duration::from_secs(2)).await;
        control.set_failure(0, None);
    };
    let (result, ()) = tokio::join!(monitor.run(pending()), script);
    assert_eq!(result.unwrap(), StopReason::Completed);

    let updates = &monitor.sink().updates;
    assert_eq!(labels(&updates[0]), ["A", "B", "System RAM"]);
    assert_eq!(labels(&updates[1]), ["GPU 0 (Error)", "B", "System RAM"]);
    assert_eq!(updates[1][1].utilization.accents(), vec![Accent::Danger]);
    assert_eq!(labels(&updates[2]), ["A", "B", "System RAM"]);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_releases_source_once() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(None));

    let (stop, stopped) = oneshot::channel::<()>();
    let interrupt = async {
        sleep(Duration::from_secs(3)).await;
        let _ = stop.send(());
    };
    let shutdown = async {
        let _ = stopped.await;
    };
    let (result, ()) = tokio::join!(monitor.run(shutdown), interrupt);

    assert_eq!(result.unwrap(), StopReason::Interrupted);
    assert_eq!(control.init_calls(), 1);
    assert_eq!(control.shutdown_calls(), 1);
    assert_eq!(monitor.sink().finished, 1);
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completion_releases_source_once() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(2)));
    monitor.run(pending()).await.unwrap();
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sink_failure_stops_loop_and_releases_source() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let sink = RecordingSink::failing_on_refresh(2);
    let mut monitor = Monitor::new(source, ram(), sink, options(None));

    let err = monitor.run(pending()).await.unwrap_err();
    assert!(matches!(err, MonitorError::Sink(_)));
    assert_eq!(monitor.state(), LoopState::Stopped);
    assert_eq!(monitor.sink().finished, 1);
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_no_valid_devices_fails_before_running() {
    let source = ScriptedSource::new(vec![gpu("A"), gpu("B")]);
    let control = source.control();
    let opts = MonitorOptions {
        gpu_indices: Some(vec![5, -1]),
        ..options(None)
    };
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), opts);

    let err = monitor.run(pending()).await.unwrap_err();
    assert!(matches!(err, MonitorError::NoValidDevices));
    assert_eq!(monitor.sink().begun, 0);
    assert!(monitor.sink().updates.is_empty());
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_init_failure_still_releases_source() {
    let source = ScriptedSource::new(vec![gpu("A")]).with_init_failure("Driver Not Loaded");
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(None));

    let err = monitor.run(pending()).await.unwrap_err();
    assert!(matches!(err, MonitorError::Init(_)));
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_error_does_not_mask_result() {
    let source = ScriptedSource::new(vec![gpu("A")]).with_shutdown_failure("GPU is lost");
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(1)));

    assert_eq!(monitor.run(pending()).await.unwrap(), StopReason::Completed);
    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_run_is_released_again() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(Some(1)));

    assert_eq!(monitor.run(pending()).await.unwrap(), StopReason::Completed);
    assert_eq!(monitor.run(pending()).await.unwrap(), StopReason::Completed);
    assert_eq!(control.init_calls(), 2);
    assert_eq!(control.shutdown_calls(), 2);

    drop(monitor);
    assert_eq!(control.shutdown_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pending_interrupt_stops_before_first_sample() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(None));

    // A signal that arrived during startup is already waiting on the first poll
    let reason = monitor.run(std::future::ready(())).await.unwrap();
    assert_eq!(reason, StopReason::Interrupted);
    assert_eq!(monitor.ticks(), 0);
    assert_eq!(monitor.sink().finished, 1);
    assert_eq!(control.init_calls(), 1);
    assert_eq!(control.shutdown_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_run_is_released_on_drop() {
    let source = ScriptedSource::new(vec![gpu("A")]);
    let control = source.control();
    let mut monitor = Monitor::new(source, ram(), RecordingSink::default(), options(None));

    let abandoned = time::timeout(Duration::from_secs(3), monitor.run(pending())).await;
    assert!(abandoned.is_err());
    assert_eq!(monitor.state(), LoopState::Running);
    assert_eq!(control.shutdown_calls(), 0);

    drop(monitor);
    assert_eq!(control.shutdown_calls(), 1);
}
