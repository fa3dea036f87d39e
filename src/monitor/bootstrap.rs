//! Source lifecycle: initialisation, index resolution and guaranteed release

use gpuwatch_core::{FetchError, SinkError, TelemetrySource};
use thiserror::Error;

/// Errors that stop the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Failed to initialize telemetry source: {0}")]
    Init(#[from] FetchError),

    #[error("No valid GPU indices specified")]
    NoValidDevices,

    #[error("Display failed: {0}")]
    Sink(#[from] SinkError),
}

/// Owns a telemetry source and releases it exactly once.
///
/// [`SourceGuard::release`] is the normal path; dropping an unreleased guard
/// releases it as a fallback. Each [`SourceGuard::init`] re-arms the guard, so
/// every initialisation is paired with one shutdown.
pub struct SourceGuard<S: TelemetrySource> {
    source: S,
    released: bool,
}

impl<S: TelemetrySource> SourceGuard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            released: false,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn init(&mut self) -> Result<(), FetchError> {
        // Armed before the attempt: a failed init is still shut down
        self.released = false;
        self.source.init()?;
        log::info!("Initialized {}", self.source.name());
        Ok(())
    }

    /// Shut the source down; later calls do nothing
    pub fn release(&mut self) -> Result<(), FetchError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.source.shutdown()?;
        log::info!("{} shutdown complete", self.source.name());
        Ok(())
    }
}

impl<S: TelemetrySource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        if !self.released {
            log::warn!("Telemetry source dropped without explicit release");
            if let Err(e) = self.release() {
                log::error!("Error shutting down {}: {}", self.source.name(), e);
            }
        }
    }
}

/// Resolve requested device indices against the device count.
///
/// No request (or an empty one) selects every device. Out-of-range and
/// negative indices are dropped with a warning; repeats keep their first
/// position.
pub fn resolve_indices(requested: Option<&[i64]>, device_count: u32) -> Vec<u32> {
    let requested = match requested {
        Some(indices) if !indices.is_empty() => indices,
        _ => return (0..device_count).collect(),
    };

    let mut resolved: Vec<u32> = Vec::with_capacity(requested.len());
    for &index in requested {
        match u32::try_from(index) {
            Ok(index) if index < device_count => {
                if resolved.contains(&index) {
                    log::debug!("Ignoring repeated GPU index {}", index);
                } else {
                    resolved.push(index);
                }
            }
            _ => log::warn!(
                "Ignoring GPU index {}: {} device(s) available",
                index,
                device_count
            ),
        }
    }
    resolved
}

/// Initialise the source and resolve the devices to monitor
pub fn bootstrap<S: TelemetrySource>(
    guard: &mut SourceGuard<S>,
    requested: Option<&[i64]>,
) -> Result<Vec<u32>, MonitorError> {
    guard.init()?;
    let device_count = guard.source().device_count()?;
    log::info!("Found {} GPU(s)", device_count);

    let indices = resolve_indices(requested, device_count);
    if indices.is_empty() {
        log::error!("No valid GPU indices specified");
        return Err(MonitorError::NoValidDevices);
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpuwatch_sources::{ScriptedDevice, ScriptedSource};

    fn two_devices() -> ScriptedSource {
        ScriptedSource::new(vec![ScriptedDevice::new("NVIDIA A"), ScriptedDevice::new("NVIDIA B")])
    }

    #[test]
    fn test_resolve_defaults_to_all() {
        assert_eq!(resolve_indices(None, 3), vec![0, 1, 2]);
        assert_eq!(resolve_indices(Some(&[]), 2), vec![0, 1]);
        assert!(resolve_indices(None, 0).is_empty());
    }

    #[test]
    fn test_resolve_filters_and_dedups() {
        assert_eq!(resolve_indices(Some(&[2, -1, 0, 7, 2, 1]), 3), vec![2, 0, 1]);
        assert!(resolve_indices(Some(&[5, -3]), 2).is_empty());
        assert_eq!(resolve_indices(Some(&[i64::MAX, 0]), 1), vec![0]);
    }

    #[test]
    fn test_bootstrap_rejects_empty_selection() {
        let source = two_devices();
        let control = source.control();
        let mut guard = SourceGuard::new(source);
        let err = bootstrap(&mut guard, Some(&[4])).unwrap_err();
        assert!(matches!(err, MonitorError::NoValidDevices));
        drop(guard);
        assert_eq!(control.shutdown_calls(), 1);
    }

    #[test]
    fn test_bootstrap_init_failure() {
        let source = two_devices().with_init_failure("Driver Not Loaded");
        let mut guard = SourceGuard::new(source);
        let err = bootstrap(&mut guard, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to initialize telemetry source: init query failed: Driver Not Loaded"
        );
    }

    #[test]
    fn test_release_is_idempotent() {
        let source = two_devices();
        let control = source.control();
        let mut guard = SourceGuard::new(source);
        guard.init().unwrap();
        guard.release().unwrap();
        guard.release().unwrap();
        assert!(guard.is_released());
        drop(guard);
        assert_eq!(control.shutdown_calls(), 1);
    }

    #[test]
    fn test_init_after_release_rearms_guard() {
        let source = two_devices();
        let control = source.control();
        let mut guard = SourceGuard::new(source);
        guard.init().unwrap();
        guard.release().unwrap();
        guard.init().unwrap();
        assert!(!guard.is_released());
        drop(guard);
        assert_eq!(control.init_calls(), 2);
        assert_eq!(control.shutdown_calls(), 2);
    }

    #[test]
    fn test_failed_release_is_not_retried() {
        let source = two_devices().with_shutdown_failure("GPU is lost");
        let control = source.control();
        let mut guard = SourceGuard::new(source);
        guard.init().unwrap();
        assert!(guard.release().is_err());
        drop(guard);
        assert_eq!(control.shutdown_calls(), 1);
    }
}
