//! Single-tick telemetry snapshots and fetch outcomes.

use std::fmt;

/// What a snapshot (or a failed attempt at one) describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// GPU at the given device index
    Gpu(u32),
    /// Host memory
    SystemRam,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Gpu(index) => write!(f, "GPU {}", index),
            Target::SystemRam => f.write_str("System RAM"),
        }
    }
}

/// Readings for one GPU, taken during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSnapshot {
    pub index: u32,
    /// Device name with the vendor prefix stripped
    pub name: String,
    pub memory_used: u64,  // bytes
    pub memory_total: u64, // bytes
    /// Derived from the raw byte counts (0.0 to 100.0)
    pub memory_percent: f64,
    pub utilization: u32, // %
    pub temperature: u32, // Celsius
    pub power_watts: f64,
    pub pcie_generation: u32,
    pub pcie_width: u32,
}

/// Host memory readings for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct RamSnapshot {
    pub used: u64,  // bytes
    pub total: u64, // bytes
    /// As reported by the host, not recomputed from used/total
    pub percent: f64,
}

/// Marker left behind when a snapshot could not be assembled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub target: Target,
    pub description: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.description)
    }
}

/// Either a complete snapshot or a failure marker, never anything in between
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Ready(T),
    Failed(FetchFailure),
}

impl<T> FetchOutcome<T> {
    pub fn failed(target: Target, description: impl Into<String>) -> Self {
        FetchOutcome::Failed(FetchFailure {
            target,
            description: description.into(),
        })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchOutcome::Ready(_))
    }

    /// The snapshot, if the fetch succeeded
    pub fn ready(self) -> Option<T> {
        match self {
            FetchOutcome::Ready(value) => Some(value),
            FetchOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchOutcome::Ready(_) => None,
            FetchOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn as_ref(&self) -> FetchOutcome<&T> {
        match self {
            FetchOutcome::Ready(value) => FetchOutcome::Ready(value),
            FetchOutcome::Failed(failure) => FetchOutcome::Failed(failure.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Gpu(3).to_string(), "GPU 3");
        assert_eq!(Target::SystemRam.to_string(), "System RAM");
    }

    #[test]
    fn test_failed_outcome_carries_target() {
        let outcome: FetchOutcome<RamSnapshot> = FetchOutcome::failed(Target::Gpu(1), "boom");
        assert!(!outcome.is_ready());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.target, Target::Gpu(1));
        assert_eq!(failure.to_string(), "GPU 1: boom");
        assert!(outcome.ready().is_none());
    }
}
