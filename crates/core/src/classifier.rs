//! Threshold classification of raw metric values

use gpuwatch_types::{MetricThresholds, ThresholdSet, Tier};

/// Map a raw value to its tier.
///
/// Bounds are inclusive lower bounds, so a value sitting exactly on a bound
/// belongs to the higher tier. NaN compares false against every bound and
/// lands in [`Tier::Base`].
pub fn classify(value: f64, thresholds: &MetricThresholds) -> Tier {
    if value >= thresholds.top {
        Tier::Top
    } else if value >= thresholds.elevated {
        Tier::Elevated
    } else if value >= thresholds.normal {
        Tier::Normal
    } else {
        Tier::Base
    }
}

/// Classifier bound to one set of threshold tables
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Classifier {
    thresholds: ThresholdSet,
}

impl Classifier {
    pub fn new(thresholds: ThresholdSet) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Tier for a temperature in Celsius
    pub fn temperature(&self, celsius: f64) -> Tier {
        classify(celsius, &self.thresholds.temperature)
    }

    /// Tier for a utilization percentage
    pub fn utilization(&self, percent: f64) -> Tier {
        classify(percent, &self.thresholds.utilization)
    }

    /// Tier for a memory-used percentage
    pub fn memory(&self, percent: f64) -> Tier {
        classify(percent, &self.thresholds.memory)
    }
}
