//! Threshold tables that split a metric range into tiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tier::{MetricKind, Tier};

/// Errors produced when validating a threshold table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("{0:?} thresholds must be finite numbers")]
    NonFinite(MetricKind),
    #[error("{kind:?} thresholds must be strictly increasing (got {normal} / {elevated} / {top})")]
    NotIncreasing {
        kind: MetricKind,
        normal: f64,
        elevated: f64,
        top: f64,
    },
    #[error("{field} thresholds must describe {expected:?} values, found {found:?}")]
    KindMismatch {
        field: &'static str,
        expected: MetricKind,
        found: MetricKind,
    },
}

/// Inclusive lower bounds for the three upper tiers of one metric.
///
/// Anything below `normal` is [`Tier::Base`]; anything at or above `top`
/// is [`Tier::Top`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub kind: MetricKind,
    pub normal: f64,
    pub elevated: f64,
    pub top: f64,
}

impl MetricThresholds {
    /// cool < 40 <= normal < 60 <= warm < 80 <= hot
    pub const TEMPERATURE: Self = Self {
        kind: MetricKind::Temperature,
        normal: 40.0,
        elevated: 60.0,
        top: 80.0,
    };

    /// low < 30 <= normal < 70 <= high < 90 <= critical
    pub const PERCENTAGE: Self = Self {
        kind: MetricKind::Percentage,
        normal: 30.0,
        elevated: 70.0,
        top: 90.0,
    };

    /// Build a validated table
    pub fn new(kind: MetricKind, normal: f64, elevated: f64, top: f64) -> Result<Self, ThresholdError> {
        let thresholds = Self {
            kind,
            normal,
            elevated,
            top,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Check that every bound is finite and the bounds strictly increase
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if !(self.normal.is_finite() && self.elevated.is_finite() && self.top.is_finite()) {
            return Err(ThresholdError::NonFinite(self.kind));
        }
        if !(self.normal < self.elevated && self.elevated < self.top) {
            return Err(ThresholdError::NotIncreasing {
                kind: self.kind,
                normal: self.normal,
                elevated: self.elevated,
                top: self.top,
            });
        }
        Ok(())
    }

    /// Inclusive lower bound of `tier` (`None` for the unbounded base tier)
    pub fn lower_bound(&self, tier: Tier) -> Option<f64> {
        match tier {
            Tier::Base => None,
            Tier::Normal => Some(self.normal),
            Tier::Elevated => Some(self.elevated),
            Tier::Top => Some(self.top),
        }
    }

    /// (tier, lower bound) pairs in increasing order
    pub fn bounds(&self) -> [(Tier, f64); 3] {
        [
            (Tier::Normal, self.normal),
            (Tier::Elevated, self.elevated),
            (Tier::Top, self.top),
        ]
    }
}

/// Threshold tables for every classified metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSet {
    pub temperature: MetricThresholds,
    pub utilization: MetricThresholds,
    pub memory: MetricThresholds,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            temperature: MetricThresholds::TEMPERATURE,
            utilization: MetricThresholds::PERCENTAGE,
            memory: MetricThresholds::PERCENTAGE,
        }
    }
}

impl ThresholdSet {
    /// Validate all tables and make sure each describes the right kind of value
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let tables = [
            ("temperature", MetricKind::Temperature, &self.temperature),
            ("utilization", MetricKind::Percentage, &self.utilization),
            ("memory", MetricKind::Percentage, &self.memory),
        ];
        for (field, expected, table) in tables {
            if table.kind != expected {
                return Err(ThresholdError::KindMismatch {
                    field,
                    expected,
                    found: table.kind,
                });
            }
            table.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        assert!(MetricThresholds::TEMPERATURE.validate().is_ok());
        assert!(MetricThresholds::PERCENTAGE.validate().is_ok());
        assert!(ThresholdSet::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_increasing_bounds() {
        let err = MetricThresholds::new(MetricKind::Percentage, 30.0, 30.0, 90.0).unwrap_err();
        assert!(matches!(err, ThresholdError::NotIncreasing { .. }));

        let err = MetricThresholds::new(MetricKind::Temperature, 80.0, 60.0, 40.0).unwrap_err();
        assert!(matches!(err, ThresholdError::NotIncreasing { .. }));
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let err = MetricThresholds::new(MetricKind::Temperature, f64::NAN, 60.0, 80.0).unwrap_err();
        assert_eq!(err, ThresholdError::NonFinite(MetricKind::Temperature));
    }

    #[test]
    fn test_set_rejects_swapped_kinds() {
        let set = ThresholdSet {
            temperature: MetricThresholds::PERCENTAGE,
            ..ThresholdSet::default()
        };
        assert!(matches!(
            set.validate(),
            Err(ThresholdError::KindMismatch { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_partial_set_deserialization_keeps_defaults() {
        let json = r#"{ "memory": { "kind": "percentage", "normal": 50.0, "elevated": 80.0, "top": 95.0 } }"#;
        let set: ThresholdSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.temperature, MetricThresholds::TEMPERATURE);
        assert_eq!(set.utilization, MetricThresholds::PERCENTAGE);
        assert_eq!(set.memory.top, 95.0);
    }

    #[test]
    fn test_lower_bounds() {
        let t = MetricThresholds::TEMPERATURE;
        assert_eq!(t.lower_bound(Tier::Base), None);
        assert_eq!(t.lower_bound(Tier::Top), Some(80.0));
        assert_eq!(t.bounds()[1], (Tier::Elevated, 60.0));
    }
}
