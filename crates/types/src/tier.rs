//! Severity tiers and the display accents they map to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of metric a threshold table describes.
///
/// The kind only affects how tiers are named; the four-tier shape is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Degrees Celsius
    Temperature,
    /// Utilization-like percentage (0.0 to 100.0)
    Percentage,
}

/// One of four ordered severity buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Below every bound ("cool" / "low")
    Base,
    /// "normal"
    Normal,
    /// "warm" / "high"
    Elevated,
    /// At or above the highest bound ("hot" / "critical")
    Top,
}

impl Tier {
    /// All tiers, lowest first
    pub const ALL: [Tier; 4] = [Tier::Base, Tier::Normal, Tier::Elevated, Tier::Top];

    /// Display accent for this tier (1:1 mapping)
    pub fn accent(self) -> Accent {
        match self {
            Tier::Base => Accent::Cold,
            Tier::Normal => Accent::Ok,
            Tier::Elevated => Accent::Warning,
            Tier::Top => Accent::Danger,
        }
    }

    /// Human-readable tier name for the given metric kind
    pub fn name(self, kind: MetricKind) -> &'static str {
        match (kind, self) {
            (MetricKind::Temperature, Tier::Base) => "cool",
            (MetricKind::Temperature, Tier::Normal) => "normal",
            (MetricKind::Temperature, Tier::Elevated) => "warm",
            (MetricKind::Temperature, Tier::Top) => "hot",
            (MetricKind::Percentage, Tier::Base) => "low",
            (MetricKind::Percentage, Tier::Normal) => "normal",
            (MetricKind::Percentage, Tier::Elevated) => "high",
            (MetricKind::Percentage, Tier::Top) => "critical",
        }
    }
}

/// Display accent attached to styled text.
///
/// The rendering backend decides the concrete color for each accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Cold,
    Ok,
    Warning,
    Danger,
}

impl Accent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accent::Cold => "cold",
            Accent::Ok => "ok",
            Accent::Warning => "warning",
            Accent::Danger => "danger",
        }
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_accent_mapping() {
        assert_eq!(Tier::Base.accent(), Accent::Cold);
        assert_eq!(Tier::Normal.accent(), Accent::Ok);
        assert_eq!(Tier::Elevated.accent(), Accent::Warning);
        assert_eq!(Tier::Top.accent(), Accent::Danger);
    }

    #[test]
    fn test_tier_names_per_kind() {
        let temp: Vec<_> = Tier::ALL
            .iter()
            .map(|t| t.name(MetricKind::Temperature))
            .collect();
        assert_eq!(temp, ["cool", "normal", "warm", "hot"]);

        let pct: Vec<_> = Tier::ALL
            .iter()
            .map(|t| t.name(MetricKind::Percentage))
            .collect();
        assert_eq!(pct, ["low", "normal", "high", "critical"]);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::Base < Tier::Normal);
        assert!(Tier::Elevated < Tier::Top);
    }
}
