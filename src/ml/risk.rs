use std::fmt;

use serde::Serialize;

use crate::config::RiskConfig;

/// Risk band of a fraud probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Normal,
    Moderate,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Normal => "normal",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RiskConfig {
    /// Bands are closed-open: `[0, low)` normal, `[low, high)` moderate, `[high, 1]` high.
    pub fn tier(&self, probability: f64) -> RiskTier {
        if probability >= self.high_threshold {
            RiskTier::High
        } else if probability >= self.low_threshold {
            RiskTier::Moderate
        } else {
            RiskTier::Normal
        }
    }

    pub fn label(&self, tier: RiskTier) -> &str {
        match tier {
            RiskTier::Normal => &self.normal_label,
            RiskTier::Moderate => &self.moderate_label,
            RiskTier::High => &self.high_label,
        }
    }

    /// Human-readable description of the three bands.
    pub fn explanation(&self) -> String {
        format!(
            "[0.00, {low:.2}): {normal}, [{low:.2}, {high:.2}): {moderate}, [{high:.2}, 1.00]: {high_label}",
            low = self.low_threshold,
            high = self.high_threshold,
            normal = self.normal_label,
            moderate = self.moderate_label,
            high_label = self.high_label,
        )
    }
}
