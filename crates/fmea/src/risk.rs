//! Risk bands derived from RPN.
//!
//! A function's overall risk is the band of its highest RPN. The same bands
//! are applied to each fault's own RPN to pick its badge.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ranking::{highest_rpn, RankedFault};

/// A discrete risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// RPN below the low threshold.
    VeryLow,
    /// RPN at or above the low threshold.
    Low,
    /// RPN at or above the medium threshold.
    Medium,
    /// RPN at or above the high threshold.
    High,
}

impl RiskLevel {
    /// Display-only color tag for badges.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "yellow",
            Self::VeryLow => "green",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
            Self::VeryLow => write!(f, "Very Low"),
        }
    }
}

/// Lower bounds (inclusive) of the High, Medium and Low bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Minimum RPN for High.
    pub high: f64,
    /// Minimum RPN for Medium.
    pub medium: f64,
    /// Minimum RPN for Low.
    pub low: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 200.0,
            medium: 120.0,
            low: 80.0,
        }
    }
}

impl RiskThresholds {
    /// Check that the bounds are positive and strictly descending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if they are not.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.high, self.medium, self.low]
            .iter()
            .all(|bound| bound.is_finite());
        if !finite || self.low <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "risk thresholds must be finite and positive (high {}, medium {}, low {})",
                    self.high, self.medium, self.low
                ),
            });
        }
        if !(self.high > self.medium && self.medium > self.low) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "risk thresholds must satisfy high > medium > low (high {}, medium {}, low {})",
                    self.high, self.medium, self.low
                ),
            });
        }
        Ok(())
    }

    /// Band of a single RPN.
    #[must_use]
    pub fn classify(&self, rpn: f64) -> RiskLevel {
        if rpn >= self.high {
            RiskLevel::High
        } else if rpn >= self.medium {
            RiskLevel::Medium
        } else if rpn >= self.low {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }

    /// Overall band of a function from its ranked faults.
    ///
    /// Uses the first (highest) RPN, or 0 when the function has no faults.
    #[must_use]
    pub fn function_risk(&self, ranked: &[RankedFault]) -> RiskLevel {
        self.classify(highest_rpn(ranked))
    }
}

/// Band of a single RPN with the default thresholds.
#[must_use]
pub fn classify(rpn: f64) -> RiskLevel {
    RiskThresholds::default().classify(rpn)
}
