//! # Gap Against the Level Standard
//!
//! `gap = weighted score - standard`. Bands use fixed thresholds on the raw
//! gap; the percentage is relative to the standard.

use serde::{Deserialize, Serialize};

/// Below this gap the receiver is under the standard.
pub const GAP_UNDER_THRESHOLD: f64 = -0.05;
/// Above this gap the receiver is over the standard.
pub const GAP_OVER_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapBand {
    Under,
    OnTarget,
    Over,
}

impl GapBand {
    pub fn classify(gap: f64) -> Self {
        if gap < GAP_UNDER_THRESHOLD {
            Self::Under
        }
        else if gap > GAP_OVER_THRESHOLD {
            Self::Over
        }
        else {
            Self::OnTarget
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub value:   f64,
    /// `value / standard * 100`, so a gap of -0.3 on a 4.0 standard is -7.5,
    /// not -30. Absent when the standard is not positive.
    pub percent: Option<f64>,
    pub band:    GapBand,
}

impl Gap {
    pub fn compute(weighted_score: f64, standard: f64) -> Self {
        let value = weighted_score - standard;
        Self {
            value,
            percent: (standard > 0.0).then(|| value / standard * 100.0),
            band: GapBand::classify(value),
        }
    }

    /// Percentage with an explicit sign and one decimal, e.g. `-7.5%`.
    pub fn display_percent(&self) -> Option<String> { self.percent.map(|p| format!("{:+.1}%", p)) }
}
