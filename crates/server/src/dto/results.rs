//! # Result Data Transfer Objects
//!
//! Aggregated scores come straight from the evaluation crate; these wrappers
//! add the display fields the result pages show.

use evaluation::{GapBand, ReceiverReport, ReceiverSummary};
use serde::Serialize;
use uuid::Uuid;

/// A receiver's full result page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverReportResponse {
    pub session_id:    Uuid,
    pub receiver_name: String,
    pub level_role:    Option<String>,
    /// Signed gap percentage, e.g. `-7.5%`
    pub gap_display:   Option<String>,
    #[serde(flatten)]
    pub report:        ReceiverReport,
}

/// One line of the session overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverSummaryResponse {
    pub receiver_name: Option<String>,
    pub gap_display:   Option<String>,
    #[serde(flatten)]
    pub summary:       ReceiverSummary,
}

/// Session-wide result overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionResultsResponse {
    pub session_id:      Uuid,
    pub receivers:       Vec<ReceiverSummaryResponse>,
    pub under_count:     usize,
    pub on_target_count: usize,
    pub over_count:      usize,
}

impl SessionResultsResponse {
    pub fn new(session_id: Uuid, receivers: Vec<ReceiverSummaryResponse>) -> Self {
        let count = |band: GapBand| {
            receivers
                .iter()
                .filter(|r| r.summary.gap.is_some_and(|g| g.band == band))
                .count()
        };
        Self {
            session_id,
            under_count: count(GapBand::Under),
            on_target_count: count(GapBand::OnTarget),
            over_count: count(GapBand::Over),
            receivers,
        }
    }
}

#[cfg(test)]
mod tests {
    use evaluation::Gap;

    use super::*;

    fn summary(gap: Option<Gap>) -> ReceiverSummaryResponse {
        ReceiverSummaryResponse {
            receiver_name: None,
            gap_display:   gap.and_then(|g| g.display_percent()),
            summary:       ReceiverSummary {
                receiver_id: Uuid::new_v4(),
                overall_mean: None,
                weighted_score: None,
                gap,
                received_count: 0,
                answered_count: 0,
            },
        }
    }

    #[test]
    fn test_band_counts() {
        let response = SessionResultsResponse::new(
            Uuid::new_v4(),
            vec![
                summary(Some(Gap::compute(3.7, 4.0))),
                summary(Some(Gap::compute(4.0, 4.0))),
                summary(Some(Gap::compute(3.0, 4.0))),
                summary(None),
            ],
        );
        assert_eq!(response.under_count, 2);
        assert_eq!(response.on_target_count, 1);
        assert_eq!(response.over_count, 0);
        assert_eq!(
            response.receivers[0].gap_display.as_deref(),
            Some("-7.5%")
        );
    }
}
