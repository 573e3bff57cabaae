use serde::Serialize;

use crate::model::records::ForecastId;
use crate::model::results::{IntervalScoreResult, WeightedIntervalScoreResult};

/// Scores for one identifier across all configured interval ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampedScore {
    pub id: ForecastId,
    pub observation: f64,
    pub intervals: Vec<IntervalScoreResult>,
    pub wis: WeightedIntervalScoreResult,
    pub median_absolute_error: Option<MedianError>,
    pub point_absolute_error: Option<f64>,
}

/// Absolute error of the median split by the side the observation fell on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MedianError {
    pub total: f64,
    /// Median above the observation.
    pub lower_side: f64,
    /// Median below the observation.
    pub upper_side: f64,
}
