use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalScoreResult {
    pub level: f64,
    pub score: f64,
    pub coverage: bool,
    /// Width of the interval, the dispersion part of the score.
    pub width: f64,
    /// Penalty for an observation below the lower bound.
    pub lower_penalty: f64,
    /// Penalty for an observation above the upper bound.
    pub upper_penalty: f64,
}

/// Weighted interval score with its additive decomposition.
///
/// `dispersion + lower_penalty + upper_penalty == wis` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedIntervalScoreResult {
    pub wis: f64,
    pub dispersion: f64,
    pub lower_penalty: f64,
    pub upper_penalty: f64,
    pub n_levels: usize,
    pub median_included: bool,
}

impl WeightedIntervalScoreResult {
    /// Normalizing constant applied to the weighted sum.
    pub fn denominator(&self) -> f64 {
        wis_denominator(self.n_levels, self.median_included)
    }
}

pub fn wis_denominator(n_levels: usize, median_included: bool) -> f64 {
    if median_included {
        n_levels as f64 + 0.5
    } else {
        n_levels as f64
    }
}
