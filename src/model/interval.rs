use serde::Serialize;

use crate::error::ScoreError;

/// A central prediction interval with its nominal coverage level.
///
/// Only constructible through [`PredictionInterval::new`], so every value in
/// circulation satisfies `lower <= upper`, finite bounds and `0 < level < 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInterval {
    lower: f64,
    upper: f64,
    level: f64,
}

impl PredictionInterval {
    pub fn new(lower: f64, upper: f64, level: f64) -> Result<Self, ScoreError> {
        let invalid = |reason: &str| ScoreError::InvalidInterval {
            detail: format!("[{lower}, {upper}] at level {level}: {reason}"),
        };
        if !lower.is_finite() || !upper.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if lower > upper {
            return Err(invalid("lower bound exceeds upper bound"));
        }
        check_level(level).map_err(|_| invalid("level must lie strictly between 0 and 1"))?;
        Ok(Self {
            lower,
            upper,
            level,
        })
    }

    /// Builds the interval from a coverage expressed in percent (90 -> 0.9).
    pub fn from_range(lower: f64, upper: f64, range_percent: f64) -> Result<Self, ScoreError> {
        check_range(range_percent)?;
        Self::new(lower, upper, range_percent / 100.0)
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    /// Probability mass the interval leaves outside, `1 - level`.
    pub fn alpha(&self) -> f64 {
        1.0 - self.level
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, y: f64) -> bool {
        self.lower <= y && y <= self.upper
    }
}

pub fn check_level(level: f64) -> Result<(), ScoreError> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ScoreError::InvalidInterval {
            detail: format!("level {level} must lie strictly between 0 and 1"),
        })
    }
}

pub fn check_range(range_percent: f64) -> Result<(), ScoreError> {
    if range_percent > 0.0 && range_percent < 100.0 {
        Ok(())
    } else {
        Err(ScoreError::InvalidRange {
            range: range_percent,
        })
    }
}

pub fn check_observation(y: f64) -> Result<(), ScoreError> {
    if y.is_finite() {
        Ok(())
    } else {
        Err(ScoreError::InvalidObservation { value: y })
    }
}

/// Quantile levels bounding the central interval that covers `range_percent`.
pub fn quantile_pair(range_percent: f64) -> Result<(f64, f64), ScoreError> {
    check_range(range_percent)?;
    let half = range_percent / 200.0;
    Ok((0.5 - half, 0.5 + half))
}
