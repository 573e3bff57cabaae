use crate::error::ScoreError;
use crate::model::interval::{PredictionInterval, check_observation};
use crate::model::results::IntervalScoreResult;
use crate::model::scores::MedianError;

/// Interval score of `[lower, upper]` at nominal `level` against observation `y`.
///
/// `score = (upper - lower) + 2/alpha * (lower - y)[y < lower] + 2/alpha * (y - upper)[y > upper]`
/// with `alpha = 1 - level`.
pub fn interval_score(
    lower: f64,
    upper: f64,
    level: f64,
    y: f64,
) -> Result<IntervalScoreResult, ScoreError> {
    let interval = PredictionInterval::new(lower, upper, level)?;
    score_interval(&interval, y)
}

pub fn score_interval(
    interval: &PredictionInterval,
    y: f64,
) -> Result<IntervalScoreResult, ScoreError> {
    check_observation(y)?;
    let scale = 2.0 / interval.alpha();
    let width = interval.width();
    let lower_penalty = if y < interval.lower() {
        scale * (interval.lower() - y)
    } else {
        0.0
    };
    let upper_penalty = if y > interval.upper() {
        scale * (y - interval.upper())
    } else {
        0.0
    };
    Ok(IntervalScoreResult {
        level: interval.level(),
        score: width + lower_penalty + upper_penalty,
        coverage: interval.contains(y),
        width,
        lower_penalty,
        upper_penalty,
    })
}

pub fn sharpness(lower: f64, upper: f64) -> Result<f64, ScoreError> {
    let width = upper - lower;
    if width >= 0.0 && width.is_finite() {
        Ok(width)
    } else {
        Err(ScoreError::InvalidInterval {
            detail: format!("[{lower}, {upper}] has negative or undefined width"),
        })
    }
}

pub fn coverage(lower: f64, upper: f64, y: f64) -> Result<bool, ScoreError> {
    sharpness(lower, upper)?;
    check_observation(y)?;
    Ok(lower <= y && y <= upper)
}

/// Signed miss of `[lower, upper]` relative to `y`, in `[-1, 1]`.
///
/// Zero when covered. Positive when the interval lies above the observation
/// (over-prediction), negative when below. The magnitude is `d / (width + d)`
/// where `d` is the distance from `y` to the nearest bound.
pub fn bias(lower: f64, upper: f64, y: f64) -> Result<f64, ScoreError> {
    let width = sharpness(lower, upper)?;
    check_observation(y)?;
    if y < lower {
        let d = lower - y;
        Ok(d / (width + d))
    } else if y > upper {
        let d = y - upper;
        Ok(-d / (width + d))
    } else {
        Ok(0.0)
    }
}

pub fn absolute_error(y: f64, prediction: f64) -> Result<f64, ScoreError> {
    check_observation(y)?;
    if !prediction.is_finite() {
        return Err(ScoreError::InvalidInterval {
            detail: format!("point prediction {prediction} is not finite"),
        });
    }
    Ok((y - prediction).abs())
}

pub fn median_error(y: f64, median: f64) -> Result<MedianError, ScoreError> {
    let total = absolute_error(y, median)?;
    let (lower_side, upper_side) = if median > y {
        (total, 0.0)
    } else {
        (0.0, total)
    };
    Ok(MedianError {
        total,
        lower_side,
        upper_side,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/interval.rs"]
mod tests;
