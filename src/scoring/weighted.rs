use crate::error::ScoreError;
use crate::model::interval::{check_level, check_observation};
use crate::model::results::{IntervalScoreResult, WeightedIntervalScoreResult, wis_denominator};
use crate::scoring::interval::median_error;

const LEVEL_EPS: f64 = 1e-9;

/// Weighted interval score over `K` levels, with an optional median term.
///
/// With a median: `(0.5 * |y - m| + sum(alpha_k / 2 * IS_k)) / (K + 0.5)`.
/// Without: `sum(alpha_k / 2 * IS_k) / K`.
///
/// The decomposition is built from each result's width and penalties, so it
/// sums to `wis` whenever the results came from [`score_interval`].
///
/// [`score_interval`]: crate::scoring::interval::score_interval
pub fn weighted_interval_score(
    results: &[(f64, IntervalScoreResult)],
    median: Option<f64>,
    y: f64,
) -> Result<WeightedIntervalScoreResult, ScoreError> {
    check_observation(y)?;
    if results.is_empty() && median.is_none() {
        return Err(ScoreError::InsufficientData(
            "weighted interval score needs at least one interval or a median",
        ));
    }

    for (i, &(level, result)) in results.iter().enumerate() {
        check_level(level)?;
        if (level - result.level).abs() >= LEVEL_EPS {
            return Err(ScoreError::InvalidInterval {
                detail: format!(
                    "weight level {level} does not match the level {} the interval was scored at",
                    result.level
                ),
            });
        }
        if !result.score.is_finite() {
            return Err(ScoreError::NonFiniteScore {
                value: result.score,
            });
        }
        if results[..i]
            .iter()
            .any(|&(prev, _)| (prev - level).abs() < LEVEL_EPS)
        {
            return Err(ScoreError::DuplicateLevel { level });
        }
    }

    let mut total = 0.0;
    let mut dispersion = 0.0;
    let mut lower_penalty = 0.0;
    let mut upper_penalty = 0.0;

    if let Some(m) = median {
        let err = median_error(y, m)?;
        total += 0.5 * err.total;
        lower_penalty += 0.5 * err.lower_side;
        upper_penalty += 0.5 * err.upper_side;
    }

    for (level, result) in results {
        let weight = 0.5 * (1.0 - level);
        total += weight * result.score;
        dispersion += weight * result.width;
        lower_penalty += weight * result.lower_penalty;
        upper_penalty += weight * result.upper_penalty;
    }

    let denom = wis_denominator(results.len(), median.is_some());

    Ok(WeightedIntervalScoreResult {
        wis: total / denom,
        dispersion: dispersion / denom,
        lower_penalty: lower_penalty / denom,
        upper_penalty: upper_penalty / denom,
        n_levels: results.len(),
        median_included: median.is_some(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/weighted.rs"]
mod tests;
