use crate::error::ScoreError;
use crate::model::records::AlignedForecast;
use crate::model::results::IntervalScoreResult;
use crate::model::scores::TimestampedScore;
use crate::scoring::interval::{absolute_error, median_error, score_interval};
use crate::scoring::weighted::weighted_interval_score;

/// Scores every aligned forecast; the first failure aborts with its row index.
pub fn run_stage2(forecasts: &[AlignedForecast]) -> Result<Vec<TimestampedScore>, ScoreError> {
    let scores = forecasts
        .iter()
        .enumerate()
        .map(|(i, f)| score_forecast(f).map_err(|e| e.at_row(i)))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(rows = scores.len(), "scored forecasts");
    Ok(scores)
}

pub fn score_forecast(forecast: &AlignedForecast) -> Result<TimestampedScore, ScoreError> {
    let y = forecast.observation;
    let intervals = forecast
        .intervals
        .iter()
        .map(|iv| score_interval(iv, y))
        .collect::<Result<Vec<IntervalScoreResult>, _>>()?;
    let by_level: Vec<(f64, IntervalScoreResult)> =
        intervals.iter().map(|r| (r.level, *r)).collect();
    let wis = weighted_interval_score(&by_level, forecast.median, y)?;

    Ok(TimestampedScore {
        id: forecast.id.clone(),
        observation: y,
        intervals,
        wis,
        median_absolute_error: forecast.median.map(|m| median_error(y, m)).transpose()?,
        point_absolute_error: forecast.point.map(|p| absolute_error(y, p)).transpose()?,
    })
}
