use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::error::ScoreError;
use crate::model::config::{MissingPolicy, ScoringConfig};
use crate::model::interval::{PredictionInterval, quantile_pair};
use crate::model::records::{
    AlignedForecast, ForecastId, ObservationRecord, PredictionKind, PredictionRecord,
};

#[derive(Debug, Error)]
pub enum AlignError {
    #[error(
        "model {model}: predictions and observations cover different (location, date) keys \
         ({only_predicted} only predicted, {only_observed} only observed)"
    )]
    KeyMismatch {
        model: String,
        only_predicted: usize,
        only_observed: usize,
    },
    #[error("duplicate observation for location {location} at {date}")]
    DuplicateObservation { location: String, date: String },
    #[error("{id}: quantile {quantile} given more than once")]
    DuplicateQuantile { id: ForecastId, quantile: f64 },
    #[error("{id}: point prediction given more than once")]
    DuplicatePoint { id: ForecastId },
    #[error("{id}: median (0.5 quantile) is required but missing")]
    MissingMedian { id: ForecastId },
    #[error("{id}: quantile {quantile} needed for the {range}% interval is missing")]
    MissingQuantile {
        id: ForecastId,
        quantile: f64,
        range: f64,
    },
    #[error("{id}: {what} is missing or NaN")]
    MissingValue { id: ForecastId, what: &'static str },
    #[error("{id}: {source}")]
    Interval {
        id: ForecastId,
        #[source]
        source: ScoreError,
    },
    #[error("no forecasts left to score after alignment")]
    NothingToScore,
}

#[derive(Debug, Clone)]
pub struct Stage1Output {
    pub forecasts: Vec<AlignedForecast>,
    /// Identifiers dropped because of a missing value under `MissingPolicy::Skip`.
    pub skipped: usize,
    /// Prediction identifiers without an observation (only with `allow_mismatch`).
    pub unmatched: usize,
}

type ObsKey = (String, String);

pub fn run_stage1(
    observations: &[ObservationRecord],
    predictions: &[PredictionRecord],
    config: &ScoringConfig,
) -> Result<Stage1Output, AlignError> {
    let mut observed: HashMap<ObsKey, f64> = HashMap::with_capacity(observations.len());
    for obs in observations {
        let key = (obs.location.clone(), obs.date.clone());
        if observed.insert(key, obs.value).is_some() {
            return Err(AlignError::DuplicateObservation {
                location: obs.location.clone(),
                date: obs.date.clone(),
            });
        }
    }

    let groups = group_predictions(predictions);
    check_keys(&observed, &groups, config.allow_mismatch)?;

    let mut forecasts = Vec::with_capacity(groups.len());
    let mut skipped = 0usize;
    let mut unmatched = 0usize;

    for (id, rows) in &groups {
        let key = (id.location.clone(), id.target_end_date.clone());
        let Some(&y) = observed.get(&key) else {
            unmatched += 1;
            continue;
        };
        match align_one(id, y, rows, config) {
            Ok(forecast) => forecasts.push(forecast),
            Err(AlignError::MissingValue { id, what }) if config.missing == MissingPolicy::Skip => {
                tracing::warn!(%id, what, "skipping forecast with missing value");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if unmatched > 0 {
        tracing::warn!(unmatched, "predictions without observations were ignored");
    }
    if forecasts.is_empty() {
        return Err(AlignError::NothingToScore);
    }
    tracing::info!(
        forecasts = forecasts.len(),
        skipped,
        unmatched,
        "aligned predictions with observations"
    );

    Ok(Stage1Output {
        forecasts,
        skipped,
        unmatched,
    })
}

fn group_predictions(predictions: &[PredictionRecord]) -> Vec<(ForecastId, Vec<&PredictionRecord>)> {
    let mut index: HashMap<ForecastId, usize> = HashMap::new();
    let mut groups: Vec<(ForecastId, Vec<&PredictionRecord>)> = Vec::new();
    for record in predictions {
        let id = record.id();
        match index.get(&id) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(id.clone(), groups.len());
                groups.push((id, vec![record]));
            }
        }
    }
    groups
}

fn check_keys(
    observed: &HashMap<ObsKey, f64>,
    groups: &[(ForecastId, Vec<&PredictionRecord>)],
    allow_mismatch: bool,
) -> Result<(), AlignError> {
    let obs_keys: BTreeSet<&ObsKey> = observed.keys().collect();
    let mut by_model: Vec<(&str, BTreeSet<ObsKey>)> = Vec::new();
    for (id, _) in groups {
        let key = (id.location.clone(), id.target_end_date.clone());
        match by_model.iter_mut().find(|(m, _)| *m == id.model) {
            Some((_, keys)) => {
                keys.insert(key);
            }
            None => by_model.push((id.model.as_str(), BTreeSet::from([key]))),
        }
    }

    for (model, keys) in &by_model {
        let only_predicted = keys.iter().filter(|k| !obs_keys.contains(k)).count();
        let only_observed = obs_keys.iter().filter(|k| !keys.contains(**k)).count();
        if only_predicted == 0 && only_observed == 0 {
            continue;
        }
        if !allow_mismatch {
            return Err(AlignError::KeyMismatch {
                model: model.to_string(),
                only_predicted,
                only_observed,
            });
        }
        tracing::warn!(
            model,
            only_predicted,
            only_observed,
            "scoring the intersection of predicted and observed keys"
        );
    }
    Ok(())
}

fn align_one(
    id: &ForecastId,
    y: f64,
    rows: &[&PredictionRecord],
    config: &ScoringConfig,
) -> Result<AlignedForecast, AlignError> {
    if !y.is_finite() {
        return Err(AlignError::MissingValue {
            id: id.clone(),
            what: "observation",
        });
    }

    let tol = config.quantile_tolerance;
    let mut quantiles: Vec<(f64, f64)> = Vec::with_capacity(rows.len());
    let mut point = None;
    for row in rows {
        match row.kind {
            PredictionKind::Quantile(q) => {
                if quantiles.iter().any(|&(prev, _)| (prev - q).abs() < tol) {
                    return Err(AlignError::DuplicateQuantile {
                        id: id.clone(),
                        quantile: q,
                    });
                }
                quantiles.push((q, row.value));
            }
            PredictionKind::Point => {
                if point.is_some() {
                    return Err(AlignError::DuplicatePoint { id: id.clone() });
                }
                point = Some(row.value);
            }
        }
    }
    let lookup = |q: f64| {
        quantiles
            .iter()
            .find(|&&(level, _)| (level - q).abs() < tol)
            .map(|&(_, v)| v)
    };
    let finite = |value: f64, what: &'static str| {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AlignError::MissingValue {
                id: id.clone(),
                what,
            })
        }
    };

    let median = match lookup(0.5) {
        Some(_) if !config.include_median => None,
        Some(v) => Some(finite(v, "median")?),
        None if config.require_median => {
            return Err(AlignError::MissingMedian { id: id.clone() });
        }
        None => None,
    };
    let point = point.map(|v| finite(v, "point prediction")).transpose()?;

    let mut intervals = Vec::with_capacity(config.interval_ranges.len());
    for &range in &config.interval_ranges {
        let (q_low, q_upp) = quantile_pair(range).map_err(|source| AlignError::Interval {
            id: id.clone(),
            source,
        })?;
        let missing = |quantile| AlignError::MissingQuantile {
            id: id.clone(),
            quantile,
            range,
        };
        let lower = finite(lookup(q_low).ok_or_else(|| missing(q_low))?, "lower quantile")?;
        let upper = finite(lookup(q_upp).ok_or_else(|| missing(q_upp))?, "upper quantile")?;
        let interval = PredictionInterval::from_range(lower, upper, range).map_err(|source| {
            AlignError::Interval {
                id: id.clone(),
                source,
            }
        })?;
        intervals.push(interval);
    }

    Ok(AlignedForecast {
        id: id.clone(),
        observation: y,
        median,
        point,
        intervals,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_align.rs"]
mod tests;
