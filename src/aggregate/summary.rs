use serde::Serialize;

use crate::aggregate::{Aggregator, ScoreTable, coverage_rate};
use crate::error::ScoreError;
use crate::model::records::ForecastId;
use crate::model::scores::TimestampedScore;

const LEVEL_EPS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeCoverage {
    pub range: f64,
    pub coverage: f64,
}

/// Share of the WIS total contributed by one interval range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeContribution {
    pub range: f64,
    pub dispersion: f64,
    pub lower_penalty: f64,
    pub upper_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WisDecomposition {
    pub ranges: Vec<RangeContribution>,
    pub median_lower_penalty: f64,
    pub median_upper_penalty: f64,
    pub dispersion: f64,
    pub lower_penalty: f64,
    pub upper_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub group: String,
    pub wis_mean: f64,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub n_matched: usize,
    pub wis_total: f64,
    pub wis_mean: f64,
    pub median_absolute_error_mean: Option<f64>,
    pub point_absolute_error_total: Option<f64>,
    pub point_absolute_error_mean: Option<f64>,
    pub coverage: Vec<RangeCoverage>,
    /// Absent when the WIS total is zero.
    pub decomposition: Option<WisDecomposition>,
    pub by_model: Vec<GroupMean>,
    pub by_location: Vec<GroupMean>,
    pub by_horizon: Vec<GroupMean>,
}

impl Aggregator {
    pub fn summarize(&self, scores: &[TimestampedScore]) -> Result<Summary, ScoreError> {
        if scores.is_empty() {
            return Err(ScoreError::InsufficientData("no scored forecasts to summarize"));
        }

        let pairs: Vec<(ForecastId, f64)> =
            scores.iter().map(|s| (s.id.clone(), s.wis.wis)).collect();
        let table = self.aggregate(&pairs)?;
        let wis_total = table.total();
        let wis_mean = table.mean().unwrap_or(0.0);

        let median_errors: Vec<f64> = scores
            .iter()
            .filter_map(|s| s.median_absolute_error.map(|e| e.total))
            .collect();
        let point_errors: Vec<f64> = scores.iter().filter_map(|s| s.point_absolute_error).collect();
        let point_total: Option<f64> =
            (!point_errors.is_empty()).then(|| point_errors.iter().sum());

        let mut coverage = Vec::with_capacity(self.config().interval_ranges.len());
        for &range in &self.config().interval_ranges {
            let level = range / 100.0;
            let results: Vec<_> = scores
                .iter()
                .filter_map(|s| {
                    s.intervals
                        .iter()
                        .find(|r| (r.level - level).abs() < LEVEL_EPS)
                        .copied()
                })
                .collect();
            if results.is_empty() {
                return Err(ScoreError::MissingRange { range });
            }
            coverage.push(RangeCoverage {
                range,
                coverage: coverage_rate(&results)?,
            });
        }

        let decomposition = if wis_total > 0.0 {
            Some(self.decompose(scores, wis_total))
        } else {
            None
        };

        Ok(Summary {
            n_matched: table.len(),
            wis_total,
            wis_mean,
            median_absolute_error_mean: mean_of(&median_errors),
            point_absolute_error_total: point_total,
            point_absolute_error_mean: mean_of(&point_errors),
            coverage,
            decomposition,
            by_model: group_means(self.group_by(&table, |id| id.model.clone())?),
            by_location: group_means(self.group_by(&table, |id| id.location.clone())?),
            by_horizon: self.horizon_means(&table)?,
        })
    }

    fn decompose(&self, scores: &[TimestampedScore], wis_total: f64) -> WisDecomposition {
        let mut ranges: Vec<RangeContribution> = self
            .config()
            .interval_ranges
            .iter()
            .map(|&range| RangeContribution {
                range,
                dispersion: 0.0,
                lower_penalty: 0.0,
                upper_penalty: 0.0,
            })
            .collect();
        let mut median_lower = 0.0;
        let mut median_upper = 0.0;

        for s in scores {
            let denom = s.wis.denominator();
            if denom <= 0.0 {
                continue;
            }
            if let Some(err) = s.median_absolute_error {
                median_lower += 0.5 * err.lower_side / denom;
                median_upper += 0.5 * err.upper_side / denom;
            }
            for contribution in ranges.iter_mut() {
                let level = contribution.range / 100.0;
                let Some(r) = s
                    .intervals
                    .iter()
                    .find(|r| (r.level - level).abs() < LEVEL_EPS)
                else {
                    // Not part of this row's WIS; summarize already rejected
                    // ranges absent from every row.
                    continue;
                };
                let weight = 0.5 * (1.0 - r.level) / denom;
                contribution.dispersion += weight * r.width;
                contribution.lower_penalty += weight * r.lower_penalty;
                contribution.upper_penalty += weight * r.upper_penalty;
            }
        }

        for c in ranges.iter_mut() {
            c.dispersion /= wis_total;
            c.lower_penalty /= wis_total;
            c.upper_penalty /= wis_total;
        }
        let median_lower_penalty = median_lower / wis_total;
        let median_upper_penalty = median_upper / wis_total;

        let dispersion = ranges.iter().map(|c| c.dispersion).sum::<f64>();
        let lower_penalty =
            ranges.iter().map(|c| c.lower_penalty).sum::<f64>() + median_lower_penalty;
        let upper_penalty =
            ranges.iter().map(|c| c.upper_penalty).sum::<f64>() + median_upper_penalty;

        WisDecomposition {
            ranges,
            median_lower_penalty,
            median_upper_penalty,
            dispersion,
            lower_penalty,
            upper_penalty,
        }
    }

    fn horizon_means(&self, table: &ScoreTable<ForecastId>) -> Result<Vec<GroupMean>, ScoreError> {
        if table.iter().all(|e| e.id.horizon.is_none()) {
            return Ok(Vec::new());
        }
        let grouped = self.group_by(table, |id| id.horizon)?;
        Ok(grouped
            .iter()
            .map(|e| GroupMean {
                group: e.id.map(|h| h.to_string()).unwrap_or_else(|| "none".to_string()),
                wis_mean: e.score,
                n: e.count,
            })
            .collect())
    }
}

fn group_means(table: ScoreTable<String>) -> Vec<GroupMean> {
    table
        .iter()
        .map(|e| GroupMean {
            group: e.id.clone(),
            wis_mean: e.score,
            n: e.count,
        })
        .collect()
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
