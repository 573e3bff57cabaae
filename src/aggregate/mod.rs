pub mod summary;
pub mod table;

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ScoreError;
use crate::model::config::AggregatorConfig;
use crate::model::results::IntervalScoreResult;

pub use summary::Summary;
pub use table::{ScoreTable, TableEntry};

use table::OrderedAccumulator;

/// Reduces per-identifier scores into tables and grouped means.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Averages repeated identifiers; output follows first-seen order.
    pub fn aggregate<K>(&self, scores: &[(K, f64)]) -> Result<ScoreTable<K>, ScoreError>
    where
        K: Clone + Eq + Hash + Debug,
    {
        if scores.is_empty() {
            return Err(ScoreError::InsufficientData("no scores to aggregate"));
        }
        let mut acc = OrderedAccumulator::new();
        for (i, (id, score)) in scores.iter().enumerate() {
            if !score.is_finite() {
                return Err(ScoreError::NonFiniteScore { value: *score }.at_row(i));
            }
            acc.add(id.clone(), *score);
        }
        mean_table(acc)
    }

    /// Mean of the table's scores per `key_fn` group, first-seen order.
    pub fn group_by<K, G, F>(
        &self,
        table: &ScoreTable<K>,
        key_fn: F,
    ) -> Result<ScoreTable<G>, ScoreError>
    where
        G: Clone + Eq + Hash + Debug,
        F: Fn(&K) -> G,
    {
        let mut acc = OrderedAccumulator::new();
        for entry in table.iter() {
            acc.add(key_fn(&entry.id), entry.score);
        }
        mean_table(acc)
    }

    pub fn coverage_rate(&self, results: &[IntervalScoreResult]) -> Result<f64, ScoreError> {
        coverage_rate(results)
    }
}

pub fn coverage_rate(results: &[IntervalScoreResult]) -> Result<f64, ScoreError> {
    if results.is_empty() {
        return Err(ScoreError::InsufficientData(
            "coverage rate of an empty result set is undefined",
        ));
    }
    let covered = results.iter().filter(|r| r.coverage).count();
    Ok(covered as f64 / results.len() as f64)
}

fn mean_table<K: Clone + Eq + Hash + Debug>(
    acc: OrderedAccumulator<K>,
) -> Result<ScoreTable<K>, ScoreError> {
    let mut entries = Vec::new();
    for (id, sum, count) in acc.into_parts() {
        if count == 0 {
            return Err(ScoreError::EmptyGroup {
                group: format!("{id:?}"),
            });
        }
        entries.push(TableEntry {
            id,
            score: sum / count as f64,
            count,
        });
    }
    Ok(ScoreTable::from_entries(entries))
}

#[cfg(test)]
#[path = "../../tests/src_inline/aggregate/tests.rs"]
mod tests;
