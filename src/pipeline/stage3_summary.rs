use crate::aggregate::{Aggregator, Summary};
use crate::error::ScoreError;
use crate::model::scores::TimestampedScore;

pub fn run_stage3(
    scores: &[TimestampedScore],
    aggregator: &Aggregator,
) -> Result<Summary, ScoreError> {
    let summary = aggregator.summarize(scores)?;
    tracing::info!(
        matched = summary.n_matched,
        wis_mean = summary.wis_mean,
        models = summary.by_model.len(),
        "aggregated scores"
    );
    for c in &summary.coverage {
        tracing::debug!(range = c.range, coverage = c.coverage, "empirical coverage");
    }
    Ok(summary)
}
