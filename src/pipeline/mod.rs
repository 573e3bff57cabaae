pub mod stage1_align;
pub mod stage2_score;
pub mod stage3_summary;
pub mod stage4_report;

use std::path::PathBuf;

use crate::aggregate::{Aggregator, Summary};
use crate::error::Result;
use crate::input::{load_observations, load_predictions};
use crate::model::config::ScoringConfig;
use crate::report::{RunInputs, ToolMeta};

use stage1_align::run_stage1;
use stage2_score::run_stage2;
use stage3_summary::run_stage3;
use stage4_report::{Stage4Input, write_reports};

#[derive(Debug, Clone)]
pub struct ScoreRun {
    pub observations: PathBuf,
    pub predictions: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub config: ScoringConfig,
}

/// Loads, aligns, scores, summarizes and writes reports for one run.
pub fn run_pipeline(run: &ScoreRun) -> Result<Summary> {
    run.config.validate()?;

    let observations = load_observations(&run.observations)?;
    let mut predictions = Vec::new();
    for path in &run.predictions {
        predictions.extend(load_predictions(path)?);
    }

    let stage1 = run_stage1(&observations, &predictions, &run.config)?;

    let scores = run_stage2(&stage1.forecasts)?;
    let aggregator = Aggregator::new(run.config.aggregator());
    let summary = run_stage3(&scores, &aggregator)?;

    let inputs = RunInputs {
        observations: run.observations.display().to_string(),
        predictions: run
            .predictions
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
    };
    write_reports(
        &Stage4Input {
            scores: &scores,
            summary: &summary,
            config: &run.config,
            inputs: &inputs,
            tool: ToolMeta::default(),
            n_skipped: stage1.skipped,
            n_unmatched: stage1.unmatched,
        },
        &run.out_dir,
    )?;

    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/run.rs"]
mod tests;
