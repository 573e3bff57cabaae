use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::aggregate::{Summary, coverage_rate};
use crate::error::Result;
use crate::model::config::ScoringConfig;
use crate::model::scores::TimestampedScore;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{RunInputs, SummaryDocument, ToolMeta, format_f64_6, format_opt_6, format_range};

#[derive(Debug, Clone)]
pub struct Stage4Input<'a> {
    pub scores: &'a [TimestampedScore],
    pub summary: &'a Summary,
    pub config: &'a ScoringConfig,
    pub inputs: &'a RunInputs,
    pub tool: ToolMeta,
    pub n_skipped: usize,
    pub n_unmatched: usize,
}

impl<'a> Stage4Input<'a> {
    fn document(&self) -> SummaryDocument<'a> {
        SummaryDocument {
            tool: self.tool.clone(),
            inputs: self.inputs,
            config: self.config,
            n_skipped: self.n_skipped,
            n_unmatched: self.n_unmatched,
            summary: self.summary,
        }
    }
}

/// Writes `scores.tsv`, `model_scores.tsv`, `summary.json` and `report.txt` into `out_dir`.
pub fn write_reports(input: &Stage4Input<'_>, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    write_scores_tsv(input, &out_dir.join("scores.tsv"))?;
    write_model_tsv(input, &out_dir.join("model_scores.tsv"))?;

    let doc = input.document();
    let json = render_summary_json(&doc)?;
    write_text(&out_dir.join("summary.json"), &json)?;

    let report = render_report_text(&doc);
    write_text(&out_dir.join("report.txt"), &report)?;

    tracing::info!(out = %out_dir.display(), rows = input.scores.len(), "wrote reports");
    Ok(())
}

fn write_scores_tsv(input: &Stage4Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let ranges = &input.config.interval_ranges;

    let mut header: Vec<String> = [
        "model",
        "location",
        "target_end_date",
        "horizon",
        "observation",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for &r in ranges {
        let r = format_range(r);
        header.push(format!("{r}_interval_score"));
        header.push(format!("{r}_coverage"));
        header.push(format!("{r}_dispersion"));
        header.push(format!("{r}_lower_penalty"));
        header.push(format!("{r}_upper_penalty"));
    }
    header.extend(
        [
            "wis",
            "wis_dispersion",
            "wis_lower_penalty",
            "wis_upper_penalty",
            "median_absolute_error",
            "point_absolute_error",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    writeln!(w, "{}", header.join("\t"))?;

    for s in input.scores {
        let mut row = vec![
            s.id.model.clone(),
            s.id.location.clone(),
            s.id.target_end_date.clone(),
            s.id.horizon.map(|h| h.to_string()).unwrap_or_else(|| "NA".to_string()),
            format_f64_6(s.observation),
        ];
        for iv in &s.intervals {
            row.push(format_f64_6(iv.score));
            row.push(if iv.coverage { "1" } else { "0" }.to_string());
            row.push(format_f64_6(iv.width));
            row.push(format_f64_6(iv.lower_penalty));
            row.push(format_f64_6(iv.upper_penalty));
        }
        row.push(format_f64_6(s.wis.wis));
        row.push(format_f64_6(s.wis.dispersion));
        row.push(format_f64_6(s.wis.lower_penalty));
        row.push(format_f64_6(s.wis.upper_penalty));
        row.push(format_opt_6(s.median_absolute_error.map(|e| e.total)));
        row.push(format_opt_6(s.point_absolute_error));
        writeln!(w, "{}", row.join("\t"))?;
    }

    w.flush()
}

fn write_model_tsv(input: &Stage4Input<'_>, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let ranges = &input.config.interval_ranges;

    let mut header: Vec<String> = [
        "model",
        "n",
        "wis_mean",
        "dispersion_mean",
        "lower_penalty_mean",
        "upper_penalty_mean",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for &r in ranges {
        header.push(format!("{}_coverage", format_range(r)));
    }
    writeln!(w, "{}", header.join("\t"))?;

    let mut model_map: BTreeMap<&str, Vec<&TimestampedScore>> = BTreeMap::new();
    for s in input.scores {
        model_map.entry(s.id.model.as_str()).or_default().push(s);
    }

    for (model, rows) in model_map {
        let n = rows.len();
        let mean = |f: fn(&TimestampedScore) -> f64| rows.iter().map(|s| f(s)).sum::<f64>() / n as f64;
        let mut row = vec![
            model.to_string(),
            n.to_string(),
            format_f64_6(mean(|s| s.wis.wis)),
            format_f64_6(mean(|s| s.wis.dispersion)),
            format_f64_6(mean(|s| s.wis.lower_penalty)),
            format_f64_6(mean(|s| s.wis.upper_penalty)),
        ];
        for k in 0..ranges.len() {
            let at_range: Vec<_> = rows.iter().filter_map(|s| s.intervals.get(k).copied()).collect();
            row.push(format_opt_6(coverage_rate(&at_range).ok()));
        }
        writeln!(w, "{}", row.join("\t"))?;
    }

    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
