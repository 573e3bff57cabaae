pub mod json;
pub mod text;

use serde::Serialize;

use crate::aggregate::Summary;
use crate::model::config::ScoringConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

impl Default for ToolMeta {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunInputs {
    pub observations: String,
    pub predictions: Vec<String>,
}

/// Everything written to `summary.json` and rendered into `report.txt`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryDocument<'a> {
    pub tool: ToolMeta,
    pub inputs: &'a RunInputs,
    pub config: &'a ScoringConfig,
    pub n_skipped: usize,
    pub n_unmatched: usize,
    pub summary: &'a Summary,
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_opt_6(v: Option<f64>) -> String {
    v.map(format_f64_6).unwrap_or_else(|| "NA".to_string())
}

pub fn format_range(range: f64) -> String {
    if range.fract() == 0.0 {
        format!("{}", range as i64)
    } else {
        format!("{range}")
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
