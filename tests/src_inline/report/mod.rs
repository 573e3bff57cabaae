use super::*;
use crate::aggregate::summary::{GroupMean, RangeCoverage};

fn summary() -> Summary {
    Summary {
        n_matched: 3,
        wis_total: 3.0,
        wis_mean: 1.0,
        median_absolute_error_mean: Some(0.5),
        point_absolute_error_total: None,
        point_absolute_error_mean: None,
        coverage: vec![
            RangeCoverage { range: 50.0, coverage: 1.0 },
            RangeCoverage { range: 90.0, coverage: 0.9 },
        ],
        decomposition: None,
        by_model: vec![GroupMean { group: "m".to_string(), wis_mean: 1.0, n: 3 }],
        by_location: Vec::new(),
        by_horizon: Vec::new(),
    }
}

#[test]
fn test_format_range() {
    assert_eq!(format_range(90.0), "90");
    assert_eq!(format_range(97.5), "97.5");
}

#[test]
fn test_format_opt() {
    assert_eq!(format_opt_6(None), "NA");
    assert_eq!(format_opt_6(Some(0.5)), "0.500000");
}

#[test]
fn test_text_report_sections() {
    let summary = summary();
    let config = ScoringConfig::default();
    let inputs = RunInputs::default();
    let doc = SummaryDocument {
        tool: ToolMeta::default(),
        inputs: &inputs,
        config: &config,
        n_skipped: 0,
        n_unmatched: 0,
        summary: &summary,
    };
    let text = text::render_report_text(&doc);
    assert!(text.contains("WIS mean: 1.000000"));
    assert!(text.contains("50% interval: 1.000000 (over-covers; intervals wider than needed)"));
    assert!(text.contains("90% interval: 0.900000 (close to nominal)"));
    assert!(text.contains("decomposition undefined"));
    assert!(!text.contains("Point absolute error"));
    assert!(!text.contains("Skipped"));

    let json = json::render_summary_json(&doc).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["coverage"][1]["range"], 90.0);
    assert!(value["summary"]["decomposition"].is_null());
}
