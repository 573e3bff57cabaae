use super::*;
use crate::aggregate::Aggregator;
use crate::model::interval::PredictionInterval;
use crate::model::records::{AlignedForecast, ForecastId};
use crate::pipeline::stage2_score::run_stage2;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("epiwis_report_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn forecast(model: &str, y: f64) -> AlignedForecast {
    AlignedForecast {
        id: ForecastId {
            model: model.to_string(),
            location: "AL".to_string(),
            target_end_date: "2019-12-04".to_string(),
            horizon: Some(1),
        },
        observation: y,
        median: Some(2.0),
        point: None,
        intervals: vec![PredictionInterval::from_range(0.0, 2.0, 50.0).unwrap()],
    }
}

fn config() -> ScoringConfig {
    ScoringConfig {
        interval_ranges: vec![50.0],
        ..ScoringConfig::default()
    }
}

#[test]
fn test_writes_all_outputs() {
    let config = config();
    let scores = run_stage2(&[forecast("a", 1.0), forecast("b", 3.0)]).unwrap();
    let summary = Aggregator::new(config.aggregator()).summarize(&scores).unwrap();
    let inputs = RunInputs {
        observations: "truth.tsv".to_string(),
        predictions: vec!["a.tsv".to_string(), "b.tsv".to_string()],
    };
    let input = Stage4Input {
        scores: &scores,
        summary: &summary,
        config: &config,
        inputs: &inputs,
        tool: ToolMeta::default(),
        n_skipped: 0,
        n_unmatched: 0,
    };
    let dir = make_temp_dir();
    write_reports(&input, &dir).unwrap();

    let tsv = std::fs::read_to_string(dir.join("scores.tsv")).unwrap();
    let mut lines = tsv.lines();
    let header: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(header[0], "model");
    assert!(header.contains(&"50_interval_score"));
    assert_eq!(header.last(), Some(&"point_absolute_error"));
    let first: Vec<&str> = lines.next().unwrap().split('\t').collect();
    assert_eq!(first.len(), header.len());
    assert_eq!(first[0], "a");
    assert_eq!(first[3], "1");
    assert_eq!(first[5], "2.000000");
    assert_eq!(first[6], "1");
    assert_eq!(first[10], "0.666667");
    assert_eq!(first.last(), Some(&"NA"));
    assert_eq!(lines.count(), 1);

    let models = std::fs::read_to_string(dir.join("model_scores.tsv")).unwrap();
    let rows: Vec<&str> = models.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("a\t1\t0.666667"));
    assert!(rows[2].starts_with("b\t1\t1.333333"));
    assert!(rows[2].ends_with("0.000000"));

    let json = std::fs::read_to_string(dir.join("summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["n_matched"], 2);
    assert_eq!(value["config"]["interval_ranges"][0], 50.0);
    assert_eq!(value["tool"]["name"], "epiwis");

    let report = std::fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Scored forecasts: 2"));
    assert!(report.contains("50% interval: 0.500000"));
    assert!(report.contains("1. a wis_mean=0.666667"));
}

#[test]
fn test_skipped_and_unmatched_reported() {
    let config = config();
    let scores = run_stage2(&[forecast("a", 1.0)]).unwrap();
    let summary = Aggregator::new(config.aggregator()).summarize(&scores).unwrap();
    let inputs = RunInputs::default();
    let input = Stage4Input {
        scores: &scores,
        summary: &summary,
        config: &config,
        inputs: &inputs,
        tool: ToolMeta::default(),
        n_skipped: 2,
        n_unmatched: 1,
    };
    let dir = make_temp_dir();
    write_reports(&input, &dir).unwrap();

    let report = std::fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Skipped (missing values): 2"));
    assert!(report.contains("Unmatched predictions: 1"));
    let json = std::fs::read_to_string(dir.join("summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["n_skipped"], 2);
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_error_at_flush_is_reported() {
    assert!(write_text(Path::new("/dev/full"), "wis\n").is_err());
}
