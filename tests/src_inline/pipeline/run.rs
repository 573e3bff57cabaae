use super::*;
use crate::error::{Error, ScoreError};
use crate::pipeline::stage1_align::AlignError;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("epiwis_run_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_inputs(dir: &Path, extra_prediction: &str) -> (PathBuf, PathBuf) {
    let truth = dir.join("truth.csv");
    fs::write(
        &truth,
        "location,date,value\nUS,2019-12-04,1\nUS,2019-12-11,3\n",
    )
    .unwrap();
    let preds = dir.join("baseline.csv");
    let mut body = String::from("location,target_end_date,type,quantile,value\n");
    for date in ["2019-12-04", "2019-12-11"] {
        body.push_str(&format!("US,{date},quantile,0.25,0\n"));
        body.push_str(&format!("US,{date},quantile,0.5,2\n"));
        body.push_str(&format!("US,{date},quantile,0.75,2\n"));
        body.push_str(&format!("US,{date},point,NA,2\n"));
    }
    body.push_str(extra_prediction);
    fs::write(&preds, body).unwrap();
    (truth, preds)
}

fn score_run(dir: &Path, truth: PathBuf, preds: PathBuf) -> ScoreRun {
    ScoreRun {
        observations: truth,
        predictions: vec![preds],
        out_dir: dir.join("out"),
        config: ScoringConfig {
            interval_ranges: vec![50.0],
            ..ScoringConfig::default()
        },
    }
}

#[test]
fn test_end_to_end() {
    let dir = make_temp_dir();
    let (truth, preds) = write_inputs(&dir, "");
    let run = score_run(&dir, truth, preds);
    let summary = run_pipeline(&run).unwrap();

    assert_eq!(summary.n_matched, 2);
    assert!((summary.wis_total - 2.0).abs() < 1e-12);
    assert!((summary.wis_mean - 1.0).abs() < 1e-12);
    assert_eq!(summary.point_absolute_error_total, Some(2.0));
    assert_eq!(summary.coverage[0].coverage, 0.5);
    assert_eq!(summary.by_model[0].group, "baseline");

    for name in ["scores.tsv", "model_scores.tsv", "summary.json", "report.txt"] {
        assert!(run.out_dir.join(name).exists(), "missing {name}");
    }
}

#[test]
fn test_unobserved_prediction_rejected() {
    let dir = make_temp_dir();
    let (truth, preds) = write_inputs(&dir, "US,2019-12-18,quantile,0.5,2\n");
    let run = score_run(&dir, truth, preds);
    assert!(matches!(
        run_pipeline(&run),
        Err(Error::Align(AlignError::KeyMismatch { .. }))
    ));
    assert!(!run.out_dir.exists());
}

#[test]
fn test_invalid_config_fails_before_loading() {
    let dir = make_temp_dir();
    let mut run = score_run(&dir, dir.join("absent.csv"), dir.join("absent_preds.csv"));
    run.config.interval_ranges = vec![50.0, 100.0];
    assert!(matches!(
        run_pipeline(&run),
        Err(Error::Score(ScoreError::InvalidRange { .. }))
    ));
}
