
use super::*;

fn obs(location: &str, date: &str, value: f64) -> ObservationRecord {
    ObservationRecord {
        location: location.to_string(),
        date: date.to_string(),
        value,
    }
}

fn quantile(location: &str, date: &str, q: f64, value: f64) -> PredictionRecord {
    PredictionRecord {
        model: "m".to_string(),
        location: location.to_string(),
        target_end_date: date.to_string(),
        horizon: None,
        kind: PredictionKind::Quantile(q),
        value,
    }
}

fn config(ranges: &[f64]) -> ScoringConfig {
    ScoringConfig {
        interval_ranges: ranges.to_vec(),
        ..ScoringConfig::default()
    }
}

fn single_location_predictions() -> Vec<PredictionRecord> {
    let mut preds = Vec::new();
    for date in ["2019-12-04", "2019-12-11"] {
        preds.push(quantile("US", date, 0.25, 0.0));
        preds.push(quantile("US", date, 0.5, 2.0));
        preds.push(quantile("US", date, 0.75, 2.0));
    }
    preds
}

#[test]
fn test_align_single_location() {
    let observations = vec![obs("US", "2019-12-04", 1.0), obs("US", "2019-12-11", 1.0)];
    let out = run_stage1(&observations, &single_location_predictions(), &config(&[50.0])).unwrap();
    assert_eq!(out.forecasts.len(), 2);
    let f = &out.forecasts[0];
    assert_eq!(f.median, Some(2.0));
    assert_eq!(f.point, None);
    assert_eq!(f.intervals.len(), 1);
    assert_eq!(f.intervals[0].lower(), 0.0);
    assert_eq!(f.intervals[0].upper(), 2.0);
    assert_eq!(f.intervals[0].level(), 0.5);
}

#[test]
fn test_key_mismatch_rejected_by_default() {
    let observations = vec![
        obs("US", "2019-12-04", 1.0),
        obs("US", "2019-12-11", 2.0),
        obs("US", "2019-12-18", 3.0),
    ];
    let err = run_stage1(&observations, &single_location_predictions(), &config(&[50.0]))
        .unwrap_err();
    match err {
        AlignError::KeyMismatch {
            only_predicted,
            only_observed,
            ..
        } => {
            assert_eq!(only_predicted, 0);
            assert_eq!(only_observed, 1);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_key_mismatch_allowed_scores_intersection() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let mut cfg = config(&[50.0]);
    cfg.allow_mismatch = true;
    let out = run_stage1(&observations, &single_location_predictions(), &cfg).unwrap();
    assert_eq!(out.forecasts.len(), 1);
    assert_eq!(out.unmatched, 1);
}

#[test]
fn test_missing_median_rejected() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let preds = vec![
        quantile("US", "2019-12-04", 0.25, 0.0),
        quantile("US", "2019-12-04", 0.75, 2.0),
    ];
    assert!(matches!(
        run_stage1(&observations, &preds, &config(&[50.0])),
        Err(AlignError::MissingMedian { .. })
    ));
    let mut cfg = config(&[50.0]);
    cfg.require_median = false;
    let out = run_stage1(&observations, &preds, &cfg).unwrap();
    assert_eq!(out.forecasts[0].median, None);
}

#[test]
fn test_missing_quantile_names_range() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let preds = vec![
        quantile("US", "2019-12-04", 0.25, 0.0),
        quantile("US", "2019-12-04", 0.5, 1.0),
        quantile("US", "2019-12-04", 0.75, 2.0),
    ];
    match run_stage1(&observations, &preds, &config(&[50.0, 90.0])) {
        Err(AlignError::MissingQuantile { range, .. }) => assert_eq!(range, 90.0),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_crossed_quantiles_rejected() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let preds = vec![
        quantile("US", "2019-12-04", 0.25, 3.0),
        quantile("US", "2019-12-04", 0.5, 1.0),
        quantile("US", "2019-12-04", 0.75, 2.0),
    ];
    assert!(matches!(
        run_stage1(&observations, &preds, &config(&[50.0])),
        Err(AlignError::Interval { .. })
    ));
}

#[test]
fn test_nan_observation_policy() {
    let observations = vec![obs("US", "2019-12-04", f64::NAN), obs("US", "2019-12-11", 1.0)];
    let preds = single_location_predictions();
    assert!(matches!(
        run_stage1(&observations, &preds, &config(&[50.0])),
        Err(AlignError::MissingValue { .. })
    ));
    let mut cfg = config(&[50.0]);
    cfg.missing = MissingPolicy::Skip;
    let out = run_stage1(&observations, &preds, &cfg).unwrap();
    assert_eq!(out.forecasts.len(), 1);
    assert_eq!(out.skipped, 1);
}

#[test]
fn test_duplicate_observation_rejected() {
    let observations = vec![obs("US", "2019-12-04", 1.0), obs("US", "2019-12-04", 2.0)];
    assert!(matches!(
        run_stage1(&observations, &single_location_predictions(), &config(&[50.0])),
        Err(AlignError::DuplicateObservation { .. })
    ));
}

#[test]
fn test_point_forecast_carried() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let mut preds = vec![quantile("US", "2019-12-04", 0.5, 2.0)];
    preds.push(PredictionRecord {
        kind: PredictionKind::Point,
        value: 1.5,
        ..quantile("US", "2019-12-04", 0.5, 0.0)
    });
    let out = run_stage1(&observations, &preds, &config(&[])).unwrap();
    assert_eq!(out.forecasts[0].point, Some(1.5));
    assert!(out.forecasts[0].intervals.is_empty());
}

fn point(location: &str, date: &str, value: f64) -> PredictionRecord {
    PredictionRecord {
        kind: PredictionKind::Point,
        ..quantile(location, date, 0.5, value)
    }
}

#[test]
fn test_excluded_median_drops_median_term() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let preds = vec![
        quantile("US", "2019-12-04", 0.25, 0.0),
        quantile("US", "2019-12-04", 0.5, 2.0),
        quantile("US", "2019-12-04", 0.75, 2.0),
    ];
    let mut cfg = config(&[50.0]);
    cfg.require_median = false;
    cfg.include_median = false;
    let out = run_stage1(&observations, &preds, &cfg).unwrap();
    assert_eq!(out.forecasts[0].median, None);

    let scores = crate::pipeline::stage2_score::run_stage2(&out.forecasts).unwrap();
    assert!(!scores[0].wis.median_included);
    assert!((scores[0].wis.wis - 0.5).abs() < 1e-12);
    assert!(scores[0].median_absolute_error.is_none());
}

#[test]
fn test_duplicate_point_rejected() {
    let observations = vec![obs("US", "2019-12-04", 1.0)];
    let mut preds = single_location_predictions();
    preds.retain(|p| p.target_end_date == "2019-12-04");
    preds.push(point("US", "2019-12-04", 1.5));
    preds.push(point("US", "2019-12-04", 99.0));
    match run_stage1(&observations, &preds, &config(&[50.0])) {
        Err(AlignError::DuplicatePoint { id }) => assert_eq!(id.location, "US"),
        other => panic!("unexpected: {other:?}"),
    }
}
