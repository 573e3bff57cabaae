//! Interval, weighted interval, coverage and bias scoring for probabilistic
//! forecasts of epidemic time series.
//!
//! The scoring core in [`scoring`] is pure and never logs. [`pipeline`] reads
//! hub-style observation and prediction files, aligns them, scores every
//! identifier and writes reports.

pub mod aggregate;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scoring;

pub use aggregate::{Aggregator, ScoreTable, Summary, TableEntry, coverage_rate};
pub use error::{Error, Result, ScoreError};
pub use model::config::{AggregatorConfig, MissingPolicy, ScoringConfig};
pub use model::interval::PredictionInterval;
pub use model::results::{IntervalScoreResult, WeightedIntervalScoreResult};
pub use pipeline::{ScoreRun, run_pipeline};
pub use scoring::{
    IntervalBatch, absolute_error, bias, coverage, interval_score, median_error, sharpness,
    weighted_interval_score,
};
