use thiserror::Error;

use crate::input::InputError;
use crate::pipeline::stage1_align::AlignError;

/// Validation failures raised by the scoring core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("invalid interval: {detail}")]
    InvalidInterval { detail: String },
    #[error("observation must be finite, got {value}")]
    InvalidObservation { value: f64 },
    #[error("confidence level {level} supplied more than once")]
    DuplicateLevel { level: f64 },
    #[error("insufficient data: {0}")]
    InsufficientData(&'static str),
    #[error("group {group} has no members")]
    EmptyGroup { group: String },
    #[error("score must be finite, got {value}")]
    NonFiniteScore { value: f64 },
    #[error("no scored forecast carries the {range}% interval")]
    MissingRange { range: f64 },
    #[error("interval range {range} must lie strictly between 0 and 100")]
    InvalidRange { range: f64 },
    #[error("row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<ScoreError>,
    },
}

impl ScoreError {
    pub fn at_row(self, index: usize) -> Self {
        ScoreError::Row {
            index,
            source: Box::new(self),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Align(#[from] AlignError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
