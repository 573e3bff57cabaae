use serde::Serialize;

use crate::error::ScoreError;
use crate::model::interval::{PredictionInterval, check_level};
use crate::model::results::IntervalScoreResult;
use crate::scoring::interval::{bias, score_interval};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchRow {
    pub lower: f64,
    pub upper: f64,
    pub y: f64,
}

/// Ordered rows sharing one nominal level, scored together.
///
/// Every operation stops at the first invalid row and reports its index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalBatch {
    rows: Vec<BatchRow>,
}

impl IntervalBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips parallel vectors; lengths must agree.
    pub fn from_columns(lower: &[f64], upper: &[f64], y: &[f64]) -> Result<Self, ScoreError> {
        if lower.len() != upper.len() || lower.len() != y.len() {
            return Err(ScoreError::InsufficientData(
                "lower, upper and observation columns differ in length",
            ));
        }
        let rows = lower
            .iter()
            .zip(upper)
            .zip(y)
            .map(|((&lower, &upper), &y)| BatchRow { lower, upper, y })
            .collect();
        Ok(Self { rows })
    }

    pub fn push(&mut self, lower: f64, upper: f64, y: f64) {
        self.rows.push(BatchRow { lower, upper, y });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[BatchRow] {
        &self.rows
    }

    pub fn score(&self, level: f64) -> Result<Vec<IntervalScoreResult>, ScoreError> {
        check_level(level)?;
        self.non_empty()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                PredictionInterval::new(row.lower, row.upper, level)
                    .and_then(|iv| score_interval(&iv, row.y))
                    .map_err(|e| e.at_row(i))
            })
            .collect()
    }

    /// Fraction of rows whose observation lies within the bounds.
    pub fn coverage(&self) -> Result<f64, ScoreError> {
        self.non_empty()?;
        let mut covered = 0usize;
        for (i, row) in self.rows.iter().enumerate() {
            if crate::scoring::interval::coverage(row.lower, row.upper, row.y)
                .map_err(|e| e.at_row(i))?
            {
                covered += 1;
            }
        }
        Ok(covered as f64 / self.rows.len() as f64)
    }

    pub fn bias(&self) -> Result<Vec<f64>, ScoreError> {
        self.non_empty()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| bias(row.lower, row.upper, row.y).map_err(|e| e.at_row(i)))
            .collect()
    }

    fn non_empty(&self) -> Result<(), ScoreError> {
        if self.rows.is_empty() {
            Err(ScoreError::InsufficientData("batch has no rows"))
        } else {
            Ok(())
        }
    }
}
