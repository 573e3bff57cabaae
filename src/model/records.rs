use std::fmt;

use serde::Serialize;

use crate::model::interval::PredictionInterval;

/// Identifies one forecast target: a model's prediction for a location at a date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ForecastId {
    pub model: String,
    pub location: String,
    pub target_end_date: String,
    pub horizon: Option<u32>,
}

impl fmt::Display for ForecastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.model, self.location, self.target_end_date
        )?;
        if let Some(h) = self.horizon {
            write!(f, " (h={h})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub location: String,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionKind {
    Quantile(f64),
    Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub model: String,
    pub location: String,
    pub target_end_date: String,
    pub horizon: Option<u32>,
    pub kind: PredictionKind,
    pub value: f64,
}

impl PredictionRecord {
    pub fn id(&self) -> ForecastId {
        ForecastId {
            model: self.model.clone(),
            location: self.location.clone(),
            target_end_date: self.target_end_date.clone(),
            horizon: self.horizon,
        }
    }
}

/// Everything needed to score one identifier, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedForecast {
    pub id: ForecastId,
    pub observation: f64,
    pub median: Option<f64>,
    pub point: Option<f64>,
    /// One interval per configured range, in configuration order.
    pub intervals: Vec<PredictionInterval>,
}
