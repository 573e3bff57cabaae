use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ScoreError};
use crate::model::interval::check_range;

/// Interval ranges scored by the forecast hubs, in percent.
pub const DEFAULT_INTERVAL_RANGES: &[f64] =
    &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 98.0];

/// What to do with rows whose observation or quantile value is missing or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    #[default]
    Reject,
    Skip,
}

/// Scoring configuration.
///
/// Example JSON:
/// ```json
/// { "interval_ranges": [50, 80, 95], "require_median": true, "missing": "skip" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub interval_ranges: Vec<f64>,
    /// Fail when an identifier has no 0.5 quantile.
    pub require_median: bool,
    /// Add the median term to the WIS. When false the 0.5 quantile is ignored.
    pub include_median: bool,
    pub allow_mismatch: bool,
    pub missing: MissingPolicy,
    /// Tolerance used when matching quantile levels read from files.
    pub quantile_tolerance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            interval_ranges: DEFAULT_INTERVAL_RANGES.to_vec(),
            require_median: true,
            include_median: true,
            allow_mismatch: false,
            missing: MissingPolicy::Reject,
            quantile_tolerance: 1e-6,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Range problems surface as [`ScoreError`]; inconsistent settings as `Error::Config`.
    pub fn validate(&self) -> Result<(), Error> {
        for (i, &range) in self.interval_ranges.iter().enumerate() {
            check_range(range)?;
            if self.interval_ranges[..i]
                .iter()
                .any(|&prev| (prev - range).abs() < 1e-9)
            {
                return Err(ScoreError::DuplicateLevel {
                    level: range / 100.0,
                }
                .into());
            }
        }
        if self.require_median && !self.include_median {
            return Err(Error::Config(
                "require_median is set but include_median is false".to_string(),
            ));
        }
        if self.interval_ranges.is_empty() && !self.require_median {
            return Err(Error::Config(
                "no interval ranges configured and median not required".to_string(),
            ));
        }
        if !(self.quantile_tolerance > 0.0 && self.quantile_tolerance < 0.005) {
            return Err(Error::Config(format!(
                "quantile_tolerance {} must lie in (0, 0.005)",
                self.quantile_tolerance
            )));
        }
        Ok(())
    }

    pub fn aggregator(&self) -> AggregatorConfig {
        AggregatorConfig {
            interval_ranges: self.interval_ranges.clone(),
        }
    }
}

/// Configuration threaded into the [`crate::aggregate::Aggregator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatorConfig {
    pub interval_ranges: Vec<f64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            interval_ranges: DEFAULT_INTERVAL_RANGES.to_vec(),
        }
    }
}
