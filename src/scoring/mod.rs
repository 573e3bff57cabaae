//! Pure scoring rules for prediction intervals.

pub mod batch;
pub mod interval;
pub mod weighted;

pub use batch::IntervalBatch;
pub use interval::{absolute_error, bias, coverage, interval_score, median_error, sharpness};
pub use weighted::weighted_interval_score;
