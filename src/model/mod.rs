pub mod config;
pub mod interval;
pub mod records;
pub mod results;
pub mod scores;
