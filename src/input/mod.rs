use std::path::PathBuf;

use thiserror::Error;

pub mod observations;
pub mod predictions;
pub mod table;

pub use observations::load_observations;
pub use predictions::load_predictions;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("missing column: {0}")]
    MissingColumn(String),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("{0} file has no data rows")]
    Empty(&'static str),
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
