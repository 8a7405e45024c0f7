use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of either pipeline.
///
/// Row-level defects, quality anomalies and unresolved fact keys are not
/// represented here: they are recovered or reported where they occur.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("input file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("{} is missing required columns: {}", path.display(), missing.join(", "))]
    SchemaViolation { path: PathBuf, missing: Vec<String> },

    #[error("{}: line {line} has {found} fields, expected at most {expected}", path.display())]
    OverlongRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("warehouse write failed: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type EtlResult<T> = Result<T, EtlError>;
