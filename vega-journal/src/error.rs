use smol_str::SmolStr;
use std::path::PathBuf;
use thiserror::Error;

/// All errors generated in `vega-journal`.
///
/// Writers propagate every failure: a journal never drops a record silently.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("journal json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed journal row {row} in {path}: {reason}")]
    Malformed {
        path: PathBuf,
        row: usize,
        reason: SmolStr,
    },
}
