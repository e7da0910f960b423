#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]

//! # Vega-Journal
//! Append-only file journals implementing the `vega` sink traits:
//!
//! * [`AlertJournal`](alert::AlertJournal): one CSV file per flip detection run, named
//!   `<tag>_<YYYYMMDD_HHMMSS>.csv`.
//! * [`TransitionJournal`](transition::TransitionJournal): one JSON file per grade transition
//!   run, named `<tag>_flips_<YYYYMMDD_HHMMSS>.json`.
//! * [`HistoryJournal`](history::HistoryJournal): one `history.csv` with a row appended per
//!   defensive index computation.
//!
//! Run files are created with `create_new`, so a collision fails instead of overwriting. History
//! rows are written with a single `write_all` and the header is written only to an empty file.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File, OpenOptions},
    path::Path,
};
use tracing::warn;

/// Flip alert run files.
pub mod alert;

/// Defensive index history file.
pub mod history;

/// Grade transition run files.
pub mod transition;

/// All errors generated in `vega-journal`.
pub mod error;

pub use alert::AlertJournal;
pub use error::JournalError;
pub use history::HistoryJournal;
pub use transition::TransitionJournal;

const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `YYYYMMDD_HHMMSS` stamp used in run file names.
pub fn run_stamp(time: DateTime<Utc>) -> String {
    time.format(RUN_STAMP_FORMAT).to_string()
}

/// Parse a `YYYYMMDD_HHMMSS` run stamp.
pub fn parse_run_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, RUN_STAMP_FORMAT)
        .ok()
        .map(|time| time.and_utc())
}

/// Create the run file at `path` and fill it with `write`.
///
/// Fails if `path` already exists. If `write` fails the partial file is removed, so a run file
/// under its final name is always complete.
pub(crate) fn write_run_file<F>(path: &Path, write: F) -> Result<(), JournalError>
where
    F: FnOnce(File) -> Result<(), JournalError>,
{
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;

    write(file).inspect_err(|error| {
        warn!(path = %path.display(), ?error, "failed to write run file, removing it");
        if let Err(remove) = fs::remove_file(path) {
            warn!(path = %path.display(), ?remove, "failed to remove partial run file");
        }
    })
}

#[cfg(test)]
pub mod test_utils {
    use chrono::{DateTime, Utc};
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Unique, not yet created directory under the system temp dir.
    pub fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "vega_journal_{name}_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ))
    }

    pub fn time_base() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }
}
