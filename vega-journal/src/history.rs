use crate::error::JournalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use vega::{
    defensive::{DefensiveIndexRecord, DefensiveStatus},
    sink::HistorySink,
};

pub const DEFAULT_HISTORY_FILE: &str = "history.csv";

/// Status column value for an undefined index.
pub const STATUS_UNDEFINED: &str = "NA";

/// One `history.csv` row. Undefined numbers are written as empty fields.
///
/// Component columns hold the raw inputs (VIX level, defensive ratio, yield spread, percentage
/// of strong sectors, Strong -> Weak count), not their sub-scores.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HistoryRow {
    pub ts: DateTime<Utc>,
    pub risk_index: Option<f64>,
    pub status: String,
    pub vix: Option<f64>,
    pub ratio: Option<f64>,
    pub yield_curve: Option<f64>,
    pub breadth_pct_strong: Option<f64>,
    pub flips_strong_to_weak: usize,
}

fn defined(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl From<&DefensiveIndexRecord> for HistoryRow {
    fn from(record: &DefensiveIndexRecord) -> Self {
        let components = &record.components;
        Self {
            ts: record.time,
            risk_index: defined(record.risk_index),
            status: record
                .status
                .map_or_else(|| STATUS_UNDEFINED.to_string(), |status| status.to_string()),
            vix: components.vix.raw.and_then(defined),
            ratio: components.ratio.raw.and_then(defined),
            yield_curve: components.yield_curve.raw.and_then(defined),
            breadth_pct_strong: components.breadth.raw.and_then(defined),
            flips_strong_to_weak: record.flips_strong_to_weak(),
        }
    }
}

impl HistoryRow {
    /// `None` for [`STATUS_UNDEFINED`] or an unrecognised value.
    pub fn status(&self) -> Option<DefensiveStatus> {
        match self.status.as_str() {
            "Normal" => Some(DefensiveStatus::Normal),
            "Caution" => Some(DefensiveStatus::Caution),
            "Defensive" => Some(DefensiveStatus::Defensive),
            _ => None,
        }
    }
}

/// Append-only defensive index history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryJournal {
    pub path: PathBuf,
}

impl HistoryJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `history.csv` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_HISTORY_FILE))
    }

    /// Append one row, writing the header first if the file is empty.
    ///
    /// The row is encoded up front and written with a single `write_all`.
    pub fn append(&self, record: &DefensiveIndexRecord) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let has_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(has_header)
            .from_writer(Vec::new());
        writer.serialize(HistoryRow::from(record))?;
        let encoded = writer
            .into_inner()
            .map_err(|error| io::Error::new(error.error().kind(), error.error().to_string()))?;

        file.write_all(&encoded)?;

        debug!(
            path = %self.path.display(),
            risk_index = record.risk_index,
            status = ?record.status,
            "appended defensive index history"
        );
        Ok(())
    }
}

impl HistorySink for HistoryJournal {
    type Error = JournalError;

    fn append(&self, record: &DefensiveIndexRecord) -> Result<(), Self::Error> {
        HistoryJournal::append(self, record)
    }
}

/// Read every row of a history file. A missing file has no rows.
pub fn read_history(path: &Path) -> Result<Vec<HistoryRow>, JournalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    csv::Reader::from_path(path)?
        .deserialize()
        .map(|row| row.map_err(JournalError::from))
        .collect()
}
