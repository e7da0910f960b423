use crate::{error::JournalError, run_stamp, write_run_file};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use vega::{
    flip::{FlipDetail, FlipDirection, FlipEvent, FlipRule},
    sink::AlertSink,
};

pub const DEFAULT_ALERT_TAG: &str = "sector_flip_intraday";

/// One CSV row per [`FlipEvent`]. Parameters of the other rule are left empty.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlertRow {
    pub ts: DateTime<Utc>,
    pub sector: SmolStr,
    pub rule: FlipRule,
    pub direction: FlipDirection,
    pub magnitude: f64,
    pub window_min: Option<usize>,
    pub threshold: Option<f64>,
    pub fast: Option<usize>,
    pub slow: Option<usize>,
    pub vol_mult: Option<f64>,
    pub vol_ratio: Option<f64>,
}

impl From<&FlipEvent> for AlertRow {
    fn from(event: &FlipEvent) -> Self {
        let mut row = Self {
            ts: event.time,
            sector: event.sector.clone(),
            rule: event.rule(),
            direction: event.direction,
            magnitude: event.magnitude,
            window_min: None,
            threshold: None,
            fast: None,
            slow: None,
            vol_mult: None,
            vol_ratio: None,
        };

        match event.detail {
            FlipDetail::RelFlip {
                window_minutes,
                threshold,
            } => {
                row.window_min = Some(window_minutes);
                row.threshold = Some(threshold);
            }
            FlipDetail::EmaCrossVol {
                fast,
                slow,
                volume_multiplier,
                volume_ratio,
            } => {
                row.fast = Some(fast);
                row.slow = Some(slow);
                row.vol_mult = Some(volume_multiplier);
                row.vol_ratio = volume_ratio.is_finite().then_some(volume_ratio);
            }
        }

        row
    }
}

impl AlertRow {
    /// Rebuild the [`FlipEvent`], or describe the missing rule parameter.
    pub fn into_event(self) -> Result<FlipEvent, SmolStr> {
        let detail = match self.rule {
            FlipRule::RelFlip => FlipDetail::RelFlip {
                window_minutes: self.window_min.ok_or("missing window_min")?,
                threshold: self.threshold.ok_or("missing threshold")?,
            },
            FlipRule::EmaCrossVol => FlipDetail::EmaCrossVol {
                fast: self.fast.ok_or("missing fast")?,
                slow: self.slow.ok_or("missing slow")?,
                volume_multiplier: self.vol_mult.ok_or("missing vol_mult")?,
                volume_ratio: self.vol_ratio.unwrap_or(f64::NAN),
            },
        };

        Ok(FlipEvent {
            time: self.ts,
            sector: self.sector,
            direction: self.direction,
            magnitude: self.magnitude,
            detail,
        })
    }
}

/// Writes each flip detection run to its own `<tag>_<YYYYMMDD_HHMMSS>.csv` under `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertJournal {
    pub dir: PathBuf,
    pub tag: SmolStr,
}

impl AlertJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_tag(dir, DEFAULT_ALERT_TAG)
    }

    pub fn with_tag(dir: impl Into<PathBuf>, tag: impl Into<SmolStr>) -> Self {
        Self {
            dir: dir.into(),
            tag: tag.into(),
        }
    }

    pub fn run_path(&self, run_time: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", self.tag, run_stamp(run_time)))
    }

    /// Write `events` to a new run file stamped with `run_time`.
    ///
    /// Returns `None` without touching the filesystem when there are no events. Fails if the
    /// run file already exists.
    pub fn write_run(
        &self,
        events: &[FlipEvent],
        run_time: DateTime<Utc>,
    ) -> Result<Option<PathBuf>, JournalError> {
        if events.is_empty() {
            debug!(tag = %self.tag, "no flip events, skipping alert run");
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.run_path(run_time);
        write_run_file(&path, |file| {
            let mut writer = csv::Writer::from_writer(file);
            for event in events {
                writer.serialize(AlertRow::from(event))?;
            }
            writer.flush()?;
            Ok(())
        })?;

        info!(path = %path.display(), events = events.len(), "wrote flip alert run");
        Ok(Some(path))
    }
}

impl AlertSink for AlertJournal {
    type Error = JournalError;

    fn publish(&self, events: &[FlipEvent]) -> Result<(), Self::Error> {
        self.write_run(events, Utc::now()).map(|_| ())
    }
}

/// Read the [`FlipEvent`]s of one alert run file.
pub fn read_alerts(path: &Path) -> Result<Vec<FlipEvent>, JournalError> {
    let mut reader = csv::Reader::from_path(path)?;

    reader
        .deserialize::<AlertRow>()
        .enumerate()
        .map(|(row, result)| -> Result<FlipEvent, JournalError> {
            result?
                .into_event()
                .map_err(|reason| JournalError::Malformed {
                    path: path.to_path_buf(),
                    row,
                    reason,
                })
        })
        .collect()
}
