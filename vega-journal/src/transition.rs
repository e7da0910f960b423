use crate::{error::JournalError, parse_run_stamp, run_stamp, write_run_file};
use chrono::{DateTime, TimeDelta, Utc};
use smol_str::SmolStr;
use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use vega::{momentum::GradeTransition, sink::TransitionSink};

pub const DEFAULT_TRANSITION_TAG: &str = "sector_momentum";

const FLIPS_MARKER: &str = "_flips_";

/// Writes each set of [`GradeTransition`]s to its own `<tag>_flips_<YYYYMMDD_HHMMSS>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionJournal {
    pub dir: PathBuf,
    pub tag: SmolStr,
}

impl TransitionJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_tag(dir, DEFAULT_TRANSITION_TAG)
    }

    pub fn with_tag(dir: impl Into<PathBuf>, tag: impl Into<SmolStr>) -> Self {
        Self {
            dir: dir.into(),
            tag: tag.into(),
        }
    }

    pub fn run_path(&self, run_time: DateTime<Utc>) -> PathBuf {
        self.dir
            .join(format!("{}{FLIPS_MARKER}{}.json", self.tag, run_stamp(run_time)))
    }

    /// Write `transitions` to a new run file stamped with `run_time`.
    ///
    /// Returns `None` without touching the filesystem when there are no transitions.
    pub fn write_run(
        &self,
        transitions: &[GradeTransition],
        run_time: DateTime<Utc>,
    ) -> Result<Option<PathBuf>, JournalError> {
        if transitions.is_empty() {
            debug!(tag = %self.tag, "no grade transitions, skipping run");
            return Ok(None);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.run_path(run_time);
        write_run_file(&path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, transitions)?;
            writer.flush()?;
            Ok(())
        })?;

        info!(
            path = %path.display(),
            transitions = transitions.len(),
            "wrote grade transition run"
        );
        Ok(Some(path))
    }
}

impl TransitionSink for TransitionJournal {
    type Error = JournalError;

    fn publish(&self, transitions: &[GradeTransition]) -> Result<(), Self::Error> {
        self.write_run(transitions, Utc::now()).map(|_| ())
    }
}

/// Read the [`GradeTransition`]s of one run file.
pub fn read_transitions(path: &Path) -> Result<Vec<GradeTransition>, JournalError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Run stamp encoded in a `<tag>_flips_<YYYYMMDD_HHMMSS>.json` file name.
pub fn transition_run_time(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?.strip_suffix(".json")?;
    let (_, stamp) = name.rsplit_once(FLIPS_MARKER)?;
    parse_run_stamp(stamp)
}

/// All [`GradeTransition`]s of run files in `dir` stamped within `lookback` of `now`, oldest
/// run first.
///
/// Files that do not parse are skipped. A missing `dir` yields no transitions.
pub fn recent_transitions(
    dir: &Path,
    now: DateTime<Utc>,
    lookback: TimeDelta,
) -> Result<Vec<GradeTransition>, JournalError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(error) => return Err(error.into()),
    };

    let since = now - lookback;
    let mut runs = entries
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter_map(|path| {
            let run_time = transition_run_time(&path)?;
            (since..=now).contains(&run_time).then_some((run_time, path))
        })
        .collect::<Vec<_>>();
    runs.sort();

    Ok(runs
        .into_iter()
        .flat_map(|(_, path)| match read_transitions(&path) {
            Ok(transitions) => transitions,
            Err(error) => {
                warn!(path = %path.display(), ?error, "skipping unreadable transition run");
                Vec::new()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{temp_dir, time_base};
    use vega::momentum::Grade;

    fn transitions(time: DateTime<Utc>) -> Vec<GradeTransition> {
        vec![
            GradeTransition::new(time, SmolStr::new("XLK"), Grade::Strong, Grade::Weak),
            GradeTransition::new(time, SmolStr::new("XLU"), Grade::Weak, Grade::Neutral),
        ]
    }

    #[test]
    fn test_transition_run_time() {
        struct TestCase {
            input: &'static str,
            expected: Option<DateTime<Utc>>,
        }

        let cases = vec![
            // TC0: default tag
            TestCase {
                input: "sector_momentum_flips_20231114_221320.json",
                expected: Some(time_base()),
            },
            // TC1: tag containing the marker uses the last occurrence
            TestCase {
                input: "my_flips_tag_flips_20231114_221320.json",
                expected: Some(time_base()),
            },
            // TC2: wrong extension
            TestCase {
                input: "sector_momentum_flips_20231114_221320.csv",
                expected: None,
            },
            // TC3: not a transition run
            TestCase {
                input: "history.json",
                expected: None,
            },
            // TC4: malformed stamp
            TestCase {
                input: "sector_momentum_flips_latest.json",
                expected: None,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = transition_run_time(Path::new(test.input));
            assert_eq!(actual, test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_write_run_then_read() {
        let journal = TransitionJournal::new(temp_dir("transition"));

        let path = journal
            .write_run(&transitions(time_base()), time_base())
            .unwrap()
            .unwrap();

        assert_eq!(transition_run_time(&path), Some(time_base()));
        assert_eq!(read_transitions(&path).unwrap(), transitions(time_base()));
        assert!(journal.write_run(&transitions(time_base()), time_base()).is_err());

        fs::remove_dir_all(&journal.dir).unwrap();
    }

    #[test]
    fn test_recent_transitions_filters_by_lookback() {
        let journal = TransitionJournal::new(temp_dir("transition_recent"));
        let now = time_base();
        let old = now - TimeDelta::hours(30);
        let recent = now - TimeDelta::hours(2);

        journal.write_run(&transitions(old), old).unwrap();
        journal.write_run(&transitions(recent), recent).unwrap();
        journal.write_run(&transitions(now), now).unwrap();
        fs::write(journal.dir.join("sector_momentum_flips_20231114_200000.json"), "not json")
            .unwrap();
        fs::write(journal.dir.join("notes.txt"), "ignored").unwrap();

        let actual = recent_transitions(&journal.dir, now, TimeDelta::hours(24)).unwrap();

        let expected = transitions(recent)
            .into_iter()
            .chain(transitions(now))
            .collect::<Vec<_>>();
        assert_eq!(actual, expected);

        fs::remove_dir_all(&journal.dir).unwrap();
    }

    #[test]
    fn test_recent_transitions_missing_dir() {
        let actual =
            recent_transitions(&temp_dir("transition_missing"), time_base(), TimeDelta::hours(24));
        assert_eq!(actual.unwrap(), Vec::new());
    }
}
