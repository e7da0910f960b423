use chrono::{DateTime, Utc};
use thiserror::Error;

/// Caller-side validation failures for a [`PriceSeries`](crate::series::PriceSeries).
///
/// The computation paths never produce these: insufficient data is reported as `NaN`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("bar {index} at {time} is not after the previous bar")]
    Unordered { index: usize, time: DateTime<Utc> },

    #[error("bar {index} at {time} contains a non-finite value")]
    NonFinite { index: usize, time: DateTime<Utc> },
}

/// Failure to score a single symbol. Batch scoring isolates these into `NaN` rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("asset series: {0}")]
    Asset(SeriesError),

    #[error("benchmark series: {0}")]
    Benchmark(SeriesError),
}

/// Failure to load or save an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}
