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
#![allow(clippy::too_many_arguments)]

//! # Vega
//! Vega is the quantitative signal engine behind a personal trading dashboard. It takes
//! already-loaded price series and turns them into numbers a dashboard can rank and colour:
//!
//! * **Statistic**: Sharpe, Sortino, beta/alpha, volatility, max drawdown, CAGR and CVaR, plus
//!   rolling Sharpe/volatility/beta. Insufficient data yields `NaN`, never an error.
//! * **Score**: squashes a [`MetricsBundle`](statistic::bundle::MetricsBundle) into a single
//!   0-100 composite using a [`WeightProfile`](score::profile::WeightProfile).
//! * **Pattern**: fits regression channels to OHLC windows and classifies rising and falling
//!   wedges.
//! * **Flip**: detects intraday sector flips from relative-return sign changes and EMA
//!   momentum crosses confirmed by volume.
//! * **Momentum**: grades sectors Strong/Neutral/Weak and diffs grade snapshots.
//! * **Defensive**: aggregates VIX, a defensive-asset ratio, the yield curve, breadth and
//!   grade flips into one risk index with a Normal/Caution/Defensive status.
//!
//! Every computation is synchronous and pure. Persisting outputs is delegated to the
//! [`sink`] traits, implemented for files by the `vega-journal` crate.
//!
//! ## Getting Started
//! ```
//! use chrono::{DateTime, Days, Utc};
//! use vega::{
//!     score::{MissingMetricPolicy, composite_score, profile::WeightProfile},
//!     series::PriceSeries,
//!     statistic::{bundle::MetricsEngine, time::Frequency},
//! };
//!
//! let base = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
//! let series = PriceSeries::from_closes(
//!     [100.0, 101.0, 99.0, 105.0, 110.0, 108.0, 115.0, 120.0, 117.0, 125.0]
//!         .into_iter()
//!         .enumerate()
//!         .map(|(day, close)| (base + Days::new(day as u64), close)),
//! );
//!
//! let metrics = MetricsEngine::new(0.0, Frequency::Daily).compute(&series, None);
//! let score = composite_score(&metrics, &WeightProfile::Balanced, MissingMetricPolicy::Neutral);
//! assert!((0.0..=100.0).contains(&score));
//! ```

use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Engine configuration, loadable from JSON.
pub mod config;

/// Errors for caller-side validation and configuration loading.
pub mod error;

/// Default `tracing` subscriber initialisation.
pub mod logging;

/// Bars, price series and return series.
pub mod series;

/// Risk/return metrics and the algorithms used to calculate them.
pub mod statistic;

/// Composite 0-100 scoring of metric bundles, single and batch.
pub mod score;

/// Regression channel fitting and wedge classification.
pub mod pattern;

/// Intraday sector flip detection.
pub mod flip;

/// Sector momentum tiles, grades and grade transitions.
pub mod momentum;

/// Defensive risk index aggregation.
pub mod defensive;

/// Optional-capability output sinks for flip alerts, grade transitions and risk snapshots.
pub mod sink;

/// Serde helpers for `NaN` as JSON `null`.
pub mod serde_util;

pub type FnvIndexMap<K, V> = indexmap::IndexMap<K, V, fnv::FnvBuildHasher>;

/// A value stamped with the time it applies to.
#[derive(
    Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize, Constructor,
)]
pub struct Timed<T> {
    pub value: T,
    pub time: DateTime<Utc>,
}
