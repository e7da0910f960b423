/// Statistical algorithms for analysing datasets.
pub mod algorithm;

/// [`MetricsBundle`](bundle::MetricsBundle) and the [`MetricsEngine`](bundle::MetricsEngine)
/// that produces it from a price series.
pub mod bundle;

/// Financial metrics and the means to calculate them at a sampling
/// [`Frequency`](time::Frequency).
pub mod metric;

/// Rolling window variants of the Sharpe ratio, volatility and beta.
pub mod rolling;

/// Sampling frequency definitions used for annualisation.
///
/// For example, `Daily` (252 periods per year), `Weekly`, `Monthly`, `Hourly`.
pub mod time;
