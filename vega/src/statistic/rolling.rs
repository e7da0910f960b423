use crate::{
    Timed,
    statistic::{
        metric::{beta::BetaAlpha, sharpe::SharpeRatio, volatility::Volatility},
        time::Frequency,
    },
};
use serde::{Deserialize, Serialize};

/// Default trailing window length for rolling metrics (one quarter of daily bars).
pub const DEFAULT_ROLLING_WINDOW: usize = 63;

/// Time-indexed rolling metrics. Entries before the window fills are `NaN`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RollingMetrics {
    pub window: usize,
    pub sharpe: Vec<Timed<f64>>,
    pub volatility: Vec<Timed<f64>>,
    pub beta: Option<Vec<Timed<f64>>>,
}

/// Rolling annualised Sharpe ratio over the trailing `window` returns.
pub fn rolling_sharpe(
    returns: &[Timed<f64>],
    window: usize,
    risk_free_rate: f64,
    frequency: Frequency,
) -> Vec<Timed<f64>> {
    rolling_apply(returns, window, |slice| {
        let values = slice.iter().map(|point| point.value).collect::<Vec<_>>();
        SharpeRatio::calculate(&values, risk_free_rate, frequency).value
    })
}

/// Rolling annualised volatility over the trailing `window` returns.
pub fn rolling_volatility(
    returns: &[Timed<f64>],
    window: usize,
    frequency: Frequency,
) -> Vec<Timed<f64>> {
    rolling_apply(returns, window, |slice| {
        let values = slice.iter().map(|point| point.value).collect::<Vec<_>>();
        Volatility::calculate(&values, frequency).value
    })
}

/// Rolling beta over the trailing `window` aligned `(asset, benchmark)` return pairs.
pub fn rolling_beta(
    pairs: &[Timed<(f64, f64)>],
    window: usize,
    risk_free_rate: f64,
    frequency: Frequency,
) -> Vec<Timed<f64>> {
    rolling_apply(pairs, window, |slice| {
        let values = slice.iter().map(|point| point.value).collect::<Vec<_>>();
        BetaAlpha::calculate(&values, risk_free_rate, frequency).beta
    })
}

fn rolling_apply<T, FnMetric>(
    points: &[Timed<T>],
    window: usize,
    metric: FnMetric,
) -> Vec<Timed<f64>>
where
    FnMetric: Fn(&[Timed<T>]) -> f64,
{
    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let value = if window == 0 || index + 1 < window {
                f64::NAN
            } else {
                metric(&points[index + 1 - window..=index])
            };
            Timed::new(value, point.time)
        })
        .collect()
}
