use crate::{
    FnvIndexMap, Timed,
    config::MetricsConfig,
    series::PriceSeries,
    statistic::{
        metric::{
            beta::BetaAlpha,
            cagr::Cagr,
            cvar::{ConditionalValueAtRisk, DEFAULT_CVAR_ALPHA},
            drawdown::MaxDrawdown,
            sharpe::SharpeRatio,
            sortino::SortinoRatio,
            volatility::Volatility,
        },
        rolling::{RollingMetrics, rolling_beta, rolling_sharpe, rolling_volatility},
        time::Frequency,
    },
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// Risk/return metrics of a single price series. Any entry may be undefined (`NaN`).
///
/// Serialises as a flat name -> float map with `NaN` as `null`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsBundle {
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub sharpe: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub sortino: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub beta: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub alpha: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub vol: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub mdd: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub cagr: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub cvar: f64,
}

impl Default for MetricsBundle {
    fn default() -> Self {
        Self::undefined()
    }
}

impl MetricsBundle {
    /// [`MetricsBundle`] with every metric `NaN`.
    pub const fn undefined() -> Self {
        Self {
            sharpe: f64::NAN,
            sortino: f64::NAN,
            beta: f64::NAN,
            alpha: f64::NAN,
            vol: f64::NAN,
            mdd: f64::NAN,
            cagr: f64::NAN,
            cvar: f64::NAN,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.to_map().values().all(|value| value.is_nan())
    }

    /// Metric name -> value, in declaration order.
    pub fn to_map(&self) -> FnvIndexMap<SmolStr, f64> {
        [
            ("sharpe", self.sharpe),
            ("sortino", self.sortino),
            ("beta", self.beta),
            ("alpha", self.alpha),
            ("vol", self.vol),
            ("mdd", self.mdd),
            ("cagr", self.cagr),
            ("cvar", self.cvar),
        ]
        .into_iter()
        .map(|(name, value)| (SmolStr::new_static(name), value))
        .collect()
    }
}

/// Computes [`MetricsBundle`]s and [`RollingMetrics`] from price series.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MetricsEngine {
    pub risk_free_rate: f64,
    pub frequency: Frequency,
    pub cvar_alpha: f64,
}

impl MetricsEngine {
    /// Construct a [`MetricsEngine`] using an annualised risk-free rate and the default CVaR
    /// tail probability.
    pub fn new(risk_free_rate: f64, frequency: Frequency) -> Self {
        Self {
            risk_free_rate,
            frequency,
            cvar_alpha: DEFAULT_CVAR_ALPHA,
        }
    }

    pub fn with_cvar_alpha(self, cvar_alpha: f64) -> Self {
        Self { cvar_alpha, ..self }
    }

    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            risk_free_rate: config.risk_free,
            frequency: config.frequency,
            cvar_alpha: config.cvar_alpha,
        }
    }

    /// Compute the [`MetricsBundle`] of `series`, with beta and alpha against `benchmark` when
    /// provided.
    pub fn compute(&self, series: &PriceSeries, benchmark: Option<&PriceSeries>) -> MetricsBundle {
        let returns = series.returns();
        let values = returns.values();

        let BetaAlpha { beta, alpha, .. } = match benchmark {
            Some(benchmark) => {
                let pairs = returns
                    .align(&benchmark.returns())
                    .into_iter()
                    .map(|pair| pair.value)
                    .collect::<Vec<_>>();
                BetaAlpha::calculate(&pairs, self.risk_free_rate, self.frequency)
            }
            None => BetaAlpha {
                beta: f64::NAN,
                alpha: f64::NAN,
                frequency: self.frequency,
            },
        };

        let bundle = MetricsBundle {
            sharpe: SharpeRatio::calculate(&values, self.risk_free_rate, self.frequency).value,
            sortino: SortinoRatio::calculate(&values, self.risk_free_rate, self.frequency).value,
            beta,
            alpha,
            vol: Volatility::calculate(&values, self.frequency).value,
            mdd: MaxDrawdown::calculate(
                series
                    .bars()
                    .iter()
                    .map(|bar| Timed::new(bar.close, bar.time)),
            )
            .value,
            cagr: Cagr::calculate(&series.closes(), self.frequency).value,
            cvar: ConditionalValueAtRisk::calculate(&values, self.cvar_alpha).value,
        };

        debug!(
            observations = series.len(),
            returns = values.len(),
            frequency = %self.frequency,
            sharpe = bundle.sharpe,
            "computed metrics bundle"
        );

        bundle
    }

    /// Compute [`RollingMetrics`] over a trailing `window` of returns.
    pub fn rolling(
        &self,
        series: &PriceSeries,
        benchmark: Option<&PriceSeries>,
        window: usize,
    ) -> RollingMetrics {
        let returns = series.returns();

        RollingMetrics {
            window,
            sharpe: rolling_sharpe(returns.points(), window, self.risk_free_rate, self.frequency),
            volatility: rolling_volatility(returns.points(), window, self.frequency),
            beta: benchmark.map(|benchmark| {
                rolling_beta(
                    &returns.align(&benchmark.returns()),
                    window,
                    self.risk_free_rate,
                    self.frequency,
                )
            }),
        }
    }
}
