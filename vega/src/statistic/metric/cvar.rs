use crate::statistic::algorithm::{SampleStatistics, quantile};
use serde::{Deserialize, Serialize};

/// Default tail probability for [`ConditionalValueAtRisk`].
pub const DEFAULT_CVAR_ALPHA: f64 = 0.05;

/// Conditional value at risk (expected shortfall): the mean of per-period returns at or below
/// the `alpha`-quantile.
///
/// See docs: <https://www.investopedia.com/terms/c/conditional_value_at_risk.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct ConditionalValueAtRisk {
    pub value: f64,
    pub alpha: f64,
}

impl ConditionalValueAtRisk {
    /// `NaN` when the tail set is empty.
    pub fn calculate(returns: &[f64], alpha: f64) -> Self {
        let threshold = quantile(returns, alpha);

        let tail = SampleStatistics::from_values(
            returns.iter().copied().filter(|value| *value <= threshold),
        );

        Self {
            value: tail.mean(),
            alpha,
        }
    }
}
