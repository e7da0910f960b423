use crate::statistic::{algorithm::SampleStatistics, metric::excess_returns, time::Frequency};
use serde::{Deserialize, Serialize};

/// Represents an annualised Sortino Ratio value calculated from returns sampled at a
/// [`Frequency`].
///
/// Similar to the Sharpe Ratio, but only considers downside volatility (standard deviation of
/// negative excess returns) rather than total volatility.
///
/// See docs: <https://www.investopedia.com/terms/s/sortinoratio.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct SortinoRatio {
    pub value: f64,
    pub frequency: Frequency,
}

impl SortinoRatio {
    /// Calculate the annualised [`SortinoRatio`] of per-period `returns`.
    ///
    /// `NaN` for fewer than two negative excess returns or a zero downside deviation.
    pub fn calculate(returns: &[f64], risk_free_rate: f64, frequency: Frequency) -> Self {
        let (all, downside) = excess_returns(returns, risk_free_rate, frequency).fold(
            (SampleStatistics::default(), SampleStatistics::default()),
            |(mut all, mut downside), excess| {
                all.update(excess);
                if excess < 0.0 {
                    downside.update(excess);
                }
                (all, downside)
            },
        );

        let downside_deviation = downside.sample_std_dev();

        let value = if downside_deviation.is_nan() || downside_deviation == 0.0 {
            f64::NAN
        } else {
            all.mean() / downside_deviation * frequency.periods_per_year().sqrt()
        };

        Self { value, frequency }
    }
}
