use crate::statistic::{algorithm::SampleStatistics, metric::excess_returns, time::Frequency};
use serde::{Deserialize, Serialize};

/// Represents an annualised Sharpe Ratio value calculated from returns sampled at a
/// [`Frequency`].
///
/// Sharpe Ratio measures the risk-adjusted return of an investment by comparing
/// its excess returns (over risk-free rate) to its standard deviation.
///
/// See docs: <https://www.investopedia.com/articles/07/sharpe_ratio.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct SharpeRatio {
    pub value: f64,
    pub frequency: Frequency,
}

impl SharpeRatio {
    /// Calculate the annualised [`SharpeRatio`] of per-period `returns`.
    ///
    /// `NaN` for fewer than two returns or a zero standard deviation.
    pub fn calculate(returns: &[f64], risk_free_rate: f64, frequency: Frequency) -> Self {
        let stats = SampleStatistics::from_values(excess_returns(returns, risk_free_rate, frequency));
        let std_dev = stats.sample_std_dev();

        let value = if std_dev.is_nan() || std_dev == 0.0 {
            f64::NAN
        } else {
            stats.mean() / std_dev * frequency.periods_per_year().sqrt()
        };

        Self { value, frequency }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::f64_is_eq;

    #[test]
    fn test_sharpe_ratio_calculate() {
        struct TestCase {
            returns: Vec<f64>,
            risk_free_rate: f64,
            frequency: Frequency,
            expected: f64,
        }

        let cases = vec![
            // TC0: mean 0.02, std 0.01
            TestCase {
                returns: vec![0.01, 0.02, 0.03],
                risk_free_rate: 0.0,
                frequency: Frequency::Daily,
                expected: 2.0 * 252.0_f64.sqrt(),
            },
            // TC1: risk free rate shifts mean only
            TestCase {
                returns: vec![0.01, 0.02, 0.03],
                risk_free_rate: 0.12,
                frequency: Frequency::Monthly,
                expected: 1.0 * 12.0_f64.sqrt(),
            },
            // TC2: zero standard deviation
            TestCase {
                returns: vec![0.01, 0.01, 0.01],
                risk_free_rate: 0.0,
                frequency: Frequency::Daily,
                expected: f64::NAN,
            },
            // TC3: single observation
            TestCase {
                returns: vec![0.05],
                risk_free_rate: 0.0,
                frequency: Frequency::Daily,
                expected: f64::NAN,
            },
            // TC4: empty
            TestCase {
                returns: vec![],
                risk_free_rate: 0.0,
                frequency: Frequency::Weekly,
                expected: f64::NAN,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = SharpeRatio::calculate(&test.returns, test.risk_free_rate, test.frequency);
            assert_eq!(actual.frequency, test.frequency, "TC{index} failed");
            assert!(
                f64_is_eq(actual.value, test.expected, 1e-9),
                "TC{index} failed: {}",
                actual.value
            );
        }
    }
}
