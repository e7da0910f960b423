use crate::statistic::{
    algorithm::{SampleStatistics, sample_covariance},
    time::Frequency,
};
use serde::{Deserialize, Serialize};

/// Sensitivity of an asset's returns to a benchmark's returns, together with Jensen's alpha.
///
/// See docs: <https://www.investopedia.com/terms/b/beta.asp>
/// and <https://www.investopedia.com/terms/j/jensensmeasure.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct BetaAlpha {
    pub beta: f64,
    pub alpha: f64,
    pub frequency: Frequency,
}

impl BetaAlpha {
    /// Calculate [`BetaAlpha`] from timestamp-aligned `(asset, benchmark)` return pairs.
    ///
    /// Both values are `NaN` for fewer than two pairs or a zero benchmark variance.
    pub fn calculate(pairs: &[(f64, f64)], risk_free_rate: f64, frequency: Frequency) -> Self {
        let asset = SampleStatistics::from_values(pairs.iter().map(|(asset, _)| *asset));
        let benchmark = SampleStatistics::from_values(pairs.iter().map(|(_, bench)| *bench));
        let benchmark_variance = benchmark.sample_variance();

        if benchmark_variance.is_nan() || benchmark_variance == 0.0 {
            return Self {
                beta: f64::NAN,
                alpha: f64::NAN,
                frequency,
            };
        }

        let beta = sample_covariance(pairs) / benchmark_variance;

        let periods = frequency.periods_per_year();
        let asset_annual = asset.mean() * periods;
        let benchmark_annual = benchmark.mean() * periods;
        let alpha = asset_annual - (risk_free_rate + beta * (benchmark_annual - risk_free_rate));

        Self {
            beta,
            alpha,
            frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::f64_is_eq;

    #[test]
    fn test_beta_alpha_calculate() {
        struct TestCase {
            pairs: Vec<(f64, f64)>,
            risk_free_rate: f64,
            expected_beta: f64,
            expected_alpha: f64,
        }

        let cases = vec![
            // TC0: asset moves twice the benchmark
            TestCase {
                pairs: vec![(0.02, 0.01), (0.04, 0.02), (0.06, 0.03), (0.08, 0.04)],
                risk_free_rate: 0.0,
                expected_beta: 2.0,
                expected_alpha: 0.0,
            },
            // TC1: constant out-performance shows up as alpha
            TestCase {
                pairs: vec![(0.011, 0.01), (0.021, 0.02), (0.031, 0.03)],
                risk_free_rate: 0.0,
                expected_beta: 1.0,
                expected_alpha: 0.001 * 252.0,
            },
            // TC2: flat benchmark
            TestCase {
                pairs: vec![(0.01, 0.01), (0.02, 0.01), (0.03, 0.01)],
                risk_free_rate: 0.0,
                expected_beta: f64::NAN,
                expected_alpha: f64::NAN,
            },
            // TC3: single pair
            TestCase {
                pairs: vec![(0.01, 0.02)],
                risk_free_rate: 0.02,
                expected_beta: f64::NAN,
                expected_alpha: f64::NAN,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = BetaAlpha::calculate(&test.pairs, test.risk_free_rate, Frequency::Daily);
            assert!(
                f64_is_eq(actual.beta, test.expected_beta, 1e-9),
                "TC{index} failed: beta {}",
                actual.beta
            );
            assert!(
                f64_is_eq(actual.alpha, test.expected_alpha, 1e-9),
                "TC{index} failed: alpha {}",
                actual.alpha
            );
        }
    }
}
