use crate::{config::ScoreConfig, statistic::bundle::MetricsBundle};
use profile::WeightProfile;
use serde::{Deserialize, Serialize};

/// Batch scoring of many symbols in parallel.
pub mod batch;

/// Metric weight presets and custom weights.
pub mod profile;

/// How [`composite_score`] treats undefined metrics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum MissingMetricPolicy {
    /// Undefined metrics squash to 0.5 and keep their weight.
    #[default]
    Neutral,
    /// Undefined metrics are dropped from the numerator and the denominator. The score is
    /// undefined when no metric is available.
    Renormalize,
}

/// Logistic squash `1 / (1 + e^-x)`. Undefined (`NaN` or infinite) input squashes to `0.5`.
pub fn squash(value: f64) -> f64 {
    if value.is_finite() {
        1.0 / (1.0 + (-value).exp())
    } else {
        0.5
    }
}

/// Composite 0-100 score of a [`MetricsBundle`] under a [`WeightProfile`].
///
/// Lower-is-better metrics (beta, volatility, drawdown, CVaR) are inverted before squashing.
/// Under [`MissingMetricPolicy::Neutral`] a bundle of undefined metrics scores exactly 50.
pub fn composite_score(
    metrics: &MetricsBundle,
    profile: &WeightProfile,
    policy: MissingMetricPolicy,
) -> f64 {
    let weights = profile.weights();

    let terms = [
        (weights.sharpe, metrics.sharpe),
        (weights.sortino, metrics.sortino),
        (weights.beta, -metrics.beta.abs()),
        (weights.vol, -metrics.vol),
        (weights.mdd, -metrics.mdd.abs()),
        (weights.cvar, -metrics.cvar.abs()),
        (weights.cagr, metrics.cagr),
    ];

    let (numerator, denominator) = terms
        .iter()
        .filter(|(_, value)| match policy {
            MissingMetricPolicy::Neutral => true,
            MissingMetricPolicy::Renormalize => value.is_finite(),
        })
        .fold((0.0, 0.0), |(numerator, denominator), (weight, value)| {
            (numerator + weight * squash(*value), denominator + weight)
        });

    if denominator <= 0.0 {
        return f64::NAN;
    }

    (100.0 * (numerator / denominator)).clamp(0.0, 100.0)
}

/// Scores [`MetricsBundle`]s with a fixed [`WeightProfile`] and [`MissingMetricPolicy`].
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CompositeScorer {
    pub profile: WeightProfile,
    pub policy: MissingMetricPolicy,
}

impl CompositeScorer {
    pub fn new(profile: WeightProfile, policy: MissingMetricPolicy) -> Self {
        Self { profile, policy }
    }

    pub fn from_config(config: &ScoreConfig) -> Self {
        Self::new(config.profile, config.missing_policy)
    }

    pub fn score(&self, metrics: &MetricsBundle) -> f64 {
        composite_score(metrics, &self.profile, self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{score::profile::MetricWeights, test_utils::f64_is_eq};

    #[test]
    fn test_squash() {
        struct TestCase {
            input: f64,
            expected: f64,
        }

        let cases = vec![
            // TC0
            TestCase {
                input: 0.0,
                expected: 0.5,
            },
            // TC1
            TestCase {
                input: 2.0,
                expected: 0.8807970779778823,
            },
            // TC2
            TestCase {
                input: -2.0,
                expected: 0.11920292202211755,
            },
            // TC3
            TestCase {
                input: f64::NAN,
                expected: 0.5,
            },
            // TC4
            TestCase {
                input: f64::NEG_INFINITY,
                expected: 0.5,
            },
            // TC5: saturates without overflow
            TestCase {
                input: -1000.0,
                expected: 0.0,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = squash(test.input);
            assert!(
                f64_is_eq(actual, test.expected, 1e-12),
                "TC{index} failed: {actual}"
            );
        }
    }

    #[test]
    fn test_composite_score_all_undefined_is_fifty() {
        let profiles = WeightProfile::PRESETS.into_iter().chain([WeightProfile::Custom(
            MetricWeights::new(0.3, 0.0, 0.7, 0.0, 0.0, 0.0, 1.1),
        )]);

        for (index, profile) in profiles.enumerate() {
            let actual = composite_score(
                &MetricsBundle::undefined(),
                &profile,
                MissingMetricPolicy::Neutral,
            );
            assert_eq!(actual, 50.0, "TC{index} failed");
        }
    }

    #[test]
    fn test_composite_score_inverts_lower_is_better() {
        let only_beta = WeightProfile::Custom(MetricWeights::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0));

        let low = MetricsBundle {
            beta: 0.5,
            ..MetricsBundle::undefined()
        };
        let high = MetricsBundle {
            beta: -1.5,
            ..MetricsBundle::undefined()
        };

        let low = composite_score(&low, &only_beta, MissingMetricPolicy::Neutral);
        let high = composite_score(&high, &only_beta, MissingMetricPolicy::Neutral);

        assert!(f64_is_eq(low, 100.0 * squash(-0.5), 1e-12));
        assert!(low > high);
    }

    #[test]
    fn test_composite_score_policies() {
        let metrics = MetricsBundle {
            sharpe: 2.0,
            ..MetricsBundle::undefined()
        };

        let neutral = composite_score(&metrics, &WeightProfile::Balanced, MissingMetricPolicy::Neutral);
        let expected = 100.0 * (0.22 * squash(2.0) + 0.78 * 0.5);
        assert!(f64_is_eq(neutral, expected, 1e-9), "{neutral}");

        let renormalized =
            composite_score(&metrics, &WeightProfile::Balanced, MissingMetricPolicy::Renormalize);
        assert!(f64_is_eq(renormalized, 100.0 * squash(2.0), 1e-9));

        let nothing = composite_score(
            &MetricsBundle::undefined(),
            &WeightProfile::Balanced,
            MissingMetricPolicy::Renormalize,
        );
        assert!(nothing.is_nan());
    }

    #[test]
    fn test_composite_score_bounds() {
        let extremes = [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1e6, -1.0, 0.0, 1.0, 1e6];

        for (index, value) in extremes.into_iter().enumerate() {
            let metrics = MetricsBundle {
                sharpe: value,
                sortino: value,
                beta: value,
                alpha: value,
                vol: value,
                mdd: value,
                cagr: value,
                cvar: value,
            };

            for profile in WeightProfile::PRESETS {
                let actual = composite_score(&metrics, &profile, MissingMetricPolicy::Neutral);
                assert!((0.0..=100.0).contains(&actual), "TC{index} failed: {actual}");
            }
        }
    }
}
