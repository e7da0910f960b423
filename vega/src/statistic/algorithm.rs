use serde::{Deserialize, Serialize};

/// Grouping of [Welford Online](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
/// algorithms for calculating running values such as mean and variance in one pass through.
pub mod welford_online {
    /// Calculates the next mean.
    pub fn calculate_mean(prev_mean: f64, next_value: f64, count: f64) -> f64 {
        prev_mean + (next_value - prev_mean) / count
    }

    /// Calculates the next Welford Online recurrence relation M.
    pub fn calculate_recurrence_relation_m(
        prev_m: f64,
        prev_mean: f64,
        new_value: f64,
        new_mean: f64,
    ) -> f64 {
        prev_m + ((new_value - prev_mean) * (new_value - new_mean))
    }

    /// Calculates the next unbiased 'Sample' Variance using Bessel's correction (count - 1), and the
    /// Welford Online recurrence relation M.
    ///
    /// Undefined (`NaN`) for fewer than two observations.
    pub fn calculate_sample_variance(recurrence_relation_m: f64, count: f64) -> f64 {
        if count < 2.0 {
            f64::NAN
        } else {
            recurrence_relation_m / (count - 1.0)
        }
    }

    /// Calculates the next biased 'Population' Variance using the Welford Online recurrence relation M.
    ///
    /// Undefined (`NaN`) for an empty dataset.
    pub fn calculate_population_variance(recurrence_relation_m: f64, count: f64) -> f64 {
        if count < 1.0 {
            f64::NAN
        } else {
            recurrence_relation_m / count
        }
    }
}

/// One-pass mean and sample variance of a dataset.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct SampleStatistics {
    pub count: usize,
    pub mean: f64,
    pub recurrence_relation_m: f64,
}

impl SampleStatistics {
    /// Calculate [`SampleStatistics`] over every value yielded by `values`.
    pub fn from_values<Iter>(values: Iter) -> Self
    where
        Iter: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(Self::default(), |mut stats, value| {
            stats.update(value);
            stats
        })
    }

    /// Iteratively update the statistics with the next value in the dataset.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let prev_mean = self.mean;
        self.mean = welford_online::calculate_mean(prev_mean, value, self.count as f64);
        self.recurrence_relation_m = welford_online::calculate_recurrence_relation_m(
            self.recurrence_relation_m,
            prev_mean,
            value,
            self.mean,
        );
    }

    /// Mean of the dataset, `NaN` if empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Unbiased sample variance, `NaN` for fewer than two observations.
    pub fn sample_variance(&self) -> f64 {
        welford_online::calculate_sample_variance(self.recurrence_relation_m, self.count as f64)
    }

    /// Sample standard deviation, `NaN` for fewer than two observations.
    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().abs().sqrt()
    }
}

/// Unbiased sample covariance of `(x, y)` pairs, `NaN` for fewer than two pairs.
///
/// Uses the one-pass co-moment update `C_n = C_n-1 + (x - mean_x_prev) * (y - mean_y_new)`.
pub fn sample_covariance(pairs: &[(f64, f64)]) -> f64 {
    let (count, _, _, co_moment) = pairs.iter().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(count, mean_x, mean_y, co_moment), (x, y)| {
            let count = count + 1.0;
            let new_mean_x = welford_online::calculate_mean(mean_x, *x, count);
            let new_mean_y = welford_online::calculate_mean(mean_y, *y, count);
            (
                count,
                new_mean_x,
                new_mean_y,
                co_moment + (x - mean_x) * (y - new_mean_y),
            )
        },
    );

    welford_online::calculate_sample_variance(co_moment, count)
}

/// Quantile `q` in `[0, 1]` of `values` using linear interpolation between closest ranks.
///
/// `NaN` for an empty dataset.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Median of `values`, `NaN` for an empty dataset.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::f64_is_eq;

    #[test]
    fn calculate_mean() {
        struct Input {
            prev_mean: f64,
            next_value: f64,
            count: f64,
            expected: f64,
        }

        // dataset = [0.1, -0.2, -0.05, 0.2, 0.15, -0.17]
        let inputs = vec![
            // TC0
            Input {
                prev_mean: 0.0,
                next_value: 0.1,
                count: 1.0,
                expected: 0.1,
            },
            // TC1
            Input {
                prev_mean: 0.1,
                next_value: -0.2,
                count: 2.0,
                expected: -0.05,
            },
            // TC2
            Input {
                prev_mean: -0.05,
                next_value: -0.05,
                count: 3.0,
                expected: -0.05,
            },
            // TC3
            Input {
                prev_mean: -0.05,
                next_value: 0.2,
                count: 4.0,
                expected: 0.0125,
            },
            // TC4
            Input {
                prev_mean: 0.0125,
                next_value: 0.15,
                count: 5.0,
                expected: 0.04,
            },
            // TC5
            Input {
                prev_mean: 0.04,
                next_value: -0.17,
                count: 6.0,
                expected: 0.005,
            },
        ];

        for (index, test) in inputs.iter().enumerate() {
            let actual =
                welford_online::calculate_mean(test.prev_mean, test.next_value, test.count);
            assert!(
                f64_is_eq(actual, test.expected, 1e-12),
                "TC{index} failed: {actual}"
            );
        }
    }

    #[test]
    fn calculate_sample_variance() {
        let inputs = vec![(0.0, 1.0), (1050.0, 5.0), (16200000000.0, 3.0)];
        let expected = vec![f64::NAN, 262.5, 8100000000.0];

        for (index, ((input_m, input_count), expected)) in
            inputs.into_iter().zip(expected).enumerate()
        {
            let actual = welford_online::calculate_sample_variance(input_m, input_count);
            assert!(f64_is_eq(actual, expected, 1e-9), "TC{index} failed");
        }
    }

    #[test]
    fn sample_statistics_matches_two_pass() {
        let values = [1.1, 1.2, 1.3, 1.4, 0.6];
        let stats = SampleStatistics::from_values(values);

        assert_eq!(stats.count, 5);
        assert!(f64_is_eq(stats.mean(), 1.12, 1e-12));
        // sum of squared deviations = 0.388
        assert!(f64_is_eq(stats.sample_variance(), 0.097, 1e-12));
    }

    #[test]
    fn sample_statistics_constant_series_has_zero_variance() {
        let stats = SampleStatistics::from_values([0.5; 10]);
        assert_eq!(stats.sample_std_dev(), 0.0);
    }

    #[test]
    fn sample_statistics_insufficient() {
        assert!(SampleStatistics::default().mean().is_nan());
        assert!(SampleStatistics::from_values([1.0]).sample_std_dev().is_nan());
    }

    #[test]
    fn sample_covariance_of_linear_pairs() {
        // y = 2x, var(x) = 2.5 => cov = 5
        let pairs: Vec<(f64, f64)> = (1..=5).map(|x| (x as f64, 2.0 * x as f64)).collect();
        assert!(f64_is_eq(sample_covariance(&pairs), 5.0, 1e-12));
        assert!(sample_covariance(&pairs[..1]).is_nan());
    }

    #[test]
    fn quantile_linear_interpolation() {
        struct TestCase {
            values: Vec<f64>,
            q: f64,
            expected: f64,
        }

        let cases = vec![
            // TC0: interpolated
            TestCase {
                values: vec![4.0, 1.0, 3.0, 2.0],
                q: 0.5,
                expected: 2.5,
            },
            // TC1: lower tail
            TestCase {
                values: vec![-0.03, 0.01, 0.02, -0.01, 0.05],
                q: 0.05,
                expected: -0.03 + 0.02 * 0.2,
            },
            // TC2: exact rank
            TestCase {
                values: vec![1.0, 2.0, 3.0],
                q: 1.0,
                expected: 3.0,
            },
            // TC3: empty
            TestCase {
                values: vec![],
                q: 0.5,
                expected: f64::NAN,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = quantile(&test.values, test.q);
            assert!(f64_is_eq(actual, test.expected, 1e-12), "TC{index} failed");
        }
    }
}
