use crate::statistic::{algorithm::SampleStatistics, time::Frequency};
use serde::{Deserialize, Serialize};

/// Annualised sample standard deviation of per-period returns.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Volatility {
    pub value: f64,
    pub frequency: Frequency,
}

impl Volatility {
    pub fn calculate(returns: &[f64], frequency: Frequency) -> Self {
        let std_dev = SampleStatistics::from_values(returns.iter().copied()).sample_std_dev();

        Self {
            value: std_dev * frequency.periods_per_year().sqrt(),
            frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::f64_is_eq;

    #[test]
    fn test_volatility_calculate() {
        let actual = Volatility::calculate(&[0.01, 0.02, 0.03], Frequency::Daily);
        assert!(f64_is_eq(actual.value, 0.01 * 252.0_f64.sqrt(), 1e-12));

        let actual = Volatility::calculate(&[0.01], Frequency::Weekly);
        assert!(actual.value.is_nan());
    }
}
