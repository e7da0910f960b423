use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::str::FromStr;
use thiserror::Error;

/// Sampling frequency of a price series, used to annualise per-period statistics.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize, Display,
)]
pub enum Frequency {
    #[default]
    #[serde(alias = "D", alias = "daily")]
    Daily,
    #[serde(alias = "W", alias = "weekly")]
    Weekly,
    #[serde(alias = "M", alias = "monthly")]
    Monthly,
    #[serde(alias = "H", alias = "hourly")]
    Hourly,
}

impl Frequency {
    /// Number of sampling periods in one year.
    ///
    /// Hourly assumes 6.5 trading hours per trading day.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            Self::Daily => 252.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
            Self::Hourly => 252.0 * 6.5,
        }
    }

    pub fn name(&self) -> SmolStr {
        match self {
            Self::Daily => SmolStr::new_static("Daily(252)"),
            Self::Weekly => SmolStr::new_static("Weekly(52)"),
            Self::Monthly => SmolStr::new_static("Monthly(12)"),
            Self::Hourly => SmolStr::new_static("Hourly(1638)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sampling frequency: {0}")]
pub struct UnknownFrequency(pub SmolStr);

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_uppercase().as_str() {
            "D" | "DAILY" => Ok(Self::Daily),
            "W" | "WEEKLY" => Ok(Self::Weekly),
            "M" | "MONTHLY" => Ok(Self::Monthly),
            "H" | "HOURLY" => Ok(Self::Hourly),
            _ => Err(UnknownFrequency(SmolStr::new(input))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_str() {
        struct TestCase {
            input: &'static str,
            expected: Result<Frequency, UnknownFrequency>,
        }

        let cases = vec![
            // TC0
            TestCase {
                input: "D",
                expected: Ok(Frequency::Daily),
            },
            // TC1
            TestCase {
                input: "weekly",
                expected: Ok(Frequency::Weekly),
            },
            // TC2
            TestCase {
                input: " m ",
                expected: Ok(Frequency::Monthly),
            },
            // TC3
            TestCase {
                input: "H",
                expected: Ok(Frequency::Hourly),
            },
            // TC4
            TestCase {
                input: "Q",
                expected: Err(UnknownFrequency(SmolStr::new("Q"))),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = Frequency::from_str(test.input);
            assert_eq!(actual, test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_frequency_periods_per_year() {
        assert_eq!(Frequency::Daily.periods_per_year(), 252.0);
        assert_eq!(Frequency::Weekly.periods_per_year(), 52.0);
        assert_eq!(Frequency::Monthly.periods_per_year(), 12.0);
        assert_eq!(Frequency::Hourly.periods_per_year(), 1638.0);
    }

    #[test]
    fn test_frequency_de_alias() {
        let frequency: Frequency = serde_json::from_str(r#""W""#).unwrap();
        assert_eq!(frequency, Frequency::Weekly);
        assert_eq!(serde_json::to_string(&Frequency::Hourly).unwrap(), r#""Hourly""#);
    }
}
