use crate::statistic::time::Frequency;
use serde::{Deserialize, Serialize};

/// Compound annual growth rate of a price path.
///
/// The number of years is approximated as `observations / periods_per_year`, which is not
/// calendar-aware.
///
/// See docs: <https://www.investopedia.com/terms/c/cagr.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Cagr {
    pub value: f64,
    pub frequency: Frequency,
}

impl Cagr {
    /// `NaN` for fewer than two prices or a non-positive starting price.
    pub fn calculate(prices: &[f64], frequency: Frequency) -> Self {
        let value = match (prices.first(), prices.last()) {
            (Some(start), Some(end)) if prices.len() >= 2 && *start > 0.0 => {
                let years = prices.len() as f64 / frequency.periods_per_year();
                (end / start).powf(1.0 / years) - 1.0
            }
            _ => f64::NAN,
        };

        Self { value, frequency }
    }
}
