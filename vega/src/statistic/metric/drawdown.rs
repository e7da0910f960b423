use crate::Timed;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// [`MaxDrawdown`] is the largest peak-to-trough decline of a price path, expressed as a
/// non-positive fraction of the running peak.
///
/// See documentation: <https://www.investopedia.com/terms/m/maximum-drawdown-mdd.asp>
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct MaxDrawdown {
    pub value: f64,
    pub time_peak: Option<DateTime<Utc>>,
    pub time_trough: Option<DateTime<Utc>>,
}

impl Default for MaxDrawdown {
    fn default() -> Self {
        Self {
            value: f64::NAN,
            time_peak: None,
            time_trough: None,
        }
    }
}

impl MaxDrawdown {
    /// Calculate the [`MaxDrawdown`] of a time-ordered price path.
    pub fn calculate<Iter>(prices: Iter) -> Self
    where
        Iter: IntoIterator<Item = Timed<f64>>,
    {
        let mut generator = MaxDrawdownGenerator::default();
        prices.into_iter().for_each(|price| generator.update(price));
        generator.generate()
    }

    /// Time period between the peak and the trough, if a decline occurred.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.time_peak
            .zip(self.time_trough)
            .map(|(peak, trough)| trough.signed_duration_since(peak))
    }
}

/// [`MaxDrawdown`] generator that tracks the running peak of a price path.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct MaxDrawdownGenerator {
    pub count: usize,
    pub peak: Option<Timed<f64>>,
    pub drawdown_max: Option<MaxDrawdown>,
}

impl MaxDrawdownGenerator {
    /// Updates the internal [`MaxDrawdownGenerator`] state using the latest [`Timed`] price.
    pub fn update(&mut self, point: Timed<f64>) {
        if !point.value.is_finite() {
            return;
        }
        self.count += 1;

        let peak = match self.peak {
            Some(peak) if point.value <= peak.value => peak,
            _ => {
                self.peak = Some(point);
                return;
            }
        };

        let drawdown = point.value / peak.value - 1.0;
        if !drawdown.is_finite() {
            return;
        }

        let is_new_max = self
            .drawdown_max
            .is_none_or(|current| drawdown < current.value);

        if is_new_max {
            self.drawdown_max = Some(MaxDrawdown {
                value: drawdown,
                time_peak: Some(peak.time),
                time_trough: Some(point.time),
            });
        }
    }

    /// Generate the current [`MaxDrawdown`].
    ///
    /// `NaN` for fewer than two observations, `0.0` for a path that never declined.
    pub fn generate(&self) -> MaxDrawdown {
        if self.count < 2 {
            return MaxDrawdown::default();
        }

        self.drawdown_max.unwrap_or(MaxDrawdown {
            value: 0.0,
            time_peak: None,
            time_trough: None,
        })
    }
}
