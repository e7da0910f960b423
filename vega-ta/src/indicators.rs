use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Simple moving average indicator over a fixed window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new SMA with the given period.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        }
    }

    /// Update the SMA with a new value and return the latest average.
    ///
    /// Returns `None` until `period` values have been observed.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.period {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.average()
    }

    /// Current average value, if the window is full.
    pub fn average(&self) -> Option<f64> {
        if self.period == 0 || self.values.len() < self.period {
            None
        } else {
            Some(self.sum / self.period as f64)
        }
    }

    /// True once `period` values have been observed.
    pub fn is_full(&self) -> bool {
        self.period > 0 && self.values.len() >= self.period
    }
}

/// Exponential moving average indicator, seeded with the first observed value.
///
/// Smoothing factor is `2 / (span + 1)`, matching the common "span" convention.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ExponentialMovingAverage {
    multiplier: f64,
    value: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create a new EMA with the given span.
    pub fn new(span: usize) -> Self {
        let multiplier = 2.0 / (span as f64 + 1.0);
        Self {
            multiplier,
            value: None,
        }
    }

    /// Update the EMA with a new price and return the latest value.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            Some(val) => (price - val) * self.multiplier + val,
            None => price,
        };
        self.value = Some(next);
        next
    }

    /// Current EMA value if initialised.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// EMA of every prefix of `values`, one output per input.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = ExponentialMovingAverage::new(span);
    values.iter().map(|value| ema.update(*value)).collect()
}

/// Rolling mean of `values` over `window`, one output per input.
///
/// Leading entries are NaN until the window fills.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut sma = SimpleMovingAverage::new(window);
    values
        .iter()
        .map(|value| sma.update(*value).unwrap_or(f64::NAN))
        .collect()
}
