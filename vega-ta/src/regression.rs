use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Straight line `y = slope * x + intercept` fitted by ordinary least squares.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize, Constructor)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line to `values` against their index `0..values.len()`.
    ///
    /// Returns `None` for fewer than two values or any non-finite value.
    pub fn fit_index(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 || values.iter().any(|value| !value.is_finite()) {
            return None;
        }

        let count = n as f64;
        let mean_x = (count - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / count;

        let (sxy, sxx) = values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
                let dx = x as f64 - mean_x;
                (sxy + dx * (y - mean_y), sxx + dx * dx)
            });

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    /// Value of the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Mean absolute distance between the line and `values` (indexed from zero).
    pub fn mean_abs_residual(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }

        let total: f64 = values
            .iter()
            .enumerate()
            .map(|(x, y)| (self.predict(x as f64) - y).abs())
            .sum();

        total / values.len() as f64
    }
}
