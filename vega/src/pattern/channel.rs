use crate::series::Bar;
use serde::{Deserialize, Serialize};
use vega_ta::regression::LinearFit;

pub const DEFAULT_CHANNEL_WINDOW: usize = 120;
pub const DEFAULT_CHANNEL_MIN_BARS: usize = 20;

/// Trailing window used when fitting a [`Channel`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub window: usize,
    pub min_bars: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_CHANNEL_WINDOW,
            min_bars: DEFAULT_CHANNEL_MIN_BARS,
        }
    }
}

/// Upper and lower regression lines fitted independently to highs and lows against bar index.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Channel {
    pub upper: LinearFit,
    pub lower: LinearFit,
    /// Average of the negated mean absolute residuals of both lines. Zero for a perfect fit.
    pub fit_quality: f64,
}

impl Channel {
    /// Fit a [`Channel`] to the trailing `config.window` bars.
    ///
    /// `None` if fewer than `config.min_bars` bars are available or the window holds
    /// non-finite highs or lows.
    pub fn fit(bars: &[Bar], config: &ChannelConfig) -> Option<Self> {
        let window = &bars[bars.len().saturating_sub(config.window)..];
        if window.len() < config.min_bars.max(2) {
            return None;
        }

        let highs = window.iter().map(|bar| bar.high).collect::<Vec<_>>();
        let lows = window.iter().map(|bar| bar.low).collect::<Vec<_>>();

        let upper = LinearFit::fit_index(&highs)?;
        let lower = LinearFit::fit_index(&lows)?;

        let fit_quality =
            (-upper.mean_abs_residual(&highs) - lower.mean_abs_residual(&lows)) / 2.0;

        Some(Self {
            upper,
            lower,
            fit_quality,
        })
    }

    pub fn slope_high(&self) -> f64 {
        self.upper.slope
    }

    pub fn slope_low(&self) -> f64 {
        self.lower.slope
    }
}
