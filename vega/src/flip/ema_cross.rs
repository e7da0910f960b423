use crate::{
    flip::{FlipDetail, FlipDirection, FlipEvent, FlipParams},
    series::PriceSeries,
};
use smol_str::SmolStr;
use vega_ta::{
    indicators::{ema_series, rolling_mean},
    patterns::{Cross, zero_cross},
};

/// EMA(fast) - EMA(slow) of close prices, one value per bar.
pub fn ema_momentum(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    ema_series(closes, fast)
        .into_iter()
        .zip(ema_series(closes, slow))
        .map(|(fast, slow)| fast - slow)
        .collect()
}

/// Rule 2: fire when EMA momentum crosses zero on a bar whose volume reaches
/// `params.volume_multiplier` times its rolling average.
///
/// Cannot fire until the volume window has filled: an undefined average is never treated as
/// zero, so a warm-up bar with any volume is not confirmed. Fewer than `ema_slow + 2` bars
/// yields no events.
pub fn ema_cross_events(sector: &SmolStr, series: &PriceSeries, params: &FlipParams) -> Vec<FlipEvent> {
    if series.len() < params.ema_slow + 2 {
        return Vec::new();
    }

    let closes = series.closes();
    let volumes = series.volumes();
    let momentum = ema_momentum(&closes, params.ema_fast, params.ema_slow);
    let volume_average = rolling_mean(&volumes, params.volume_window);

    (1..series.len())
        .filter_map(|bar| {
            let cross = zero_cross(momentum[bar - 1], momentum[bar])?;

            let average = volume_average[bar];
            if average.is_nan() || volumes[bar] < params.volume_multiplier * average {
                return None;
            }

            let volume_ratio = if average == 0.0 {
                f64::NAN
            } else {
                volumes[bar] / average
            };

            Some(FlipEvent {
                time: series.bars()[bar].time,
                sector: sector.clone(),
                direction: match cross {
                    Cross::Above => FlipDirection::Up,
                    Cross::Below => FlipDirection::Down,
                },
                magnitude: momentum[bar],
                detail: FlipDetail::EmaCrossVol {
                    fast: params.ema_fast,
                    slow: params.ema_slow,
                    volume_multiplier: params.volume_multiplier,
                    volume_ratio,
                },
            })
        })
        .collect()
}
