use crate::{
    Timed,
    flip::{FlipDetail, FlipDirection, FlipEvent, FlipParams},
    series::PriceSeries,
};
use smol_str::SmolStr;
use vega_ta::patterns::sign;

/// Relative window return of `sector` against `index` on their shared timestamps.
///
/// `rel[t] = (1 + sector_return) / (1 + index_return) - 1` where each return is taken over a
/// shift of `window` bars. Undefined values are dropped.
pub fn relative_returns(sector: &PriceSeries, index: &PriceSeries, window: usize) -> Vec<Timed<f64>> {
    let aligned = sector.align(index);

    aligned
        .iter()
        .enumerate()
        .skip(window)
        .filter_map(|(position, (sector_now, index_now))| {
            let (sector_then, index_then) = aligned[position - window];
            let sector_return = sector_now.close / sector_then.close - 1.0;
            let index_return = index_now.close / index_then.close - 1.0;
            let relative = (1.0 + sector_return) / (1.0 + index_return) - 1.0;
            relative
                .is_finite()
                .then(|| Timed::new(relative, sector_now.time))
        })
        .collect()
}

/// Rule 1: fire when the relative window return changes sign and its magnitude reaches
/// `params.threshold`.
///
/// Fewer than three aligned bars yields no events.
pub fn rel_flip_events(
    sector: &SmolStr,
    series: &PriceSeries,
    index: &PriceSeries,
    params: &FlipParams,
) -> Vec<FlipEvent> {
    if series.align(index).len() < 3 {
        return Vec::new();
    }

    relative_returns(series, index, params.window_minutes)
        .windows(2)
        .filter(|pair| {
            let (prev, current) = (pair[0].value, pair[1].value);
            sign(current) != sign(prev) && current.abs() >= params.threshold
        })
        .map(|pair| {
            let current = pair[1];
            FlipEvent {
                time: current.time,
                sector: sector.clone(),
                direction: if current.value > 0.0 {
                    FlipDirection::Up
                } else {
                    FlipDirection::Down
                },
                magnitude: current.value,
                detail: FlipDetail::RelFlip {
                    window_minutes: params.window_minutes,
                    threshold: params.threshold,
                },
            }
        })
        .collect()
}
