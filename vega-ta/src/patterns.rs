use serde::{Deserialize, Serialize};

/// Type of crossover event detected between two data series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Cross {
    Above,
    Below,
}

/// Determine if a crossover occurred between the previous and current values.
///
/// Touching the slow series on the previous observation counts as "not yet crossed", so a
/// series that sits exactly on the line and then moves away reports a cross.
pub fn crossover(prev_fast: f64, prev_slow: f64, fast: f64, slow: f64) -> Option<Cross> {
    if prev_fast <= prev_slow && fast > slow {
        Some(Cross::Above)
    } else if prev_fast >= prev_slow && fast < slow {
        Some(Cross::Below)
    } else {
        None
    }
}

/// Determine if a series crossed zero between the previous and current values.
pub fn zero_cross(prev: f64, current: f64) -> Option<Cross> {
    crossover(prev, 0.0, current, 0.0)
}

/// Sign of a value as -1, 0 or 1. NaN has no sign.
pub fn sign(value: f64) -> Option<i8> {
    if value.is_nan() {
        None
    } else if value > 0.0 {
        Some(1)
    } else if value < 0.0 {
        Some(-1)
    } else {
        Some(0)
    }
}
