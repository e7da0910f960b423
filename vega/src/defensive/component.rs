use crate::{
    momentum::GradeTransition,
    momentum::MomentumTile,
    statistic::algorithm::SampleStatistics,
};
use chrono::{DateTime, TimeDelta, Utc};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Risk-off sub-score in `[0, 100]` together with the raw input it was derived from.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct SubScore {
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub score: f64,
    pub raw: Option<f64>,
}

impl SubScore {
    pub const UNDEFINED: Self = Self {
        score: f64::NAN,
        raw: None,
    };

    pub fn is_defined(&self) -> bool {
        self.score.is_finite()
    }
}

/// Most recent finite value. Non-finite trailing values are skipped, not scored.
fn latest_finite(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|value| value.is_finite())
}

/// Volatility index level of the latest finite value.
pub fn vix_score(values: &[f64]) -> SubScore {
    let Some(latest) = latest_finite(values) else {
        return SubScore::UNDEFINED;
    };

    let score = match latest {
        level if level < 15.0 => 10.0,
        level if level < 20.0 => 35.0,
        level if level < 30.0 => 70.0,
        _ => 95.0,
    };

    SubScore::new(score, Some(latest))
}

/// Z-score of the latest defensive ratio against its trailing `window` mean and sample
/// standard deviation, mapped to `clip(50 + 20 * z, 0, 100)`.
pub fn ratio_score(ratios: &[f64], window: usize) -> SubScore {
    let Some(latest) = ratios.last().copied() else {
        return SubScore::UNDEFINED;
    };

    if window < 2 || ratios.len() < window {
        return SubScore::new(f64::NAN, Some(latest));
    }

    let stats = SampleStatistics::from_values(ratios[ratios.len() - window..].iter().copied());
    let std_dev = stats.sample_std_dev();
    if std_dev.is_nan() || std_dev == 0.0 {
        return SubScore::new(f64::NAN, Some(latest));
    }

    let z = (latest - stats.mean()) / std_dev;
    SubScore::new((50.0 + 20.0 * z).clamp(0.0, 100.0), Some(latest))
}

/// Yield curve spread of the latest finite value.
pub fn yield_curve_score(values: &[f64]) -> SubScore {
    let Some(latest) = latest_finite(values) else {
        return SubScore::UNDEFINED;
    };

    let score = match latest {
        spread if spread >= 1.0 => 10.0,
        spread if spread >= 0.2 => 30.0,
        spread if spread >= 0.0 => 45.0,
        spread if spread >= -0.5 => 75.0,
        _ => 90.0,
    };

    SubScore::new(score, Some(latest))
}

/// `100 * (1 - fraction of tiles scoring at least strong_cutoff)`, over tiles with a finite
/// score. The raw value is the fraction as a percentage.
pub fn breadth_score(tiles: &[MomentumTile], strong_cutoff: f64) -> SubScore {
    let (valid, strong) = tiles
        .iter()
        .filter(|tile| tile.score.is_finite())
        .fold((0usize, 0usize), |(valid, strong), tile| {
            (valid + 1, strong + usize::from(tile.score >= strong_cutoff))
        });

    if valid == 0 {
        return SubScore::UNDEFINED;
    }

    let fraction_strong = strong as f64 / valid as f64;
    SubScore::new(
        (100.0 * (1.0 - fraction_strong)).clamp(0.0, 100.0),
        Some(fraction_strong * 100.0),
    )
}

/// Number of Strong -> Weak transitions within `lookback` ending at `now`, mapped to
/// `{0: 0, 1: 30, 2: 50, 3: 70, 4+: 90}`. The raw value is the count.
pub fn flips_score(
    transitions: &[GradeTransition],
    now: DateTime<Utc>,
    lookback: TimeDelta,
) -> SubScore {
    const MAPPING: [f64; 5] = [0.0, 30.0, 50.0, 70.0, 90.0];

    let cutoff = now - lookback;
    let count = transitions
        .iter()
        .filter(|transition| transition.time >= cutoff && transition.time <= now)
        .filter(|transition| transition.is_strong_to_weak())
        .count();

    SubScore::new(MAPPING[count.min(4)], Some(count as f64))
}
