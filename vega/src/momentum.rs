use crate::{
    FnvIndexMap,
    series::PriceSeries,
    sink::TransitionSink,
    statistic::algorithm::median,
};
use chrono::{DateTime, Utc};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// Sector momentum parameters.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Periods for the 1w, 1m, 3m and 6m horizon returns.
    pub horizons: [usize; 4],
    pub weights: [f64; 4],
    pub rs_weight: f64,
    pub strong_cutoff: f64,
    pub neutral_cutoff: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            horizons: [5, 21, 63, 126],
            weights: [0.2, 0.3, 0.3, 0.2],
            rs_weight: 0.25,
            strong_cutoff: 0.06,
            neutral_cutoff: 0.0,
        }
    }
}

/// Momentum grade of a sector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum Grade {
    Strong,
    Neutral,
    Weak,
}

impl Grade {
    /// `None` for an undefined score.
    pub fn from_score(score: f64, config: &MomentumConfig) -> Option<Self> {
        if score.is_nan() {
            None
        } else if score >= config.strong_cutoff {
            Some(Self::Strong)
        } else if score >= config.neutral_cutoff {
            Some(Self::Neutral)
        } else {
            Some(Self::Weak)
        }
    }
}

/// Multi-horizon momentum of one sector.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MomentumTile {
    pub sector: SmolStr,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub h_1w: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub h_1m: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub h_3m: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub h_6m: f64,
    /// Relative strength against the benchmark.
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub rs: f64,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub score: f64,
}

/// A sector's grade changing between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Constructor)]
pub struct GradeTransition {
    pub time: DateTime<Utc>,
    pub sector: SmolStr,
    pub from: Grade,
    pub to: Grade,
}

impl GradeTransition {
    pub fn is_strong_to_weak(&self) -> bool {
        self.from == Grade::Strong && self.to == Grade::Weak
    }
}

/// Return over the last `periods` observations: `p[n-1] / p[n-1-periods] - 1`.
///
/// This is a full `periods`-bar shift, so the 5-period horizon compounds five bar-to-bar
/// returns, not four. `NaN` if there are not more than `periods` observations.
pub fn horizon_return(closes: &[f64], periods: usize) -> f64 {
    let count = closes.len();
    if count <= periods {
        return f64::NAN;
    }
    closes[count - 1] / closes[count - 1 - periods] - 1.0
}

/// Relative strength of `asset` against `benchmark`.
///
/// On aligned returns, `ratio = cumprod(1 + a) / cumprod(1 + b)` and the result is
/// `ratio_last / median(ratio) - 1`. `NaN` with fewer than two aligned returns.
pub fn relative_strength(asset: &PriceSeries, benchmark: &PriceSeries) -> f64 {
    let aligned = asset.returns().align(&benchmark.returns());
    if aligned.len() < 2 {
        return f64::NAN;
    }

    let ratios = aligned
        .iter()
        .scan((1.0, 1.0), |(asset_equity, benchmark_equity), pair| {
            let (asset_return, benchmark_return) = pair.value;
            *asset_equity *= 1.0 + asset_return;
            *benchmark_equity *= 1.0 + benchmark_return;
            Some(*asset_equity / *benchmark_equity)
        })
        .collect::<Vec<_>>();

    match ratios.last() {
        Some(last) => last / median(&ratios) - 1.0,
        None => f64::NAN,
    }
}

/// Grades sectors by multi-horizon momentum and relative strength.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SectorMomentum {
    pub config: MomentumConfig,
}

impl SectorMomentum {
    pub fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// Compute the [`MomentumTile`] of one sector. Undefined horizon returns and relative
    /// strength contribute nothing to the score.
    pub fn tile(
        &self,
        sector: SmolStr,
        series: &PriceSeries,
        benchmark: Option<&PriceSeries>,
    ) -> MomentumTile {
        let closes = series.closes();
        let [h_1w, h_1m, h_3m, h_6m] = self
            .config
            .horizons
            .map(|periods| horizon_return(&closes, periods));
        let rs = benchmark
            .map(|benchmark| relative_strength(series, benchmark))
            .unwrap_or(f64::NAN);

        let finite_or_zero = |value: f64| if value.is_finite() { value } else { 0.0 };

        let base = [h_1w, h_1m, h_3m, h_6m]
            .into_iter()
            .zip(self.config.weights)
            .map(|(value, weight)| finite_or_zero(value) * weight)
            .sum::<f64>();
        let score = base + finite_or_zero(rs) * self.config.rs_weight;

        debug!(%sector, score, rs, "computed momentum tile");

        MomentumTile {
            sector,
            h_1w,
            h_1m,
            h_3m,
            h_6m,
            rs,
            score,
        }
    }

    /// [`MomentumTile`] of every sector of `universe`, in input order.
    pub fn tiles(
        &self,
        universe: &FnvIndexMap<SmolStr, PriceSeries>,
        benchmark: Option<&PriceSeries>,
    ) -> Vec<MomentumTile> {
        universe
            .iter()
            .map(|(sector, series)| self.tile(sector.clone(), series, benchmark))
            .collect()
    }

    pub fn grade(&self, tile: &MomentumTile) -> Option<Grade> {
        Grade::from_score(tile.score, &self.config)
    }

    /// Sector -> [`Grade`] snapshot. Sectors without a grade are left out.
    pub fn grades(&self, tiles: &[MomentumTile]) -> FnvIndexMap<SmolStr, Grade> {
        tiles
            .iter()
            .filter_map(|tile| self.grade(tile).map(|grade| (tile.sector.clone(), grade)))
            .collect()
    }
}

/// Transitions for every sector of `next` whose grade differs from `prev`, in the order of
/// `next`. Sectors absent from `prev` have no transition.
pub fn grade_transitions(
    prev: &FnvIndexMap<SmolStr, Grade>,
    next: &FnvIndexMap<SmolStr, Grade>,
    time: DateTime<Utc>,
) -> Vec<GradeTransition> {
    next.iter()
        .filter_map(|(sector, to)| {
            let from = prev.get(sector)?;
            (from != to).then(|| GradeTransition::new(time, sector.clone(), *from, *to))
        })
        .collect()
}

/// [`grade_transitions`], then publish them to `sink`.
pub fn publish_grade_transitions<Sink>(
    prev: &FnvIndexMap<SmolStr, Grade>,
    next: &FnvIndexMap<SmolStr, Grade>,
    time: DateTime<Utc>,
    sink: &Sink,
) -> Result<Vec<GradeTransition>, Sink::Error>
where
    Sink: TransitionSink,
{
    let transitions = grade_transitions(prev, next, time);
    sink.publish(&transitions)?;
    Ok(transitions)
}
