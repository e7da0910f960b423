use crate::{
    momentum::{GradeTransition, MomentumTile},
    series::PriceSeries,
    sink::HistorySink,
};
use chrono::{DateTime, TimeDelta, Utc};
use component::{
    SubScore, breadth_score, flips_score, ratio_score, vix_score, yield_curve_score,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Independent risk-off sub-scores.
pub mod component;

/// Risk posture derived from the composite defensive index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum DefensiveStatus {
    Normal,
    Caution,
    Defensive,
}

impl DefensiveStatus {
    pub const CAUTION_THRESHOLD: f64 = 45.0;
    pub const DEFENSIVE_THRESHOLD: f64 = 70.0;

    /// `None` for an undefined index.
    pub fn from_index(index: f64) -> Option<Self> {
        if !index.is_finite() {
            None
        } else if index >= Self::DEFENSIVE_THRESHOLD {
            Some(Self::Defensive)
        } else if index >= Self::CAUTION_THRESHOLD {
            Some(Self::Caution)
        } else {
            Some(Self::Normal)
        }
    }
}

/// Weight of each sub-score in the composite index.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DefensiveWeights {
    pub vix: f64,
    pub ratio: f64,
    pub yield_curve: f64,
    pub breadth: f64,
    pub flips: f64,
}

impl Default for DefensiveWeights {
    fn default() -> Self {
        Self {
            vix: 0.30,
            ratio: 0.20,
            yield_curve: 0.15,
            breadth: 0.25,
            flips: 0.10,
        }
    }
}

/// [`DefensiveIndexCalculator`] parameters.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DefensiveConfig {
    pub weights: DefensiveWeights,
    pub ratio_window: usize,
    pub breadth_cutoff: f64,
    pub flip_lookback_hours: i64,
}

impl Default for DefensiveConfig {
    fn default() -> Self {
        Self {
            weights: DefensiveWeights::default(),
            ratio_window: 60,
            breadth_cutoff: 0.0,
            flip_lookback_hours: 24,
        }
    }
}

/// Already-loaded inputs of one defensive index computation. Any input may be absent.
#[derive(Debug, Copy, Clone, Default)]
pub struct DefensiveInputs<'a> {
    pub vix: Option<&'a PriceSeries>,
    /// Numerator of the defensive ratio, eg/ a long-bond fund.
    pub long_bond: Option<&'a PriceSeries>,
    /// Denominator of the defensive ratio, eg/ a broad equity index.
    pub equity: Option<&'a PriceSeries>,
    pub yield_spread: Option<&'a PriceSeries>,
    pub tiles: &'a [MomentumTile],
    pub transitions: &'a [GradeTransition],
}

/// Sub-scores of every component.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubScores {
    pub vix: SubScore,
    pub ratio: SubScore,
    pub yield_curve: SubScore,
    pub breadth: SubScore,
    pub flips: SubScore,
}

impl SubScores {
    /// Weighted average over defined sub-scores. `NaN` if none is defined.
    pub fn composite(&self, weights: &DefensiveWeights) -> f64 {
        let (total, weight_sum) = [
            (self.vix, weights.vix),
            (self.ratio, weights.ratio),
            (self.yield_curve, weights.yield_curve),
            (self.breadth, weights.breadth),
            (self.flips, weights.flips),
        ]
        .into_iter()
        .filter(|(component, _)| component.is_defined())
        .fold((0.0, 0.0), |(total, weight_sum), (component, weight)| {
            (total + component.score * weight, weight_sum + weight)
        });

        if weight_sum == 0.0 {
            f64::NAN
        } else {
            total / weight_sum
        }
    }
}

/// Snapshot of the defensive index. Created once per computation.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct DefensiveIndexRecord {
    pub time: DateTime<Utc>,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub risk_index: f64,
    pub status: Option<DefensiveStatus>,
    pub components: SubScores,
}

impl DefensiveIndexRecord {
    /// Number of Strong -> Weak transitions counted in the flip lookback.
    pub fn flips_strong_to_weak(&self) -> usize {
        self.components.flips.raw.map_or(0, |count| count as usize)
    }
}

/// Aggregates macro indicators into one composite risk index.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct DefensiveIndexCalculator {
    pub config: DefensiveConfig,
}

impl DefensiveIndexCalculator {
    pub fn new(config: DefensiveConfig) -> Self {
        Self { config }
    }

    pub fn sub_scores(&self, inputs: &DefensiveInputs<'_>, time: DateTime<Utc>) -> SubScores {
        let closes = |series: Option<&PriceSeries>| series.map(PriceSeries::closes).unwrap_or_default();

        let ratios = match (inputs.long_bond, inputs.equity) {
            (Some(long_bond), Some(equity)) => long_bond
                .ratio(equity)
                .into_iter()
                .map(|ratio| ratio.value)
                .collect(),
            _ => Vec::new(),
        };

        SubScores {
            vix: vix_score(&closes(inputs.vix)),
            ratio: ratio_score(&ratios, self.config.ratio_window),
            yield_curve: yield_curve_score(&closes(inputs.yield_spread)),
            breadth: breadth_score(inputs.tiles, self.config.breadth_cutoff),
            flips: flips_score(
                inputs.transitions,
                time,
                TimeDelta::hours(self.config.flip_lookback_hours),
            ),
        }
    }

    /// Compute the [`DefensiveIndexRecord`] at `time`.
    pub fn compute(&self, inputs: &DefensiveInputs<'_>, time: DateTime<Utc>) -> DefensiveIndexRecord {
        let components = self.sub_scores(inputs, time);
        let risk_index = components.composite(&self.config.weights);
        let status = DefensiveStatus::from_index(risk_index);

        debug!(
            risk_index,
            status = ?status,
            vix = components.vix.score,
            ratio = components.ratio.score,
            yield_curve = components.yield_curve.score,
            breadth = components.breadth.score,
            flips = components.flips.score,
            "computed defensive index"
        );

        DefensiveIndexRecord {
            time,
            risk_index,
            status,
            components,
        }
    }

    /// [`Self::compute`], then append the record to `sink`.
    pub fn compute_and_append<Sink>(
        &self,
        inputs: &DefensiveInputs<'_>,
        time: DateTime<Utc>,
        sink: &Sink,
    ) -> Result<DefensiveIndexRecord, Sink::Error>
    where
        Sink: HistorySink,
    {
        let record = self.compute(inputs, time);
        sink.append(&record)?;
        Ok(record)
    }
}
