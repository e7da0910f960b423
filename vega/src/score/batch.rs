use crate::{
    FnvIndexMap,
    error::ScoreError,
    score::CompositeScorer,
    series::PriceSeries,
    statistic::bundle::{MetricsBundle, MetricsEngine},
};
use derive_more::Constructor;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Metrics and composite score of one symbol.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct ScoreRow {
    pub symbol: SmolStr,
    pub metrics: MetricsBundle,
    #[serde(with = "crate::serde_util::nan_as_null")]
    pub score: f64,
}

impl ScoreRow {
    /// [`ScoreRow`] with undefined metrics and score, used to isolate a failed symbol.
    pub fn undefined(symbol: SmolStr) -> Self {
        Self {
            symbol,
            metrics: MetricsBundle::undefined(),
            score: f64::NAN,
        }
    }
}

/// Computes metrics then the composite score for one or many symbols.
#[derive(Debug, Copy, Clone, PartialEq, Constructor)]
pub struct SymbolScorer {
    pub engine: MetricsEngine,
    pub scorer: CompositeScorer,
}

impl SymbolScorer {
    /// Score a single symbol.
    ///
    /// Fails only if `series` or `benchmark` is empty, out of order or non-finite.
    pub fn score_from_prices(
        &self,
        symbol: SmolStr,
        series: &PriceSeries,
        benchmark: Option<&PriceSeries>,
    ) -> Result<ScoreRow, ScoreError> {
        series.validate().map_err(ScoreError::Asset)?;
        if let Some(benchmark) = benchmark {
            benchmark.validate().map_err(ScoreError::Benchmark)?;
        }

        let metrics = self.engine.compute(series, benchmark);
        let score = self.scorer.score(&metrics);

        debug!(%symbol, score, "scored symbol");
        Ok(ScoreRow::new(symbol, metrics, score))
    }

    /// Score every symbol of `universe` in parallel.
    ///
    /// Output order equals input order. A symbol that fails to score yields
    /// [`ScoreRow::undefined`] and never aborts the batch.
    pub fn score_batch(
        &self,
        universe: &FnvIndexMap<SmolStr, PriceSeries>,
        benchmark: Option<&PriceSeries>,
    ) -> Vec<ScoreRow> {
        universe
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(symbol, series)| {
                self.score_from_prices(symbol.clone(), series, benchmark)
                    .unwrap_or_else(|error| {
                        warn!(%symbol, %error, "failed to score symbol, isolating as undefined");
                        ScoreRow::undefined(symbol.clone())
                    })
            })
            .collect()
    }
}

/// Sort rows by score descending, undefined scores last. Ties keep their input order.
pub fn rank_by_score(rows: &mut [ScoreRow]) {
    rows.sort_by(|left, right| match (left.score.is_nan(), right.score.is_nan()) {
        (false, false) => right.score.total_cmp(&left.score),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    });
}
