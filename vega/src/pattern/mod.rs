use crate::{FnvIndexMap, series::PriceSeries};
use channel::{Channel, ChannelConfig};
use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::debug;
use wedge::{WedgeFilter, WedgeHit, WedgePattern};

/// Regression channel fitting over a trailing window of bars.
pub mod channel;

/// Rising and falling wedge classification of a [`Channel`].
pub mod wedge;

/// Fits regression channels to OHLC windows and classifies wedges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ChannelPatternDetector {
    pub config: ChannelConfig,
}

impl ChannelPatternDetector {
    pub fn new(config: ChannelConfig) -> Self {
        Self { config }
    }

    pub fn fit_channel(&self, series: &PriceSeries) -> Option<Channel> {
        Channel::fit(series.bars(), &self.config)
    }

    /// Classify the trailing window of `series`. `None` if no channel can be fitted.
    pub fn detect(&self, series: &PriceSeries) -> Option<WedgePattern> {
        self.fit_channel(series)
            .map(|channel| WedgePattern::classify(&channel))
    }

    /// Scan every symbol of `universe`, keeping wedges accepted by `filter` sorted by score
    /// descending. Symbols with too few bars are skipped.
    pub fn scan(
        &self,
        universe: &FnvIndexMap<SmolStr, PriceSeries>,
        filter: WedgeFilter,
    ) -> Vec<WedgeHit> {
        let mut hits = universe
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .filter_map(|(symbol, series)| {
                let Some(pattern) = self.detect(series) else {
                    debug!(%symbol, bars = series.len(), "skipping wedge scan, no channel");
                    return None;
                };

                filter
                    .matches(pattern.kind)
                    .then(|| WedgeHit::new(symbol.clone(), pattern))
            })
            .collect::<Vec<_>>();

        hits.sort_by(|left, right| right.pattern.score.total_cmp(&left.pattern.score));
        hits
    }
}
