use crate::pattern::channel::Channel;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Wedge classification of a [`Channel`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum WedgeKind {
    /// Both lines rise and converge: the lower line rises faster.
    Rising,
    /// Both lines fall and converge: the upper line falls faster.
    Falling,
    None,
}

/// Classified wedge with a ranking score.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct WedgePattern {
    pub kind: WedgeKind,
    /// `fit_quality + (slope_low - slope_high)`. Only meaningful for ranking.
    pub score: f64,
}

impl WedgePattern {
    pub fn classify(channel: &Channel) -> Self {
        let slope_high = channel.slope_high();
        let slope_low = channel.slope_low();

        let kind = if slope_high > 0.0 && slope_low > 0.0 && slope_high < slope_low {
            WedgeKind::Rising
        } else if slope_high < 0.0 && slope_low < 0.0 && slope_low > slope_high {
            WedgeKind::Falling
        } else {
            WedgeKind::None
        };

        Self {
            kind,
            score: channel.fit_quality + (slope_low - slope_high),
        }
    }

    pub fn is_wedge(&self) -> bool {
        self.kind != WedgeKind::None
    }
}

/// Which wedge kinds a scan keeps.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum WedgeFilter {
    Rising,
    Falling,
    #[default]
    Both,
}

impl WedgeFilter {
    pub fn matches(&self, kind: WedgeKind) -> bool {
        matches!(
            (self, kind),
            (Self::Rising | Self::Both, WedgeKind::Rising)
                | (Self::Falling | Self::Both, WedgeKind::Falling)
        )
    }
}

/// Wedge found for a symbol by a batch scan.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct WedgeHit {
    pub symbol: SmolStr,
    pub pattern: WedgePattern,
}
