use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Weight per scored metric. Alpha is reported but never scored.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct MetricWeights {
    pub sharpe: f64,
    pub sortino: f64,
    pub beta: f64,
    pub vol: f64,
    pub mdd: f64,
    pub cvar: f64,
    pub cagr: f64,
}

impl MetricWeights {
    pub const BALANCED: Self = Self {
        sharpe: 0.22,
        sortino: 0.18,
        beta: 0.10,
        vol: 0.10,
        mdd: 0.15,
        cvar: 0.10,
        cagr: 0.15,
    };

    pub const MOMENTUM: Self = Self {
        sharpe: 0.20,
        sortino: 0.15,
        beta: 0.05,
        vol: 0.05,
        mdd: 0.10,
        cvar: 0.05,
        cagr: 0.40,
    };

    pub const DIVIDEND_SAFETY: Self = Self {
        sharpe: 0.15,
        sortino: 0.15,
        beta: 0.20,
        vol: 0.20,
        mdd: 0.15,
        cvar: 0.10,
        cagr: 0.05,
    };

    pub const LOW_BETA_DEFENSIVE: Self = Self {
        sharpe: 0.10,
        sortino: 0.10,
        beta: 0.30,
        vol: 0.20,
        mdd: 0.15,
        cvar: 0.10,
        cagr: 0.05,
    };

    fn values(&self) -> [f64; 7] {
        [
            self.sharpe,
            self.sortino,
            self.beta,
            self.vol,
            self.mdd,
            self.cvar,
            self.cagr,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Weights divided by their sum.
    ///
    /// `None` if any weight is negative or non-finite, or the sum is not positive.
    pub fn normalized(&self) -> Option<Self> {
        let sum = self.sum();
        let valid = self
            .values()
            .iter()
            .all(|weight| weight.is_finite() && *weight >= 0.0);

        if !valid || !sum.is_finite() || sum <= 0.0 {
            return None;
        }

        Some(Self {
            sharpe: self.sharpe / sum,
            sortino: self.sortino / sum,
            beta: self.beta / sum,
            vol: self.vol / sum,
            mdd: self.mdd / sum,
            cvar: self.cvar / sum,
            cagr: self.cagr / sum,
        })
    }
}

/// Named metric weighting used by the composite scorer.
///
/// Presets are read-only constants. [`WeightProfile::Custom`] weights are normalised by their
/// sum, falling back to [`WeightProfile::Balanced`] if they cannot be.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize, Display)]
pub enum WeightProfile {
    #[default]
    #[display("Balanced")]
    Balanced,
    #[display("Momentum")]
    Momentum,
    #[display("Dividend Safety")]
    DividendSafety,
    #[display("Low-Beta Defensive")]
    LowBetaDefensive,
    #[display("Custom")]
    Custom(MetricWeights),
}

impl WeightProfile {
    pub const PRESETS: [WeightProfile; 4] = [
        Self::Balanced,
        Self::Momentum,
        Self::DividendSafety,
        Self::LowBetaDefensive,
    ];

    pub fn name(&self) -> SmolStr {
        SmolStr::new(self.to_string())
    }

    /// Effective weights of this profile.
    pub fn weights(&self) -> MetricWeights {
        match self {
            Self::Balanced => MetricWeights::BALANCED,
            Self::Momentum => MetricWeights::MOMENTUM,
            Self::DividendSafety => MetricWeights::DIVIDEND_SAFETY,
            Self::LowBetaDefensive => MetricWeights::LOW_BETA_DEFENSIVE,
            Self::Custom(weights) => weights.normalized().unwrap_or_else(|| {
                warn!(?weights, "invalid custom weights, falling back to Balanced");
                MetricWeights::BALANCED
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown weight profile: {0}")]
pub struct UnknownProfile(pub SmolStr);

impl FromStr for WeightProfile {
    type Err = UnknownProfile;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let key = input
            .chars()
            .filter(|char| char.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "balanced" => Ok(Self::Balanced),
            "momentum" => Ok(Self::Momentum),
            "dividendsafety" => Ok(Self::DividendSafety),
            "lowbetadefensive" => Ok(Self::LowBetaDefensive),
            _ => Err(UnknownProfile(SmolStr::new(input))),
        }
    }
}
