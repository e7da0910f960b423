use crate::{
    defensive::DefensiveConfig,
    error::ConfigError,
    flip::FlipParams,
    momentum::MomentumConfig,
    pattern::channel::ChannelConfig,
    score::{MissingMetricPolicy, profile::WeightProfile},
    statistic::{metric::cvar::DEFAULT_CVAR_ALPHA, rolling::DEFAULT_ROLLING_WINDOW, time::Frequency},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Complete engine configuration. Every section falls back to its defaults when absent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub metrics: MetricsConfig,
    pub score: ScoreConfig,
    pub channel: ChannelConfig,
    pub flip: FlipParams,
    pub momentum: MomentumConfig,
    pub defensive: DefensiveConfig,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Annualised risk-free rate.
    pub risk_free: f64,
    pub frequency: Frequency,
    pub cvar_alpha: f64,
    pub rolling_window: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free: 0.0,
            frequency: Frequency::Daily,
            cvar_alpha: DEFAULT_CVAR_ALPHA,
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub profile: WeightProfile,
    pub missing_policy: MissingMetricPolicy,
}

impl EngineConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}
