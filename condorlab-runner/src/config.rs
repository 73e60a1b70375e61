//! Serializable run configuration.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use condorlab_core::config::BacktestConfig;
use serde::{Deserialize, Serialize};

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Everything needed to reproduce a run: the instrument, the blackout
/// dates, and the full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Instrument symbol, used for labeling artifacts only.
    pub symbol: String,

    /// Dates with scheduled events; entries near these are suppressed.
    #[serde(default)]
    pub blackout_dates: Vec<NaiveDate>,

    /// Engine parameters.
    #[serde(default)]
    pub backtest: BacktestConfig,
}

impl RunConfig {
    /// Computes a deterministic hash id for this configuration.
    ///
    /// Two runs with identical configs share an id, so artifacts from a
    /// repeated run land in the same place.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        hash.to_hex().to_string()
    }

    /// Load a run configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: RunConfig = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
