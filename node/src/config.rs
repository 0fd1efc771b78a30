//! Node configuration with TOML file support.

use pact_types::PactParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::NodeError;

/// Configuration for a PACT node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Engine parameters (thresholds, rewards, sweep cadence).
    #[serde(default)]
    pub params: PactParams,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            params: PactParams::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let raw = std::fs::read_to_string(path)?;
        let config: NodeConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run under.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.params.validate()?;
        Ok(())
    }
}
