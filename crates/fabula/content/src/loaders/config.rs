//! Driver configuration loader.
//!
//! Loads [`SimConfig`] overrides from TOML. Every key is optional; absent
//! keys keep the driver defaults.

use std::path::Path;

use fabula_core::{SimConfig, TickPolicy};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Config file shape (all keys optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigToml {
    tick_policy: Option<TickPolicy>,
    regenerate_actions: Option<bool>,
}

/// Loader for driver configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load driver configuration from a TOML file.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Parse driver configuration from TOML text.
    pub fn parse(content: &str) -> Result<SimConfig, toml::de::Error> {
        let data: ConfigToml = toml::from_str(content)?;
        let mut config = SimConfig::new();
        if let Some(tick_policy) = data.tick_policy {
            config = config.with_tick_policy(tick_policy);
        }
        if let Some(regenerate) = data.regenerate_actions {
            config = config.with_regenerate_actions(regenerate);
        }
        Ok(config)
    }
}
