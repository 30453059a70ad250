//! Scenario file loader.
//!
//! A scenario RON file is the data rendition of one claim script: the entity
//! declarations and the literal action menu, nothing else.

use std::path::Path;

use fabula_core::Simulation;

use crate::factory::ScenarioFactory;
use crate::loaders::{LoadResult, read_file};
use crate::scenario::ScenarioSpec;

/// Loader for scenario specs from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a scenario spec from a RON file.
    pub fn load(path: &Path) -> LoadResult<ScenarioSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario {}: {}", path.display(), e))
    }

    /// Parse a scenario spec from RON text.
    pub fn parse(content: &str) -> Result<ScenarioSpec, ron::error::SpannedError> {
        ron::from_str(content)
    }

    /// Load a scenario file and instantiate it in one go.
    pub fn load_simulation(path: &Path) -> LoadResult<Simulation> {
        let spec = Self::load(path)?;
        ScenarioFactory::build(&spec)
            .map_err(|e| anyhow::anyhow!("Invalid scenario {}: {}", path.display(), e))
    }
}
