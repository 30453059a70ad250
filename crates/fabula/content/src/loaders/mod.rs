//! Loaders for reading scenario data from files.
//!
//! Scenario trees and action menus live in RON files; driver configuration
//! lives in TOML. Loaders turn files into the spec types in
//! [`crate::scenario`]; instantiation stays in [`crate::factory`].

pub mod config;
pub mod scenario;

pub use config::ConfigLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
