//! Explicitly constructed application state
//!
//! Built once at startup and passed by reference to the repository, the
//! migrator and the backup functions. There are no ambient globals.

use crate::settings::AutosaveSwitch;
use lexi_core::CONFIG_VERSION;
use lexi_storage::DataPaths;
use std::path::Path;

/// Shared state for one open store
#[derive(Debug, Clone)]
pub struct AppState {
    /// Data directory layout
    pub paths: DataPaths,
    /// Process-wide autosave flag
    pub autosave: AutosaveSwitch,
    /// Schema version this engine writes
    pub expected_version: u32,
}

impl AppState {
    /// State for the data directory at `root`, autosave on
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            paths: DataPaths::from_root(root),
            autosave: AutosaveSwitch::default(),
            expected_version: CONFIG_VERSION,
        }
    }

    /// Replace the autosave switch
    pub fn with_autosave(mut self, autosave: AutosaveSwitch) -> Self {
        self.autosave = autosave;
        self
    }
}
