//! Application settings via `settings.toml`
//!
//! On first open, a default `settings.toml` is created in the data
//! directory. The engine rewrites it when a setting is changed through the
//! [`crate::Lexi`] handle.

use lexi_core::{LexiError, LexiResult, SortDirection, SortKey};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application settings loaded from `settings.toml`.
///
/// # Example
///
/// ```toml
/// word_autosave = true
/// sort_key = "first_translation"
/// sort_direction = "descending"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiSettings {
    /// Save a lexicon after every word change.
    #[serde(default = "default_autosave")]
    pub word_autosave: bool,
    /// Sort key used for word lists.
    #[serde(default)]
    pub sort_key: SortKey,
    /// Sort direction used for word lists.
    #[serde(default)]
    pub sort_direction: SortDirection,
}

fn default_autosave() -> bool {
    true
}

impl Default for LexiSettings {
    fn default() -> Self {
        Self {
            word_autosave: default_autosave(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl LexiSettings {
    /// Returns the default settings file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Lexi settings
#
# Save a lexicon to disk after every word change (default: true).
# When false, changes are kept in memory until an explicit save.
word_autosave = true

# Word list order: "word", "first_translation" or "reference_count"
sort_key = "word"

# "ascending" or "descending"
sort_direction = "ascending"
"#
    }

    /// Read and parse settings from a file path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the file cannot be parsed, including
    /// unknown sort key or direction values.
    pub fn from_file(path: &Path) -> LexiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            LexiError::invalid_format(format!(
                "Failed to parse settings file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default settings file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> LexiResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize these settings to TOML and write them to the given path.
    pub fn write_to_file(&self, path: &Path) -> LexiResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LexiError::storage(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Process-wide autosave flag
///
/// Cloned into every lexicon and read at mutation time, so flipping it
/// affects later mutations only.
#[derive(Debug, Clone)]
pub struct AutosaveSwitch(Arc<AtomicBool>);

impl AutosaveSwitch {
    /// Create a switch in the given state
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Current state
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Turn autosave on or off for every holder of this switch
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}

impl Default for AutosaveSwitch {
    fn default() -> Self {
        Self::new(default_autosave())
    }
}
