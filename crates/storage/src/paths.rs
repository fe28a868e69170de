//! Data directory structure
//!
//! All live state is a portable directory:
//!
//! ```text
//! lexi/
//! ├── config.yaml      # Word type vocabulary, enabled filters, schema version
//! ├── settings.toml    # Application settings (autosave, sort order)
//! └── lexicons/
//!     ├── <id>.yaml    # One document per lexicon
//!     └── ...
//! ```
//!
//! Backups archive `config.yaml` and `lexicons/` only.

use lexi_core::{LexiError, LexiconId};
use std::path::{Path, PathBuf};

/// File name of the config document
pub const CONFIG_FILE: &str = "config.yaml";

/// Directory holding lexicon documents
pub const LEXICONS_DIR: &str = "lexicons";

/// File name of the application settings
pub const SETTINGS_FILE: &str = "settings.toml";

/// Data directory paths
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create paths from root directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        DataPaths {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config document path
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Get the lexicons directory
    pub fn lexicons_dir(&self) -> PathBuf {
        self.root.join(LEXICONS_DIR)
    }

    /// Get the document path for a lexicon
    pub fn lexicon_file(&self, id: &LexiconId) -> PathBuf {
        self.lexicons_dir().join(format!("{}.yaml", id.as_str()))
    }

    /// Check if a store exists at this path
    ///
    /// A store exists if the config document is present.
    pub fn exists(&self) -> bool {
        self.config_file().exists()
    }

    /// Create the directory structure
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.lexicons_dir())?;
        Ok(())
    }

    /// Validate that the required files and directories exist
    pub fn validate(&self) -> Result<(), DataPathError> {
        if !self.root.exists() {
            return Err(DataPathError::NotFound {
                path: self.root.clone(),
            });
        }

        if !self.config_file().exists() {
            return Err(DataPathError::MissingConfig {
                path: self.config_file(),
            });
        }

        if !self.lexicons_dir().exists() {
            return Err(DataPathError::MissingLexiconsDir {
                path: self.lexicons_dir(),
            });
        }

        Ok(())
    }

    /// Lexicon document files, sorted by file name
    ///
    /// Anything that is not a `.yaml` file is ignored. A missing lexicons
    /// directory yields an empty list.
    pub fn list_lexicon_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let dir = self.lexicons_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().map(|e| e == "yaml").unwrap_or(false) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Delete everything inside the root directory, keeping the root itself
    ///
    /// Irreversible. Used by backup restore before extracting an archive.
    pub fn clear_contents(&self) -> std::io::Result<()> {
        if !self.root.exists() {
            return std::fs::create_dir_all(&self.root);
        }
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)?;
            } else {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

/// Data directory validation errors
#[derive(Debug, thiserror::Error)]
pub enum DataPathError {
    /// Data directory not found at path
    #[error("Data directory not found at {path}")]
    NotFound {
        /// Path that was checked
        path: PathBuf,
    },

    /// Missing config document
    #[error("Missing config document at {path}")]
    MissingConfig {
        /// Expected config path
        path: PathBuf,
    },

    /// Missing lexicons directory
    #[error("Missing lexicons directory at {path}")]
    MissingLexiconsDir {
        /// Expected lexicons directory path
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DataPathError> for LexiError {
    fn from(e: DataPathError) -> Self {
        match e {
            DataPathError::Io(io) => LexiError::Io(io),
            other => LexiError::storage(other.to_string()),
        }
    }
}
