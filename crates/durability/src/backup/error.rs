//! Backup error types

use lexi_core::LexiError;
use std::io;
use thiserror::Error;

/// Errors that can occur while writing, reading or restoring archives
#[derive(Debug, Error)]
pub enum BackupError {
    /// Not a readable zip file
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Required entry missing from the archive, or source file missing
    #[error("Missing required file: {0}")]
    MissingFile(String),

    /// Archive is readable but fails the proof-of-content check
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Config inside the archive could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Flashcard database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BackupError {
    /// Create a missing file error
    pub fn missing_file(path: impl Into<String>) -> Self {
        Self::MissingFile(path.into())
    }

    /// Create an invalid archive error
    pub fn invalid_archive(msg: impl Into<String>) -> Self {
        Self::InvalidArchive(msg.into())
    }
}

/// Result type for backup operations
pub type BackupResult<T> = Result<T, BackupError>;

impl From<BackupError> for LexiError {
    fn from(e: BackupError) -> Self {
        match e {
            BackupError::Zip(z) => LexiError::invalid_archive(z.to_string()),
            BackupError::MissingFile(f) => LexiError::invalid_archive(format!("missing {f}")),
            BackupError::InvalidArchive(msg) => LexiError::InvalidArchive(msg),
            BackupError::Yaml(y) => LexiError::parse(y.to_string()),
            BackupError::Sqlite(s) => LexiError::storage(s.to_string()),
            BackupError::Io(io) => LexiError::Io(io),
        }
    }
}
