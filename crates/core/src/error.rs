//! Error types for the Lexi document engine
//!
//! This module defines the error taxonomy shared by every layer of the
//! workspace. We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Entity-level invariant violations (`AlreadyExists`, `InvalidFormat`,
//! `IndexOutOfRange`, ...) are raised before any state is touched, so a
//! caller receiving one of them can rely on the entity being unchanged.

use std::io;
use thiserror::Error;

/// Result type alias for Lexi operations
pub type LexiResult<T> = std::result::Result<T, LexiError>;

/// Error types for the Lexi document engine
#[derive(Debug, Error)]
pub enum LexiError {
    /// A lexicon, word, type, tag or reference does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate tag, type, reference or a self-reference
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Malformed input (tag with a space or `#`, empty required field, ...)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// List mutation outside the bounds of the list
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the list at the time of the call
        len: usize,
    },

    /// A document on disk could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A backup archive failed the proof-of-content check
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Schema version differs from the one this build understands
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version the running engine expects
        expected: u32,
        /// Version found in the document
        found: u32,
    },

    /// No migration step is registered for the given target version.
    ///
    /// This is the only fatal error: startup must abort.
    #[error("No migrator registered for version {version}")]
    MigratorNotFound {
        /// Version the missing step should migrate to
        version: u32,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage layer error that carries extra context
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LexiError {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create an invalid format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid archive error
    pub fn invalid_archive(msg: impl Into<String>) -> Self {
        Self::InvalidArchive(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether the error must abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MigratorNotFound { .. })
    }

    /// Whether the error reports a missing entity or file
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
