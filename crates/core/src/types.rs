//! Core identifier types for Lexi
//!
//! This module defines the foundational types:
//! - LexiconId: Opaque, stable identifier of a lexicon (and its file stem)
//! - WordId: Integer identifier of a word, unique within its lexicon

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a lexicon
///
/// New ids are the simple (hyphen-less, lowercase hex) form of a UUID v4.
/// Ids read from disk are accepted as-is: older stores used shorter random
/// tokens, and the id is only ever compared for equality and used as the
/// file stem of the lexicon document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LexiconId(String);

impl LexiconId {
    /// Generate a new random LexiconId
    ///
    /// Uniqueness against existing files is the repository's job; see
    /// `LexiconRepository::add`.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing id string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LexiconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LexiconId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a word inside one lexicon
///
/// Allocated as `max(existing) + 1`; ids are never shared across lexicons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WordId(pub u64);

impl WordId {
    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for WordId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
