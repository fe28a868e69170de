//! Lexicon documents
//!
//! One document per lexicon file: `{id, name, words}`.

use serde::{Deserialize, Serialize};

use crate::error::{LexiError, LexiResult};
use crate::types::{LexiconId, WordId};
use crate::word::WordRecord;

/// On-disk shape of a lexicon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconDocument {
    /// Stable id, also the file stem
    pub id: LexiconId,
    /// Display name
    pub name: String,
    /// Words in insertion order
    #[serde(default)]
    pub words: Vec<WordRecord>,
}

impl LexiconDocument {
    /// Create an empty document
    pub fn new(id: LexiconId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            words: Vec::new(),
        }
    }

    /// Largest word id present, or 0 for an empty lexicon
    pub fn max_word_id(&self) -> WordId {
        self.words.iter().map(|w| w.id).max().unwrap_or_default()
    }

    /// Look up a word by id
    pub fn word(&self, id: WordId) -> Option<&WordRecord> {
        self.words.iter().find(|w| w.id == id)
    }

    /// Position of a word in the sequence
    pub fn position(&self, id: WordId) -> Option<usize> {
        self.words.iter().position(|w| w.id == id)
    }
}

/// Validate and normalize a lexicon name
///
/// Names are trimmed and must not be empty.
pub fn validate_lexicon_name(name: &str) -> LexiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LexiError::invalid_format("lexicon name cannot be empty"));
    }
    Ok(name.to_string())
}
