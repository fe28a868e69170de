//! The process-wide config document (`config.yaml`)
//!
//! Holds the user-defined vocabulary of word types, the subset currently
//! used as a strict filter, and the schema version. Only the migration
//! engine advances `version`.

use serde::{Deserialize, Serialize};

use crate::error::{LexiError, LexiResult};

/// Latest schema version understood by this build
pub const CONFIG_VERSION: u32 = 2;

/// Word types seeded into a fresh config
pub const DEFAULT_WORD_TYPES: [&str; 13] = [
    "Noun",
    "Verb",
    "Adjective",
    "Adverb",
    "Pronoun",
    "Preposition",
    "Conjunction",
    "Interjection",
    "Article",
    "Idiom",
    "Clause",
    "Prefix",
    "Suffix",
];

/// The default vocabulary, sorted
pub fn default_word_types() -> Vec<String> {
    let mut types: Vec<String> = DEFAULT_WORD_TYPES.iter().map(|t| t.to_string()).collect();
    types.sort();
    types
}

/// On-disk shape of `config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigDocument {
    /// Vocabulary of word types, kept sorted
    #[serde(default)]
    pub word_types: Vec<String>,
    /// Types every listed word must carry
    #[serde(default)]
    pub enabled_types: Vec<String>,
    /// Schema version
    pub version: u32,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            word_types: default_word_types(),
            enabled_types: Vec::new(),
            version: CONFIG_VERSION,
        }
    }
}

impl ConfigDocument {
    /// Add a type to the vocabulary
    pub fn add_word_type(&mut self, word_type: &str) -> LexiResult<()> {
        let word_type = word_type.trim();
        if word_type.is_empty() {
            return Err(LexiError::invalid_format("word type cannot be empty"));
        }
        if self.word_types.iter().any(|t| t == word_type) {
            return Err(LexiError::already_exists(format!(
                "word type '{word_type}'"
            )));
        }
        self.word_types.push(word_type.to_string());
        self.word_types.sort();
        Ok(())
    }

    /// Remove a type from the vocabulary (and from the enabled filter)
    pub fn remove_word_type(&mut self, word_type: &str) -> LexiResult<()> {
        let pos = self
            .word_types
            .iter()
            .position(|t| t == word_type)
            .ok_or_else(|| LexiError::not_found(format!("word type '{word_type}'")))?;
        self.word_types.remove(pos);
        self.enabled_types.retain(|t| t != word_type);
        Ok(())
    }

    /// Turn on filtering by a type
    pub fn enable_type(&mut self, word_type: &str) -> LexiResult<()> {
        if !self.word_types.iter().any(|t| t == word_type) {
            return Err(LexiError::not_found(format!("word type '{word_type}'")));
        }
        if self.enabled_types.iter().any(|t| t == word_type) {
            return Err(LexiError::already_exists(format!(
                "filter on '{word_type}'"
            )));
        }
        self.enabled_types.push(word_type.to_string());
        Ok(())
    }

    /// Turn off filtering by a type
    pub fn disable_type(&mut self, word_type: &str) -> LexiResult<()> {
        let pos = self
            .enabled_types
            .iter()
            .position(|t| t == word_type)
            .ok_or_else(|| LexiError::not_found(format!("filter on '{word_type}'")))?;
        self.enabled_types.remove(pos);
        Ok(())
    }
}
