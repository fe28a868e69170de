//! Word records
//!
//! [`WordRecord`] is the on-disk shape of a word and carries the
//! validate-then-apply mutators. A failing mutator returns an error and
//! leaves the record untouched.
//!
//! Persistence and change notification are layered on top by the engine;
//! nothing in this module performs I/O.

use serde::{Deserialize, Serialize};

use crate::error::{LexiError, LexiResult};
use crate::text::{normalize_tag, strip_direction};
use crate::types::WordId;

/// A single vocabulary entry, as stored in a lexicon document
///
/// Field order matches the document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Id, unique within the owning lexicon
    pub id: WordId,
    /// The word itself (may carry a leading direction marker)
    pub word: String,
    /// Pronunciation, empty when unknown
    #[serde(default)]
    pub pronunciation: String,
    /// Ordered translations
    #[serde(default)]
    pub translations: Vec<String>,
    /// Ordered usage examples
    #[serde(default)]
    pub examples: Vec<String>,
    /// Assigned word types
    #[serde(default)]
    pub types: Vec<String>,
    /// Ids of other words in the same lexicon
    #[serde(default)]
    pub references: Vec<WordId>,
    /// Lowercase tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload used to create a word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewWord {
    /// Word text, required
    pub word: String,
    /// Optional first translation
    pub translation: Option<String>,
    /// Optional first example
    pub example: Option<String>,
}

impl NewWord {
    /// Create a payload with only the word text
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    /// Set the first translation
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    /// Set the first example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// The list-valued fields that share the add/set/remove-at-index pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    /// `translations`
    Translations,
    /// `examples`
    Examples,
}

impl ListField {
    /// Field name as stored in the document
    pub fn as_str(&self) -> &'static str {
        match self {
            ListField::Translations => "translations",
            ListField::Examples => "examples",
        }
    }
}

impl WordRecord {
    /// Build a record from a creation payload
    ///
    /// Empty optional strings count as absent. The word text must not be
    /// empty once the direction marker is ignored.
    pub fn new(id: WordId, payload: NewWord) -> LexiResult<Self> {
        if strip_direction(&payload.word).trim().is_empty() {
            return Err(LexiError::invalid_format("word cannot be empty"));
        }
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty()).into_iter().collect();
        Ok(Self {
            id,
            word: payload.word,
            pronunciation: String::new(),
            translations: non_empty(payload.translation),
            examples: non_empty(payload.example),
            types: Vec::new(),
            references: Vec::new(),
            tags: Vec::new(),
        })
    }

    /// First translation, or the empty string
    pub fn first_translation(&self) -> &str {
        self.translations.first().map(String::as_str).unwrap_or("")
    }

    /// Borrow a list field
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::Translations => &self.translations,
            ListField::Examples => &self.examples,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::Translations => &mut self.translations,
            ListField::Examples => &mut self.examples,
        }
    }

    // =========================================================================
    // Ordered lists (translations, examples)
    // =========================================================================

    /// Append to a list field
    pub fn push_item(&mut self, field: ListField, value: impl Into<String>) {
        self.list_mut(field).push(value.into());
    }

    /// Replace the item at `index`
    pub fn set_item(
        &mut self,
        field: ListField,
        index: usize,
        value: impl Into<String>,
    ) -> LexiResult<()> {
        let list = self.list_mut(field);
        let len = list.len();
        let slot = list
            .get_mut(index)
            .ok_or(LexiError::IndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove and return the item at `index`
    pub fn remove_item(&mut self, field: ListField, index: usize) -> LexiResult<String> {
        let list = self.list_mut(field);
        if index >= list.len() {
            return Err(LexiError::IndexOutOfRange {
                index,
                len: list.len(),
            });
        }
        Ok(list.remove(index))
    }

    // =========================================================================
    // Sets (types, references, tags)
    // =========================================================================

    /// Assign a word type
    pub fn add_type(&mut self, word_type: &str) -> LexiResult<()> {
        if word_type.trim().is_empty() {
            return Err(LexiError::invalid_format("word type cannot be empty"));
        }
        if self.types.iter().any(|t| t == word_type) {
            return Err(LexiError::already_exists(format!(
                "type '{word_type}' already assigned"
            )));
        }
        self.types.push(word_type.to_string());
        Ok(())
    }

    /// Unassign a word type
    pub fn remove_type(&mut self, word_type: &str) -> LexiResult<()> {
        let pos = self
            .types
            .iter()
            .position(|t| t == word_type)
            .ok_or_else(|| LexiError::not_found(format!("type '{word_type}'")))?;
        self.types.remove(pos);
        Ok(())
    }

    /// Reference another word
    ///
    /// Whether `target` exists in the lexicon is checked by the caller, which
    /// can see the other words.
    pub fn add_reference(&mut self, target: WordId) -> LexiResult<()> {
        if target == self.id {
            return Err(LexiError::already_exists(format!(
                "word {} cannot reference itself",
                self.id
            )));
        }
        if self.references.contains(&target) {
            return Err(LexiError::already_exists(format!(
                "reference to word {target}"
            )));
        }
        self.references.push(target);
        Ok(())
    }

    /// Drop a reference
    pub fn remove_reference(&mut self, target: WordId) -> LexiResult<()> {
        let pos = self
            .references
            .iter()
            .position(|r| *r == target)
            .ok_or_else(|| LexiError::not_found(format!("reference to word {target}")))?;
        self.references.remove(pos);
        Ok(())
    }

    /// Whether this word references `target`
    pub fn references_word(&self, target: WordId) -> bool {
        self.references.contains(&target)
    }

    /// Add a tag; returns the normalized form that was stored
    pub fn add_tag(&mut self, tag: &str) -> LexiResult<String> {
        let tag = normalize_tag(tag)?;
        if self.tags.contains(&tag) {
            return Err(LexiError::already_exists(format!("tag '#{tag}'")));
        }
        self.tags.push(tag.clone());
        Ok(tag)
    }

    /// Remove a tag (matched case-insensitively)
    pub fn remove_tag(&mut self, tag: &str) -> LexiResult<()> {
        let wanted = tag.trim().to_lowercase();
        let pos = self
            .tags
            .iter()
            .position(|t| *t == wanted)
            .ok_or_else(|| LexiError::not_found(format!("tag '#{wanted}'")))?;
        self.tags.remove(pos);
        Ok(())
    }
}
