//! Word mutators
//!
//! [`WordMut`] borrows its lexicon mutably, applies one validated change
//! to a word, then hands the change to the lexicon (notify, then save if
//! autosave is on). A failed precondition returns the error with the word
//! untouched and nothing notified.
//!
//! An autosave failure is different: the change has already been applied
//! and announced, so it stays in memory with the lexicon marked dirty and
//! the write error is returned. The next successful save persists it.
//!
//! Mutators chain:
//!
//! ```ignore
//! lexicon
//!     .word_mut(id)?
//!     .add_translation("cat")?
//!     .add_tag("animal")?
//!     .add_type("Noun")?;
//! ```

use crate::lexicon::{Lexicon, LexiconEvent, WordField};
use lexi_core::{LexiError, LexiResult, ListField, WordId, WordRecord};
use tracing::debug;

/// Mutable handle to one live word
pub struct WordMut<'a> {
    lexicon: &'a mut Lexicon,
    id: WordId,
    index: usize,
}

impl<'a> WordMut<'a> {
    pub(crate) fn new(lexicon: &'a mut Lexicon, id: WordId, index: usize) -> Self {
        Self { lexicon, id, index }
    }

    /// Word id
    pub fn id(&self) -> WordId {
        self.id
    }

    /// Current state of the word
    pub fn record(&self) -> &WordRecord {
        &self.lexicon.doc.words[self.index]
    }

    fn apply<T, F>(&mut self, field: WordField, f: F) -> LexiResult<T>
    where
        F: FnOnce(&mut WordRecord) -> LexiResult<T>,
    {
        let out = f(&mut self.lexicon.doc.words[self.index])?;
        self.lexicon.commit(LexiconEvent::WordChanged { id: self.id, field })?;
        Ok(out)
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    /// Replace the word text
    pub fn set_word(&mut self, word: impl Into<String>) -> LexiResult<&mut Self> {
        let word = word.into();
        self.apply(WordField::Word, |w| {
            w.word = word;
            Ok(())
        })?;
        Ok(self)
    }

    /// Replace the pronunciation
    pub fn set_pronunciation(&mut self, pronunciation: impl Into<String>) -> LexiResult<&mut Self> {
        let pronunciation = pronunciation.into();
        self.apply(WordField::Pronunciation, |w| {
            w.pronunciation = pronunciation;
            Ok(())
        })?;
        Ok(self)
    }

    // =========================================================================
    // Ordered lists
    // =========================================================================

    /// Append to `field`
    pub fn add_item(&mut self, field: ListField, value: impl Into<String>) -> LexiResult<&mut Self> {
        let value = value.into();
        self.apply(list_field(field), |w| {
            w.push_item(field, value);
            Ok(())
        })?;
        Ok(self)
    }

    /// Replace the item at `index` in `field`
    pub fn set_item(
        &mut self,
        field: ListField,
        index: usize,
        value: impl Into<String>,
    ) -> LexiResult<&mut Self> {
        let value = value.into();
        self.apply(list_field(field), |w| w.set_item(field, index, value))?;
        Ok(self)
    }

    /// Remove the item at `index` in `field`
    pub fn rm_item(&mut self, field: ListField, index: usize) -> LexiResult<&mut Self> {
        self.apply(list_field(field), |w| w.remove_item(field, index))?;
        Ok(self)
    }

    /// Append a translation
    pub fn add_translation(&mut self, translation: impl Into<String>) -> LexiResult<&mut Self> {
        self.add_item(ListField::Translations, translation)
    }

    /// Replace the translation at `index`
    pub fn set_translation(
        &mut self,
        index: usize,
        translation: impl Into<String>,
    ) -> LexiResult<&mut Self> {
        self.set_item(ListField::Translations, index, translation)
    }

    /// Remove the translation at `index`
    pub fn rm_translation(&mut self, index: usize) -> LexiResult<&mut Self> {
        self.rm_item(ListField::Translations, index)
    }

    /// Append an example
    pub fn add_example(&mut self, example: impl Into<String>) -> LexiResult<&mut Self> {
        self.add_item(ListField::Examples, example)
    }

    /// Replace the example at `index`
    pub fn set_example(&mut self, index: usize, example: impl Into<String>) -> LexiResult<&mut Self> {
        self.set_item(ListField::Examples, index, example)
    }

    /// Remove the example at `index`
    pub fn rm_example(&mut self, index: usize) -> LexiResult<&mut Self> {
        self.rm_item(ListField::Examples, index)
    }

    // =========================================================================
    // Sets
    // =========================================================================

    /// Assign a word type
    pub fn add_type(&mut self, word_type: &str) -> LexiResult<&mut Self> {
        self.apply(WordField::Types, |w| w.add_type(word_type))?;
        Ok(self)
    }

    /// Unassign a word type
    pub fn rm_type(&mut self, word_type: &str) -> LexiResult<&mut Self> {
        self.apply(WordField::Types, |w| w.remove_type(word_type))?;
        Ok(self)
    }

    /// Reference another live word of the same lexicon
    ///
    /// Fails with `NotFound` if `target` is not a live word and with
    /// `AlreadyExists` for a duplicate or a self-reference.
    pub fn add_reference(&mut self, target: WordId) -> LexiResult<&mut Self> {
        if target != self.id && self.lexicon.word(target).is_none() {
            return Err(LexiError::not_found(format!("word {target}")));
        }
        self.apply(WordField::References, |w| w.add_reference(target))?;
        debug!(target: "lexi::repo", word = %self.id, references = %target, "Reference added");
        Ok(self)
    }

    /// Drop a reference
    pub fn rm_reference(&mut self, target: WordId) -> LexiResult<&mut Self> {
        self.apply(WordField::References, |w| w.remove_reference(target))?;
        Ok(self)
    }

    /// Add a tag (lowercased; no spaces or `#`)
    pub fn add_tag(&mut self, tag: &str) -> LexiResult<&mut Self> {
        let stored = self.apply(WordField::Tags, |w| w.add_tag(tag))?;
        debug!(target: "lexi::repo", word = %self.id, tag = %stored, "Tag added");
        Ok(self)
    }

    /// Remove a tag (matched case-insensitively)
    pub fn rm_tag(&mut self, tag: &str) -> LexiResult<&mut Self> {
        self.apply(WordField::Tags, |w| w.remove_tag(tag))?;
        Ok(self)
    }
}

fn list_field(field: ListField) -> WordField {
    match field {
        ListField::Translations => WordField::Translations,
        ListField::Examples => WordField::Examples,
    }
}
