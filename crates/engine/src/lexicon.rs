//! A lexicon: one document, one open file, its words
//!
//! ## Persistence policy
//!
//! - Renames are written immediately.
//! - Word changes (add, edit, remove, sweep) are written immediately only
//!   while the shared [`AutosaveSwitch`] is on. Otherwise the lexicon is
//!   marked dirty and waits for [`Lexicon::save`].
//!
//! ## Soft delete
//!
//! [`Lexicon::trash_word`] hides a word without touching the document;
//! [`Lexicon::restore_word`] brings it back. [`Lexicon::sweep`] removes
//! trashed words for good and runs the reference cascade for each.
//!
//! ## Notifications
//!
//! Subscribers registered with [`Lexicon::subscribe`] are called
//! synchronously after every successful change, before the autosave check.

use crate::references;
use crate::settings::AutosaveSwitch;
use crate::word::WordMut;
use lexi_core::search::{self, SortEntry};
use lexi_core::{
    validate_lexicon_name, LexiError, LexiResult, LexiconDocument, LexiconId, NewWord,
    SortDirection, SortKey, WordId, WordRecord,
};
use lexi_storage::RecordStore;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Word field touched by a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordField {
    /// `word`
    Word,
    /// `pronunciation`
    Pronunciation,
    /// `translations`
    Translations,
    /// `examples`
    Examples,
    /// `types`
    Types,
    /// `references`
    References,
    /// `tags`
    Tags,
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconEvent {
    /// Lexicon renamed
    Renamed {
        /// New name
        name: String,
    },
    /// Word created
    WordAdded(WordId),
    /// Field of a word mutated
    WordChanged {
        /// Word
        id: WordId,
        /// Field
        field: WordField,
    },
    /// Word hidden pending sweep
    WordTrashed(WordId),
    /// Trashed word brought back
    WordRestored(WordId),
    /// Word deleted; `dereferenced` lists the words that lost a reference to it
    WordRemoved {
        /// Deleted word
        id: WordId,
        /// Words whose references were cascaded
        dereferenced: Vec<WordId>,
    },
    /// Document written to disk
    Saved,
}

/// Handle returned by [`Lexicon::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LexiconEvent) + Send>;

/// An open lexicon
pub struct Lexicon {
    store: RecordStore,
    pub(crate) doc: LexiconDocument,
    last_word_id: WordId,
    trashed: HashSet<WordId>,
    dirty: bool,
    autosave: AutosaveSwitch,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("id", &self.doc.id)
            .field("name", &self.doc.name)
            .field("words", &self.doc.words.len())
            .field("trashed", &self.trashed.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Lexicon {
    /// Open an existing lexicon file
    pub fn open(path: impl Into<PathBuf>, autosave: AutosaveSwitch) -> LexiResult<Self> {
        let mut store = RecordStore::open(path)?;
        let doc: LexiconDocument = store.load()?;

        let dangling = references::dangling(doc.words.iter());
        if !dangling.is_empty() {
            warn!(
                target: "lexi::repo",
                lexicon = %doc.id,
                count = dangling.len(),
                "Lexicon holds references to missing words"
            );
        }

        Ok(Self::from_parts(store, doc, autosave))
    }

    /// Write a new, empty lexicon document at `path`
    pub fn create(
        path: impl Into<PathBuf>,
        id: LexiconId,
        name: &str,
        autosave: AutosaveSwitch,
    ) -> LexiResult<Self> {
        let name = validate_lexicon_name(name)?;
        let doc = LexiconDocument::new(id, name);
        let store = RecordStore::create(path, &doc)?;
        Ok(Self::from_parts(store, doc, autosave))
    }

    fn from_parts(store: RecordStore, doc: LexiconDocument, autosave: AutosaveSwitch) -> Self {
        let last_word_id = doc.max_word_id();
        Self {
            store,
            doc,
            last_word_id,
            trashed: HashSet::new(),
            dirty: false,
            autosave,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lexicon id
    pub fn id(&self) -> &LexiconId {
        &self.doc.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.doc.name
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Whether there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The document as held in memory, trashed words included
    pub fn document(&self) -> &LexiconDocument {
        &self.doc
    }

    /// Copy of the document without trashed words
    pub fn live_document(&self) -> LexiconDocument {
        LexiconDocument {
            id: self.doc.id.clone(),
            name: self.doc.name.clone(),
            words: self.words().cloned().collect(),
        }
    }

    /// Live words in insertion order
    pub fn words(&self) -> impl Iterator<Item = &WordRecord> + '_ {
        self.doc
            .words
            .iter()
            .filter(move |w| !self.trashed.contains(&w.id))
    }

    /// Number of live words
    pub fn len(&self) -> usize {
        self.words().count()
    }

    /// Whether there are no live words
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a live word
    pub fn word(&self, id: WordId) -> Option<&WordRecord> {
        if self.trashed.contains(&id) {
            return None;
        }
        self.doc.word(id)
    }

    /// Whether the word is trashed and waiting for a sweep
    pub fn is_trashed(&self, id: WordId) -> bool {
        self.trashed.contains(&id)
    }

    // =========================================================================
    // Lexicon-level changes
    // =========================================================================

    /// Rename the lexicon and write it immediately
    ///
    /// Not gated by autosave. Pending word changes are written too.
    pub fn rename(&mut self, name: &str) -> LexiResult<()> {
        let name = validate_lexicon_name(name)?;
        let old = std::mem::replace(&mut self.doc.name, name);
        if let Err(e) = self.save() {
            self.doc.name = old;
            return Err(e);
        }
        info!(target: "lexi::repo", lexicon = %self.doc.id, name = %self.doc.name, "Lexicon renamed");
        self.emit(&LexiconEvent::Renamed {
            name: self.doc.name.clone(),
        });
        Ok(())
    }

    /// Write the document to disk
    pub fn save(&mut self) -> LexiResult<()> {
        self.store.save(&self.doc)?;
        self.dirty = false;
        debug!(target: "lexi::repo", lexicon = %self.doc.id, words = self.doc.words.len(), "Lexicon saved");
        self.emit(&LexiconEvent::Saved);
        Ok(())
    }

    /// Sync and release the file handle
    pub fn close(self) -> LexiResult<LexiconDocument> {
        self.store.close()?;
        Ok(self.doc)
    }

    // =========================================================================
    // Words
    // =========================================================================

    /// Create a word
    ///
    /// The id is one past the largest id this lexicon has ever issued, so
    /// ids of deleted words are not reused during the session.
    pub fn add_word(&mut self, payload: NewWord) -> LexiResult<WordId> {
        let id = self.last_word_id.max(self.doc.max_word_id()).next();
        let record = WordRecord::new(id, payload)?;
        self.doc.words.push(record);
        self.last_word_id = id;
        info!(target: "lexi::repo", lexicon = %self.doc.id, word = %id, "Word added");
        self.commit(LexiconEvent::WordAdded(id))?;
        Ok(id)
    }

    /// Mutable access to a live word
    pub fn word_mut(&mut self, id: WordId) -> LexiResult<WordMut<'_>> {
        let index = self.live_position(id)?;
        Ok(WordMut::new(self, id, index))
    }

    /// Delete a word and remove it from every other word's references
    pub fn remove_word(&mut self, id: WordId) -> LexiResult<WordRecord> {
        let index = self
            .doc
            .position(id)
            .ok_or_else(|| LexiError::not_found(format!("word {id}")))?;
        let (record, dereferenced) = self.purge(index);
        self.commit(LexiconEvent::WordRemoved { id, dereferenced })?;
        Ok(record)
    }

    /// Hide a word until [`Lexicon::restore_word`] or [`Lexicon::sweep`]
    pub fn trash_word(&mut self, id: WordId) -> LexiResult<()> {
        self.live_position(id)?;
        self.trashed.insert(id);
        debug!(target: "lexi::repo", lexicon = %self.doc.id, word = %id, "Word trashed");
        self.emit(&LexiconEvent::WordTrashed(id));
        Ok(())
    }

    /// Bring back a trashed word
    pub fn restore_word(&mut self, id: WordId) -> LexiResult<()> {
        if !self.trashed.remove(&id) {
            return Err(LexiError::not_found(format!("trashed word {id}")));
        }
        self.emit(&LexiconEvent::WordRestored(id));
        Ok(())
    }

    /// Permanently remove every trashed word
    ///
    /// Returns the removed records.
    pub fn sweep(&mut self) -> LexiResult<Vec<WordRecord>> {
        let mut ids: Vec<WordId> = self.trashed.iter().copied().collect();
        ids.sort();
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            match self.doc.position(id) {
                Some(index) => {
                    let (record, dereferenced) = self.purge(index);
                    removed.push(record);
                    self.commit(LexiconEvent::WordRemoved { id, dereferenced })?;
                }
                None => {
                    self.trashed.remove(&id);
                }
            }
        }
        Ok(removed)
    }

    fn purge(&mut self, index: usize) -> (WordRecord, Vec<WordId>) {
        let record = self.doc.words.remove(index);
        self.trashed.remove(&record.id);
        let dereferenced = references::cascade_remove(self.doc.words.iter_mut(), record.id);
        info!(
            target: "lexi::repo",
            lexicon = %self.doc.id,
            word = %record.id,
            dereferenced = dereferenced.len(),
            "Word removed"
        );
        (record, dereferenced)
    }

    fn live_position(&self, id: WordId) -> LexiResult<usize> {
        if self.trashed.contains(&id) {
            return Err(LexiError::not_found(format!("word {id}")));
        }
        self.doc
            .position(id)
            .ok_or_else(|| LexiError::not_found(format!("word {id}")))
    }

    // =========================================================================
    // Derived reference queries
    // =========================================================================

    /// How many live words reference `id`
    pub fn ref_count(&self, id: WordId) -> usize {
        references::ref_count(self.words(), id)
    }

    /// Live words that reference `id`, in insertion order
    pub fn referrers(&self, id: WordId) -> Vec<&WordRecord> {
        references::referrers(self.words(), id)
    }

    /// Live words that `id` references
    pub fn referenced_words(&self, id: WordId) -> LexiResult<Vec<&WordRecord>> {
        let word = self
            .word(id)
            .ok_or_else(|| LexiError::not_found(format!("word {id}")))?;
        Ok(word
            .references
            .iter()
            .filter_map(|target| self.word(*target))
            .collect())
    }

    /// Live words that `id` could still reference
    pub fn reference_candidates(&self, id: WordId) -> LexiResult<Vec<&WordRecord>> {
        let word = self
            .word(id)
            .ok_or_else(|| LexiError::not_found(format!("word {id}")))?;
        Ok(self
            .words()
            .filter(|w| w.id != id && !word.references_word(w.id))
            .collect())
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Live words ordered by `key` and `direction`
    ///
    /// Stable: words with equal keys keep insertion order.
    pub fn sorted_words(&self, key: SortKey, direction: SortDirection) -> Vec<&WordRecord> {
        let mut entries: Vec<SortEntry<'_>> = self
            .words()
            .map(|w| SortEntry::new(w, self.ref_count(w.id)))
            .collect();
        entries.sort_by(|a, b| search::compare(a, b, key, direction));
        entries.into_iter().map(|e| e.word).collect()
    }

    /// Live words matching a search query and type filter
    pub fn filter_words(&self, query: &str, enabled_types: &[String]) -> Vec<&WordRecord> {
        self.words()
            .filter(|w| search::matches(w, query, enabled_types))
            .collect()
    }

    /// Filtered, then sorted
    pub fn view(
        &self,
        query: &str,
        enabled_types: &[String],
        key: SortKey,
        direction: SortDirection,
    ) -> Vec<&WordRecord> {
        let mut words = self.sorted_words(key, direction);
        words.retain(|w| search::matches(w, query, enabled_types));
        words
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Register a callback for every change
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LexiconEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: &LexiconEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    /// Record a successful word change: notify, then save if autosave is on
    ///
    /// A failed save does not undo the change. The lexicon stays dirty and
    /// the error goes back to the mutator's caller.
    pub(crate) fn commit(&mut self, event: LexiconEvent) -> LexiResult<()> {
        self.dirty = true;
        self.emit(&event);
        if self.autosave.is_enabled() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn lexicon(autosave: bool) -> (TempDir, Lexicon) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lex.yaml");
        let lex = Lexicon::create(
            path,
            LexiconId::from("lex"),
            "Spanish",
            AutosaveSwitch::new(autosave),
        )
        .unwrap();
        (dir, lex)
    }

    fn on_disk(lex: &Lexicon) -> LexiconDocument {
        lexi_storage::read_document(lex.path()).unwrap()
    }

    #[test]
    fn test_create_writes_empty_document() {
        let (_dir, lex) = lexicon(true);
        let doc = on_disk(&lex);
        assert_eq!(doc.name, "Spanish");
        assert!(doc.words.is_empty());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let dir = TempDir::new().unwrap();
        let err = Lexicon::create(
            dir.path().join("x.yaml"),
            LexiconId::from("x"),
            "  ",
            AutosaveSwitch::new(true),
        )
        .unwrap_err();
        assert!(matches!(err, LexiError::InvalidFormat(_)));
        assert!(!dir.path().join("x.yaml").exists());
    }

    #[test]
    fn test_word_ids_are_not_reused() {
        let (_dir, mut lex) = lexicon(true);
        let a = lex.add_word(NewWord::new("uno")).unwrap();
        let b = lex.add_word(NewWord::new("dos")).unwrap();
        assert_eq!((a, b), (WordId(1), WordId(2)));

        lex.remove_word(b).unwrap();
        let c = lex.add_word(NewWord::new("tres")).unwrap();
        assert_eq!(c, WordId(3));
    }

    #[test]
    fn test_rename_ignores_autosave() {
        let (_dir, mut lex) = lexicon(false);
        lex.add_word(NewWord::new("uno")).unwrap();
        assert!(lex.is_dirty());

        lex.rename("Español").unwrap();
        let doc = on_disk(&lex);
        assert_eq!(doc.name, "Español");
        assert_eq!(doc.words.len(), 1);
        assert!(!lex.is_dirty());
    }

    #[test]
    fn test_rename_blank_leaves_file() {
        let (_dir, mut lex) = lexicon(true);
        assert!(matches!(lex.rename(""), Err(LexiError::InvalidFormat(_))));
        assert_eq!(lex.name(), "Spanish");
        assert_eq!(on_disk(&lex).name, "Spanish");
    }

    #[test]
    fn test_remove_cascades_references() {
        let (_dir, mut lex) = lexicon(true);
        let a = lex.add_word(NewWord::new("a")).unwrap();
        let b = lex.add_word(NewWord::new("b")).unwrap();
        let c = lex.add_word(NewWord::new("c")).unwrap();
        lex.word_mut(a).unwrap().add_reference(c).unwrap();
        lex.word_mut(b).unwrap().add_reference(c).unwrap();
        assert_eq!(lex.ref_count(c), 2);

        lex.remove_word(c).unwrap();
        assert!(lex.words().all(|w| !w.references_word(c)));
        assert!(on_disk(&lex).words.iter().all(|w| !w.references_word(c)));
    }

    #[test]
    fn test_remove_unknown_word() {
        let (_dir, mut lex) = lexicon(true);
        assert!(matches!(
            lex.remove_word(WordId(7)),
            Err(LexiError::NotFound(_))
        ));
    }

    #[test]
    fn test_trash_restore_sweep() {
        let (_dir, mut lex) = lexicon(true);
        let a = lex.add_word(NewWord::new("a")).unwrap();
        let b = lex.add_word(NewWord::new("b")).unwrap();
        lex.word_mut(a).unwrap().add_reference(b).unwrap();

        lex.trash_word(b).unwrap();
        assert!(lex.word(b).is_none());
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.ref_count(b), 0);
        assert!(matches!(lex.word_mut(b), Err(LexiError::NotFound(_))));
        assert_eq!(on_disk(&lex).words.len(), 2);

        lex.restore_word(b).unwrap();
        assert_eq!(lex.len(), 2);
        assert!(matches!(
            lex.restore_word(b),
            Err(LexiError::NotFound(_))
        ));

        lex.trash_word(b).unwrap();
        let removed = lex.sweep().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, b);
        let doc = on_disk(&lex);
        assert_eq!(doc.words.len(), 1);
        assert!(doc.words[0].references.is_empty());
        assert_eq!(lex.add_word(NewWord::new("c")).unwrap(), WordId(3));
    }

    #[test]
    fn test_reference_queries() {
        let (_dir, mut lex) = lexicon(true);
        let a = lex.add_word(NewWord::new("a")).unwrap();
        let b = lex.add_word(NewWord::new("b")).unwrap();
        let c = lex.add_word(NewWord::new("c")).unwrap();
        lex.word_mut(a).unwrap().add_reference(b).unwrap();

        let referenced: Vec<WordId> = lex.referenced_words(a).unwrap().iter().map(|w| w.id).collect();
        assert_eq!(referenced, vec![b]);
        let referrers: Vec<WordId> = lex.referrers(b).iter().map(|w| w.id).collect();
        assert_eq!(referrers, vec![a]);
        let candidates: Vec<WordId> = lex
            .reference_candidates(a)
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(candidates, vec![c]);
    }

    #[test]
    fn test_sorted_and_filtered_views() {
        let (_dir, mut lex) = lexicon(true);
        let perro = lex
            .add_word(NewWord::new("perro").with_translation("dog"))
            .unwrap();
        let gato = lex
            .add_word(NewWord::new("Gato").with_translation("cat"))
            .unwrap();
        let ave = lex.add_word(NewWord::new("ave").with_translation("bird")).unwrap();
        lex.word_mut(ave).unwrap().add_reference(gato).unwrap();
        lex.word_mut(perro).unwrap().add_reference(gato).unwrap();

        let ids = |ws: Vec<&WordRecord>| ws.iter().map(|w| w.id).collect::<Vec<_>>();
        assert_eq!(
            ids(lex.sorted_words(SortKey::Word, SortDirection::Ascending)),
            vec![ave, gato, perro]
        );
        assert_eq!(
            ids(lex.sorted_words(SortKey::FirstTranslation, SortDirection::Descending)),
            vec![perro, gato, ave]
        );
        assert_eq!(
            ids(lex.sorted_words(SortKey::ReferenceCount, SortDirection::Descending)),
            vec![gato, perro, ave]
        );
        assert_eq!(ids(lex.filter_words("at", &[])), vec![gato]);
        assert_eq!(
            ids(lex.view("", &[], SortKey::Word, SortDirection::Descending)),
            vec![perro, gato, ave]
        );
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (_dir, mut lex) = lexicon(false);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = lex.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        let id = lex.add_word(NewWord::new("uno")).unwrap();
        lex.word_mut(id).unwrap().add_tag("num").unwrap();
        assert!(lex.unsubscribe(sub));
        lex.word_mut(id).unwrap().add_tag("x").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                LexiconEvent::WordAdded(id),
                LexiconEvent::WordChanged {
                    id,
                    field: WordField::Tags
                },
            ]
        );
    }

    #[test]
    fn test_open_round_trip() {
        let (_dir, mut lex) = lexicon(true);
        let id = lex.add_word(NewWord::new("uno").with_translation("one")).unwrap();
        lex.word_mut(id).unwrap().set_pronunciation("ˈu.no").unwrap();
        let path = lex.path().to_path_buf();
        let doc = lex.close().unwrap();

        let reopened = Lexicon::open(path, AutosaveSwitch::new(true)).unwrap();
        assert_eq!(reopened.document(), &doc);
        assert!(!reopened.is_dirty());
    }
}
