//! The live config document
//!
//! Wraps `config.yaml` in a [`RecordStore`]. Every mutation is written
//! through immediately; config changes are not gated by autosave.

use lexi_core::{ConfigDocument, LexiResult};
use lexi_storage::{DataPaths, RecordStore};
use tracing::info;

/// Open config document
#[derive(Debug)]
pub struct ConfigStore {
    store: RecordStore,
    doc: ConfigDocument,
}

impl ConfigStore {
    /// Open the config, creating the default document if it is missing
    ///
    /// Expects an already migrated file; run the migrator first.
    pub fn open(paths: &DataPaths) -> LexiResult<Self> {
        let mut store = RecordStore::open_or_create(paths.config_file(), &ConfigDocument::default())?;
        let doc = store.load()?;
        Ok(Self { store, doc })
    }

    /// The config as loaded
    pub fn document(&self) -> &ConfigDocument {
        &self.doc
    }

    /// Vocabulary of word types, sorted
    pub fn word_types(&self) -> &[String] {
        &self.doc.word_types
    }

    /// Types used as a strict filter
    pub fn enabled_types(&self) -> &[String] {
        &self.doc.enabled_types
    }

    /// Schema version
    pub fn version(&self) -> u32 {
        self.doc.version
    }

    /// Add a type to the vocabulary
    pub fn add_word_type(&mut self, word_type: &str) -> LexiResult<()> {
        self.doc.add_word_type(word_type)?;
        info!(target: "lexi::config", word_type, "Word type added");
        self.flush()
    }

    /// Remove a type from the vocabulary
    ///
    /// Words keep the type; only the vocabulary and the filter change.
    pub fn remove_word_type(&mut self, word_type: &str) -> LexiResult<()> {
        self.doc.remove_word_type(word_type)?;
        info!(target: "lexi::config", word_type, "Word type removed");
        self.flush()
    }

    /// Start filtering by a type
    pub fn enable_type(&mut self, word_type: &str) -> LexiResult<()> {
        self.doc.enable_type(word_type)?;
        self.flush()
    }

    /// Stop filtering by a type
    pub fn disable_type(&mut self, word_type: &str) -> LexiResult<()> {
        self.doc.disable_type(word_type)?;
        self.flush()
    }

    /// Write the document to disk
    pub fn flush(&mut self) -> LexiResult<()> {
        self.store.save(&self.doc)
    }

    /// Flush and release the file handle
    pub fn close(mut self) -> LexiResult<()> {
        self.flush()?;
        self.store.close()
    }
}
