//! The `Lexi` handle
//!
//! One open data directory: settings, config, lexicons, and the shared
//! autosave switch.
//!
//! ## Open sequence
//!
//! 1. Create the directory layout
//! 2. Write the default `settings.toml` if missing, then read it
//! 3. Write the default `config.yaml` if missing
//! 4. Run the migrator (fatal on a missing step)
//! 5. Open the config, check the layout, load every lexicon
//!
//! ## Close sequence
//!
//! Flush the config, sweep everything trashed, save dirty lexicons.

use crate::backup::{self, ImportReport};
use crate::config_store::ConfigStore;
use crate::lexicon::Lexicon;
use crate::migration::{MigrationReport, Migrator};
use crate::repository::LexiconRepository;
use crate::settings::{AutosaveSwitch, LexiSettings};
use crate::state::AppState;
use lexi_core::{
    ConfigDocument, LexiError, LexiResult, LexiconId, SortDirection, SortKey, WordRecord,
};
use lexi_durability::{ArchiveExportInfo, ArchiveInspectInfo, ForeignExportInfo};
use lexi_storage::RecordStore;
use std::path::Path;
use tracing::{info, warn};

/// An open Lexi data directory
#[derive(Debug)]
pub struct Lexi {
    state: AppState,
    settings: LexiSettings,
    config: ConfigStore,
    lexicons: LexiconRepository,
    migration: MigrationReport,
}

impl Lexi {
    /// Open (or initialize) the data directory at `root`
    ///
    /// # Errors
    ///
    /// - `MigratorNotFound` if the store needs a step this build lacks
    /// - `VersionMismatch` if the store was written by a newer version
    /// - `Parse` if a document is corrupt
    pub fn open(root: impl AsRef<Path>) -> LexiResult<Self> {
        let mut state = AppState::new(root);
        state.paths.create_directories()?;

        let settings_path = state.paths.settings_file();
        LexiSettings::write_default_if_missing(&settings_path)?;
        let settings = LexiSettings::from_file(&settings_path)?;
        state = state.with_autosave(AutosaveSwitch::new(settings.word_autosave));

        if !state.paths.config_file().exists() {
            RecordStore::create(state.paths.config_file(), &ConfigDocument::default())?.close()?;
        }

        let migration = Migrator::new().run(&state)?;
        let config = ConfigStore::open(&state.paths)?;
        state.paths.validate()?;
        let lexicons = LexiconRepository::load(&state)?;

        info!(
            target: "lexi::db",
            root = %state.paths.root().display(),
            version = config.version(),
            lexicons = lexicons.len(),
            autosave = settings.word_autosave,
            "Data directory opened"
        );

        Ok(Self {
            state,
            settings,
            config,
            lexicons,
            migration,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Shared state (paths, autosave switch, schema version)
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Settings as last read or written
    pub fn settings(&self) -> &LexiSettings {
        &self.settings
    }

    /// What the migrator did on open
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    /// The config document
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// The config document, for vocabulary and filter changes
    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    /// Every open lexicon
    pub fn lexicons(&self) -> &LexiconRepository {
        &self.lexicons
    }

    /// Every open lexicon, for mutation
    pub fn lexicons_mut(&mut self) -> &mut LexiconRepository {
        &mut self.lexicons
    }

    /// Look up a live lexicon, failing with `NotFound`
    pub fn lexicon(&self, id: &LexiconId) -> LexiResult<&Lexicon> {
        self.lexicons
            .get(id)
            .ok_or_else(|| LexiError::not_found(format!("lexicon {id}")))
    }

    /// Mutable lookup of a live lexicon, failing with `NotFound`
    pub fn lexicon_mut(&mut self, id: &LexiconId) -> LexiResult<&mut Lexicon> {
        self.lexicons
            .get_mut(id)
            .ok_or_else(|| LexiError::not_found(format!("lexicon {id}")))
    }

    /// Words of a lexicon filtered by `query` and the enabled types, in the
    /// configured order
    pub fn word_view(&self, id: &LexiconId, query: &str) -> LexiResult<Vec<&WordRecord>> {
        let lexicon = self.lexicon(id)?;
        Ok(lexicon.view(
            query,
            self.config.enabled_types(),
            self.settings.sort_key,
            self.settings.sort_direction,
        ))
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Turn autosave on or off and persist the choice
    ///
    /// Affects later mutations only. Turning it back on does not write
    /// pending changes; call [`Lexi::save_all`] for that.
    pub fn set_autosave(&mut self, enabled: bool) -> LexiResult<()> {
        self.settings.word_autosave = enabled;
        self.settings.write_to_file(&self.state.paths.settings_file())?;
        self.state.autosave.set(enabled);
        info!(target: "lexi::config", enabled, "Autosave changed");
        Ok(())
    }

    /// Change the word list order and persist it
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> LexiResult<()> {
        self.settings.sort_key = key;
        self.settings.sort_direction = direction;
        self.settings.write_to_file(&self.state.paths.settings_file())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write every lexicon with unsaved changes; returns how many
    pub fn save_all(&mut self) -> LexiResult<usize> {
        self.lexicons.save_all()
    }

    /// Flush the config, sweep the trash and save dirty lexicons
    pub fn close(mut self) -> LexiResult<()> {
        self.config.close()?;
        let swept = self.lexicons.sweep()?;
        let saved = self.lexicons.save_all()?;
        self.lexicons.release()?;
        info!(target: "lexi::db", saved, swept = swept.len(), "Data directory closed");
        Ok(())
    }

    // =========================================================================
    // Backup
    // =========================================================================

    /// Export the store to a zip archive
    pub fn export_backup(&self, target: &Path) -> LexiResult<ArchiveExportInfo> {
        backup::export_backup(&self.state, &self.lexicons, target)
    }

    /// Check an archive without touching the store
    pub fn inspect_backup(&self, source: &Path) -> LexiResult<ArchiveInspectInfo> {
        backup::inspect_archive(source, self.state.expected_version)
    }

    /// Replace the store with an archive and reopen
    ///
    /// Unsaved changes are discarded. The current settings survive the
    /// import. An older archive is migrated forward on reopen and the
    /// report says so.
    ///
    /// The archive is fully checked before any handle is released, so a
    /// rejected archive leaves both the store and this handle usable. If
    /// the restore itself fails, the handle is reopened on whatever the
    /// data directory then holds and the restore error is returned.
    pub fn import_backup(&mut self, source: &Path) -> LexiResult<ImportReport> {
        let inspected = self.inspect_backup(source)?;
        if inspected.config_version > self.state.expected_version {
            return Err(LexiError::VersionMismatch {
                expected: self.state.expected_version,
                found: inspected.config_version,
            });
        }

        self.lexicons.release()?;
        let restored = backup::import_backup(&self.state, source).and_then(|report| {
            self.settings
                .write_to_file(&self.state.paths.settings_file())?;
            Ok(report)
        });

        let root = self.state.paths.root().to_path_buf();
        match restored {
            Ok(report) => {
                *self = Lexi::open(root)?;
                Ok(report)
            }
            Err(e) => {
                warn!(target: "lexi::db", error = %e, "Import failed after release; reloading store");
                if let Ok(reopened) = Lexi::open(root) {
                    *self = reopened;
                }
                Err(e)
            }
        }
    }

    /// Export every live lexicon as a flashcard deck file
    pub fn export_flashcards(&self, target: &Path) -> LexiResult<ForeignExportInfo> {
        backup::export_flashcards(&self.lexicons, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexi_core::NewWord;
    use tempfile::TempDir;

    #[test]
    fn test_open_initializes_directory() {
        let dir = TempDir::new().unwrap();
        let db = Lexi::open(dir.path()).unwrap();
        assert!(dir.path().join("config.yaml").exists());
        assert!(dir.path().join("settings.toml").exists());
        assert!(dir.path().join("lexicons").is_dir());
        assert!(db.migration().is_noop());
        assert!(db.lexicons().is_empty());
        assert!(db.state().autosave.is_enabled());
    }

    #[test]
    fn test_autosave_setting_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let mut db = Lexi::open(dir.path()).unwrap();
        db.set_autosave(false).unwrap();
        db.set_sort(SortKey::ReferenceCount, SortDirection::Descending)
            .unwrap();
        db.close().unwrap();

        let db = Lexi::open(dir.path()).unwrap();
        assert!(!db.settings().word_autosave);
        assert!(!db.state().autosave.is_enabled());
        assert_eq!(db.settings().sort_key, SortKey::ReferenceCount);
    }

    #[test]
    fn test_close_saves_and_sweeps() {
        let dir = TempDir::new().unwrap();
        let mut db = Lexi::open(dir.path()).unwrap();
        db.set_autosave(false).unwrap();

        let id = db.lexicons_mut().add("Spanish").unwrap().id().clone();
        let gone = db.lexicons_mut().add("Gone").unwrap().id().clone();
        let lexicon = db.lexicon_mut(&id).unwrap();
        let gato = lexicon.add_word(NewWord::new("gato")).unwrap();
        let perro = lexicon.add_word(NewWord::new("perro")).unwrap();
        lexicon.word_mut(gato).unwrap().add_reference(perro).unwrap();
        lexicon.trash_word(perro).unwrap();
        db.lexicons_mut().trash(&gone).unwrap();
        db.close().unwrap();

        let db = Lexi::open(dir.path()).unwrap();
        assert_eq!(db.lexicons().len(), 1);
        let lexicon = db.lexicon(&id).unwrap();
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.word(gato).unwrap().references.is_empty());
        assert!(matches!(db.lexicon(&gone), Err(LexiError::NotFound(_))));
    }

    #[test]
    fn test_word_view_uses_settings_and_filter() {
        let dir = TempDir::new().unwrap();
        let mut db = Lexi::open(dir.path()).unwrap();
        let id = db.lexicons_mut().add("Spanish").unwrap().id().clone();
        let lexicon = db.lexicon_mut(&id).unwrap();
        let b = lexicon.add_word(NewWord::new("b")).unwrap();
        let a = lexicon.add_word(NewWord::new("a")).unwrap();
        lexicon.word_mut(a).unwrap().add_type("Noun").unwrap();

        let words: Vec<&str> = db
            .word_view(&id, "")
            .unwrap()
            .iter()
            .map(|w| w.word.as_str())
            .collect();
        assert_eq!(words, vec!["a", "b"]);

        db.config_mut().enable_type("Noun").unwrap();
        let ids: Vec<_> = db.word_view(&id, "").unwrap().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![a]);
        assert!(!ids.contains(&b));
    }

    #[test]
    fn test_import_restores_and_keeps_settings() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("backup.zip");

        let mut source = Lexi::open(dir.path().join("a")).unwrap();
        let id = source.lexicons_mut().add("Spanish").unwrap().id().clone();
        source
            .lexicon_mut(&id)
            .unwrap()
            .add_word(NewWord::new("gato").with_translation("cat"))
            .unwrap();
        source.export_backup(&archive).unwrap();

        let mut target = Lexi::open(dir.path().join("b")).unwrap();
        target.set_autosave(false).unwrap();
        target.lexicons_mut().add("Doomed").unwrap();

        let report = target.import_backup(&archive).unwrap();
        assert_eq!(report.lexicon_count, 1);
        assert!(!report.needs_restart());
        assert_eq!(target.lexicons().len(), 1);
        assert_eq!(target.lexicon(&id).unwrap().len(), 1);
        assert!(!target.settings().word_autosave);
    }
}
