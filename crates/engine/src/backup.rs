//! Backup orchestration
//!
//! Glue between the open store and the archive/flashcard writers in
//! `lexi-durability`. Archive export reads the files as they are on disk;
//! callers that want pending changes included save first.

use crate::repository::LexiconRepository;
use crate::state::AppState;
use lexi_core::{LexiError, LexiResult, LexiconDocument};
use lexi_durability::{
    ArchiveExportInfo, ArchiveInspectInfo, BackupReader, BackupWriter, FlashcardExporter,
    ForeignExportInfo,
};
use std::path::Path;
use tracing::{info, warn};

/// Result of [`import_backup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Files written into the data directory
    pub files_restored: usize,
    /// Lexicon documents restored
    pub lexicon_count: usize,
    /// Schema version of the imported config
    pub found_version: u32,
    /// Schema version this engine writes
    pub expected_version: u32,
}

impl ImportReport {
    /// Whether the archive came from a different schema version
    pub fn version_mismatch(&self) -> bool {
        self.found_version != self.expected_version
    }

    /// Whether the application should restart to finish the import
    pub fn needs_restart(&self) -> bool {
        self.version_mismatch()
    }
}

/// Write the config and every live lexicon file into a zip archive
pub fn export_backup(
    state: &AppState,
    repo: &LexiconRepository,
    target: &Path,
) -> LexiResult<ArchiveExportInfo> {
    let files = repo.live_files();
    let info = BackupWriter::new().write(&state.paths.config_file(), &files, target)?;
    info!(
        target: "lexi::backup",
        path = %info.path.display(),
        lexicons = info.lexicon_count,
        bytes = info.archive_size_bytes,
        "Backup exported"
    );
    Ok(info)
}

/// Validate an archive and read its schema version without touching the store
pub fn inspect_archive(source: &Path, expected_version: u32) -> LexiResult<ArchiveInspectInfo> {
    Ok(BackupReader::inspect(source, expected_version)?)
}

/// Replace the data directory with the contents of an archive
///
/// Open lexicons and the config must be released before calling this;
/// the caller reloads afterwards. Nothing is deleted unless the archive
/// passes validation and its schema is not newer than this engine.
///
/// # Errors
///
/// - `InvalidArchive` if the archive fails the proof-of-content check
/// - `VersionMismatch` if the archive schema is newer than `expected_version`
pub fn import_backup(state: &AppState, source: &Path) -> LexiResult<ImportReport> {
    let inspected = BackupReader::inspect(source, state.expected_version)?;
    if inspected.config_version > state.expected_version {
        warn!(
            target: "lexi::backup",
            found = inspected.config_version,
            expected = state.expected_version,
            "Archive is newer than this version; refusing import"
        );
        return Err(LexiError::VersionMismatch {
            expected: state.expected_version,
            found: inspected.config_version,
        });
    }

    let restored = BackupReader::restore(source, &state.paths)?;
    let report = ImportReport {
        files_restored: restored.files_restored,
        lexicon_count: restored.lexicon_count,
        found_version: inspected.config_version,
        expected_version: state.expected_version,
    };
    if report.version_mismatch() {
        warn!(
            target: "lexi::backup",
            found = report.found_version,
            expected = report.expected_version,
            "Imported data uses an older schema; restart required"
        );
    }
    info!(target: "lexi::backup", files = report.files_restored, lexicons = report.lexicon_count, "Backup imported");
    Ok(report)
}

/// Export every live lexicon as a flashcard deck file
///
/// Trashed lexicons and words are left out.
pub fn export_flashcards(repo: &LexiconRepository, target: &Path) -> LexiResult<ForeignExportInfo> {
    let docs: Vec<LexiconDocument> = repo.list().map(|l| l.live_document()).collect();
    Ok(FlashcardExporter::new().export(docs.iter(), target)?)
}
