//! Backup archive reader
//!
//! Validates archives ("proof of content") and restores them into a data
//! directory. Nothing in the store is touched until validation passes.

use crate::backup::error::{BackupError, BackupResult};
use crate::backup::types::{paths, ArchiveContents, ArchiveInspectInfo, RestoreInfo};
use lexi_storage::{schema_version, DataPaths};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Reader for backup archives
pub struct BackupReader;

impl BackupReader {
    /// Whether the file is a zip holding a config and at least one
    /// `lexicons/` entry
    pub fn proof_of_content(path: &Path) -> bool {
        match Self::validate(path) {
            Ok(_) => true,
            Err(e) => {
                warn!(target: "lexi::backup", path = %path.display(), error = %e, "Invalid archive");
                false
            }
        }
    }

    /// Validate the archive structure
    ///
    /// Checks:
    /// - The file is a readable zip
    /// - `config.yaml` is present at the root
    /// - At least one entry lives under `lexicons/`
    pub fn validate(path: &Path) -> BackupResult<ArchiveContents> {
        let archive = Self::open(path)?;
        let names: Vec<&str> = archive.file_names().collect();

        if !names.iter().any(|n| *n == paths::CONFIG) {
            return Err(BackupError::missing_file(paths::CONFIG));
        }
        if !names.iter().any(|n| n.starts_with(paths::LEXICONS_DIR)) {
            return Err(BackupError::invalid_archive(format!(
                "no entries under {}",
                paths::LEXICONS_DIR
            )));
        }

        let mut lexicon_entries: Vec<String> = names
            .iter()
            .filter(|n| n.starts_with(paths::LEXICONS_DIR) && **n != paths::LEXICONS_DIR)
            .filter(|n| !n.ends_with('/'))
            .map(|n| n.to_string())
            .collect();
        lexicon_entries.sort();

        Ok(ArchiveContents {
            lexicon_entries,
            entry_count: names.len(),
        })
    }

    /// Read the archived config version without touching the store
    ///
    /// The config is extracted to a scratch directory first. A config with
    /// no `version` key is a version 1 store. An unreadable config, a
    /// version that is not a `u32`, or a lexicon entry that is not a YAML
    /// mapping makes the archive invalid.
    pub fn inspect(path: &Path, expected_version: u32) -> BackupResult<ArchiveInspectInfo> {
        let contents = Self::validate(path)?;
        let mut archive = Self::open(path)?;

        let scratch = tempfile::tempdir()?;
        let extracted = scratch.path().join(paths::CONFIG);
        {
            let mut entry = archive.by_name(paths::CONFIG)?;
            let mut out = File::create(&extracted)?;
            io::copy(&mut entry, &mut out)?;
        }

        let text = std::fs::read_to_string(&extracted)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&text).map_err(|e| {
            BackupError::invalid_archive(format!("{}: {e}", paths::CONFIG))
        })?;
        let config_version = schema_version(&value).map_err(|e| {
            BackupError::invalid_archive(format!("{}: {e}", paths::CONFIG))
        })?;

        for name in &contents.lexicon_entries {
            let mut body = String::new();
            archive.by_name(name)?.read_to_string(&mut body)?;
            let doc: serde_yaml::Value = serde_yaml::from_str(&body)
                .map_err(|e| BackupError::invalid_archive(format!("{name}: {e}")))?;
            if !doc.is_mapping() {
                return Err(BackupError::invalid_archive(format!(
                    "{name}: document root is not a mapping"
                )));
            }
        }

        let info = ArchiveInspectInfo {
            lexicon_count: contents.lexicon_entries.len(),
            config_version,
            expected_version,
        };
        if !info.version_matches() {
            warn!(
                target: "lexi::backup",
                path = %path.display(),
                found = config_version,
                expected = expected_version,
                "Archive version mismatch"
            );
        }
        Ok(info)
    }

    /// Replace the contents of the data directory with the archive
    ///
    /// Validates first; on failure the store is left untouched. On success
    /// everything under the data root is deleted before extraction.
    pub fn restore(path: &Path, data: &DataPaths) -> BackupResult<RestoreInfo> {
        let contents = Self::validate(path)?;
        let mut archive = Self::open(path)?;

        data.clear_contents()?;
        archive.extract(data.root())?;
        data.create_directories()?;

        let files_restored = (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().map(|f| !f.is_dir()))
            .filter(|is_file| *is_file)
            .count();
        for name in &contents.lexicon_entries {
            debug!(target: "lexi::backup", entry = %name, "Imported file from archive");
        }
        info!(
            target: "lexi::backup",
            path = %path.display(),
            files = files_restored,
            lexicons = contents.lexicon_entries.len(),
            "Backup restored"
        );

        Ok(RestoreInfo {
            files_restored,
            lexicon_count: contents.lexicon_entries.len(),
        })
    }

    fn open(path: &Path) -> BackupResult<ZipArchive<BufReader<File>>> {
        let file = File::open(path)?;
        Ok(ZipArchive::new(BufReader::new(file))?)
    }
}
