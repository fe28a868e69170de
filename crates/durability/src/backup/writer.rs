//! Backup archive writer
//!
//! Creates uncompressed zip archives of the store. The archive is built at
//! a temporary sibling path and renamed into place, so a failed export
//! never leaves a partial archive behind.

use crate::backup::error::{BackupError, BackupResult};
use crate::backup::types::{paths, ArchiveExportInfo};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for backup archives
#[derive(Debug, Default)]
pub struct BackupWriter;

impl BackupWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self
    }

    /// Write an archive holding `config_file` and every file in `lexicon_files`
    ///
    /// Lexicon documents are stored under `lexicons/` using their file name.
    /// An existing file at `target` is replaced.
    pub fn write(
        &self,
        config_file: &Path,
        lexicon_files: &[PathBuf],
        target: &Path,
    ) -> BackupResult<ArchiveExportInfo> {
        if !config_file.exists() {
            return Err(BackupError::missing_file(config_file.display().to_string()));
        }

        let temp_path = target.with_extension("tmp");

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        match self.write_inner(config_file, lexicon_files, &temp_path) {
            Ok(lexicon_count) => {
                fs::rename(&temp_path, target)?;
                let archive_size_bytes = fs::metadata(target)?.len();
                debug!(
                    target: "lexi::backup",
                    path = %target.display(),
                    bytes = archive_size_bytes,
                    "Archive renamed into place"
                );
                Ok(ArchiveExportInfo {
                    path: target.to_path_buf(),
                    lexicon_count,
                    archive_size_bytes,
                })
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    fn write_inner(
        &self,
        config_file: &Path,
        lexicon_files: &[PathBuf],
        path: &Path,
    ) -> BackupResult<usize> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        self.add_file(&mut zip, paths::CONFIG, config_file, options)?;
        zip.add_directory(paths::LEXICONS_DIR, options)?;

        let mut count = 0;
        for source in lexicon_files {
            let name = source
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| BackupError::missing_file(source.display().to_string()))?;
            let entry = format!("{}{}", paths::LEXICONS_DIR, name);
            self.add_file(&mut zip, &entry, source, options)?;
            count += 1;
        }

        let mut writer = zip.finish()?;
        writer.flush()?;
        Ok(count)
    }

    fn add_file<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        entry: &str,
        source: &Path,
        options: FileOptions,
    ) -> BackupResult<()> {
        let data = fs::read(source).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BackupError::missing_file(source.display().to_string()),
            _ => BackupError::Io(e),
        })?;
        zip.start_file(entry, options)?;
        zip.write_all(&data)?;
        debug!(target: "lexi::backup", entry, bytes = data.len(), "Exported file into archive");
        Ok(())
    }
}
