//! Record store: one YAML document behind one open file handle
//!
//! The handle is opened once and held for the lifetime of the owning
//! entity. Every save rewrites the whole file in place:
//!
//! ```text
//! seek(0) -> set_len(0) -> write document -> flush
//! ```
//!
//! There is no temp-file swap for live documents. A crash in the middle of
//! a save can leave a truncated file, which then fails to load with
//! `LexiError::Parse`.

use lexi_core::{LexiError, LexiResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open, file-backed document
///
/// Dropping the store closes the handle.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    file: File,
}

impl RecordStore {
    /// Open an existing document file for reading and rewriting
    ///
    /// Fails with `NotFound` when the file is absent; callers create
    /// default content with [`RecordStore::create`] first.
    pub fn open(path: impl Into<PathBuf>) -> LexiResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| map_open_error(e, &path))?;
        Ok(RecordStore { path, file })
    }

    /// Create a new document file holding `doc`
    ///
    /// Fails with `AlreadyExists` if the file is already there.
    pub fn create<T: Serialize>(path: impl Into<PathBuf>, doc: &T) -> LexiResult<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => {
                    LexiError::already_exists(format!("file {}", path.display()))
                }
                _ => LexiError::Io(e),
            })?;
        let mut store = RecordStore { path, file };
        store.save(doc)?;
        Ok(store)
    }

    /// Open `path`, creating it with `default` first if it does not exist
    pub fn open_or_create<T: Serialize>(path: impl Into<PathBuf>, default: &T) -> LexiResult<Self> {
        let path = path.into();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, default)
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document
    pub fn load<T: DeserializeOwned>(&mut self) -> LexiResult<T> {
        let text = self.read_text()?;
        serde_yaml::from_str(&text).map_err(|e| parse_error(&self.path, e))
    }

    /// Read the document as an untyped YAML tree
    ///
    /// Used by schema migration, which must look at shapes the typed
    /// records no longer describe.
    pub fn load_value(&mut self) -> LexiResult<serde_yaml::Value> {
        self.load()
    }

    /// Overwrite the backing file with `doc`
    pub fn save<T: Serialize>(&mut self, doc: &T) -> LexiResult<()> {
        let text = serde_yaml::to_string(doc)
            .map_err(|e| LexiError::storage(format!("serialize {}: {e}", self.path.display())))?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(text.as_bytes())?;
        self.file.flush()?;
        debug!(target: "lexi::store", path = %self.path.display(), bytes = text.len(), "Document saved");
        Ok(())
    }

    /// Sync and release the handle
    pub fn close(self) -> LexiResult<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn read_text(&mut self) -> LexiResult<String> {
        let mut text = String::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_string(&mut text)?;
        Ok(text)
    }
}

/// One-shot read of a document that is not kept open
pub fn read_document<T: DeserializeOwned>(path: &Path) -> LexiResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| map_open_error(e, path))?;
    serde_yaml::from_str(&text).map_err(|e| parse_error(path, e))
}

/// Schema version recorded in a raw config tree
///
/// A mapping without `version` (or with `version: null`) is a version 1
/// store. Anything else that is not a `u32` is a parse error, as is a root
/// that is not a mapping.
pub fn schema_version(config: &serde_yaml::Value) -> LexiResult<u32> {
    if !config.is_mapping() {
        return Err(LexiError::parse("config root is not a mapping"));
    }
    match config.get("version") {
        None | Some(serde_yaml::Value::Null) => Ok(1),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| LexiError::parse(format!("config version is not a number: {v:?}"))),
    }
}

fn map_open_error(e: io::Error, path: &Path) -> LexiError {
    match e.kind() {
        io::ErrorKind::NotFound => LexiError::not_found(format!("file {}", path.display())),
        _ => LexiError::Io(e),
    }
}

fn parse_error(path: &Path, e: serde_yaml::Error) -> LexiError {
    LexiError::parse(format!("{}: {e}", path.display()))
}
