//! Storage layer for Lexi
//!
//! This crate owns everything that touches the live data directory:
//! - RecordStore: one open document file with truncate-and-rewrite saves
//! - DataPaths: the directory layout (`config.yaml`, `lexicons/`, `settings.toml`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod paths;
pub mod record_store;

pub use paths::{DataPathError, DataPaths, CONFIG_FILE, LEXICONS_DIR, SETTINGS_FILE};
pub use record_store::{read_document, schema_version, RecordStore};
