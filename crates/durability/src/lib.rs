//! Durability layer for Lexi
//!
//! Everything that moves the store in or out of the data directory as a
//! whole:
//! - backup: zip archive export, proof-of-content validation, restore
//! - flashcards: one-way export to a Memorado-style SQLite deck file

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;
pub mod flashcards;

pub use backup::{
    ArchiveContents, ArchiveExportInfo, ArchiveInspectInfo, BackupError, BackupReader,
    BackupResult, BackupWriter, RestoreInfo,
};
pub use flashcards::{FlashcardExporter, ForeignExportInfo, DECK_ICON};
