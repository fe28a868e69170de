//! Document engine for Lexi
//!
//! This crate ties the lower layers together:
//! - Lexi: one open data directory, with open/close
//! - Lexicon and WordMut: entities, mutators and change notification
//! - LexiconRepository: the set of open lexicons
//! - references: one-way reference bookkeeping and the delete cascade
//! - Migrator: versioned schema upgrades
//! - backup: archive and flashcard export/import against the open store
//!
//! Persistence policy is driven by a single [`AutosaveSwitch`] shared by
//! every lexicon of a [`Lexi`] handle.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backup;
pub mod config_store;
pub mod database;
pub mod lexicon;
pub mod migration;
pub mod references;
pub mod repository;
pub mod settings;
pub mod state;
pub mod word;

pub use backup::ImportReport;
pub use config_store::ConfigStore;
pub use database::Lexi;
pub use lexicon::{Lexicon, LexiconEvent, SubscriptionId, WordField};
pub use migration::{MigrationReport, MigrationStep, Migrator};
pub use repository::LexiconRepository;
pub use settings::{AutosaveSwitch, LexiSettings};
pub use state::AppState;
pub use word::WordMut;
