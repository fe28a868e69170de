//! Lexi - document engine for a vocabulary and flashcard manager
//!
//! Lexicons are named word lists, one YAML document each, next to a shared
//! `config.yaml`. Words carry translations, examples, types, tags and
//! one-way references to other words of the same lexicon.
//!
//! # Quick Start
//!
//! ```ignore
//! use lexi::{Lexi, NewWord};
//!
//! let mut db = Lexi::open("/path/to/data")?;
//! let id = db.lexicons_mut().add("Spanish")?.id().clone();
//!
//! let lexicon = db.lexicon_mut(&id)?;
//! let gato = lexicon.add_word(NewWord::new("gato").with_translation("cat"))?;
//! lexicon.word_mut(gato)?.add_tag("animal")?;
//!
//! db.close()?;
//! ```
//!
//! # Architecture
//!
//! - `lexi-core`: records, ids, errors, the pure sort/filter functions
//! - `lexi-storage`: one YAML document per open file, data directory layout
//! - `lexi-durability`: zip backups and the flashcard exporter
//! - `lexi-engine`: lexicons, word mutators, migration, the [`Lexi`] handle
//!
//! Only the engine API and the core model are re-exported here.

pub use lexi_core::{
    default_word_types, is_rtl, normalize_tag, search, strip_direction, with_direction,
    ConfigDocument, LexiError, LexiResult, LexiconDocument, LexiconId, ListField, NewWord,
    SortDirection, SortKey, WordId, WordRecord, CONFIG_VERSION, RTL_MARKER,
};
pub use lexi_engine::{
    AppState, AutosaveSwitch, ConfigStore, ImportReport, Lexi, LexiSettings, Lexicon,
    LexiconEvent, LexiconRepository, MigrationReport, Migrator, SubscriptionId, WordField,
    WordMut,
};
