//! Core types for Lexi
//!
//! This crate defines the document model shared by every layer:
//! - LexiconId, WordId: identifiers
//! - WordRecord, NewWord: words and their validate-then-apply mutators
//! - LexiconDocument: one lexicon file
//! - ConfigDocument: the process-wide config file
//! - search: the pure sort/filter engine
//! - LexiError: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod lexicon;
pub mod search;
pub mod text;
pub mod types;
pub mod word;

pub use config::{default_word_types, ConfigDocument, CONFIG_VERSION, DEFAULT_WORD_TYPES};
pub use error::{LexiError, LexiResult};
pub use lexicon::{validate_lexicon_name, LexiconDocument};
pub use search::{SortDirection, SortEntry, SortKey};
pub use text::{is_rtl, normalize_tag, strip_direction, with_direction, RTL_MARKER};
pub use types::{LexiconId, WordId};
pub use word::{ListField, NewWord, WordRecord};
