//! Memorado flashcard export
//!
//! One-way, lossy projection of lexicons into a two-table SQLite file:
//!
//! ```text
//! decks(deck_id TEXT, name TEXT, icon TEXT)   -- one row per lexicon
//! cards(deck_id TEXT, front TEXT, back TEXT)  -- one row per word
//! ```
//!
//! `front` is the word, `back` the translations joined by `", "`.
//! Pronunciation, examples, types, tags and references are dropped; there
//! is no import path back.

use crate::backup::error::BackupResult;
use lexi_core::{strip_direction, LexiconDocument, WordRecord};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Icon stored on every exported deck
pub const DECK_ICON: &str = "🤖";

const SCHEMA: &str = "
    CREATE TABLE cards (deck_id TEXT, front TEXT, back TEXT);
    CREATE TABLE decks (deck_id TEXT, name TEXT, icon TEXT);
";

/// Result of a flashcard export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignExportInfo {
    /// Path of the written database
    pub path: PathBuf,
    /// Decks written (one per lexicon)
    pub deck_count: usize,
    /// Cards written (one per word)
    pub card_count: usize,
}

/// Writes lexicons as Memorado decks
#[derive(Debug, Default)]
pub struct FlashcardExporter;

impl FlashcardExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self
    }

    /// Export `lexicons` to a fresh database at `target`
    ///
    /// An existing file at `target` is removed first. Each deck gets a newly
    /// generated id, so exporting twice yields different deck ids.
    pub fn export<'a, I>(&self, lexicons: I, target: &Path) -> BackupResult<ForeignExportInfo>
    where
        I: IntoIterator<Item = &'a LexiconDocument>,
    {
        if target.exists() {
            fs::remove_file(target)?;
        }

        let mut conn = Connection::open(target)?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        let mut deck_count = 0;
        let mut card_count = 0;
        {
            let mut insert_deck =
                tx.prepare("INSERT INTO decks (deck_id, name, icon) VALUES (?1, ?2, ?3)")?;
            let mut insert_card =
                tx.prepare("INSERT INTO cards (deck_id, front, back) VALUES (?1, ?2, ?3)")?;

            for lexicon in lexicons {
                let deck_id = Uuid::new_v4().simple().to_string();
                insert_deck.execute(params![deck_id, lexicon.name, DECK_ICON])?;
                for word in &lexicon.words {
                    insert_card.execute(params![deck_id, card_front(word), card_back(word)])?;
                }
                debug!(
                    target: "lexi::backup",
                    lexicon = %lexicon.id,
                    cards = lexicon.words.len(),
                    "Exported lexicon as deck"
                );
                deck_count += 1;
                card_count += lexicon.words.len();
            }
        }
        tx.commit()?;

        info!(
            target: "lexi::backup",
            path = %target.display(),
            decks = deck_count,
            cards = card_count,
            "Flashcard export finished"
        );
        Ok(ForeignExportInfo {
            path: target.to_path_buf(),
            deck_count,
            card_count,
        })
    }
}

/// Card front: the word without its direction marker
pub fn card_front(word: &WordRecord) -> String {
    strip_direction(&word.word)
}

/// Card back: translations joined by `", "`
pub fn card_back(word: &WordRecord) -> String {
    word.translations
        .iter()
        .map(|t| strip_direction(t))
        .collect::<Vec<_>>()
        .join(", ")
}
