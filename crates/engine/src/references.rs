//! Reference integrity
//!
//! References are stored one way only: `A -> B` puts `B` in `A.references`
//! and nothing in `B`. Everything seen "from B's side" is derived here by
//! scanning, never stored.
//!
//! Deleting a word must be followed by [`cascade_remove`] over the words
//! that remain, or their reference lists would point at nothing.

use lexi_core::{WordId, WordRecord};

/// Drop `removed` from every word's references
///
/// Returns the ids of the words that were changed.
pub fn cascade_remove<'a, I>(words: I, removed: WordId) -> Vec<WordId>
where
    I: IntoIterator<Item = &'a mut WordRecord>,
{
    let mut affected = Vec::new();
    for word in words {
        let before = word.references.len();
        word.references.retain(|r| *r != removed);
        if word.references.len() != before {
            affected.push(word.id);
        }
    }
    affected
}

/// Words whose references contain `target`, in the order given
pub fn referrers<'a, I>(words: I, target: WordId) -> Vec<&'a WordRecord>
where
    I: IntoIterator<Item = &'a WordRecord>,
{
    words
        .into_iter()
        .filter(|w| w.references_word(target))
        .collect()
}

/// Number of words whose references contain `target`
pub fn ref_count<'a, I>(words: I, target: WordId) -> usize
where
    I: IntoIterator<Item = &'a WordRecord>,
{
    words
        .into_iter()
        .filter(|w| w.references_word(target))
        .count()
}

/// `(word, missing target)` pairs for references to ids not in `words`
pub fn dangling<'a, I>(words: I) -> Vec<(WordId, WordId)>
where
    I: IntoIterator<Item = &'a WordRecord> + Clone,
{
    let known: std::collections::HashSet<WordId> = words.clone().into_iter().map(|w| w.id).collect();
    words
        .into_iter()
        .flat_map(|w| {
            w.references
                .iter()
                .filter(|r| !known.contains(r))
                .map(move |r| (w.id, *r))
        })
        .collect()
}
