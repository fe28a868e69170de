//! Sort and filter engine
//!
//! Pure comparator and predicate functions over words and lexicons. The
//! caller supplies everything that would otherwise be UI state: the sort
//! key and direction, the search text, and the enabled type filter.
//!
//! ## Word search syntax
//!
//! - `""` matches everything
//! - `"gat"` matches words whose text or first translation contains `gat`
//!   (case-insensitive, direction markers ignored)
//! - `"#animal#pet"` matches words tagged with both `animal` and `pet`
//!
//! In every case the word must also carry all of the enabled types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::text::sort_text;
use crate::word::WordRecord;

/// What words are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// The word text
    #[default]
    Word,
    /// The first translation (empty when there is none)
    FirstTranslation,
    /// How many words reference this one
    ReferenceCount,
}

impl SortKey {
    /// Parse the settings/CLI spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "word" => Some(SortKey::Word),
            "first_translation" | "first-translation" => Some(SortKey::FirstTranslation),
            "reference_count" | "reference-count" | "refs" => Some(SortKey::ReferenceCount),
            _ => None,
        }
    }

    /// Settings spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Word => "word",
            SortKey::FirstTranslation => "first_translation",
            SortKey::ReferenceCount => "reference_count",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Build from an "ascending" flag
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    /// Whether this is [`SortDirection::Ascending`]
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// A word paired with its derived reference count
///
/// The count is not stored on the word; the lexicon computes it by reverse
/// lookup before sorting.
#[derive(Debug, Clone, Copy)]
pub struct SortEntry<'a> {
    /// The word
    pub word: &'a WordRecord,
    /// Number of live words referencing it
    pub ref_count: usize,
}

impl<'a> SortEntry<'a> {
    /// Pair a word with its reference count
    pub fn new(word: &'a WordRecord, ref_count: usize) -> Self {
        Self { word, ref_count }
    }
}

/// Compare two words by `key` in `direction`
///
/// Text keys compare lowercased text with direction markers stripped;
/// `ReferenceCount` compares integers. Descending inverts the result, so
/// equal keys stay `Equal` and a stable sort keeps insertion order for ties.
pub fn compare(a: &SortEntry<'_>, b: &SortEntry<'_>, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = match key {
        SortKey::Word => sort_text(&a.word.word).cmp(&sort_text(&b.word.word)),
        SortKey::FirstTranslation => {
            sort_text(a.word.first_translation()).cmp(&sort_text(b.word.first_translation()))
        }
        SortKey::ReferenceCount => a.ref_count.cmp(&b.ref_count),
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// [`compare`] as `-1`, `0`, `1`
pub fn compare_sign(
    a: &SortEntry<'_>,
    b: &SortEntry<'_>,
    key: SortKey,
    direction: SortDirection,
) -> i32 {
    match compare(a, b, key, direction) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Tags required by a `#tag` query, or `None` for a text query
///
/// Spaces are ignored and empty segments dropped, so `"# a#b ##"` requires
/// `{a, b}`.
pub fn parse_tag_query(query: &str) -> Option<HashSet<String>> {
    let query = query.to_lowercase();
    if !query.starts_with('#') {
        return None;
    }
    let compact: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    Some(
        compact
            .split('#')
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
    )
}

/// Whether `word` carries every type in `enabled_types`
///
/// An empty filter is always satisfied.
pub fn matches_types(word: &WordRecord, enabled_types: &[String]) -> bool {
    enabled_types.iter().all(|t| word.types.contains(t))
}

/// Whether `word` should be listed for `query` under `enabled_types`
pub fn matches(word: &WordRecord, query: &str, enabled_types: &[String]) -> bool {
    if !matches_types(word, enabled_types) {
        return false;
    }
    match parse_tag_query(query) {
        Some(required) => required.iter().all(|t| word.tags.contains(t)),
        None => {
            let text = query.to_lowercase();
            text.is_empty()
                || sort_text(&word.word).contains(&text)
                || sort_text(word.first_translation()).contains(&text)
        }
    }
}

/// Whether a lexicon named `name` should be listed for `query`
pub fn matches_lexicon(name: &str, query: &str) -> bool {
    let query = query.to_lowercase();
    query.is_empty() || name.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WordId;
    use crate::word::NewWord;
    use proptest::prelude::*;

    fn word(id: u64, text: &str, translation: Option<&str>) -> WordRecord {
        let mut payload = NewWord::new(text);
        if let Some(t) = translation {
            payload = payload.with_translation(t);
        }
        WordRecord::new(WordId(id), payload).unwrap()
    }

    fn cat() -> WordRecord {
        let mut w = word(1, "cat", Some("gato"));
        w.add_tag("animal").unwrap();
        w
    }

    #[test]
    fn test_filter_scenario() {
        let w = cat();
        assert!(matches(&w, "", &[]));
        assert!(!matches(&w, "dog", &[]));
        assert!(matches(&w, "#animal", &[]));
        assert!(!matches(&w, "#plant", &[]));
    }

    #[test]
    fn test_text_query_hits_translation_and_ignores_case() {
        let w = cat();
        assert!(matches(&w, "GAT", &[]));
        assert!(matches(&w, "Ca", &[]));
    }

    #[test]
    fn test_text_query_ignores_direction_marker() {
        let w = word(2, "&rtlשלום", None);
        assert!(matches(&w, "של", &[]));
        assert!(!matches(&w, "rtl", &[]));
    }

    #[test]
    fn test_tag_query_is_a_set() {
        let mut w = cat();
        w.add_tag("pet").unwrap();
        assert!(matches(&w, "#pet#animal", &[]));
        assert!(matches(&w, "# animal ## pet", &[]));
        assert!(!matches(&w, "#pet#wild", &[]));
        assert!(matches(&w, "#", &[]));
    }

    #[test]
    fn test_type_filter_is_strict_superset() {
        let mut w = cat();
        w.add_type("Noun").unwrap();
        let noun = vec!["Noun".to_string()];
        let noun_verb = vec!["Noun".to_string(), "Verb".to_string()];
        assert!(matches(&w, "", &noun));
        assert!(!matches(&w, "", &noun_verb));
        assert!(matches(&w, "#animal", &noun));
        assert!(!matches(&w, "#animal", &noun_verb));
    }

    #[test]
    fn test_matches_lexicon() {
        assert!(matches_lexicon("Spanish verbs", ""));
        assert!(matches_lexicon("Spanish verbs", "SPAN"));
        assert!(!matches_lexicon("Spanish verbs", "german"));
    }

    #[test]
    fn test_compare_by_word() {
        let a = word(1, "apple", None);
        let b = word(2, "&rtlBanana", None);
        let (ea, eb) = (SortEntry::new(&a, 0), SortEntry::new(&b, 0));
        assert_eq!(compare_sign(&ea, &eb, SortKey::Word, SortDirection::Ascending), -1);
        assert_eq!(compare_sign(&ea, &eb, SortKey::Word, SortDirection::Descending), 1);
    }

    #[test]
    fn test_compare_by_first_translation_missing_sorts_first() {
        let a = word(1, "x", None);
        let b = word(2, "y", Some("A"));
        let (ea, eb) = (SortEntry::new(&a, 0), SortEntry::new(&b, 0));
        assert_eq!(
            compare(&ea, &eb, SortKey::FirstTranslation, SortDirection::Ascending),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_by_reference_count() {
        let a = word(1, "x", None);
        let b = word(2, "y", None);
        let (ea, eb) = (SortEntry::new(&a, 3), SortEntry::new(&b, 1));
        assert_eq!(
            compare_sign(&ea, &eb, SortKey::ReferenceCount, SortDirection::Ascending),
            1
        );
    }

    #[test]
    fn test_ties_are_zero_in_both_directions() {
        let a = word(1, "Same", None);
        let b = word(2, "same", None);
        let (ea, eb) = (SortEntry::new(&a, 0), SortEntry::new(&b, 0));
        for dir in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(compare_sign(&ea, &eb, SortKey::Word, dir), 0);
        }
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("word"), Some(SortKey::Word));
        assert_eq!(SortKey::parse("refs"), Some(SortKey::ReferenceCount));
        assert_eq!(SortKey::parse("nope"), None);
        assert_eq!(
            SortKey::parse(SortKey::FirstTranslation.as_str()),
            Some(SortKey::FirstTranslation)
        );
    }

    fn key_strategy() -> impl Strategy<Value = SortKey> {
        prop_oneof![
            Just(SortKey::Word),
            Just(SortKey::FirstTranslation),
            Just(SortKey::ReferenceCount),
        ]
    }

    proptest! {
        #[test]
        fn test_compare_is_antisymmetric(
            a in "[a-zA-Z]{1,8}",
            b in "[a-zA-Z]{1,8}",
            ta in "[a-zA-Z]{0,8}",
            tb in "[a-zA-Z]{0,8}",
            ra in 0usize..5,
            rb in 0usize..5,
            key in key_strategy(),
            ascending in any::<bool>(),
        ) {
            let wa = word(1, &a, Some(&ta));
            let wb = word(2, &b, Some(&tb));
            let (ea, eb) = (SortEntry::new(&wa, ra), SortEntry::new(&wb, rb));
            let dir = SortDirection::from_ascending(ascending);
            prop_assert_eq!(compare_sign(&ea, &eb, key, dir), -compare_sign(&eb, &ea, key, dir));
        }

        #[test]
        fn test_compare_zero_only_for_equal_keys(
            a in "[a-zA-Z]{1,8}",
            b in "[a-zA-Z]{1,8}",
        ) {
            let wa = word(1, &a, None);
            let wb = word(2, &b, None);
            let (ea, eb) = (SortEntry::new(&wa, 0), SortEntry::new(&wb, 0));
            let zero = compare_sign(&ea, &eb, SortKey::Word, SortDirection::Ascending) == 0;
            prop_assert_eq!(zero, a.to_lowercase() == b.to_lowercase());
        }
    }
}
