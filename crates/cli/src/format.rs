//! Human-readable output for lexicons and words.

use lexi_core::{strip_direction, LexiError, WordRecord};
use lexi_engine::{ImportReport, Lexicon};

/// One line per lexicon: id, name, live word count.
pub fn format_lexicon(lexicon: &Lexicon) -> String {
    format!("{}  {}  ({} words)", lexicon.id(), lexicon.name(), lexicon.len())
}

/// One line per word.
///
/// `3  gato [gato]: cat, kitten  {Noun}  #pet  -> 1, 2  (refs 4)`
pub fn format_word(word: &WordRecord, ref_count: usize) -> String {
    let mut line = format!("{:>4}  {}", word.id.0, strip_direction(&word.word));
    if !word.pronunciation.is_empty() {
        line.push_str(&format!(" [{}]", word.pronunciation));
    }
    if !word.translations.is_empty() {
        let translations: Vec<String> = word.translations.iter().map(|t| strip_direction(t)).collect();
        line.push_str(&format!(": {}", translations.join(", ")));
    }
    if !word.types.is_empty() {
        line.push_str(&format!("  {{{}}}", word.types.join(", ")));
    }
    for tag in &word.tags {
        line.push_str(&format!("  #{tag}"));
    }
    if !word.references.is_empty() {
        let refs: Vec<String> = word.references.iter().map(|r| r.to_string()).collect();
        line.push_str(&format!("  -> {}", refs.join(", ")));
    }
    if ref_count > 0 {
        line.push_str(&format!("  (refs {ref_count})"));
    }
    line
}

/// Summary printed after an import.
pub fn format_import(report: &ImportReport) -> String {
    let mut out = format!(
        "Imported {} files ({} lexicons)",
        report.files_restored, report.lexicon_count
    );
    if report.needs_restart() {
        out.push_str(&format!(
            "\nwarning: archive schema v{} differs from v{}; restart Lexi to finish the import",
            report.found_version, report.expected_version
        ));
    }
    out
}

/// Format an error.
pub fn format_error(err: &LexiError) -> String {
    format!("(error) {}", err)
}
