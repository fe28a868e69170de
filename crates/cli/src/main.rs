//! Lexi CLI: manage lexicons and words in a Lexi data directory.
//!
//! `lexi [--data-dir DIR] [-v] COMMAND`. Every command opens the data
//! directory, runs, and closes it again (flush config, sweep, save).

mod commands;
mod format;
mod logging;

use std::path::{Path, PathBuf};
use std::process;

use clap::ArgMatches;
use lexi_core::{LexiError, LexiResult, LexiconId, NewWord, SortDirection, SortKey, WordId};
use lexi_engine::Lexi;
use tracing::error;

use commands::build_cli;
use format::{format_error, format_import, format_lexicon, format_word};

/// Environment variable overriding the data directory
const DATA_DIR_ENV: &str = "LEXI_DATA_DIR";

fn main() {
    let matches = build_cli().get_matches();
    logging::init(matches.get_flag("verbose"));

    let root = match data_dir(&matches) {
        Some(root) => root,
        None => {
            eprintln!("(error) no data directory; pass --data-dir or set {DATA_DIR_ENV}");
            process::exit(1);
        }
    };

    let mut db = match Lexi::open(&root) {
        Ok(db) => db,
        Err(e) => {
            error!(target: "lexi::cli", error = %e, "Failed to open data directory");
            eprintln!("{}", format_error(&e));
            process::exit(if e.is_fatal() { 2 } else { 1 });
        }
    };

    let result = run(&matches, &mut db);
    let closed = db.close();

    match result.and_then(|out| closed.map(|_| out)) {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    }
}

fn data_dir(matches: &ArgMatches) -> Option<PathBuf> {
    if let Some(dir) = matches.get_one::<String>("data-dir") {
        return Some(PathBuf::from(dir));
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::data_dir().map(|dir| dir.join("lexi"))
}

fn run(matches: &ArgMatches, db: &mut Lexi) -> LexiResult<String> {
    let Some((name, sub)) = matches.subcommand() else {
        return Ok(String::new());
    };

    match name {
        "list" => {
            let query = sub.get_one::<String>("search").map(String::as_str).unwrap_or("");
            let lines: Vec<String> = db
                .lexicons()
                .filter(query)
                .into_iter()
                .map(format_lexicon)
                .collect();
            Ok(lines.join("\n"))
        }
        "new" => {
            let lexicon = db.lexicons_mut().add(arg(sub, "name")?)?;
            Ok(format_lexicon(lexicon))
        }
        "rename" => {
            let id = lexicon_id(sub)?;
            let lexicon = db.lexicon_mut(&id)?;
            lexicon.rename(arg(sub, "name")?)?;
            Ok(format_lexicon(lexicon))
        }
        "delete" => {
            let id = lexicon_id(sub)?;
            let doc = db.lexicons_mut().remove(&id)?;
            Ok(format!("Deleted '{}' ({} words)", doc.name, doc.words.len()))
        }
        "words" => words(sub, db),
        "add-word" => {
            let id = lexicon_id(sub)?;
            let mut payload = NewWord::new(arg(sub, "word")?);
            if let Some(t) = sub.get_one::<String>("translation") {
                payload = payload.with_translation(t.as_str());
            }
            if let Some(e) = sub.get_one::<String>("example") {
                payload = payload.with_example(e.as_str());
            }
            let lexicon = db.lexicon_mut(&id)?;
            let word_id = lexicon.add_word(payload)?;
            let line = lexicon
                .word(word_id)
                .map(|w| format_word(w, 0))
                .unwrap_or_default();
            Ok(line)
        }
        "tag" => {
            let id = lexicon_id(sub)?;
            let word_id = parse_word_id(sub, "word-id")?;
            db.lexicon_mut(&id)?
                .word_mut(word_id)?
                .add_tag(arg(sub, "tag")?)?;
            Ok(String::new())
        }
        "ref" => {
            let id = lexicon_id(sub)?;
            let word_id = parse_word_id(sub, "word-id")?;
            let target = parse_word_id(sub, "target-id")?;
            db.lexicon_mut(&id)?
                .word_mut(word_id)?
                .add_reference(target)?;
            Ok(String::new())
        }
        "rm-word" => {
            let id = lexicon_id(sub)?;
            let word_id = parse_word_id(sub, "word-id")?;
            let removed = db.lexicon_mut(&id)?.remove_word(word_id)?;
            Ok(format!("Removed '{}'", removed.word))
        }
        "types" => types(sub, db),
        "export" => {
            let target = target_path(sub, "lexi-backup", "zip");
            let info = db.export_backup(&target)?;
            Ok(format!(
                "Exported {} lexicons to {} ({} bytes)",
                info.lexicon_count,
                info.path.display(),
                info.archive_size_bytes
            ))
        }
        "import" => {
            let source = PathBuf::from(arg(sub, "path")?);
            let report = db.import_backup(&source)?;
            Ok(format_import(&report))
        }
        "export-memorado" => {
            let target = target_path(sub, "lexi-memorado", "db");
            let info = db.export_flashcards(&target)?;
            Ok(format!(
                "Exported {} decks ({} cards) to {}",
                info.deck_count,
                info.card_count,
                info.path.display()
            ))
        }
        "autosave" => {
            let enabled = arg(sub, "state")? == "on";
            db.set_autosave(enabled)?;
            Ok(format!("Autosave {}", if enabled { "on" } else { "off" }))
        }
        other => Err(LexiError::invalid_format(format!("unknown command '{other}'"))),
    }
}

fn words(sub: &ArgMatches, db: &Lexi) -> LexiResult<String> {
    let id = lexicon_id(sub)?;
    let key = match sub.get_one::<String>("sort") {
        Some(s) => SortKey::parse(s)
            .ok_or_else(|| LexiError::invalid_format(format!("unknown sort key '{s}'")))?,
        None => db.settings().sort_key,
    };
    let direction = if sub.get_flag("desc") {
        SortDirection::Descending
    } else if sub.get_one::<String>("sort").is_some() {
        SortDirection::Ascending
    } else {
        db.settings().sort_direction
    };
    let query = sub.get_one::<String>("search").map(String::as_str).unwrap_or("");

    let lexicon = db.lexicon(&id)?;
    let lines: Vec<String> = lexicon
        .view(query, db.config().enabled_types(), key, direction)
        .into_iter()
        .map(|w| format_word(w, lexicon.ref_count(w.id)))
        .collect();
    Ok(lines.join("\n"))
}

fn types(sub: &ArgMatches, db: &mut Lexi) -> LexiResult<String> {
    let config = db.config_mut();
    if let Some(t) = sub.get_one::<String>("add") {
        config.add_word_type(t)?;
    }
    if let Some(t) = sub.get_one::<String>("remove") {
        config.remove_word_type(t)?;
    }
    if let Some(t) = sub.get_one::<String>("enable") {
        config.enable_type(t)?;
    }
    if let Some(t) = sub.get_one::<String>("disable") {
        config.disable_type(t)?;
    }

    let lines: Vec<String> = config
        .word_types()
        .iter()
        .map(|t| {
            let marker = if config.enabled_types().contains(t) { "*" } else { " " };
            format!("{marker} {t}")
        })
        .collect();
    Ok(lines.join("\n"))
}

fn arg<'a>(sub: &'a ArgMatches, name: &str) -> LexiResult<&'a str> {
    sub.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| LexiError::invalid_format(format!("missing argument '{name}'")))
}

fn lexicon_id(sub: &ArgMatches) -> LexiResult<LexiconId> {
    arg(sub, "id").map(LexiconId::from)
}

fn parse_word_id(sub: &ArgMatches, name: &str) -> LexiResult<WordId> {
    let raw = arg(sub, name)?;
    raw.parse::<u64>()
        .map(WordId)
        .map_err(|_| LexiError::invalid_format(format!("'{raw}' is not a word id")))
}

fn target_path(sub: &ArgMatches, stem: &str, extension: &str) -> PathBuf {
    match sub.get_one::<String>("path") {
        Some(p) => PathBuf::from(p),
        None => default_target(Path::new("."), stem, extension),
    }
}

fn default_target(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d");
    dir.join(format!("{stem}-{date}.{extension}"))
}
