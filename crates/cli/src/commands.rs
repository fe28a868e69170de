//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("lexi")
        .about("Manage Lexi vocabulary lexicons from the command line")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Data directory (default: $LEXI_DATA_DIR or the platform data dir)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("list")
                .about("List lexicons")
                .arg(Arg::new("search").long("search").help("Filter by name")),
        )
        .subcommand(
            Command::new("new")
                .about("Create a lexicon")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a lexicon")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a lexicon and its file")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(build_words())
        .subcommand(
            Command::new("add-word")
                .about("Add a word to a lexicon")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("word").required(true))
                .arg(Arg::new("translation").long("translation").short('t'))
                .arg(Arg::new("example").long("example").short('e')),
        )
        .subcommand(
            Command::new("tag")
                .about("Tag a word")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("word-id").required(true))
                .arg(Arg::new("tag").required(true)),
        )
        .subcommand(
            Command::new("ref")
                .about("Make a word reference another word")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("word-id").required(true))
                .arg(Arg::new("target-id").required(true)),
        )
        .subcommand(
            Command::new("rm-word")
                .about("Delete a word and every reference to it")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("word-id").required(true)),
        )
        .subcommand(build_types())
        .subcommand(
            Command::new("export")
                .about("Export a backup archive")
                .arg(Arg::new("path").help("Target file (default: dated name in the current directory)")),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all data with a backup archive")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(
            Command::new("export-memorado")
                .about("Export lexicons as Memorado flashcard decks")
                .arg(Arg::new("path").help("Target file (default: dated name in the current directory)")),
        )
        .subcommand(
            Command::new("autosave")
                .about("Turn word autosave on or off")
                .arg(
                    Arg::new("state")
                        .required(true)
                        .value_parser(["on", "off"]),
                ),
        )
}

fn build_words() -> Command {
    Command::new("words")
        .about("List the words of a lexicon")
        .arg(Arg::new("id").required(true))
        .arg(
            Arg::new("sort")
                .long("sort")
                .help("Sort key (default: from settings)")
                .value_parser(["word", "first_translation", "reference_count"]),
        )
        .arg(
            Arg::new("desc")
                .long("desc")
                .help("Descending order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .help("Text to match, or #tag #tag"),
        )
}

fn build_types() -> Command {
    Command::new("types")
        .about("Show or edit the word type vocabulary")
        .arg(Arg::new("add").long("add").help("Add a type"))
        .arg(Arg::new("remove").long("remove").help("Remove a type"))
        .arg(Arg::new("enable").long("enable").help("Only list words of this type"))
        .arg(Arg::new("disable").long("disable").help("Stop filtering by this type"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tree_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parses_words_flags() {
        let m = build_cli()
            .try_get_matches_from(["lexi", "words", "abc", "--sort", "reference_count", "--desc"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "words");
        assert_eq!(sub.get_one::<String>("sort").map(String::as_str), Some("reference_count"));
        assert!(sub.get_flag("desc"));
    }

    #[test]
    fn test_rejects_unknown_autosave_state() {
        assert!(build_cli()
            .try_get_matches_from(["lexi", "autosave", "maybe"])
            .is_err());
    }
}
