//! Archives, flashcard export and schema upgrades end to end

use lexi::{ConfigDocument, LexiError, Lexi, LexiconDocument, NewWord, WordId};
use lexi_durability::BackupReader;
use rusqlite::Connection;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const V1_CONFIG: &str = "filter-types:\n  noun: false\n";

const V1_LEXICON: &str = "\
id: legacy
name: Legacy
words:
- id: 1
  word: Haus
  pronunciation: haʊ̯s
  translations:
  - house
  examples: []
  types:
    noun: true
  references: []
";

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, body) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

#[test]
fn test_proof_of_content_scenarios() {
    let dir = TempDir::new().unwrap();
    let config_only = dir.path().join("config-only.zip");
    write_zip(&config_only, &[("config.yaml", "version: 2\n")]);
    assert!(!BackupReader::proof_of_content(&config_only));

    let full = dir.path().join("full.zip");
    write_zip(
        &full,
        &[
            ("config.yaml", "version: 2\n"),
            ("lexicons/abc.yaml", "id: abc\nname: A\nwords: []\n"),
        ],
    );
    assert!(BackupReader::proof_of_content(&full));
}

#[test]
fn test_invalid_archive_leaves_store_alone() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path().join("data")).unwrap();
    let id = db.lexicons_mut().add("Mine").unwrap().id().clone();

    let bad = dir.path().join("config-only.zip");
    write_zip(&bad, &[("config.yaml", "version: 2\n")]);
    assert!(matches!(
        db.import_backup(&bad),
        Err(LexiError::InvalidArchive(_))
    ));
    assert!(db.lexicon(&id).is_ok());
    assert!(db.state().paths.lexicon_file(&id).exists());
}

#[test]
fn test_archive_with_unreadable_version_is_refused_before_wiping() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path().join("data")).unwrap();
    let id = db.lexicons_mut().add("Mine").unwrap().id().clone();

    for version in ["two", "4294967298"] {
        let archive = dir.path().join(format!("bad-{version}.zip"));
        let config = format!("version: {version}\nword-types: []\nenabled-types: []\n");
        write_zip(
            &archive,
            &[
                ("config.yaml", config.as_str()),
                ("lexicons/x.yaml", "id: x\nname: X\nwords: []\n"),
            ],
        );
        assert!(matches!(
            db.import_backup(&archive),
            Err(LexiError::InvalidArchive(_))
        ));
        assert!(db.state().paths.lexicon_file(&id).exists());
        assert_eq!(db.lexicons().len(), 1);
    }

    db.lexicon_mut(&id).unwrap().rename("Still mine").unwrap();
    drop(db);
    let db = Lexi::open(dir.path().join("data")).unwrap();
    assert_eq!(db.lexicon(&id).unwrap().name(), "Still mine");
}

#[test]
fn test_export_then_import_elsewhere() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("backup.zip");

    let mut source = Lexi::open(dir.path().join("src")).unwrap();
    source.config_mut().add_word_type("Gerund").unwrap();
    let id = source.lexicons_mut().add("Deutsch").unwrap().id().clone();
    let lexicon = source.lexicon_mut(&id).unwrap();
    let hund = lexicon
        .add_word(NewWord::new("Hund").with_translation("dog"))
        .unwrap();
    let katze = lexicon.add_word(NewWord::new("Katze")).unwrap();
    lexicon.word_mut(katze).unwrap().add_reference(hund).unwrap();
    let info = source.export_backup(&archive).unwrap();
    assert_eq!(info.lexicon_count, 1);

    let mut target = Lexi::open(dir.path().join("dst")).unwrap();
    let report = target.import_backup(&archive).unwrap();
    assert!(!report.version_mismatch());
    assert!(target
        .config()
        .word_types()
        .contains(&"Gerund".to_string()));
    let restored = target.lexicon(&id).unwrap();
    assert_eq!(restored.referrers(hund).len(), 1);
    assert_eq!(restored.document(), source.lexicon(&id).unwrap().document());
}

#[test]
fn test_legacy_store_is_migrated_on_open() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("lexicons")).unwrap();
    fs::write(dir.path().join("config.yaml"), V1_CONFIG).unwrap();
    fs::write(dir.path().join("lexicons").join("legacy.yaml"), V1_LEXICON).unwrap();

    let db = Lexi::open(dir.path()).unwrap();
    assert_eq!(db.migration().applied, vec![2]);
    assert_eq!(db.config().version(), 2);
    let lexicon = db.lexicon(&"legacy".into()).unwrap();
    let haus = lexicon.word(WordId(1)).unwrap();
    assert_eq!(haus.types, vec!["Noun"]);
    assert!(haus.tags.is_empty());
    drop(db);

    let config_before = fs::read(dir.path().join("config.yaml")).unwrap();
    let db = Lexi::open(dir.path()).unwrap();
    assert!(db.migration().is_noop());
    assert_eq!(fs::read(dir.path().join("config.yaml")).unwrap(), config_before);
}

#[test]
fn test_importing_legacy_archive_flags_restart_and_migrates() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("old.zip");
    write_zip(
        &archive,
        &[
            ("config.yaml", V1_CONFIG),
            ("lexicons/", ""),
            ("lexicons/legacy.yaml", V1_LEXICON),
        ],
    );

    let mut db = Lexi::open(dir.path().join("data")).unwrap();
    let report = db.import_backup(&archive).unwrap();
    assert_eq!(report.found_version, 1);
    assert!(report.needs_restart());

    assert_eq!(db.config().version(), 2);
    let config: ConfigDocument =
        serde_yaml::from_str(&fs::read_to_string(db.state().paths.config_file()).unwrap())
            .unwrap();
    assert_eq!(config.version, 2);
    let doc: LexiconDocument = serde_yaml::from_str(
        &fs::read_to_string(db.state().paths.lexicons_dir().join("legacy.yaml")).unwrap(),
    )
    .unwrap();
    assert_eq!(doc.words[0].types, vec!["Noun"]);
}

#[test]
fn test_newer_store_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("lexicons")).unwrap();
    fs::write(dir.path().join("config.yaml"), "version: 3\n").unwrap();
    let err = Lexi::open(dir.path()).unwrap_err();
    assert!(matches!(err, LexiError::VersionMismatch { expected: 2, found: 3 }));
    assert!(!err.is_fatal());
}

#[test]
fn test_memorado_export_is_lossy_projection() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path().join("data")).unwrap();
    let id = db.lexicons_mut().add("Hebrew").unwrap().id().clone();
    let lexicon = db.lexicon_mut(&id).unwrap();
    let shalom = lexicon
        .add_word(NewWord::new("&rtlשלום").with_translation("hello"))
        .unwrap();
    lexicon.word_mut(shalom).unwrap().add_translation("peace").unwrap();
    lexicon.word_mut(shalom).unwrap().add_tag("greeting").unwrap();

    let target = dir.path().join("memorado.db");
    let info = db.export_flashcards(&target).unwrap();
    assert_eq!((info.deck_count, info.card_count), (1, 1));

    let conn = Connection::open(&target).unwrap();
    let (front, back): (String, String) = conn
        .query_row("SELECT front, back FROM cards", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(front, "שלום");
    assert_eq!(back, "hello, peace");
    let name: String = conn
        .query_row("SELECT name FROM decks", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Hebrew");
}
