//! Persistence policy, reference integrity and document round trips

use lexi::{LexiError, Lexi, LexiconDocument, LexiconId, NewWord, WordId};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

fn on_disk(db: &Lexi, id: &LexiconId) -> LexiconDocument {
    let text = fs::read_to_string(db.state().paths.lexicon_file(id)).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

fn spanish(db: &mut Lexi) -> (LexiconId, WordId) {
    let id = db.lexicons_mut().add("Spanish").unwrap().id().clone();
    let gato = db
        .lexicon_mut(&id)
        .unwrap()
        .add_word(NewWord::new("gato").with_translation("cat"))
        .unwrap();
    (id, gato)
}

#[test]
fn test_autosave_off_waits_for_explicit_save() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    let (id, gato) = spanish(&mut db);

    db.set_autosave(false).unwrap();
    let before = fs::read(db.state().paths.lexicon_file(&id)).unwrap();
    db.lexicon_mut(&id)
        .unwrap()
        .word_mut(gato)
        .unwrap()
        .add_translation("kitty")
        .unwrap();
    assert_eq!(fs::read(db.state().paths.lexicon_file(&id)).unwrap(), before);

    assert_eq!(db.save_all().unwrap(), 1);
    assert_eq!(on_disk(&db, &id).words[0].translations, vec!["cat", "kitty"]);
}

#[test]
fn test_autosave_on_writes_before_returning() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    let (id, gato) = spanish(&mut db);

    db.lexicon_mut(&id)
        .unwrap()
        .word_mut(gato)
        .unwrap()
        .add_translation("kitty")
        .unwrap();
    assert_eq!(on_disk(&db, &id).words[0].translations, vec!["cat", "kitty"]);
}

#[test]
fn test_unsaved_changes_are_lost_without_close() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    db.set_autosave(false).unwrap();
    let (id, _) = spanish(&mut db);
    drop(db);

    let db = Lexi::open(dir.path()).unwrap();
    assert!(db.lexicon(&id).unwrap().is_empty());
}

#[test]
fn test_deleted_word_leaves_no_references() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    let (id, gato) = spanish(&mut db);
    let lexicon = db.lexicon_mut(&id).unwrap();
    let others: Vec<WordId> = (0..5)
        .map(|i| lexicon.add_word(NewWord::new(format!("w{i}"))).unwrap())
        .collect();
    for w in &others {
        lexicon.word_mut(*w).unwrap().add_reference(gato).unwrap();
    }
    lexicon.trash_word(others[0]).unwrap();

    lexicon.remove_word(gato).unwrap();
    assert_eq!(lexicon.ref_count(gato), 0);
    lexicon.restore_word(others[0]).unwrap();
    for word in on_disk(&db, &id).words {
        assert!(!word.references_word(gato), "word {} still references", word.id);
    }
}

#[test]
fn test_self_reference_never_lands() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    let (id, gato) = spanish(&mut db);
    let lexicon = db.lexicon_mut(&id).unwrap();
    assert!(matches!(
        lexicon.word_mut(gato).unwrap().add_reference(gato),
        Err(LexiError::AlreadyExists(_))
    ));
    assert!(lexicon.word(gato).unwrap().references.is_empty());
    assert!(lexicon.reference_candidates(gato).unwrap().is_empty());
}

#[test]
fn test_save_of_load_is_stable() {
    let dir = TempDir::new().unwrap();
    let mut db = Lexi::open(dir.path()).unwrap();
    let (id, gato) = spanish(&mut db);
    let lexicon = db.lexicon_mut(&id).unwrap();
    let perro = lexicon.add_word(NewWord::new("perro")).unwrap();
    lexicon
        .word_mut(gato)
        .unwrap()
        .set_pronunciation("ˈɡato")
        .unwrap()
        .add_type("Noun")
        .unwrap()
        .add_tag("mascota")
        .unwrap()
        .add_reference(perro)
        .unwrap()
        .add_example("El gato duerme.")
        .unwrap();
    let doc = lexicon.document().clone();
    db.close().unwrap();

    let mut db = Lexi::open(dir.path()).unwrap();
    let first = fs::read(db.state().paths.lexicon_file(&id)).unwrap();
    assert_eq!(db.lexicon(&id).unwrap().document(), &doc);
    db.lexicon_mut(&id).unwrap().save().unwrap();
    db.lexicon_mut(&id).unwrap().save().unwrap();
    assert_eq!(fs::read(db.state().paths.lexicon_file(&id)).unwrap(), first);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_tag_case_variants_are_duplicates(tag in "[a-zA-Z][a-zA-Z0-9_-]{0,11}") {
        let dir = TempDir::new().unwrap();
        let mut db = Lexi::open(dir.path()).unwrap();
        db.set_autosave(false).unwrap();
        let (id, gato) = spanish(&mut db);
        let lexicon = db.lexicon_mut(&id).unwrap();

        lexicon.word_mut(gato).unwrap().add_tag(&tag).unwrap();
        let upper = tag.to_uppercase();
        let mut word = lexicon.word_mut(gato).unwrap();
        let duplicate = word.add_tag(&upper);
        prop_assert!(matches!(duplicate, Err(LexiError::AlreadyExists(_))));
        prop_assert_eq!(lexicon.word(gato).unwrap().tags.clone(), vec![tag.to_lowercase()]);
    }
}
