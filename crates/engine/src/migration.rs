//! Schema migration
//!
//! The config `version` says which schema the data directory is in. A
//! config without `version` is version 1. Steps are keyed by the version
//! they produce; upgrading from `N` to `latest` runs every step
//! `N + 1 ..= latest` in order and writes the config after each one, so an
//! interrupted run resumes at the first step that did not finish.
//!
//! Steps work on raw [`serde_yaml::Value`] trees since the old shapes do
//! not deserialize into the current records. Each step checks the shape
//! before it transforms, which makes reapplying it a no-op.

use crate::state::AppState;
use lexi_core::{default_word_types, LexiError, LexiResult, CONFIG_VERSION};
use lexi_storage::{schema_version, RecordStore};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One upgrade step; receives the config tree and may rewrite lexicon files
pub type MigrationStep = fn(&AppState, &mut Value) -> LexiResult<()>;

/// Outcome of [`Migrator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version found on disk
    pub from: u32,
    /// Version after the run
    pub to: u32,
    /// Steps applied, in order
    pub applied: Vec<u32>,
}

impl MigrationReport {
    /// Whether nothing had to be done
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Ordered set of upgrade steps
#[derive(Debug, Clone)]
pub struct Migrator {
    latest: u32,
    steps: BTreeMap<u32, MigrationStep>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Migrator {
    /// The steps shipped with this build
    pub fn new() -> Self {
        let mut steps: BTreeMap<u32, MigrationStep> = BTreeMap::new();
        steps.insert(2, migrate_v2);
        Self {
            latest: CONFIG_VERSION,
            steps,
        }
    }

    /// A migrator with a custom step table
    pub fn with_steps(latest: u32, steps: BTreeMap<u32, MigrationStep>) -> Self {
        Self { latest, steps }
    }

    /// Version the steps lead to
    pub fn latest(&self) -> u32 {
        self.latest
    }

    /// Bring the data directory up to [`Migrator::latest`]
    ///
    /// # Errors
    ///
    /// - `VersionMismatch` if the config is newer than `latest`
    /// - `MigratorNotFound` if any required step is missing; checked
    ///   before anything is written
    pub fn run(&self, state: &AppState) -> LexiResult<MigrationReport> {
        let mut store = RecordStore::open(state.paths.config_file())?;
        let mut config = store.load_value()?;
        let from = read_version(&config)?;

        if from > self.latest {
            return Err(LexiError::VersionMismatch {
                expected: self.latest,
                found: from,
            });
        }

        for version in (from + 1)..=self.latest {
            if !self.steps.contains_key(&version) {
                return Err(LexiError::MigratorNotFound { version });
            }
        }

        let mut applied = Vec::new();
        if from == self.latest {
            debug!(target: "lexi::migrate", version = from, "Schema up to date");
        } else {
            for (version, step) in self.steps.range((from + 1)..=self.latest) {
                info!(target: "lexi::migrate", from = version - 1, to = *version, "Migration step started");
                step(state, &mut config)?;
                set_version(&mut config, *version)?;
                store.save(&config)?;
                applied.push(*version);
                info!(target: "lexi::migrate", version = *version, "Migration step completed");
            }
        }
        store.close()?;

        Ok(MigrationReport {
            from,
            to: applied.last().copied().unwrap_or(from),
            applied,
        })
    }
}

/// Schema version of a config tree; absent means 1
pub fn read_version(config: &Value) -> LexiResult<u32> {
    schema_version(config)
}

fn set_version(config: &mut Value, version: u32) -> LexiResult<()> {
    root_mapping(config)?.insert(Value::from("version"), Value::from(version));
    Ok(())
}

fn root_mapping(value: &mut Value) -> LexiResult<&mut Mapping> {
    value
        .as_mapping_mut()
        .ok_or_else(|| LexiError::parse("document root is not a mapping"))
}

// =============================================================================
// v2: free-form word types and tags
// =============================================================================

/// Upgrade a v1 data directory to v2
///
/// Config: drops `filter-types`, seeds `word-types` and `enabled-types`
/// when absent. Lexicons: a `types` mapping of `type: bool` becomes the
/// list of types set to true, and every word gets `tags: []` if it has
/// none. Only lexicon files that change are rewritten.
pub fn migrate_v2(state: &AppState, config: &mut Value) -> LexiResult<()> {
    let root = root_mapping(config)?;
    if root.remove("filter-types").is_some() {
        debug!(target: "lexi::migrate", "Dropped filter-types");
    }
    if !root.contains_key("word-types") {
        let types = default_word_types().into_iter().map(Value::from).collect();
        root.insert(Value::from("word-types"), Value::Sequence(types));
    }
    if !root.contains_key("enabled-types") {
        root.insert(Value::from("enabled-types"), Value::Sequence(Vec::new()));
    }

    let vocabulary: Vec<String> = root
        .get("word-types")
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    for path in state.paths.list_lexicon_files()? {
        let mut store = RecordStore::open(&path)?;
        let mut doc = store.load_value()?;
        let changed = migrate_lexicon_v2(&mut doc, &vocabulary);
        if changed > 0 {
            store.save(&doc)?;
            info!(target: "lexi::migrate", file = %path.display(), words = changed, "Lexicon migrated to v2");
        }
        store.close()?;
    }
    Ok(())
}

/// Returns how many words were changed
fn migrate_lexicon_v2(doc: &mut Value, vocabulary: &[String]) -> usize {
    let Some(words) = doc.get_mut("words").and_then(Value::as_sequence_mut) else {
        return 0;
    };
    let mut changed = 0;
    for word in words.iter_mut().filter_map(Value::as_mapping_mut) {
        let mut touched = false;

        let converted = word
            .get("types")
            .and_then(Value::as_mapping)
            .map(|flags| types_from_flags(flags, vocabulary));
        if let Some(types) = converted {
            word.insert(Value::from("types"), types);
            touched = true;
        }

        if !word.contains_key("tags") {
            word.insert(Value::from("tags"), Value::Sequence(Vec::new()));
            touched = true;
        }

        if touched {
            changed += 1;
        }
    }
    changed
}

fn types_from_flags(flags: &Mapping, vocabulary: &[String]) -> Value {
    let types = flags
        .iter()
        .filter(|(_, set)| is_truthy(set))
        .filter_map(|(name, _)| name.as_str())
        .map(|name| {
            vocabulary
                .iter()
                .find(|known| known.eq_ignore_ascii_case(name))
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
        .map(Value::from)
        .collect();
    Value::Sequence(types)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        Value::Tagged(t) => is_truthy(&t.value),
    }
}
