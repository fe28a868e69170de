//! Lexicon repository
//!
//! Owns every open [`Lexicon`]. Populated once by scanning the lexicons
//! directory; after that the in-memory list is the source of truth.
//!
//! Removing a lexicon does not clear anything a caller may still hold
//! about it (a "current lexicon" selection, for example).

use crate::lexicon::Lexicon;
use crate::settings::AutosaveSwitch;
use crate::state::AppState;
use lexi_core::search;
use lexi_core::{LexiError, LexiResult, LexiconDocument, LexiconId};
use lexi_storage::DataPaths;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// The set of open lexicons
#[derive(Debug)]
pub struct LexiconRepository {
    paths: DataPaths,
    autosave: AutosaveSwitch,
    lexicons: Vec<Lexicon>,
    trashed: HashSet<LexiconId>,
}

impl LexiconRepository {
    /// Open every lexicon document in the data directory
    pub fn load(state: &AppState) -> LexiResult<Self> {
        let mut lexicons = Vec::new();
        for path in state.paths.list_lexicon_files()? {
            let lexicon = Lexicon::open(path, state.autosave.clone())?;
            debug!(target: "lexi::repo", lexicon = %lexicon.id(), words = lexicon.len(), "Lexicon loaded");
            lexicons.push(lexicon);
        }
        info!(target: "lexi::repo", count = lexicons.len(), "Lexicons loaded");
        Ok(Self {
            paths: state.paths.clone(),
            autosave: state.autosave.clone(),
            lexicons,
            trashed: HashSet::new(),
        })
    }

    /// Live lexicons, in load/creation order
    pub fn list(&self) -> impl Iterator<Item = &Lexicon> + '_ {
        self.lexicons
            .iter()
            .filter(move |l| !self.trashed.contains(l.id()))
    }

    /// Mutable access to every live lexicon
    pub fn list_mut(&mut self) -> impl Iterator<Item = &mut Lexicon> + '_ {
        let trashed = &self.trashed;
        self.lexicons
            .iter_mut()
            .filter(move |l| !trashed.contains(l.id()))
    }

    /// Number of live lexicons
    pub fn len(&self) -> usize {
        self.list().count()
    }

    /// Whether there are no live lexicons
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a lexicon and write its document
    ///
    /// Ids are regenerated until no document with that id exists on disk.
    pub fn add(&mut self, name: &str) -> LexiResult<&mut Lexicon> {
        let lexicon = loop {
            let id = LexiconId::generate();
            let path = self.paths.lexicon_file(&id);
            if path.exists() {
                continue;
            }
            match Lexicon::create(path, id, name, self.autosave.clone()) {
                Ok(lexicon) => break lexicon,
                Err(LexiError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e),
            }
        };
        info!(target: "lexi::repo", lexicon = %lexicon.id(), name = %lexicon.name(), "Lexicon created");
        self.lexicons.push(lexicon);
        let last = self.lexicons.len() - 1;
        Ok(&mut self.lexicons[last])
    }

    /// Look up a live lexicon
    pub fn get(&self, id: &LexiconId) -> Option<&Lexicon> {
        if self.trashed.contains(id) {
            return None;
        }
        self.lexicons.iter().find(|l| l.id() == id)
    }

    /// Look up a live lexicon for mutation
    pub fn get_mut(&mut self, id: &LexiconId) -> Option<&mut Lexicon> {
        if self.trashed.contains(id) {
            return None;
        }
        self.lexicons.iter_mut().find(|l| l.id() == id)
    }

    /// Delete, close and evict a lexicon
    ///
    /// Returns the document as it was held in memory. The backing file goes
    /// first; if that fails the lexicon stays in the repository.
    pub fn remove(&mut self, id: &LexiconId) -> LexiResult<LexiconDocument> {
        let index = self
            .lexicons
            .iter()
            .position(|l| l.id() == id)
            .ok_or_else(|| LexiError::not_found(format!("lexicon {id}")))?;
        match std::fs::remove_file(self.lexicons[index].path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(target: "lexi::repo", lexicon = %id, "Lexicon file already gone");
            }
            Err(e) => return Err(e.into()),
        }
        let lexicon = self.lexicons.remove(index);
        self.trashed.remove(id);
        let doc = lexicon.close()?;
        info!(target: "lexi::repo", lexicon = %id, "Lexicon deleted");
        Ok(doc)
    }

    /// Hide a lexicon until [`LexiconRepository::restore`] or
    /// [`LexiconRepository::sweep`]
    pub fn trash(&mut self, id: &LexiconId) -> LexiResult<()> {
        if self.get(id).is_none() {
            return Err(LexiError::not_found(format!("lexicon {id}")));
        }
        self.trashed.insert(id.clone());
        debug!(target: "lexi::repo", lexicon = %id, "Lexicon trashed");
        Ok(())
    }

    /// Bring back a trashed lexicon
    pub fn restore(&mut self, id: &LexiconId) -> LexiResult<()> {
        if !self.trashed.remove(id) {
            return Err(LexiError::not_found(format!("trashed lexicon {id}")));
        }
        Ok(())
    }

    /// Whether the lexicon is trashed and waiting for a sweep
    pub fn is_trashed(&self, id: &LexiconId) -> bool {
        self.trashed.contains(id)
    }

    /// Delete every trashed lexicon, and trashed words in the live ones
    ///
    /// Returns the ids of the deleted lexicons.
    pub fn sweep(&mut self) -> LexiResult<Vec<LexiconId>> {
        let mut ids: Vec<LexiconId> = self.trashed.iter().cloned().collect();
        ids.sort();
        for id in &ids {
            self.remove(id)?;
        }
        for lexicon in self.lexicons.iter_mut() {
            lexicon.sweep()?;
        }
        Ok(ids)
    }

    /// Save every lexicon with unsaved changes; returns how many were saved
    pub fn save_all(&mut self) -> LexiResult<usize> {
        let mut saved = 0;
        for lexicon in self.lexicons.iter_mut().filter(|l| l.is_dirty()) {
            lexicon.save()?;
            saved += 1;
        }
        Ok(saved)
    }

    /// Close every handle and empty the repository
    ///
    /// Unsaved changes are dropped.
    pub fn release(&mut self) -> LexiResult<()> {
        self.trashed.clear();
        for lexicon in self.lexicons.drain(..) {
            lexicon.close()?;
        }
        Ok(())
    }

    /// Live lexicons ordered by lowercased name
    pub fn sorted_by_name(&self) -> Vec<&Lexicon> {
        let mut lexicons: Vec<&Lexicon> = self.list().collect();
        lexicons.sort_by_key(|l| l.name().to_lowercase());
        lexicons
    }

    /// Live lexicons whose name matches `query`, ordered by name
    pub fn filter(&self, query: &str) -> Vec<&Lexicon> {
        self.sorted_by_name()
            .into_iter()
            .filter(|l| search::matches_lexicon(l.name(), query))
            .collect()
    }

    /// Backing files of the live lexicons
    pub fn live_files(&self) -> Vec<PathBuf> {
        self.list().map(|l| l.path().to_path_buf()).collect()
    }
}
