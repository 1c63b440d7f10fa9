//! Persistence providers for session snapshots.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::outline::snapshot::Snapshot;

/// Where a session loads its snapshot from and saves it to.
pub trait Store {
    /// The stored snapshot, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let snapshot = Snapshot::from_json(&text)
            .with_context(|| format!("corrupt snapshot in {}", self.path.display()))?;
        debug!(path = %self.path.display(), roots = snapshot.nodes.len(), "loaded snapshot");
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), "saved snapshot");
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory. Used by demo sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saved: Option<Snapshot>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Some(snapshot),
            saves: 0,
        }
    }

    #[cfg(test)]
    pub fn last_saved(&self) -> Option<&Snapshot> {
        self.saved.as_ref()
    }

    #[cfg(test)]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.saved = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::model::{Forest, IdCounter, ViewState};
    use tempfile::TempDir;

    fn snapshot() -> Snapshot {
        let mut forest = Forest::new();
        let mut ids = IdCounter::new();
        forest.insert_root(&mut ids, "Inbox");
        Snapshot::capture(&forest, &ids, &ViewState::new(), None)
    }

    #[test]
    fn file_store_missing_file_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("state.json"));
        let snap = snapshot();
        store.save(&snap).unwrap();
        assert_eq!(store.load().unwrap(), Some(snap));
    }

    #[test]
    fn file_store_reports_corrupt_file_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{\"nodes\": 3}").unwrap();
        let err = FileStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("state.json"), "got: {err:#}");
    }

    #[test]
    fn file_store_save_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nope/state.json"));
        assert!(store.save(&snapshot()).is_err());
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&snapshot()).unwrap();
        store.save(&snapshot()).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.last_saved(), Some(&snapshot()));
    }
}
