//! An editing session: the forest plus everything that travels with it.
//!
//! Each user intent maps to one engine call followed by a save. Saving is
//! fire-and-forget: a failed save is logged and kept for
//! [`Session::ensure_saved`], and the in-memory state stays
//! authoritative.

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::outline::engine::DropPosition;
use crate::outline::model::{Forest, IdCounter, NodeId, ViewState};
use crate::outline::snapshot::{Restored, Snapshot, SnapshotError};
use crate::parser::outline::{self, IndentStyle};
use crate::store::Store;

/// Failures at the import/export boundary. The session is unchanged when
/// any of these is returned.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("no nodes could be parsed from the text")]
    NoNodes,

    #[error("there is no data to export")]
    NothingToExport,

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub struct Session<S: Store> {
    forest: Forest,
    ids: IdCounter,
    view: ViewState,
    selected: Option<NodeId>,
    store: S,
    /// Most recent save failure, until [`Session::ensure_saved`] reports it.
    save_error: Option<anyhow::Error>,
}

impl<S: Store> Session<S> {
    /// Start from whatever `store` holds, or from an empty forest.
    pub fn open(store: S) -> Result<Self> {
        let restored = match store.load()? {
            Some(snapshot) => snapshot.restore(),
            None => Restored {
                forest: Forest::new(),
                ids: IdCounter::new(),
                view: ViewState::new(),
                selected: None,
            },
        };
        debug!(nodes = restored.forest.len(), next_id = restored.ids.peek(), "session opened");
        Ok(Self {
            forest: restored.forest,
            ids: restored.ids,
            view: restored.view,
            selected: restored.selected,
            store,
            save_error: None,
        })
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn next_id(&self) -> NodeId {
        self.ids.peek()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.forest, &self.ids, &self.view, self.selected)
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Select `id`, or clear the selection with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<NodeId>) -> bool {
        if id.is_some_and(|id| !self.forest.contains(id)) || id == self.selected {
            return false;
        }
        self.selected = id;
        self.persist();
        true
    }

    /// Add a root node. Blank titles are rejected before the engine is called.
    pub fn add_root(&mut self, title: &str) -> Option<NodeId> {
        let title = non_blank(title)?;
        let id = self.forest.insert_root(&mut self.ids, title).id;
        self.persist();
        Some(id)
    }

    pub fn add_child(&mut self, parent: NodeId, title: &str) -> Option<NodeId> {
        let title = non_blank(title)?;
        let id = self
            .forest
            .insert_child(&mut self.ids, &mut self.view, parent, title)?
            .id;
        self.persist();
        Some(id)
    }

    pub fn rename(&mut self, id: NodeId, title: &str) -> bool {
        let Some(title) = non_blank(title) else {
            return false;
        };
        let Some(node) = self.forest.find_by_id_mut(id) else {
            return false;
        };
        node.rename(title);
        self.persist();
        true
    }

    /// `None` is a cancelled edit: nothing changes and nothing is saved.
    pub fn edit_content(&mut self, id: NodeId, content: Option<&str>) -> bool {
        let Some(content) = content else {
            return false;
        };
        let Some(node) = self.forest.find_by_id_mut(id) else {
            return false;
        };
        node.set_content(Some(content));
        self.persist();
        true
    }

    /// Delete `id` with its subtree. Clears the selection if it was removed.
    pub fn delete(&mut self, id: NodeId) -> bool {
        let Some(removed) = self.forest.delete_subtree(id, &mut self.view) else {
            return false;
        };
        if self
            .selected
            .is_some_and(|sel| removed.subtree_ids().contains(&sel))
        {
            self.selected = None;
        }
        self.persist();
        true
    }

    pub fn toggle_open(&mut self, id: NodeId) -> bool {
        if !self.forest.contains(id) {
            return false;
        }
        self.view.toggle_open(id);
        self.persist();
        true
    }

    pub fn toggle_content_visible(&mut self, id: NodeId) -> bool {
        if !self.forest.contains(id) {
            return false;
        }
        self.view.toggle_content_visible(id);
        self.persist();
        true
    }

    pub fn relocate(&mut self, dragged: NodeId, target: NodeId, position: DropPosition) -> bool {
        if !self
            .forest
            .relocate(dragged, target, position, &mut self.view)
        {
            return false;
        }
        self.persist();
        true
    }

    pub fn breadcrumb(&self, id: NodeId) -> Option<Vec<&str>> {
        self.forest.breadcrumb(id)
    }

    // -----------------------------------------------------------------------
    // Import / export
    // -----------------------------------------------------------------------

    /// Replace the forest with parsed indented text.
    ///
    /// Open state and selection are reset; the id counter keeps running so
    /// new ids never collide with ones already handed out.
    pub fn import_text(&mut self, text: &str) -> Result<usize, TransferError> {
        let mut ids = self.ids;
        let forest = outline::parse(text, &mut ids);
        if forest.is_empty() {
            return Err(TransferError::NoNodes);
        }
        let count = forest.len();
        self.forest = forest;
        self.ids = ids;
        self.view.clear();
        self.selected = None;
        info!(nodes = count, "imported indented text");
        self.persist();
        Ok(count)
    }

    /// Replace the whole session with a validated JSON snapshot.
    pub fn import_json(&mut self, text: &str) -> Result<usize, TransferError> {
        let restored = Snapshot::from_json(text)?.restore();
        let count = restored.forest.len();
        self.forest = restored.forest;
        self.ids = restored.ids;
        self.view = restored.view;
        self.selected = restored.selected;
        info!(nodes = count, "imported snapshot");
        self.persist();
        Ok(count)
    }

    pub fn export_text(&self, style: IndentStyle) -> Result<String, TransferError> {
        if self.forest.is_empty() {
            return Err(TransferError::NothingToExport);
        }
        Ok(outline::serialize_with(&self.forest, style))
    }

    pub fn export_json(&self) -> Result<String, TransferError> {
        Ok(self.snapshot().to_json()?)
    }

    /// Fails with the latest save error since the last call, if any.
    /// A later successful save does not clear it.
    pub fn ensure_saved(&mut self) -> Result<()> {
        match self.save_error.take() {
            Some(err) => Err(err.context("changes were not saved")),
            None => Ok(()),
        }
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        if let Err(err) = self.store.save(&snapshot) {
            warn!("failed to save session: {err:#}");
            self.save_error = Some(err);
        }
    }
}

fn non_blank(title: &str) -> Option<&str> {
    let title = title.trim();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> Session<MemoryStore> {
        Session::open(MemoryStore::new()).unwrap()
    }

    /// `[A[B, C]]` with ids 1, 2, 3.
    fn abc() -> Session<MemoryStore> {
        let mut s = session();
        let a = s.add_root("A").unwrap();
        s.add_child(a, "B").unwrap();
        s.add_child(a, "C").unwrap();
        s
    }

    struct BrokenStore;

    impl Store for BrokenStore {
        fn load(&self) -> Result<Option<Snapshot>> {
            Ok(None)
        }

        fn save(&mut self, _: &Snapshot) -> Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn every_mutation_saves() {
        let mut s = abc();
        assert_eq!(s.store().save_count(), 3);
        s.rename(2, "Bee");
        s.toggle_content_visible(2);
        assert_eq!(s.store().save_count(), 5);
        let saved = s.store().last_saved().unwrap();
        assert_eq!(saved.nodes[0].children[0].title, "Bee");
        assert!(saved.nodes[0].children[0].content_visible);
    }

    #[test]
    fn reopen_from_store_restores_everything() {
        let mut s = abc();
        s.select(Some(3));
        s.edit_content(3, Some("details"));
        let store = MemoryStore::with_snapshot(s.snapshot());
        let reopened = Session::open(store).unwrap();
        assert_eq!(reopened.forest(), s.forest());
        assert_eq!(reopened.selected(), Some(3));
        assert_eq!(reopened.next_id(), 4);
        assert!(reopened.view().is_open(1));
    }

    #[test]
    fn blank_titles_are_rejected_without_consuming_ids() {
        let mut s = abc();
        assert_eq!(s.add_root("   "), None);
        assert_eq!(s.add_child(1, ""), None);
        assert!(!s.rename(1, "  "));
        assert_eq!(s.next_id(), 4);
        assert_eq!(s.forest().find_by_id(1).unwrap().title, "A");
    }

    #[test]
    fn cancelled_content_edit_changes_and_saves_nothing() {
        let mut s = abc();
        let saves = s.store().save_count();
        assert!(!s.edit_content(2, None));
        assert_eq!(s.forest().find_by_id(2).unwrap().content, "Content of B.");
        assert_eq!(s.store().save_count(), saves);
        assert!(s.edit_content(2, Some("")));
        assert_eq!(s.forest().find_by_id(2).unwrap().content, "");
    }

    #[test]
    fn delete_clears_selection_inside_removed_subtree() {
        let mut s = abc();
        s.select(Some(3));
        assert!(s.delete(1));
        assert_eq!(s.selected(), None);
        assert!(s.forest().is_empty());
        assert!(s.view().open.is_empty());
    }

    #[test]
    fn delete_keeps_unrelated_selection() {
        let mut s = abc();
        s.select(Some(2));
        assert!(s.delete(3));
        assert_eq!(s.selected(), Some(2));
    }

    #[test]
    fn select_ignores_unknown_ids() {
        let mut s = abc();
        assert!(!s.select(Some(42)));
        assert_eq!(s.selected(), None);
        assert!(s.select(Some(1)));
        assert!(s.select(None));
    }

    #[test]
    fn relocate_saves_only_when_moved() {
        let mut s = abc();
        let saves = s.store().save_count();
        assert!(!s.relocate(1, 3, DropPosition::Inside));
        assert_eq!(s.store().save_count(), saves);
        assert!(s.relocate(2, 3, DropPosition::After));
        assert_eq!(s.store().save_count(), saves + 1);
        let kids: Vec<&str> = s.forest().roots[0]
            .children
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(kids, vec!["C", "B"]);
    }

    #[test]
    fn import_text_replaces_forest_and_keeps_counter_running() {
        let mut s = abc();
        s.select(Some(2));
        let count = s.import_text("X\n\tY\n").unwrap();
        assert_eq!(count, 2);
        assert_eq!(s.selected(), None);
        assert!(s.view().open.is_empty());
        let ids: Vec<NodeId> = s.forest().walk().map(|(_, n)| n.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(s.add_root("Z"), Some(6));
    }

    #[test]
    fn empty_text_import_is_rejected_and_state_kept() {
        let mut s = abc();
        let before = s.forest().clone();
        let err = s.import_text("\n   \n").unwrap_err();
        assert!(matches!(err, TransferError::NoNodes));
        assert_eq!(s.forest(), &before);
        assert_eq!(s.next_id(), 4);
    }

    #[test]
    fn malformed_json_import_is_rejected_and_state_kept() {
        let mut s = abc();
        let before = s.forest().clone();
        let err = s.import_json(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Snapshot(SnapshotError::MissingField("openNodes"))
        ));
        assert_eq!(s.forest(), &before);
    }

    #[test]
    fn json_export_import_roundtrip() {
        let mut s = abc();
        s.edit_content(2, Some("b body"));
        s.toggle_content_visible(2);
        let json = s.export_json().unwrap();

        let mut other = session();
        assert_eq!(other.import_json(&json).unwrap(), 3);
        assert_eq!(other.forest(), s.forest());
        assert_eq!(other.view(), s.view());
        assert_eq!(other.next_id(), s.next_id());
    }

    #[test]
    fn text_export_refuses_empty_forest() {
        let s = session();
        assert!(matches!(
            s.export_text(IndentStyle::Tab),
            Err(TransferError::NothingToExport)
        ));
        assert_eq!(abc().export_text(IndentStyle::Tab).unwrap(), "A\n\tB\n\tC\n");
    }

    #[test]
    fn failed_saves_do_not_block_mutations() {
        let mut s = Session::open(BrokenStore).unwrap();
        let a = s.add_root("A").unwrap();
        let b = s.add_child(a, "B").unwrap();
        assert!(s.rename(b, "Bee"));
        assert_eq!(s.forest().find_by_id(b).unwrap().title, "Bee");
        let err = s.ensure_saved().unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
        assert!(s.ensure_saved().is_ok());
    }

    #[test]
    fn ensure_saved_passes_after_clean_saves() {
        let mut s = abc();
        assert!(s.ensure_saved().is_ok());
    }

    #[test]
    fn breadcrumb_follows_ancestors() {
        let s = abc();
        assert_eq!(s.breadcrumb(3), Some(vec!["A", "C"]));
    }
}
