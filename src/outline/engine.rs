//! Structural operations over a [`Forest`].
//!
//! Every operation is total: an id that does not resolve yields `None` or
//! `false` and leaves the forest exactly as it was.

use tracing::debug;

use crate::outline::model::{Forest, IdCounter, Node, NodeId, ViewState};

/// Where a relocated node lands relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
    /// Appended as the target's last child.
    Inside,
}

/// A node together with its immediate parent (`None` for a root).
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub node: &'a Node,
    pub parent: Option<&'a Node>,
}

impl Forest {
    pub fn find_by_id(&self, id: NodeId) -> Option<&Node> {
        self.find_with_parent(id).map(|found| found.node)
    }

    pub fn find_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        find_in_mut(&mut self.roots, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn find_with_parent(&self, id: NodeId) -> Option<Located<'_>> {
        locate(&self.roots, id, None)
    }

    /// `Some(None)` for a root, `Some(Some(parent))` for a nested node.
    pub fn parent_of(&self, id: NodeId) -> Option<Option<NodeId>> {
        self.find_with_parent(id)
            .map(|found| found.parent.map(|p| p.id))
    }

    /// True when `id` sits strictly below `ancestor`.
    ///
    /// Walks upward one parent lookup at a time.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent_of(id).flatten();
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent).flatten();
        }
        false
    }

    /// Titles from the root down to `id`, inclusive.
    pub fn breadcrumb(&self, id: NodeId) -> Option<Vec<&str>> {
        let mut titles = vec![self.find_by_id(id)?.title.as_str()];
        let mut current = self.parent_of(id).flatten();
        while let Some(parent) = current {
            let found = self.find_with_parent(parent)?;
            titles.push(found.node.title.as_str());
            current = found.parent.map(|p| p.id);
        }
        titles.reverse();
        Some(titles)
    }

    /// Append a new root node with a fresh id.
    pub fn insert_root(&mut self, ids: &mut IdCounter, title: &str) -> &Node {
        let node = Node::new(ids.issue(), title);
        debug!(id = node.id, title = %node.title, "insert root");
        let idx = self.roots.len();
        self.roots.push(node);
        &self.roots[idx]
    }

    /// Append a new child under `parent_id` and mark the parent open.
    ///
    /// No id is consumed when the parent does not exist.
    pub fn insert_child(
        &mut self,
        ids: &mut IdCounter,
        view: &mut ViewState,
        parent_id: NodeId,
        title: &str,
    ) -> Option<&Node> {
        let parent = find_in_mut(&mut self.roots, parent_id)?;
        let node = Node::new(ids.issue(), title);
        debug!(id = node.id, parent = parent_id, title = %node.title, "insert child");
        parent.children.push(node);
        view.open.insert(parent_id);
        parent.children.last()
    }

    /// Remove `id` and its whole subtree, wherever it sits.
    ///
    /// Every removed id is dropped from `view` as well.
    pub fn delete_subtree(&mut self, id: NodeId, view: &mut ViewState) -> Option<Node> {
        let removed = self.detach(id)?;
        let gone = removed.subtree_ids();
        view.forget(&gone);
        debug!(id, removed = gone.len(), "delete subtree");
        Some(removed)
    }

    /// Move `dragged` next to or into `target`.
    ///
    /// Returns `false` without touching anything when the ids are equal,
    /// either id is missing, or `target` lies inside `dragged`'s subtree.
    pub fn relocate(
        &mut self,
        dragged: NodeId,
        target: NodeId,
        position: DropPosition,
        view: &mut ViewState,
    ) -> bool {
        if dragged == target || !self.contains(target) {
            return false;
        }
        let Some(origin_parent) = self.parent_of(dragged) else {
            return false;
        };
        if self.is_descendant_of(target, dragged) {
            debug!(dragged, target, "relocate rejected: target inside dragged subtree");
            return false;
        }
        let Some(origin_idx) = self.index_in_parent(dragged, origin_parent) else {
            return false;
        };
        let Some(node) = self.detach(dragged) else {
            return false;
        };

        // Indices are resolved again: detaching may have shifted the target.
        match self.place(node, target, position) {
            Ok(()) => {
                if position == DropPosition::Inside {
                    view.open.insert(target);
                }
                debug!(dragged, target, ?position, "relocate");
                true
            }
            Err(node) => {
                if let Some(siblings) = self.siblings_mut(origin_parent) {
                    let idx = origin_idx.min(siblings.len());
                    siblings.insert(idx, node);
                }
                false
            }
        }
    }

    fn place(&mut self, node: Node, target: NodeId, position: DropPosition) -> Result<(), Node> {
        if position == DropPosition::Inside {
            return match find_in_mut(&mut self.roots, target) {
                Some(target_node) => {
                    target_node.children.push(node);
                    Ok(())
                }
                None => Err(node),
            };
        }
        let Some(target_parent) = self.parent_of(target) else {
            return Err(node);
        };
        let Some(target_idx) = self.index_in_parent(target, target_parent) else {
            return Err(node);
        };
        let Some(siblings) = self.siblings_mut(target_parent) else {
            return Err(node);
        };
        let at = match position {
            DropPosition::Before => target_idx,
            DropPosition::After | DropPosition::Inside => target_idx + 1,
        };
        siblings.insert(at, node);
        Ok(())
    }

    /// Unlink `id` from its containing sequence and hand it back.
    fn detach(&mut self, id: NodeId) -> Option<Node> {
        let parent = self.parent_of(id)?;
        let idx = self.index_in_parent(id, parent)?;
        let siblings = self.siblings_mut(parent)?;
        Some(siblings.remove(idx))
    }

    fn index_in_parent(&self, id: NodeId, parent: Option<NodeId>) -> Option<usize> {
        let siblings = match parent {
            None => &self.roots,
            Some(pid) => &self.find_by_id(pid)?.children,
        };
        siblings.iter().position(|n| n.id == id)
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<Node>> {
        match parent {
            None => Some(&mut self.roots),
            Some(pid) => find_in_mut(&mut self.roots, pid).map(|n| &mut n.children),
        }
    }
}

fn locate<'a>(nodes: &'a [Node], id: NodeId, parent: Option<&'a Node>) -> Option<Located<'a>> {
    for node in nodes {
        if node.id == id {
            return Some(Located { node, parent });
        }
        if let Some(found) = locate(&node.children, id, Some(node)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut(nodes: &mut [Node], id: NodeId) -> Option<&mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `[A[B, C[D]], E]` with ids 1..=5 and a counter at 6.
    fn sample() -> (Forest, IdCounter, ViewState) {
        let mut forest = Forest::new();
        let mut ids = IdCounter::new();
        let mut view = ViewState::new();
        let a = forest.insert_root(&mut ids, "A").id;
        forest.insert_child(&mut ids, &mut view, a, "B");
        let c = forest.insert_child(&mut ids, &mut view, a, "C").unwrap().id;
        forest.insert_child(&mut ids, &mut view, c, "D");
        forest.insert_root(&mut ids, "E");
        (forest, ids, view)
    }

    fn titles(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn find_by_id_reaches_every_depth() {
        let (forest, _, _) = sample();
        assert_eq!(forest.find_by_id(4).map(|n| n.title.as_str()), Some("D"));
        assert_eq!(forest.find_by_id(5).map(|n| n.title.as_str()), Some("E"));
        assert!(forest.find_by_id(99).is_none());
    }

    #[test]
    fn find_with_parent_reports_root_and_nested_parents() {
        let (forest, _, _) = sample();
        let root = forest.find_with_parent(1).unwrap();
        assert!(root.parent.is_none());
        let nested = forest.find_with_parent(4).unwrap();
        assert_eq!(nested.node.title, "D");
        assert_eq!(nested.parent.map(|p| p.id), Some(3));
        assert!(forest.find_with_parent(42).is_none());
    }

    #[test]
    fn insert_root_appends_at_end() {
        let (mut forest, mut ids, _) = sample();
        let id = forest.insert_root(&mut ids, "F").id;
        assert_eq!(id, 6);
        assert_eq!(titles(&forest.roots), vec!["A", "E", "F"]);
    }

    #[test]
    fn insert_child_opens_parent_and_appends_last() {
        let (mut forest, mut ids, mut view) = sample();
        view.open.clear();
        let id = forest
            .insert_child(&mut ids, &mut view, 1, "Z")
            .map(|n| n.id)
            .unwrap();
        assert!(view.is_open(1));
        let parent = forest.find_by_id(1).unwrap();
        assert_eq!(parent.children.last().map(|n| n.id), Some(id));
        assert_eq!(titles(&parent.children), vec!["B", "C", "Z"]);
    }

    #[test]
    fn insert_child_under_missing_parent_consumes_no_id() {
        let (mut forest, mut ids, mut view) = sample();
        let before = forest.clone();
        assert!(forest.insert_child(&mut ids, &mut view, 77, "lost").is_none());
        assert_eq!(ids.peek(), 6);
        assert_eq!(forest, before);
    }

    #[test]
    fn delete_subtree_removes_all_descendants_and_their_view_state() {
        let (mut forest, _, mut view) = sample();
        view.toggle_content_visible(4);
        let removed = forest.delete_subtree(3, &mut view).unwrap();
        assert_eq!(removed.subtree_ids(), vec![3, 4]);
        assert!(forest.find_by_id(3).is_none());
        assert!(forest.find_by_id(4).is_none());
        assert!(!view.is_open(3));
        assert!(!view.is_content_visible(4));
        assert_eq!(titles(&forest.find_by_id(1).unwrap().children), vec!["B"]);
    }

    #[test]
    fn delete_root_subtree() {
        let (mut forest, _, mut view) = sample();
        forest.delete_subtree(1, &mut view);
        assert_eq!(titles(&forest.roots), vec!["E"]);
        assert_eq!(forest.len(), 1);
        assert!(view.open.is_empty());
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let (mut forest, _, mut view) = sample();
        let before = forest.clone();
        assert!(forest.delete_subtree(99, &mut view).is_none());
        assert_eq!(forest, before);
    }

    #[test]
    fn ids_never_repeat_across_delete_and_insert() {
        let (mut forest, mut ids, mut view) = sample();
        forest.delete_subtree(5, &mut view);
        let next = forest.insert_root(&mut ids, "again").id;
        assert_eq!(next, 6);
        forest.delete_subtree(next, &mut view);
        let after = forest.insert_root(&mut ids, "once more").id;
        assert!(after > next);
    }

    #[test]
    fn relocate_onto_itself_is_noop_for_every_position() {
        let (mut forest, _, mut view) = sample();
        let before = forest.clone();
        for position in [DropPosition::Before, DropPosition::After, DropPosition::Inside] {
            assert!(!forest.relocate(3, 3, position, &mut view));
        }
        assert_eq!(forest, before);
    }

    #[test]
    fn relocate_into_own_descendant_is_noop() {
        let (mut forest, _, mut view) = sample();
        let before = forest.clone();
        let view_before = view.clone();
        assert!(!forest.relocate(1, 4, DropPosition::Inside, &mut view));
        assert!(!forest.relocate(1, 2, DropPosition::After, &mut view));
        assert_eq!(forest, before);
        assert_eq!(view, view_before);
    }

    #[test]
    fn relocate_with_missing_ids_is_noop() {
        let (mut forest, _, mut view) = sample();
        let before = forest.clone();
        assert!(!forest.relocate(99, 1, DropPosition::Before, &mut view));
        assert!(!forest.relocate(1, 99, DropPosition::Before, &mut view));
        assert_eq!(forest, before);
    }

    #[test]
    fn relocate_after_sibling_already_after_keeps_order() {
        let (mut forest, _, mut view) = sample();
        assert!(forest.relocate(3, 2, DropPosition::After, &mut view));
        assert_eq!(titles(&forest.find_by_id(1).unwrap().children), vec!["B", "C"]);
    }

    #[test]
    fn relocate_after_later_sibling_swaps() {
        let (mut forest, _, mut view) = sample();
        assert!(forest.relocate(2, 3, DropPosition::After, &mut view));
        assert_eq!(titles(&forest.find_by_id(1).unwrap().children), vec!["C", "B"]);
    }

    #[test]
    fn relocate_before_moves_across_levels() {
        let (mut forest, _, mut view) = sample();
        assert!(forest.relocate(4, 1, DropPosition::Before, &mut view));
        assert_eq!(titles(&forest.roots), vec!["D", "A", "E"]);
        assert!(forest.find_by_id(3).unwrap().children.is_empty());
    }

    #[test]
    fn relocate_inside_appends_and_opens_target() {
        let (mut forest, _, mut view) = sample();
        assert!(!view.is_open(5));
        assert!(forest.relocate(1, 5, DropPosition::Inside, &mut view));
        assert_eq!(titles(&forest.roots), vec!["E"]);
        assert!(view.is_open(5));
        let e = forest.find_by_id(5).unwrap();
        assert_eq!(titles(&e.children), vec!["A"]);
        // The moved subtree travels intact.
        assert_eq!(forest.find_with_parent(4).unwrap().parent.map(|p| p.id), Some(3));
    }

    #[test]
    fn relocate_child_out_to_root_after_its_former_parent() {
        let (mut forest, _, mut view) = sample();
        assert!(forest.relocate(3, 1, DropPosition::After, &mut view));
        assert_eq!(titles(&forest.roots), vec!["A", "C", "E"]);
        assert_eq!(forest.len(), 5);
    }

    #[test]
    fn descendant_check_walks_full_ancestor_chain() {
        let (forest, _, _) = sample();
        assert!(forest.is_descendant_of(4, 1));
        assert!(forest.is_descendant_of(4, 3));
        assert!(!forest.is_descendant_of(1, 4));
        assert!(!forest.is_descendant_of(5, 1));
        assert!(!forest.is_descendant_of(1, 1));
    }

    #[test]
    fn breadcrumb_runs_root_to_node() {
        let (forest, _, _) = sample();
        assert_eq!(forest.breadcrumb(4), Some(vec!["A", "C", "D"]));
        assert_eq!(forest.breadcrumb(5), Some(vec!["E"]));
        assert_eq!(forest.breadcrumb(99), None);
    }
}
