use std::collections::BTreeSet;

/// Identifier of a node. Unique within a forest and never reused in a session.
pub type NodeId = u64;

/// Largest id a loaded snapshot may carry (2^53 - 1, the largest integer a
/// JSON reader can hold exactly). Keeping ids this low means the counter
/// cannot overflow.
pub const MAX_ID: NodeId = (1 << 53) - 1;

/// Content given to a node when none was set explicitly.
pub fn default_content(title: &str) -> String {
    format!("Content of {}.", title)
}

/// A titled node in the outline.
///
/// A node owns its children; parents are found by traversal, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub content: String,
    /// Order is significant: it is the render and serialization order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a childless node with the default content for `title`.
    ///
    /// The title is trimmed; callers reject empty titles beforehand.
    pub fn new(id: NodeId, title: &str) -> Self {
        let title = title.trim().to_string();
        Self {
            id,
            content: default_content(&title),
            title,
            children: Vec::new(),
        }
    }

    pub fn rename(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Replace the content. `None` is a cancelled edit and leaves it untouched.
    pub fn set_content(&mut self, content: Option<&str>) {
        if let Some(content) = content {
            self.content = content.to_string();
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Ids of this node and every descendant, pre-order.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        collect_ids(self, &mut ids);
        ids
    }
}

fn collect_ids(node: &Node, out: &mut Vec<NodeId>) {
    out.push(node.id);
    for child in &node.children {
        collect_ids(child, out);
    }
}

/// The ordered sequence of root nodes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<Node>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_roots(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    /// Depth-first pre-order walk yielding `(depth, node)`; roots are depth 0.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Largest id present, if any.
    pub fn max_id(&self) -> Option<NodeId> {
        self.walk().map(|(_, n)| n.id).max()
    }
}

/// Pre-order iterator over a forest. See [`Forest::walk`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

/// Session-scoped id source. Issued ids strictly increase and never repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCounter {
    next: NodeId,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a stored counter, raised past any id already in `forest`.
    pub fn resume(stored: Option<NodeId>, forest: &Forest) -> Self {
        let floor = forest.max_id().map_or(1, |max| max + 1);
        Self {
            next: stored.unwrap_or(1).max(floor),
        }
    }

    /// The id the next call to [`IdCounter::issue`] returns.
    pub fn peek(&self) -> NodeId {
        self.next
    }

    pub fn issue(&mut self) -> NodeId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Presentation state kept beside the tree, keyed by node id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Nodes whose children are expanded.
    pub open: BTreeSet<NodeId>,
    /// Nodes whose content paragraph is shown.
    pub content_visible: BTreeSet<NodeId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    pub fn is_content_visible(&self, id: NodeId) -> bool {
        self.content_visible.contains(&id)
    }

    pub fn toggle_open(&mut self, id: NodeId) {
        if !self.open.remove(&id) {
            self.open.insert(id);
        }
    }

    pub fn toggle_content_visible(&mut self, id: NodeId) {
        if !self.content_visible.remove(&id) {
            self.content_visible.insert(id);
        }
    }

    /// Drop every entry for `ids`.
    pub fn forget(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.open.remove(id);
            self.content_visible.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.content_visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        let mut a = Node::new(1, "A");
        let mut c = Node::new(3, "C");
        c.children.push(Node::new(4, "D"));
        a.children.push(Node::new(2, "B"));
        a.children.push(c);
        Forest::from_roots(vec![a, Node::new(5, "E")])
    }

    #[test]
    fn new_node_trims_title_and_fills_default_content() {
        let node = Node::new(7, "  Plan  ");
        assert_eq!(node.title, "Plan");
        assert_eq!(node.content, "Content of Plan.");
        assert!(!node.has_children());
    }

    #[test]
    fn cancelled_content_edit_keeps_content() {
        let mut node = Node::new(1, "A");
        node.set_content(Some("notes"));
        node.set_content(None);
        assert_eq!(node.content, "notes");
    }

    #[test]
    fn empty_content_is_a_real_edit() {
        let mut node = Node::new(1, "A");
        node.set_content(Some(""));
        assert_eq!(node.content, "");
    }

    #[test]
    fn walk_is_preorder_with_depths() {
        let forest = sample();
        let order: Vec<(usize, &str)> = forest
            .walk()
            .map(|(d, n)| (d, n.title.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(0, "A"), (1, "B"), (1, "C"), (2, "D"), (0, "E")]
        );
        assert_eq!(forest.len(), 5);
        assert_eq!(forest.max_id(), Some(5));
    }

    #[test]
    fn subtree_ids_include_root_and_descendants() {
        let forest = sample();
        assert_eq!(forest.roots[0].subtree_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn counter_resume_never_goes_below_existing_ids() {
        let forest = sample();
        assert_eq!(IdCounter::resume(Some(2), &forest).peek(), 6);
        assert_eq!(IdCounter::resume(Some(40), &forest).peek(), 40);
        assert_eq!(IdCounter::resume(None, &Forest::new()).peek(), 1);
    }

    #[test]
    fn counter_issues_strictly_increasing_ids() {
        let mut ids = IdCounter::new();
        let a = ids.issue();
        let b = ids.issue();
        assert!(b > a);
        assert_eq!(ids.peek(), b + 1);
    }

    #[test]
    fn view_state_toggles_and_forgets() {
        let mut view = ViewState::new();
        view.toggle_open(3);
        view.toggle_content_visible(3);
        assert!(view.is_open(3));
        assert!(view.is_content_visible(3));
        view.forget(&[3]);
        assert!(!view.is_open(3));
        assert!(!view.is_content_visible(3));
    }
}
