//! JSON snapshot of a whole session: tree, view state, selection and counter.
//!
//! Unlike the indented-text form this keeps node content and visibility.
//! Decoding validates the shape explicitly; any failure leaves the caller's
//! current state untouched because nothing is built until validation passes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::outline::model::{
    Forest, IdCounter, MAX_ID, Node, NodeId, ViewState, default_content,
};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot must be a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("malformed node: {0}")]
    InvalidNode(String),

    #[error("node id {0} appears more than once")]
    DuplicateId(NodeId),

    #[error("`{field}` value {id} is larger than {max}", max = MAX_ID)]
    IdOutOfRange { field: &'static str, id: NodeId },
}

/// The persisted form. Field names match the on-disk camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub nodes: Vec<SnapshotNode>,
    pub selected_node_id: Option<NodeId>,
    pub next_id: NodeId,
    /// Open ids as a sequence; rebuilt into a set on restore.
    pub open_nodes: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub id: NodeId,
    pub title: String,
    pub content: String,
    pub content_visible: bool,
    pub children: Vec<SnapshotNode>,
}

/// Session state rebuilt from a snapshot.
#[derive(Debug, Clone)]
pub struct Restored {
    pub forest: Forest,
    pub ids: IdCounter,
    pub view: ViewState,
    pub selected: Option<NodeId>,
}

/// Lenient decoding target; defaults are applied after the shape checks.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    nodes: Option<Value>,
    selected_node_id: Option<NodeId>,
    next_id: Option<NodeId>,
    open_nodes: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: NodeId,
    title: String,
    content: Option<String>,
    content_visible: Option<bool>,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl Snapshot {
    pub fn capture(
        forest: &Forest,
        ids: &IdCounter,
        view: &ViewState,
        selected: Option<NodeId>,
    ) -> Self {
        Self {
            nodes: forest.roots.iter().map(|n| capture_node(n, view)).collect(),
            selected_node_id: selected,
            next_id: ids.peek(),
            open_nodes: view.open.iter().copied().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate.
    ///
    /// `nodes` must be an array and `openNodes` must be present. Nodes
    /// missing `content` get the default text; missing `contentVisible` is
    /// false. Ids must be unique. `nextId` is optional and is raised past
    /// the largest id found. Ids above [`MAX_ID`] are rejected so the
    /// resumed counter can never run out.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let value = parse_unbounded(text)?;
        if !value.is_object() {
            return Err(SnapshotError::NotAnObject);
        }
        let raw: RawSnapshot = serde_json::from_value(value)?;

        let nodes = raw.nodes.ok_or(SnapshotError::MissingField("nodes"))?;
        if !nodes.is_array() {
            return Err(SnapshotError::WrongType {
                field: "nodes",
                expected: "an array",
            });
        }
        let nodes: Vec<RawNode> = serde_json::from_value(nodes)
            .map_err(|e| SnapshotError::InvalidNode(e.to_string()))?;

        let open_nodes = raw
            .open_nodes
            .ok_or(SnapshotError::MissingField("openNodes"))?;
        let open_nodes: Vec<NodeId> =
            serde_json::from_value(open_nodes).map_err(|_| SnapshotError::WrongType {
                field: "openNodes",
                expected: "an array of node ids",
            })?;

        let mut seen = HashSet::new();
        let nodes = nodes
            .into_iter()
            .map(|n| fill_node(n, &mut seen))
            .collect::<Result<Vec<_>, _>>()?;

        let next_id = raw.next_id.unwrap_or(1);
        if next_id > MAX_ID + 1 {
            return Err(SnapshotError::IdOutOfRange {
                field: "nextId",
                id: next_id,
            });
        }
        // Every id is at most MAX_ID here, so this cannot overflow.
        let floor = seen.iter().max().map_or(1, |max| max + 1);
        Ok(Self {
            nodes,
            selected_node_id: raw.selected_node_id.filter(|id| seen.contains(id)),
            next_id: next_id.max(floor),
            open_nodes: open_nodes
                .into_iter()
                .filter(|id| seen.contains(id))
                .collect(),
        })
    }

    /// Rebuild session state. Assumes a snapshot produced by
    /// [`Snapshot::capture`] or validated by [`Snapshot::from_json`].
    pub fn restore(self) -> Restored {
        let mut view = ViewState::new();
        view.open.extend(self.open_nodes.iter().copied());
        let roots = self
            .nodes
            .into_iter()
            .map(|n| restore_node(n, &mut view))
            .collect();
        let forest = Forest::from_roots(roots);
        let ids = IdCounter::resume(Some(self.next_id), &forest);
        Restored {
            forest,
            ids,
            view,
            selected: self.selected_node_id,
        }
    }
}

/// Parse without serde_json's nesting limit. Each outline level costs two
/// JSON levels, so the default limit caps loadable outlines at about 63
/// levels; the stack grows on demand instead.
fn parse_unbounded(text: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn capture_node(node: &Node, view: &ViewState) -> SnapshotNode {
    SnapshotNode {
        id: node.id,
        title: node.title.clone(),
        content: node.content.clone(),
        content_visible: view.is_content_visible(node.id),
        children: node
            .children
            .iter()
            .map(|c| capture_node(c, view))
            .collect(),
    }
}

fn fill_node(raw: RawNode, seen: &mut HashSet<NodeId>) -> Result<SnapshotNode, SnapshotError> {
    if raw.id > MAX_ID {
        return Err(SnapshotError::IdOutOfRange {
            field: "id",
            id: raw.id,
        });
    }
    if !seen.insert(raw.id) {
        return Err(SnapshotError::DuplicateId(raw.id));
    }
    if raw.title.trim().is_empty() {
        return Err(SnapshotError::InvalidNode(format!(
            "node {} has an empty title",
            raw.id
        )));
    }
    let children = raw
        .children
        .into_iter()
        .map(|c| fill_node(c, seen))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SnapshotNode {
        id: raw.id,
        content: raw.content.unwrap_or_else(|| default_content(&raw.title)),
        title: raw.title,
        content_visible: raw.content_visible.unwrap_or(false),
        children,
    })
}

fn restore_node(node: SnapshotNode, view: &mut ViewState) -> Node {
    if node.content_visible {
        view.content_visible.insert(node.id);
    }
    Node {
        id: node.id,
        title: node.title,
        content: node.content,
        children: node
            .children
            .into_iter()
            .map(|c| restore_node(c, view))
            .collect(),
    }
}
