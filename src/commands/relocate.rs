//! `accord mv`: move a node before, after or into another node.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::engine::DropPosition;
use crate::outline::model::NodeId;
use crate::workspace;

pub fn run(id: NodeId, target: NodeId, position: DropPosition) -> Result<()> {
    let root = workspace::find_root()?;
    run_in(&root, id, target, position)?;
    let place = match position {
        DropPosition::Before => "before",
        DropPosition::After => "after",
        DropPosition::Inside => "into",
    };
    println!("  {} #{} {} #{}", "Moved".green().bold(), id, place, target);
    Ok(())
}

pub fn run_in(root: &Path, id: NodeId, target: NodeId, position: DropPosition) -> Result<()> {
    let mut session = workspace::open_session(root)?;
    let forest = session.forest();
    for node in [id, target] {
        if !forest.contains(node) {
            bail!("node {} not found", node);
        }
    }
    if id == target {
        bail!("cannot move a node relative to itself");
    }
    if forest.is_descendant_of(target, id) {
        bail!("cannot move #{} into its own subtree", id);
    }
    if !session.relocate(id, target, position) {
        bail!("move of #{} was rejected", id);
    }
    session.ensure_saved()
}
