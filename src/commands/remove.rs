//! `accord rm`: delete a node and everything beneath it.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::NodeId;
use crate::workspace;

pub fn run(id: NodeId) -> Result<()> {
    let root = workspace::find_root()?;
    let removed = run_in(&root, id)?;
    let noun = if removed == 1 { "node" } else { "nodes" };
    println!("  {} {} {}", "Removed".red().bold(), removed, noun);
    Ok(())
}

/// Returns how many nodes went away with `id`.
pub fn run_in(root: &Path, id: NodeId) -> Result<usize> {
    let mut session = workspace::open_session(root)?;
    let Some(count) = session
        .forest()
        .find_by_id(id)
        .map(|node| node.subtree_ids().len())
    else {
        bail!("node {} not found", id);
    };
    session.delete(id);
    session.ensure_saved()?;
    Ok(count)
}
