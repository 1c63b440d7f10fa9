//! `accord add`: append a root node, or a child with `--parent`.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::NodeId;
use crate::workspace;

pub fn run(title: &str, parent: Option<NodeId>) -> Result<()> {
    let root = workspace::find_root()?;
    let id = run_in(&root, title, parent)?;
    println!("  {} #{} {}", "Added".green().bold(), id, title.trim());
    Ok(())
}

pub fn run_in(root: &Path, title: &str, parent: Option<NodeId>) -> Result<NodeId> {
    if title.trim().is_empty() {
        bail!("title must not be empty");
    }
    let mut session = workspace::open_session(root)?;
    let id = match parent {
        None => match session.add_root(title) {
            Some(id) => id,
            None => bail!("title must not be empty"),
        },
        Some(parent) => match session.add_child(parent, title) {
            Some(id) => id,
            None => bail!("node {} not found", parent),
        },
    };
    session.ensure_saved()?;
    Ok(id)
}
