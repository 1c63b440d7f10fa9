//! `accord rename`: change a node's title.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::NodeId;
use crate::workspace;

pub fn run(id: NodeId, title: &str) -> Result<()> {
    let root = workspace::find_root()?;
    run_in(&root, id, title)?;
    println!("  {} #{} {}", "Renamed".green().bold(), id, title.trim());
    Ok(())
}

pub fn run_in(root: &Path, id: NodeId, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        bail!("title must not be empty");
    }
    let mut session = workspace::open_session(root)?;
    if !session.rename(id, title) {
        bail!("node {} not found", id);
    }
    session.ensure_saved()
}
