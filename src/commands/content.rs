//! `accord content`: replace a node's content paragraph.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::NodeId;
use crate::workspace;

pub fn run(id: NodeId, text: &str) -> Result<()> {
    let root = workspace::find_root()?;
    run_in(&root, id, text)?;
    println!("  {} content of #{}", "Updated".green().bold(), id);
    Ok(())
}

/// The text is stored as given, empty included.
pub fn run_in(root: &Path, id: NodeId, text: &str) -> Result<()> {
    let mut session = workspace::open_session(root)?;
    if !session.edit_content(id, Some(text)) {
        bail!("node {} not found", id);
    }
    session.ensure_saved()
}
