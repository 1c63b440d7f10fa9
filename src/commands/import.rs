//! `accord import`: replace the outline with an indented text file or a
//! JSON snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    /// `.json` files are snapshots; anything else is indented text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Text,
        }
    }
}

pub fn run(file: &Path, format: Option<Format>) -> Result<()> {
    let root = workspace::find_root()?;
    let count = run_in(&root, file, format)?;
    println!(
        "  {} {} nodes from {}",
        "Imported".green().bold(),
        count,
        file.display()
    );
    Ok(())
}

pub fn run_in(root: &Path, file: &Path, format: Option<Format>) -> Result<usize> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut session = workspace::open_session(root)?;
    let count = match format.unwrap_or_else(|| Format::from_path(file)) {
        Format::Text => session.import_text(&text),
        Format::Json => session.import_json(&text),
    }
    .with_context(|| format!("failed to import {}", file.display()))?;
    session.ensure_saved()?;
    Ok(count)
}
