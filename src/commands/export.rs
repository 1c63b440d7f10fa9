//! `accord export`: write the outline as indented text or a JSON snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::workspace;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let root = workspace::find_root()?;
    run_in(&root, file, json)?;
    println!("  {} {}", "Exported".green().bold(), file.display());
    Ok(())
}

/// Text exports use the configured `export_indent`.
pub fn run_in(root: &Path, file: &Path, json: bool) -> Result<()> {
    let session = workspace::open_session(root)?;
    let body = if json {
        session.export_json()?
    } else {
        let config = workspace::load_config(root)?;
        session.export_text(config.export_indent)?
    };
    fs::write(file, body).with_context(|| format!("failed to write {}", file.display()))?;
    Ok(())
}
