//! `accord view`: browse an indented text file without a workspace.

use std::path::Path;

use anyhow::Result;

use crate::parser::config::Config;
use crate::tui::{self, viewer::ViewerApp};
use crate::workspace;

pub fn run(file: &Path) -> Result<()> {
    // Borrow the workspace config for search settings when there is one.
    let config = match workspace::find_root() {
        Ok(root) => workspace::load_config(&root)?,
        Err(_) => Config::default(),
    };
    tui::run(&mut ViewerApp::load(file, config)?)
}
