//! `accord edit`: the interactive accordion editor.

use anyhow::Result;
use tracing::info;

use crate::tui::{self, editor::EditorApp};
use crate::workspace;

/// With `demo`, edit a sample outline in memory instead of the workspace.
pub fn run(demo: bool) -> Result<()> {
    if demo {
        return tui::run(&mut EditorApp::demo()?);
    }
    let root = workspace::find_root()?;
    let session = workspace::open_session(&root)?;
    let config = workspace::load_config(&root)?;
    info!(root = %root.display(), "starting editor");
    tui::run(&mut EditorApp::new(session, config))
}
