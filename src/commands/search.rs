//! `accord search`: look up a node's breadcrumb on the web.

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::NodeId;
use crate::search;
use crate::workspace;

/// With `print_only`, print the URL instead of opening a browser.
pub fn run(id: NodeId, print_only: bool) -> Result<()> {
    let root = workspace::find_root()?;
    let url = run_in(&root, id)?;
    if print_only {
        println!("{}", url);
        return Ok(());
    }
    let config = workspace::load_config(&root)?;
    search::open(&config, &url)?;
    println!("  {} {}", "Opened".green().bold(), url);
    Ok(())
}

/// The search URL for `id`'s path from its root.
pub fn run_in(root: &Path, id: NodeId) -> Result<String> {
    let session = workspace::open_session(root)?;
    let config = workspace::load_config(root)?;
    let Some(breadcrumb) = session.breadcrumb(id) else {
        bail!("node {} not found", id);
    };
    Ok(search::url(&config, &breadcrumb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{add, init};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn url_covers_the_ancestor_path() {
        let dir = TempDir::new().unwrap();
        init::run_in(dir.path()).unwrap();
        let a = add::run_in(dir.path(), "Rust", None).unwrap();
        let b = add::run_in(dir.path(), "Error handling", Some(a)).unwrap();
        fs::write(
            workspace::config_path(dir.path()),
            "search_url: https://example.test/?q=\n",
        )
        .unwrap();

        assert_eq!(
            run_in(dir.path(), b).unwrap(),
            "https://example.test/?q=Rust%20Error%20handling"
        );
    }

    #[test]
    fn missing_node_fails() {
        let dir = TempDir::new().unwrap();
        init::run_in(dir.path()).unwrap();
        assert!(run_in(dir.path(), 1).is_err());
    }
}
