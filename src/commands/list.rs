//! `accord list`: print the outline as an indented tree.

use std::path::Path;

use anyhow::Result;

use crate::outline::model::Forest;
use crate::workspace;

pub fn run(show_ids: bool) -> Result<()> {
    let root = workspace::find_root()?;
    let lines = run_in(&root, show_ids)?;
    if lines.is_empty() {
        println!("  No nodes.");
    } else {
        for line in lines {
            println!("  {}", line);
        }
    }
    Ok(())
}

pub fn run_in(root: &Path, show_ids: bool) -> Result<Vec<String>> {
    let session = workspace::open_session(root)?;
    Ok(format_tree(session.forest(), show_ids))
}

/// One line per node in pre-order. Open state is ignored.
fn format_tree(forest: &Forest, show_ids: bool) -> Vec<String> {
    forest
        .walk()
        .map(|(depth, node)| {
            let indent = "  ".repeat(depth);
            if show_ids {
                format!("{}{} #{}", indent, node.title, node.id)
            } else {
                format!("{}{}", indent, node.title)
            }
        })
        .collect()
}
