mod commands;
mod outline;
mod parser;
mod search;
mod session;
mod store;
mod tui;
mod workspace;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::import::Format;
use crate::outline::engine::DropPosition;
use crate::outline::model::NodeId;

#[derive(Parser)]
#[command(
    name = "accord",
    about = "An outline editor for nested, collapsible notes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty outline in the current directory
    Init,
    /// Add a node at the end of the roots, or under a parent
    Add {
        title: String,
        /// Append as the last child of this node
        #[arg(long)]
        parent: Option<NodeId>,
    },
    /// Change a node's title
    Rename { id: NodeId, title: String },
    /// Replace a node's content paragraph
    Content { id: NodeId, text: String },
    /// Delete a node and its whole subtree
    Rm { id: NodeId },
    /// Move a node relative to another node
    #[command(
        group(
            ArgGroup::new("position")
                .args(["before", "after", "into"])
                .required(true)
                .multiple(false)
        )
    )]
    Mv {
        id: NodeId,
        /// Place as the previous sibling of TARGET
        #[arg(long, value_name = "TARGET")]
        before: Option<NodeId>,
        /// Place as the next sibling of TARGET
        #[arg(long, value_name = "TARGET")]
        after: Option<NodeId>,
        /// Append as the last child of TARGET
        #[arg(long, value_name = "TARGET")]
        into: Option<NodeId>,
    },
    /// Print the outline as an indented tree
    List {
        /// Show node ids next to titles
        #[arg(long)]
        ids: bool,
    },
    /// Replace the outline from a file (.json is a snapshot, otherwise indented text)
    #[command(group(ArgGroup::new("format").args(["json", "text"]).multiple(false)))]
    Import {
        file: PathBuf,
        /// Read the file as a JSON snapshot
        #[arg(long)]
        json: bool,
        /// Read the file as indented text
        #[arg(long)]
        text: bool,
    },
    /// Write the outline to a file as indented text
    Export {
        file: PathBuf,
        /// Write a JSON snapshot instead
        #[arg(long)]
        json: bool,
    },
    /// Search the web for a node's path from its root
    Search {
        id: NodeId,
        /// Print the URL instead of opening a browser
        #[arg(long)]
        print: bool,
    },
    /// Open the interactive outline editor
    Edit {
        /// Launch with a built-in sample outline (nothing is saved)
        #[arg(long)]
        demo: bool,
    },
    /// Browse an indented text file read-only
    View { file: PathBuf },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Init => commands::init::run(),
        Command::Add { title, parent } => commands::add::run(&title, parent),
        Command::Rename { id, title } => commands::rename::run(id, &title),
        Command::Content { id, text } => commands::content::run(id, &text),
        Command::Rm { id } => commands::remove::run(id),
        Command::Mv {
            id,
            before,
            after,
            into,
        } => {
            let (target, position) = drop_target(before, after, into)?;
            commands::relocate::run(id, target, position)
        }
        Command::List { ids } => commands::list::run(ids),
        Command::Import { file, json, text } => {
            let format = if json {
                Some(Format::Json)
            } else if text {
                Some(Format::Text)
            } else {
                None
            };
            commands::import::run(&file, format)
        }
        Command::Export { file, json } => commands::export::run(&file, json),
        Command::Search { id, print } => commands::search::run(id, print),
        Command::Edit { demo } => commands::edit::run(demo),
        Command::View { file } => commands::view::run(&file),
    }
}

/// Logs go to stderr, filtered by `ACCORD_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("ACCORD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn drop_target(
    before: Option<NodeId>,
    after: Option<NodeId>,
    into: Option<NodeId>,
) -> Result<(NodeId, DropPosition)> {
    match (before, after, into) {
        (Some(t), None, None) => Ok((t, DropPosition::Before)),
        (None, Some(t), None) => Ok((t, DropPosition::After)),
        (None, None, Some(t)) => Ok((t, DropPosition::Inside)),
        _ => anyhow::bail!("specify exactly one of --before, --after or --into"),
    }
}
