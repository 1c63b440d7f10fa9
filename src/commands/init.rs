//! `accord init`: create an empty outline in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::outline::model::{Forest, IdCounter, ViewState};
use crate::outline::snapshot::Snapshot;
use crate::parser::config;
use crate::workspace;

pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let state_path = workspace::state_path(root);
    if state_path.exists() {
        bail!("accord is already initialised here (.accord/state.json exists)");
    }
    fs::create_dir_all(workspace::accord_dir(root))?;

    let empty = Snapshot::capture(&Forest::new(), &IdCounter::new(), &ViewState::new(), None);
    fs::write(&state_path, empty.to_json()?)?;
    println!("  {} .accord/state.json", "Created".green().bold());

    let config_path = workspace::config_path(root);
    if !config_path.exists() {
        fs::write(&config_path, config::serialize(&config::Config::default()))?;
        println!("  {} .accord/config.accord", "Created".green().bold());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_state_and_config() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(workspace::state_path(dir.path()).exists());
        assert!(workspace::config_path(dir.path()).exists());
        let session = workspace::open_session(dir.path()).unwrap();
        assert!(session.forest().is_empty());
        assert_eq!(
            workspace::load_config(dir.path()).unwrap(),
            config::Config::default()
        );
    }

    #[test]
    fn refuses_to_run_twice() {
        let dir = TempDir::new().unwrap();
        run_in(dir.path()).unwrap();
        assert!(run_in(dir.path()).is_err());
    }

    #[test]
    fn keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(workspace::accord_dir(dir.path())).unwrap();
        fs::write(workspace::config_path(dir.path()), "confirm_delete: false\n").unwrap();
        run_in(dir.path()).unwrap();
        assert!(!workspace::load_config(dir.path()).unwrap().confirm_delete);
    }
}
