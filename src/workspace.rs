//! Paths and common operations for the `.accord/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::parser::config::{self, Config};
use crate::session::Session;
use crate::store::FileStore;

const DIR: &str = ".accord";

/// Walk upward from `start` to find the directory containing `.accord/state.json`.
pub fn find_root_from(start: &Path) -> Result<PathBuf> {
    match start.ancestors().find(|dir| state_path(dir).exists()) {
        Some(root) => Ok(root.to_path_buf()),
        None => bail!(
            "no accord outline in {} or any parent; run `accord init` first",
            start.display()
        ),
    }
}

/// Walk upward from the current working directory to find the outline root.
pub fn find_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    find_root_from(&cwd)
}

pub fn accord_dir(root: &Path) -> PathBuf {
    root.join(DIR)
}

pub fn state_path(root: &Path) -> PathBuf {
    root.join(DIR).join("state.json")
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(DIR).join("config.accord")
}

/// Open the session persisted under `root`.
pub fn open_session(root: &Path) -> Result<Session<FileStore>> {
    Session::open(FileStore::new(state_path(root)))
}

/// The config under `root`, or defaults when the file is absent.
pub fn load_config(root: &Path) -> Result<Config> {
    let path = config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    config::parse(&content)
}
