//! Breadcrumb search: hand a node's ancestor path to an external search page.

use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::parser::config::Config;

/// The search query for a breadcrumb: titles root→node joined by spaces.
pub fn query(breadcrumb: &[&str]) -> String {
    breadcrumb.join(" ")
}

/// The full search URL for a breadcrumb.
pub fn url(config: &Config, breadcrumb: &[&str]) -> String {
    format!(
        "{}{}",
        config.search_url,
        urlencoding::encode(&query(breadcrumb))
    )
}

/// Open `url` with the configured browser command.
pub fn open(config: &Config, url: &str) -> Result<()> {
    let browser = resolve_browser(config.browser.clone());
    let mut parts = browser.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("no browser configured for search"))?;
    let args: Vec<String> = parts.map(ToString::to_string).collect();

    info!(%url, browser = %browser, "opening search");
    let status = Command::new(program)
        .args(&args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("failed to launch browser {:?}", browser))?;

    if !status.success() {
        bail!("browser exited with status {}", status);
    }
    Ok(())
}

/// First non-blank of: the config, `$ACCORD_BROWSER`, `$BROWSER`. Falls back
/// to the platform's URL opener.
fn resolve_browser(config_browser: Option<String>) -> String {
    config_browser
        .into_iter()
        .chain(["ACCORD_BROWSER", "BROWSER"].iter().filter_map(|var| std::env::var(var).ok()))
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or_else(|| platform_opener().to_string())
}

fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}
