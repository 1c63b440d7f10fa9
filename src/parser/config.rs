//! Parser and writer for `.accord/config.accord`.
//!
//! The file is a flat list of `key: value` lines. `#` starts a comment line.
//! Unknown keys are ignored so older binaries can read newer files.

use anyhow::{Result, bail};

use crate::parser::outline::IndentStyle;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix the percent-encoded breadcrumb query is appended to.
    pub search_url: String,
    /// Command used to open search URLs (falls back to the environment).
    pub browser: Option<String>,
    /// Indentation written by `accord export`.
    pub export_indent: IndentStyle,
    /// Ask before deleting a subtree in the editor.
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            browser: None,
            export_indent: IndentStyle::Tab,
            confirm_delete: true,
        }
    }
}

pub fn parse(input: &str) -> Result<Config> {
    let mut config = Config::default();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("config line {}: expected `key: value`, got {:?}", idx + 1, line);
        };
        let value = value.trim();
        match key.trim() {
            "search_url" => {
                if !value.is_empty() {
                    config.search_url = value.to_string();
                }
            }
            "browser" => {
                config.browser = (!value.is_empty()).then(|| value.to_string());
            }
            "export_indent" => {
                config.export_indent = match value {
                    "tab" | "tabs" => IndentStyle::Tab,
                    "spaces" => IndentStyle::Spaces,
                    other => bail!(
                        "config line {}: export_indent must be `tab` or `spaces`, got {:?}",
                        idx + 1,
                        other
                    ),
                };
            }
            "confirm_delete" => config.confirm_delete = parse_bool(value, idx + 1)?,
            _ => {}
        }
    }

    Ok(config)
}

fn parse_bool(value: &str, line: usize) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => bail!("config line {}: expected true/false, got {:?}", line, other),
    }
}

pub fn serialize(config: &Config) -> String {
    let export_indent = match config.export_indent {
        IndentStyle::Tab => "tab",
        IndentStyle::Spaces => "spaces",
    };
    let browser = config.browser.clone().unwrap_or_default();
    format!(
        "\
# accord configuration

# Search prefix used when a node title is activated
search_url: {}

# Command that opens search URLs (falls back to $ACCORD_BROWSER, then $BROWSER)
browser: {}

# Indentation written by `accord export`
# Options: tab | spaces
export_indent: {}

# Ask before deleting a node and its children in `accord edit`
confirm_delete: {}
",
        config.search_url, browser, export_indent, config.confirm_delete
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_roundtrip_through_serialize() {
        let text = serialize(&Config::default());
        assert_eq!(parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn custom_values_roundtrip() {
        let cfg = Config {
            search_url: "https://duckduckgo.com/?q=".to_string(),
            browser: Some("firefox --new-tab".to_string()),
            export_indent: IndentStyle::Spaces,
            confirm_delete: false,
        };
        assert_eq!(parse(&serialize(&cfg)).unwrap(), cfg);
    }

    #[test]
    fn url_values_keep_their_colons() {
        let cfg = parse("search_url: https://example.com/find?q=\n").unwrap();
        assert_eq!(cfg.search_url, "https://example.com/find?q=");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = parse("theme: dark\nconfirm_delete: no\n").unwrap();
        assert!(!cfg.confirm_delete);
    }

    #[test]
    fn bad_values_report_line_number() {
        let err = parse("# header\nconfirm_delete: maybe\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
        assert!(parse("export_indent: dots\n").is_err());
        assert!(parse("no separator here\n").is_err());
    }
}
