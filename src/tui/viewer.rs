//! `accord view`: read-only accordion over an indented text file.
//!
//! Nothing here is persisted; open/closed state lives only for the session.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::outline::model::{Forest, IdCounter, NodeId, ViewState};
use crate::parser::config::Config;
use crate::parser::outline;
use crate::search;
use crate::tui::App;
use crate::tui::input::{self, Action, KeyMode};
use crate::tui::render::{self, RenderData, Row};

const HELP: &[&str] = &[
    "VIEWER (read-only)",
    "  j/k or arrows   focus previous/next row",
    "  g / G           first / last row",
    "  Enter / Space   open or close the focused node",
    "  /               search the web for the node's path",
    "",
    "Esc closes this help.",
];

pub struct ViewerApp {
    heading: String,
    forest: Forest,
    view: ViewState,
    focused: Option<NodeId>,
    config: Config,
    show_help: bool,
    status_message: Option<String>,
}

impl ViewerApp {
    pub fn load(path: &Path, config: Config) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(&text, &name, config))
    }

    /// Parse `text`; every node with children starts open.
    pub fn from_text(text: &str, name: &str, config: Config) -> Self {
        let forest = outline::parse(text, &mut IdCounter::new());
        let mut view = ViewState::new();
        view.open.extend(
            forest
                .walk()
                .filter(|(_, n)| n.has_children())
                .map(|(_, n)| n.id),
        );
        let focused = forest.roots.first().map(|n| n.id);
        Self {
            heading: format!("accord view: {name}"),
            forest,
            view,
            focused,
            config,
            show_help: false,
            status_message: None,
        }
    }

    fn rows(&self) -> Vec<Row> {
        render::visible_rows(&self.forest, &self.view, false)
    }

    fn step_focus(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let next = match self
            .focused
            .and_then(|id| rows.iter().position(|r| r.id == id))
        {
            Some(idx) => idx.saturating_add_signed(delta).min(rows.len() - 1),
            None => 0,
        };
        self.focused = Some(rows[next].id);
    }

    fn search_focused(&mut self) {
        let Some(breadcrumb) = self.focused.and_then(|id| self.forest.breadcrumb(id)) else {
            return;
        };
        let url = search::url(&self.config, &breadcrumb);
        self.status_message = Some(match search::open(&self.config, &url) {
            Ok(()) => format!("opened {url}"),
            Err(err) => format!("search failed: {err:#}"),
        });
    }
}

impl App for ViewerApp {
    fn draw(&mut self, frame: &mut Frame) {
        let rows = self.rows();
        let data = RenderData {
            heading: &self.heading,
            rows: &rows,
            focused: self.focused,
            moving: None,
            show_content_markers: false,
            mode_label: "View",
            hints: "[j/k] move  [Enter] open/close  [/] search  [q] quit",
            message: self.status_message.as_deref(),
            help: self.show_help.then_some(HELP),
            empty_text: "No data to display. Pass an indented .txt file.",
        };
        render::draw(frame, &data);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let action = input::action_for_key(key, KeyMode::Browse);
        if self.show_help && action != Action::Quit {
            self.show_help = false;
            return Ok(false);
        }
        match action {
            Action::Quit => return Ok(true),
            Action::Up => self.step_focus(-1),
            Action::Down => self.step_focus(1),
            Action::Top => self.focused = self.rows().first().map(|r| r.id),
            Action::Bottom => self.focused = self.rows().last().map(|r| r.id),
            Action::ToggleOpen => {
                if let Some(id) = self.focused {
                    self.view.toggle_open(id);
                }
            }
            Action::Search => self.search_focused(),
            Action::ToggleHelp => self.show_help = true,
            Action::Cancel => self.status_message = None,
            // Editing keys do nothing in the viewer.
            _ => {}
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn press(app: &mut ViewerApp, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn titles(app: &ViewerApp) -> Vec<String> {
        app.rows().into_iter().map(|r| r.title).collect()
    }

    #[test]
    fn everything_starts_open() {
        let app = ViewerApp::from_text("A\n\tB\n\t\tC\nD\n", "t.txt", Config::default());
        assert_eq!(titles(&app), vec!["A", "B", "C", "D"]);
        assert_eq!(app.focused, Some(1));
    }

    #[test]
    fn toggling_hides_children() {
        let mut app = ViewerApp::from_text("A\n\tB\n\t\tC\nD\n", "t.txt", Config::default());
        press(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app), vec!["A", "D"]);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focused, Some(4));
    }

    #[test]
    fn editing_keys_are_ignored() {
        let mut app = ViewerApp::from_text("A\n", "t.txt", Config::default());
        for code in [KeyCode::Char('a'), KeyCode::Char('D'), KeyCode::Char('m'), KeyCode::Char('r')] {
            press(&mut app, code);
        }
        assert_eq!(titles(&app), vec!["A"]);
        assert_eq!(app.forest.len(), 1);
    }

    #[test]
    fn empty_file_has_no_focus() {
        let mut app = ViewerApp::from_text("\n\n", "empty.txt", Config::default());
        press(&mut app, KeyCode::Down);
        assert!(app.focused.is_none());
        assert!(app.rows().is_empty());
    }

    #[test]
    fn load_reads_file_and_names_heading() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.txt");
        fs::write(&path, "\u{feff}Plan\r\n\tStep\r\n").unwrap();
        let app = ViewerApp::load(&path, Config::default()).unwrap();
        assert_eq!(app.heading, "accord view: plan.txt");
        assert_eq!(titles(&app), vec!["Plan", "Step"]);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(ViewerApp::load(&dir.path().join("nope.txt"), Config::default()).is_err());
    }
}
