//! `accord edit`: the interactive accordion editor.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::outline::engine::DropPosition;
use crate::outline::model::NodeId;
use crate::parser::config::Config;
use crate::search;
use crate::session::Session;
use crate::store::{MemoryStore, Store};
use crate::tui::App;
use crate::tui::input::{self, Action, KeyMode};
use crate::tui::render::{self, RenderData, Row, centered_rect, line_with_cursor};

const HELP: &[&str] = &[
    "MOVE AROUND",
    "  j/k or arrows   focus previous/next row",
    "  g / G           first / last row",
    "  Enter / Space   open or close the focused node",
    "  c               show or hide the node's content",
    "",
    "EDIT",
    "  a  add root node      n  add child node",
    "  r  rename             e  edit content",
    "  D  delete node and children",
    "",
    "REORDER",
    "  m  pick up the focused node, then focus a target and press",
    "     b (before)  a (after)  i/Enter (inside)",
    "",
    "  /  search the web for the node's path",
    "",
    "Esc backs out one step. Changes save immediately.",
];

const DEMO_OUTLINE: &str = "\
Rust
\tOwnership
\t\tBorrowing
\t\tLifetimes
\tTraits
\t\tGenerics
Tooling
\tcargo
\tclippy
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingTextKind {
    AddRoot,
    AddChild { parent: NodeId },
    Rename { id: NodeId },
    EditContent { id: NodeId },
}

#[derive(Debug, Clone)]
struct PendingText {
    title: String,
    buffer: String,
    cursor: usize,
    kind: PendingTextKind,
}

impl PendingText {
    fn new(title: impl Into<String>, initial: &str, kind: PendingTextKind) -> Self {
        Self {
            title: title.into(),
            buffer: initial.to_string(),
            cursor: initial.chars().count(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingConfirm {
    Delete { id: NodeId },
}

pub struct EditorApp<S: Store> {
    session: Session<S>,
    config: Config,
    show_help: bool,
    status_message: Option<String>,
    pending_text: Option<PendingText>,
    pending_confirm: Option<PendingConfirm>,
    /// Node picked up with `m`, waiting for a drop target.
    moving: Option<NodeId>,
}

impl<S: Store> EditorApp<S> {
    pub fn new(session: Session<S>, config: Config) -> Self {
        Self {
            session,
            config,
            show_help: false,
            status_message: None,
            pending_text: None,
            pending_confirm: None,
            moving: None,
        }
    }

    fn rows(&self) -> Vec<Row> {
        render::visible_rows(self.session.forest(), self.session.view(), true)
    }

    fn key_mode(&self) -> KeyMode {
        if self.pending_text.is_some() {
            KeyMode::Text
        } else if self.pending_confirm.is_some() {
            KeyMode::Confirm
        } else if self.moving.is_some() {
            KeyMode::Move
        } else {
            KeyMode::Browse
        }
    }

    fn mode_label(&self) -> &'static str {
        match self.key_mode() {
            KeyMode::Browse => "Browse",
            KeyMode::Text => "Editing",
            KeyMode::Move => "Moving",
            KeyMode::Confirm => "Confirming",
        }
    }

    fn hints(&self) -> &'static str {
        match self.key_mode() {
            KeyMode::Browse => {
                "[j/k] move  [Enter] open/close  [c] content  [a] root  [n] child  [r] rename  [e] edit  [D] delete  [m] move  [/] search"
            }
            KeyMode::Text => "type text, [Backspace] delete, [Enter] apply, [Esc] cancel",
            KeyMode::Move => "pick target: [j/k] focus  [b] before  [a] after  [i/Enter] inside  [Esc] cancel",
            KeyMode::Confirm => "[y] confirm  [n/Esc] cancel",
        }
    }

    /// Move focus by `delta` visible rows; with no focus, land on the first row.
    fn step_focus(&mut self, delta: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let next = match self
            .session
            .selected()
            .and_then(|id| rows.iter().position(|r| r.id == id))
        {
            Some(idx) => idx
                .saturating_add_signed(delta)
                .min(rows.len() - 1),
            None => 0,
        };
        self.session.select(Some(rows[next].id));
    }

    fn focus_edge(&mut self, last: bool) {
        let rows = self.rows();
        let target = if last { rows.last() } else { rows.first() };
        if let Some(row) = target {
            self.session.select(Some(row.id));
        }
    }

    fn focused_title(&self) -> Option<(NodeId, String)> {
        let id = self.session.selected()?;
        let node = self.session.forest().find_by_id(id)?;
        Some((id, node.title.clone()))
    }

    fn begin_text(&mut self, action: &Action) {
        let next_id = self.session.next_id();
        let prompt = match action {
            Action::AddRoot => Some(PendingText::new(
                "Title for the new root node",
                &format!("Node {next_id}"),
                PendingTextKind::AddRoot,
            )),
            Action::AddChild => self.session.selected().map(|parent| {
                PendingText::new(
                    "Title for the new child node",
                    &format!("Child node {next_id}"),
                    PendingTextKind::AddChild { parent },
                )
            }),
            Action::Rename => self.focused_title().map(|(id, title)| {
                PendingText::new("New title", &title, PendingTextKind::Rename { id })
            }),
            Action::EditContent => self.session.selected().and_then(|id| {
                let content = self.session.forest().find_by_id(id)?.content.clone();
                Some(PendingText::new(
                    "New content",
                    &content,
                    PendingTextKind::EditContent { id },
                ))
            }),
            _ => None,
        };
        match prompt {
            Some(prompt) => self.pending_text = Some(prompt),
            None => self.status_message = Some("select a node first".to_string()),
        }
    }

    fn submit_text(&mut self) {
        let Some(prompt) = self.pending_text.take() else {
            return;
        };
        let text = prompt.buffer.as_str();
        let applied = match &prompt.kind {
            PendingTextKind::AddRoot => self
                .session
                .add_root(text)
                .map(|id| self.session.select(Some(id)))
                .is_some(),
            PendingTextKind::AddChild { parent } => self
                .session
                .add_child(*parent, text)
                .map(|id| self.session.select(Some(id)))
                .is_some(),
            PendingTextKind::Rename { id } => self.session.rename(*id, text),
            PendingTextKind::EditContent { id } => {
                let edited = self.session.edit_content(*id, Some(text));
                if edited && !self.session.view().is_content_visible(*id) {
                    self.session.toggle_content_visible(*id);
                }
                edited
            }
        };
        self.status_message = match (applied, &prompt.kind) {
            (true, _) => None,
            (false, PendingTextKind::EditContent { .. }) => {
                Some("node no longer exists".to_string())
            }
            (false, _) => Some("title must not be empty".to_string()),
        };
    }

    fn handle_text_input(&mut self, action: Action) {
        let Some(prompt) = self.pending_text.as_mut() else {
            return;
        };
        match action {
            Action::InputChar(c) => {
                let at = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                prompt.buffer.insert(at, c);
                prompt.cursor += 1;
            }
            Action::Backspace => {
                if prompt.cursor > 0 {
                    let at = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor - 1);
                    prompt.buffer.remove(at);
                    prompt.cursor -= 1;
                }
            }
            Action::CursorLeft => prompt.cursor = prompt.cursor.saturating_sub(1),
            Action::CursorRight => {
                prompt.cursor = (prompt.cursor + 1).min(prompt.buffer.chars().count());
            }
            Action::SubmitText => self.submit_text(),
            // Cancelled edits never reach the session.
            Action::Cancel => self.pending_text = None,
            _ => {}
        }
    }

    fn request_delete(&mut self) {
        let Some(id) = self.session.selected() else {
            self.status_message = Some("select a node first".to_string());
            return;
        };
        if self.config.confirm_delete {
            self.pending_confirm = Some(PendingConfirm::Delete { id });
        } else {
            self.session.delete(id);
        }
    }

    fn drop_moving(&mut self, position: DropPosition) {
        let Some(dragged) = self.moving.take() else {
            return;
        };
        let Some(target) = self.session.selected() else {
            return;
        };
        if self.session.relocate(dragged, target, position) {
            self.session.select(Some(dragged));
            self.status_message = None;
        } else {
            self.status_message = Some("cannot drop a node onto itself or inside its own children".to_string());
        }
    }

    fn search_focused(&mut self) {
        let Some(id) = self.session.selected() else {
            self.status_message = Some("select a node first".to_string());
            return;
        };
        let Some(breadcrumb) = self.session.breadcrumb(id) else {
            return;
        };
        let url = search::url(&self.config, &breadcrumb);
        self.status_message = Some(match search::open(&self.config, &url) {
            Ok(()) => format!("opened {url}"),
            Err(err) => format!("search failed: {err:#}"),
        });
    }

    fn draw_text_prompt(&self, frame: &mut Frame, prompt: &PendingText) {
        let area = centered_rect(frame.area(), 70, 28);
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                prompt.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            line_with_cursor(
                &prompt.buffer,
                prompt.cursor,
                Style::default().fg(Color::White),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            ),
            Line::from(""),
            Line::from(Span::styled(
                "Backspace deletes char. Enter applies, Esc cancels.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .title(" input ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .padding(Padding::new(1, 1, 1, 0)),
        )
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_confirm_prompt(&self, frame: &mut Frame, confirm: PendingConfirm) {
        let PendingConfirm::Delete { id } = confirm;
        let area = centered_rect(frame.area(), 56, 22);
        frame.render_widget(Clear, area);
        let title = self
            .session
            .forest()
            .find_by_id(id)
            .map(|n| n.title.as_str())
            .unwrap_or("?");
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Delete \"{title}\" and all its children?"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    "[y/Enter]",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    "[n/Esc]",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" no", Style::default().fg(Color::DarkGray)),
            ]),
        ])
        .block(
            Block::default()
                .title(" confirm ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(paragraph, area);
    }
}

impl EditorApp<MemoryStore> {
    /// A throwaway session over a sample outline; nothing is written to disk.
    pub fn demo() -> Result<Self> {
        let mut session = Session::open(MemoryStore::new())?;
        session.import_text(DEMO_OUTLINE)?;
        let mut app = Self::new(session, Config::default());
        app.status_message = Some("demo mode: changes are in-memory only".to_string());
        Ok(app)
    }
}

impl<S: Store> App for EditorApp<S> {
    fn draw(&mut self, frame: &mut Frame) {
        let rows = self.rows();
        let help = self.show_help.then_some(HELP);
        let data = RenderData {
            heading: "accord edit",
            rows: &rows,
            focused: self.session.selected(),
            moving: self.moving,
            show_content_markers: true,
            mode_label: self.mode_label(),
            hints: self.hints(),
            message: self.status_message.as_deref(),
            help,
            empty_text: "No nodes yet. Press [a] to add a root node.",
        };
        render::draw(frame, &data);

        if let Some(prompt) = &self.pending_text {
            self.draw_text_prompt(frame, prompt);
        } else if let Some(confirm) = self.pending_confirm {
            self.draw_confirm_prompt(frame, confirm);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let quit = self.apply_key(key)?;
        if let Err(err) = self.session.ensure_saved() {
            self.status_message = Some(format!("{err:#}"));
        }
        Ok(quit)
    }
}

impl<S: Store> EditorApp<S> {
    fn apply_key(&mut self, key: KeyEvent) -> Result<bool> {
        let mode = self.key_mode();
        let action = input::action_for_key(key, mode);

        match mode {
            KeyMode::Text => {
                self.handle_text_input(action);
                return Ok(false);
            }
            KeyMode::Confirm => {
                match (action, self.pending_confirm.take()) {
                    (Action::Confirm, Some(PendingConfirm::Delete { id })) => {
                        self.session.delete(id);
                    }
                    (Action::Noop, pending) => self.pending_confirm = pending,
                    _ => {}
                }
                return Ok(false);
            }
            KeyMode::Move | KeyMode::Browse => {}
        }

        if self.show_help && action != Action::Quit {
            self.show_help = false;
            if action == Action::ToggleHelp || action == Action::Cancel {
                return Ok(false);
            }
        }

        match action {
            Action::Quit => return Ok(true),
            Action::Up => self.step_focus(-1),
            Action::Down => self.step_focus(1),
            Action::Top => self.focus_edge(false),
            Action::Bottom => self.focus_edge(true),
            Action::ToggleOpen => {
                if let Some(id) = self.session.selected() {
                    self.session.toggle_open(id);
                }
            }
            Action::ToggleContent => {
                if let Some(id) = self.session.selected() {
                    self.session.toggle_content_visible(id);
                }
            }
            Action::AddRoot | Action::AddChild | Action::Rename | Action::EditContent => {
                self.begin_text(&action);
            }
            Action::Delete => self.request_delete(),
            Action::StartMove => match self.session.selected() {
                Some(id) => {
                    self.moving = Some(id);
                    self.status_message = None;
                }
                None => self.status_message = Some("select a node first".to_string()),
            },
            Action::DropBefore => self.drop_moving(DropPosition::Before),
            Action::DropAfter => self.drop_moving(DropPosition::After),
            Action::DropInside => self.drop_moving(DropPosition::Inside),
            Action::Search => self.search_focused(),
            Action::ToggleHelp => self.show_help = true,
            Action::Cancel => {
                self.moving = None;
                self.status_message = None;
            }
            _ => {}
        }
        Ok(false)
    }
}
