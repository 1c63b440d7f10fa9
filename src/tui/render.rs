use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::outline::model::{Forest, Node, NodeId, ViewState};

/// One visible accordion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
    pub title: String,
    pub has_children: bool,
    pub open: bool,
    /// Content paragraph, present only while the node's content is visible.
    pub content: Option<String>,
}

/// Flatten the forest into visible rows, skipping children of closed nodes.
pub fn visible_rows(forest: &Forest, view: &ViewState, with_content: bool) -> Vec<Row> {
    let mut rows = Vec::new();
    push_rows(&forest.roots, 0, view, with_content, &mut rows);
    rows
}

fn push_rows(
    nodes: &[Node],
    depth: usize,
    view: &ViewState,
    with_content: bool,
    out: &mut Vec<Row>,
) {
    for node in nodes {
        let open = view.is_open(node.id);
        out.push(Row {
            id: node.id,
            depth,
            title: node.title.clone(),
            has_children: node.has_children(),
            open,
            content: (with_content && view.is_content_visible(node.id))
                .then(|| node.content.clone()),
        });
        if open {
            push_rows(&node.children, depth + 1, view, with_content, out);
        }
    }
}

pub struct RenderData<'a> {
    pub heading: &'a str,
    pub rows: &'a [Row],
    pub focused: Option<NodeId>,
    /// Node being moved, if a move is in progress.
    pub moving: Option<NodeId>,
    pub show_content_markers: bool,
    pub mode_label: &'a str,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub help: Option<&'a [&'a str]>,
    /// Shown in place of the tree when there are no rows.
    pub empty_text: &'a str,
}

pub fn draw(frame: &mut Frame, data: &RenderData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 2,
        vertical: 1,
    });

    let mut title_spans = vec![
        Span::styled(data.heading, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ];
    let border_color = if data.moving.is_some() {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            "[MOVE]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(border_color))
        .padding(Padding::new(2, 2, 1, 1))
        .title(Line::from(title_spans));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [tree_area, _gap, status_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(inner);

    if data.rows.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                data.empty_text,
                Style::default().fg(Color::DarkGray),
            ))),
            tree_area,
        );
    } else {
        let (lines, focus_line) = build_tree_lines(data);
        let height = usize::from(tree_area.height.max(1));
        let offset = focus_line
            .filter(|line| *line >= height)
            .map_or(0, |line| line + 1 - height);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), tree_area);
    }

    frame.render_widget(Paragraph::new(status_lines(data)), status_area);

    if let Some(help) = data.help {
        render_help_overlay(frame, help);
    }
}

/// Lines for the tree pane and the index of the focused row's line.
fn build_tree_lines(data: &RenderData<'_>) -> (Vec<Line<'static>>, Option<usize>) {
    let mut lines = Vec::new();
    let mut focus_line = None;

    for row in data.rows {
        let indent = "  ".repeat(row.depth);
        let toggle = match (row.has_children, row.open) {
            (false, _) => " ",
            (true, true) => "-",
            (true, false) => "+",
        };
        let focused = data.focused == Some(row.id);
        if focused {
            focus_line = Some(lines.len());
        }
        let title_style = if data.moving == Some(row.id) {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let mut spans = vec![
            Span::raw(indent.clone()),
            Span::styled(format!("{toggle} "), Style::default().fg(Color::Cyan)),
        ];
        if data.show_content_markers {
            let marker = if row.content.is_some() { "v " } else { "> " };
            spans.push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(row.title.clone(), title_style));
        lines.push(Line::from(spans));

        if let Some(content) = &row.content {
            let body_style = Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC);
            if content.is_empty() {
                lines.push(Line::from(vec![
                    Span::raw(format!("{indent}    ")),
                    Span::styled("(empty)", Style::default().fg(Color::DarkGray)),
                ]));
            }
            for text in content.lines() {
                lines.push(Line::from(vec![
                    Span::raw(format!("{indent}    ")),
                    Span::styled(text.to_string(), body_style),
                ]));
            }
        }
    }

    (lines, focus_line)
}

fn status_lines<'a>(data: &RenderData<'a>) -> Vec<Line<'a>> {
    let focused = data
        .focused
        .and_then(|id| data.rows.iter().find(|r| r.id == id))
        .map(|r| format!("{} (#{})", r.title, r.id))
        .unwrap_or_else(|| "none".to_string());
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                data.mode_label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("node: ", Style::default().fg(Color::DarkGray)),
            Span::raw(focused),
        ]),
        Line::from(Span::styled(data.hints, Style::default().fg(Color::DarkGray))),
    ];
    if let Some(message) = data.message {
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

fn render_help_overlay(frame: &mut Frame, help: &[&str]) {
    let area = centered_rect(frame.area(), 70, 70);
    frame.render_widget(Clear, area);
    let lines = help.iter().map(|l| Line::from(*l)).collect::<Vec<_>>();
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

/// A single-line text field with a block caret at `cursor` (a char index).
pub fn line_with_cursor(
    text: &str,
    cursor: usize,
    text_style: Style,
    caret_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    let clamped = cursor.min(text.chars().count());
    let split = byte_index_for_cursor(text, clamped);
    let (left, right) = text.split_at(split);
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

pub fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
