//! Parser and writer for indented outline text.
//!
//! One title per line; nesting is carried purely by leading whitespace. The
//! text form is lossy by design: node content and view state are not
//! represented, so `serialize(parse(t))` preserves titles and structure only.

use crate::outline::model::{Forest, IdCounter, Node};

/// Columns a tab counts for when comparing indentation.
pub const TAB_WIDTH: usize = 4;

const BOM: char = '\u{feff}';

/// Indentation unit written by [`serialize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    #[default]
    Tab,
    /// [`TAB_WIDTH`] spaces per level.
    Spaces,
}

impl IndentStyle {
    fn unit(self) -> &'static str {
        match self {
            Self::Tab => "\t",
            Self::Spaces => "    ",
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse indented text into a fresh forest.
///
/// Every node receives a newly issued id from `ids`. Blank lines are dropped
/// before indentation is considered. Indentation is never validated: a line
/// becomes a child of the closest preceding line with a strictly smaller
/// indent, however deep it jumps. Input without any non-blank line yields an
/// empty forest.
pub fn parse(text: &str, ids: &mut IdCounter) -> Forest {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut roots = Vec::new();
    // Open ancestor chain, innermost last.
    let mut stack: Vec<(Node, usize)> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let title = line.trim();
        if title.is_empty() {
            continue;
        }
        let indent = indent_width(line);

        while stack.last().is_some_and(|(_, open)| *open >= indent) {
            close_innermost(&mut stack, &mut roots);
        }
        stack.push((Node::new(ids.issue(), title), indent));
    }
    while !stack.is_empty() {
        close_innermost(&mut stack, &mut roots);
    }

    Forest::from_roots(roots)
}

/// Leading indentation of `line` in columns, counting a tab as [`TAB_WIDTH`].
pub fn indent_width(line: &str) -> usize {
    line.chars()
        .map_while(|c| match c {
            ' ' => Some(1),
            '\t' => Some(TAB_WIDTH),
            _ => None,
        })
        .sum()
}

/// Pop the innermost open node and attach it to its parent (or the roots).
fn close_innermost(stack: &mut Vec<(Node, usize)>, roots: &mut Vec<Node>) {
    if let Some((node, _)) = stack.pop() {
        match stack.last_mut() {
            Some((parent, _)) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Serialise with one tab per level.
pub fn serialize(forest: &Forest) -> String {
    serialize_with(forest, IndentStyle::Tab)
}

/// Serialise depth-first, one newline-terminated title per node.
pub fn serialize_with(forest: &Forest, style: IndentStyle) -> String {
    let mut out = String::new();
    for (depth, node) in forest.walk() {
        for _ in 0..depth {
            out.push_str(style.unit());
        }
        out.push_str(&node.title);
        out.push('\n');
    }
    out
}
