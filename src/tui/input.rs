use crossterm::event::{KeyCode, KeyEvent};

/// Which key table is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Browse,
    /// A text prompt has focus.
    Text,
    /// A node is being moved and a drop target is being picked.
    Move,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Top,
    Bottom,
    ToggleOpen,
    ToggleContent,
    AddRoot,
    AddChild,
    Rename,
    EditContent,
    Delete,
    StartMove,
    DropBefore,
    DropAfter,
    DropInside,
    Search,
    ToggleHelp,
    Quit,
    Confirm,
    Cancel,
    SubmitText,
    Backspace,
    CursorLeft,
    CursorRight,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, mode: KeyMode) -> Action {
    match mode {
        KeyMode::Text => match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::CursorLeft,
            KeyCode::Right => Action::CursorRight,
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        },
        KeyMode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Action::Confirm,
            KeyCode::Char('n') | KeyCode::Esc | KeyCode::Backspace => Action::Cancel,
            _ => Action::Noop,
        },
        KeyMode::Move => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::Up,
            KeyCode::Down | KeyCode::Char('j') => Action::Down,
            KeyCode::Char('b') => Action::DropBefore,
            KeyCode::Char('a') => Action::DropAfter,
            KeyCode::Char('i') | KeyCode::Enter => Action::DropInside,
            KeyCode::Esc | KeyCode::Backspace => Action::Cancel,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::Noop,
        },
        KeyMode::Browse => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::Up,
            KeyCode::Down | KeyCode::Char('j') => Action::Down,
            KeyCode::Home | KeyCode::Char('g') => Action::Top,
            KeyCode::End | KeyCode::Char('G') => Action::Bottom,
            KeyCode::Enter | KeyCode::Char(' ') => Action::ToggleOpen,
            KeyCode::Char('c') => Action::ToggleContent,
            KeyCode::Char('a') => Action::AddRoot,
            KeyCode::Char('n') => Action::AddChild,
            KeyCode::Char('r') => Action::Rename,
            KeyCode::Char('e') => Action::EditContent,
            KeyCode::Char('D') | KeyCode::Delete => Action::Delete,
            KeyCode::Char('m') => Action::StartMove,
            KeyCode::Char('/') => Action::Search,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc => Action::Cancel,
            _ => Action::Noop,
        },
    }
}
