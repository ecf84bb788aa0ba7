//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether keystrokes go to a text field or to commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextField,
    PrevField,
    /// Enter: open, start editing, or commit.
    Select,
    Confirm,
    Cancel,
    NewItem,
    EditItem,
    DeleteItem,
    Refresh,
    OpenSearch,
    CycleSubject,
    CycleSort,
    LevelCeiling,
    ClearFilters,
    AddQuestion,
    RemoveQuestion,
    AddChoice,
    RemoveChoice,
    NextStep,
    PrevStep,
    GoToStep(usize),
    Submit,
    InsertChar(char),
    DeleteChar,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('s') => Some(Action::Submit),
            _ => None,
        };
    }

    match mode {
        InputMode::Text => map_text_key(code),
        InputMode::Normal => map_normal_key(code),
    }
}

fn map_text_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Backspace => Some(Action::DeleteChar),
        KeyCode::Char(c) => Some(Action::InsertChar(c)),
        _ => None,
    }
}

fn map_normal_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('y') => Some(Action::Confirm),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('f') => Some(Action::CycleSubject),
        KeyCode::Char('s') => Some(Action::CycleSort),
        KeyCode::Char('m') => Some(Action::LevelCeiling),
        KeyCode::Char('c') => Some(Action::ClearFilters),
        KeyCode::Char('a') => Some(Action::AddQuestion),
        KeyCode::Char('x') => Some(Action::RemoveQuestion),
        KeyCode::Char('+') => Some(Action::AddChoice),
        KeyCode::Char('-') => Some(Action::RemoveChoice),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextStep),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PrevStep),
        KeyCode::Char(c @ '1'..='3') => Some(Action::GoToStep(c as usize - '1' as usize)),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextField),
        KeyCode::BackTab => Some(Action::PrevField),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveRight),
        _ => None,
    }
}
