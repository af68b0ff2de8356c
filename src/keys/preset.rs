use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    Help,
    TogglePaste,
    ScrollUp,
    ScrollDown,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    LineStart,
    LineEnd,
    SplitBlock,
    ExitBlock,
    DeleteBackward,
}

impl Action {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quit" => Some(Self::Quit),
            "help" => Some(Self::Help),
            "toggle_paste" => Some(Self::TogglePaste),
            "scroll_up" => Some(Self::ScrollUp),
            "scroll_down" => Some(Self::ScrollDown),
            "cursor_left" => Some(Self::CursorLeft),
            "cursor_right" => Some(Self::CursorRight),
            "cursor_up" => Some(Self::CursorUp),
            "cursor_down" => Some(Self::CursorDown),
            "line_start" => Some(Self::LineStart),
            "line_end" => Some(Self::LineEnd),
            "split_block" => Some(Self::SplitBlock),
            "exit_block" => Some(Self::ExitBlock),
            "delete_backward" => Some(Self::DeleteBackward),
            _ => None,
        }
    }

    pub fn hint_text(&self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Help => "help",
            Self::TogglePaste => "md paste",
            Self::ScrollUp => "scroll up",
            Self::ScrollDown => "scroll down",
            Self::CursorLeft => "left",
            Self::CursorRight => "right",
            Self::CursorUp => "up",
            Self::CursorDown => "down",
            Self::LineStart => "line start",
            Self::LineEnd => "line end",
            Self::SplitBlock => "new block",
            Self::ExitBlock => "exit block",
            Self::DeleteBackward => "delete",
        }
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn alt(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
}

pub fn default_preset() -> HashMap<KeyEvent, Action> {
    let mut m = HashMap::new();
    m.insert(ctrl('q'), Action::Quit);
    m.insert(key(KeyCode::F(1)), Action::Help);
    m.insert(ctrl('t'), Action::TogglePaste);
    m.insert(KeyEvent::new(KeyCode::Up, KeyModifiers::CONTROL), Action::ScrollUp);
    m.insert(KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL), Action::ScrollDown);
    m.insert(key(KeyCode::PageUp), Action::ScrollUp);
    m.insert(key(KeyCode::PageDown), Action::ScrollDown);
    m.insert(key(KeyCode::Left), Action::CursorLeft);
    m.insert(key(KeyCode::Right), Action::CursorRight);
    m.insert(key(KeyCode::Up), Action::CursorUp);
    m.insert(key(KeyCode::Down), Action::CursorDown);
    m.insert(key(KeyCode::Home), Action::LineStart);
    m.insert(key(KeyCode::End), Action::LineEnd);
    m.insert(key(KeyCode::Enter), Action::SplitBlock);
    m.insert(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT), Action::ExitBlock);
    m.insert(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT), Action::ExitBlock);
    m.insert(key(KeyCode::Backspace), Action::DeleteBackward);
    m
}

pub fn emacs_preset() -> HashMap<KeyEvent, Action> {
    let mut m = default_preset();
    m.insert(ctrl('b'), Action::CursorLeft);
    m.insert(ctrl('f'), Action::CursorRight);
    m.insert(ctrl('p'), Action::CursorUp);
    m.insert(ctrl('n'), Action::CursorDown);
    m.insert(ctrl('a'), Action::LineStart);
    m.insert(ctrl('e'), Action::LineEnd);
    m.insert(ctrl('h'), Action::DeleteBackward);
    m.insert(alt('v'), Action::ScrollUp);
    m.insert(ctrl('v'), Action::ScrollDown);
    m
}

pub fn get_preset(name: &str) -> Option<HashMap<KeyEvent, Action>> {
    match name.to_lowercase().as_str() {
        "default" => Some(default_preset()),
        "emacs" => Some(emacs_preset()),
        _ => None,
    }
}
