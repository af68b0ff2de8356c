use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::AppState;
use crate::keys::preset::Action;
use crate::keys::KeybindingMap;
use crate::markdown::{is_allowed_url, Clipboard, PasteEvent};
use crate::suggest::MenuKey;

pub fn handle_key(state: &mut AppState, key: &KeyEvent, keybindings: &KeybindingMap) {
    if state.show_help {
        state.show_help = false;
        return;
    }
    if state.url_prompt.is_some() {
        handle_prompt_key(state, key);
        return;
    }

    let menu_key = keybindings.menu_key(key);
    if menu_key != MenuKey::Other && state.popup_key(menu_key).is_handled() {
        state.after_edit();
        return;
    }

    match keybindings.resolve(key) {
        Some(action @ (Action::ScrollUp | Action::ScrollDown)) => {
            let delta = if action == Action::ScrollUp { -1 } else { 1 };
            state.viewport.scroll_by(delta);
            return;
        }
        Some(action) => handle_action(state, action),
        None => insert_typed(state, key),
    }
    state.after_edit();
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.show_help = true,
        Action::TogglePaste => {
            let enabled = !state.paste.is_enabled();
            state.paste.set_enabled(enabled);
            state.set_status(if enabled {
                "Markdown paste on"
            } else {
                "Markdown paste off"
            });
        }
        Action::ScrollUp | Action::ScrollDown => {}
        Action::CursorLeft => state.editor.borrow_mut().move_left(),
        Action::CursorRight => state.editor.borrow_mut().move_right(),
        Action::CursorUp => state.editor.borrow_mut().move_up(),
        Action::CursorDown => state.editor.borrow_mut().move_down(),
        Action::LineStart => state.editor.borrow_mut().move_home(),
        Action::LineEnd => state.editor.borrow_mut().move_end(),
        Action::SplitBlock => state.editor.borrow_mut().split_block(),
        Action::ExitBlock => {
            if !state.editor.borrow_mut().exit_block() {
                state.set_status("Nothing to exit");
            }
        }
        Action::DeleteBackward => state.editor.borrow_mut().delete_backward(),
    }
}

fn insert_typed(state: &mut AppState, key: &KeyEvent) {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    let text = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Tab => "    ".to_string(),
        _ => return,
    };
    state.editor.borrow_mut().insert_text(&text);
}

fn handle_prompt_key(state: &mut AppState, key: &KeyEvent) {
    let Some(prompt) = state.url_prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => state.url_prompt = None,
        KeyCode::Enter => {
            let url = prompt.input.trim().to_string();
            if is_allowed_url(&url) {
                debug!(%url, "image inserted from prompt");
                state.editor.borrow_mut().set_image(&url, None);
                state.url_prompt = None;
                state.after_edit();
            } else {
                prompt.error = Some("Only http, https and mailto URLs are allowed".into());
            }
        }
        KeyCode::Backspace => {
            prompt.input.pop();
            prompt.error = None;
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            prompt.input.push(c);
            prompt.error = None;
        }
        _ => {}
    }
}

/// Bracketed paste from the terminal. Markdown goes through the paste pipeline;
/// anything it declines is inserted as plain lines.
pub fn handle_paste(state: &mut AppState, text: String) {
    if let Some(prompt) = state.url_prompt.as_mut() {
        prompt.input.push_str(text.trim());
        prompt.error = None;
        return;
    }

    let mut event = PasteEvent::new(Clipboard::plain(text.clone()));
    let outcome = {
        let mut editor = state.editor.borrow_mut();
        state.paste.handle_paste(&mut editor, &mut event)
    };
    if outcome.intercepted {
        state.set_status("Pasted as markdown");
    } else if !event.default_prevented() {
        let mut editor = state.editor.borrow_mut();
        editor.delete_selection();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                editor.split_block();
            }
            editor.insert_text(line.strip_suffix('\r').unwrap_or(line));
        }
    }
    state.after_edit();
}
