use std::rc::Rc;

use crate::config::AppConfig;
use crate::document::{Editor, EditorHandle, Fragment, NodeKind, Prompt};
use crate::markdown::MarkdownPaste;
use crate::mention::MentionMenu;
use crate::slash::SlashMenu;
use crate::suggest::{
    AnchorProvider, AnchorRect, KeyOutcome, MenuKey, PluginHost, SuggestionPlugin, Viewport,
    ViewportSurface,
};
use crate::ui::document_view::CursorGeometry;
use crate::ui::menu::{OverlayLayer, TerminalMenuFactory};

/// Ticks a status message stays up (250ms each).
const STATUS_TICKS: u8 = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPrompt {
    pub input: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Key(crossterm::event::KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

pub struct AppState {
    pub title: String,
    pub editor: EditorHandle,
    pub slash: SuggestionPlugin<SlashMenu, TerminalMenuFactory>,
    pub mentions: SuggestionPlugin<MentionMenu, TerminalMenuFactory>,
    pub paste: MarkdownPaste,
    pub overlay: OverlayLayer,
    pub viewport: Rc<Viewport>,
    pub geometry: Rc<CursorGeometry>,
    pub host: PluginHost,
    pub hints: Vec<(String, &'static str)>,
    pub status_message: Option<String>,
    status_ttl: u8,
    pub url_prompt: Option<UrlPrompt>,
    pub show_help: bool,
    /// Scroll the viewport to the cursor after the next paint.
    pub follow_cursor: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        title: &str,
        hints: Vec<(String, &'static str)>,
        seed: Option<Fragment>,
    ) -> Self {
        let editor = match seed {
            Some(fragment) if !fragment.is_empty() => Editor::from_fragment(fragment),
            _ => Editor::new(),
        };
        let overlay = OverlayLayer::new();
        let viewport = Rc::new(Viewport::new());
        let geometry = Rc::new(CursorGeometry::default());
        let host = PluginHost {
            anchor: cursor_anchor(&geometry, &viewport),
            surface: Rc::new(ViewportSurface {
                scroll_parent: Some(Rc::clone(&viewport)),
                root: Rc::new(Viewport::new()),
            }),
        };

        let max_visible = config.popup.max_visible as usize;
        let slash = SuggestionPlugin::new(
            SlashMenu,
            TerminalMenuFactory::new(overlay.clone(), " Commands ", max_visible),
            config.popup.gap,
        );
        let mentions = SuggestionPlugin::new(
            MentionMenu::new(config.mention.members.clone())
                .with_max_suggestions(config.mention.max_suggestions),
            TerminalMenuFactory::new(overlay.clone(), " Mentions ", max_visible),
            config.popup.gap,
        );
        let mut paste = MarkdownPaste::new();
        paste.set_enabled(config.paste.markdown);

        Self {
            title: title.to_string(),
            editor: EditorHandle::new(editor),
            slash,
            mentions,
            paste,
            overlay,
            viewport,
            geometry,
            host,
            hints,
            status_message: None,
            status_ttl: 0,
            url_prompt: None,
            show_help: false,
            follow_cursor: true,
            should_quit: false,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ttl = STATUS_TICKS;
    }

    pub fn tick(&mut self) {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }
    }

    /// Offers a key to whichever popup is open.
    pub fn popup_key(&mut self, key: MenuKey) -> KeyOutcome {
        if self.slash.is_active() {
            self.slash.handle_key(key, &self.editor, &self.host)
        } else if self.mentions.is_active() {
            self.mentions.handle_key(key, &self.editor, &self.host)
        } else {
            KeyOutcome::NotHandled
        }
    }

    /// Bookkeeping after anything that may have changed the document or cursor.
    pub fn after_edit(&mut self) {
        if let Some(Prompt::ImageUrl) = self.editor.borrow_mut().take_prompt() {
            self.url_prompt = Some(UrlPrompt::default());
        }
        self.slash.sync(&self.editor, &self.host);
        self.mentions.sync(&self.editor, &self.host);
        self.follow_cursor = true;
    }

    /// Runs once the frame is on screen. Returns true when another paint is needed.
    pub fn after_paint(&mut self) -> bool {
        let mut dirty = false;
        if std::mem::take(&mut self.follow_cursor) {
            dirty |= self.scroll_to_cursor();
        }
        dirty |= self.slash.controller_mut().on_paint();
        dirty |= self.mentions.controller_mut().on_paint();
        dirty
    }

    fn scroll_to_cursor(&self) -> bool {
        let Some(line) = self.geometry.cursor_line() else {
            return false;
        };
        let height = self.geometry.area().height;
        let offset = self.viewport.offset();
        let target = if line < offset {
            line
        } else if height > 0 && line >= offset + height {
            line + 1 - height
        } else {
            return false;
        };
        self.viewport.scroll_to(target);
        true
    }

    pub fn block_label(&self) -> String {
        let editor = self.editor.borrow();
        match editor.current_block().map(|b| &b.kind) {
            Some(NodeKind::Heading { level }) => format!("Heading {level}"),
            Some(NodeKind::CodeBlock { language: Some(lang) }) => format!("Code ({lang})"),
            Some(NodeKind::CodeBlock { language: None }) => "Code".to_string(),
            Some(NodeKind::TableCell { .. }) => "Table".to_string(),
            Some(_) => "Paragraph".to_string(),
            None => String::new(),
        }
    }
}

fn cursor_anchor(geometry: &Rc<CursorGeometry>, viewport: &Rc<Viewport>) -> AnchorProvider {
    let geometry = Rc::clone(geometry);
    let viewport = Rc::clone(viewport);
    Rc::new(move || {
        geometry
            .screen_cell(viewport.offset())
            .map(|(x, y)| AnchorRect::cell(x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_helpers::test_state;
    use ratatui::layout::Rect;

    #[test]
    fn seeds_editor_from_fragment() {
        let fragment = Fragment::new(vec![crate::document::Node::heading(1, "Seeded")]);
        let state = AppState::new(&AppConfig::default(), "t", vec![], Some(fragment));
        assert_eq!(state.editor.borrow().doc().text_content(), "Seeded");
        assert_eq!(state.block_label(), "Heading 1");
    }

    #[test]
    fn paste_toggle_follows_config() {
        let mut config = AppConfig::default();
        config.paste.markdown = false;
        let state = AppState::new(&config, "t", vec![], None);
        assert!(!state.paste.is_enabled());
    }

    #[test]
    fn status_message_expires_after_ticks() {
        let mut state = test_state();
        state.set_status("hello");
        for _ in 0..STATUS_TICKS - 1 {
            state.tick();
        }
        assert_eq!(state.status_message.as_deref(), Some("hello"));
        state.tick();
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn anchor_follows_viewport_scroll() {
        let state = test_state();
        state.geometry.record(Rect::new(0, 1, 40, 10), Some((4, 6)));
        assert_eq!((state.host.anchor)(), Some(AnchorRect::cell(6, 5)));
        state.viewport.scroll_to(2);
        assert_eq!((state.host.anchor)(), Some(AnchorRect::cell(6, 3)));
        state.viewport.scroll_to(5);
        assert_eq!((state.host.anchor)(), None);
    }

    #[test]
    fn after_paint_scrolls_cursor_into_view() {
        let mut state = test_state();
        state.geometry.record(Rect::new(0, 1, 40, 5), Some((9, 0)));
        state.follow_cursor = true;
        assert!(state.after_paint());
        assert_eq!(state.viewport.offset(), 5);
        assert!(!state.after_paint());
    }
}
