use serde::Serialize;
use tracing::debug;

use super::convert::markdown_to_fragment;
use super::detect::MarkdownDetector;
use super::lexer::{BlockLexer, PulldownLexer};
use crate::document::{Editor, Fragment};

/// The representations a paste offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Clipboard {
    pub html: Option<String>,
    pub text: Option<String>,
}

impl Clipboard {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }

    pub fn with_html(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasteEvent {
    pub clipboard: Option<Clipboard>,
    default_prevented: bool,
}

impl PasteEvent {
    pub fn new(clipboard: Clipboard) -> Self {
        Self {
            clipboard: Some(clipboard),
            default_prevented: false,
        }
    }

    /// Suppresses the host's own paste handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasteOutcome {
    pub intercepted: bool,
}

/// The decision for one clipboard, computed without touching the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PastePlan {
    pub proceed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<Fragment>,
}

/// Intercepts plain-text pastes that look like markdown and inserts them as
/// structured content.
#[derive(Debug, Clone)]
pub struct MarkdownPaste<L = PulldownLexer> {
    detector: MarkdownDetector<L>,
    enabled: bool,
}

impl Default for MarkdownPaste {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownPaste {
    pub fn new() -> Self {
        Self::with_detector(MarkdownDetector::new())
    }
}

impl<L: BlockLexer> MarkdownPaste<L> {
    pub fn with_detector(detector: MarkdownDetector<L>) -> Self {
        Self {
            detector,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn plan(&self, clipboard: &Clipboard) -> PastePlan {
        if !self.enabled {
            return PastePlan::default();
        }
        if clipboard.html.is_some() {
            debug!("clipboard has html, leaving paste to the editor");
            return PastePlan::default();
        }
        let Some(text) = clipboard.text.as_deref().filter(|t| !t.is_empty()) else {
            return PastePlan::default();
        };
        if !self.detector.classify(text) {
            debug!(len = text.len(), "pasted text is not markdown");
            return PastePlan::default();
        }
        let (sanitized, fragment) = markdown_to_fragment(text);
        PastePlan {
            proceed: true,
            sanitized_html: Some(sanitized),
            fragment: Some(fragment),
        }
    }

    /// Replaces the selection with converted markdown when the paste qualifies.
    pub fn handle_paste(&self, editor: &mut Editor, event: &mut PasteEvent) -> PasteOutcome {
        let plan = match &event.clipboard {
            Some(clipboard) => self.plan(clipboard),
            None => PastePlan::default(),
        };
        let Some(fragment) = plan.fragment.filter(|_| plan.proceed) else {
            return PasteOutcome { intercepted: false };
        };
        debug!(blocks = fragment.nodes().len(), "pasting markdown as structured content");
        editor.replace_selection(fragment);
        event.prevent_default();
        PasteOutcome { intercepted: true }
    }
}

/// Plans a paste with the default detector.
pub fn plan_paste(clipboard: &Clipboard) -> PastePlan {
    MarkdownPaste::new().plan(clipboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;

    #[test]
    fn html_clipboard_is_never_intercepted() {
        let paste = MarkdownPaste::new();
        let mut editor = Editor::new();
        let before = editor.doc().clone();
        let mut event = PasteEvent::new(Clipboard::with_html("<b>x</b>", "# Title\n\n- a"));
        let outcome = paste.handle_paste(&mut editor, &mut event);
        assert!(!outcome.intercepted);
        assert!(!event.default_prevented());
        assert_eq!(*editor.doc(), before);
    }

    #[test]
    fn ordered_list_is_intercepted() {
        let paste = MarkdownPaste::new();
        let mut editor = Editor::new();
        let mut event = PasteEvent::new(Clipboard::plain("1. First\n2. Second"));
        let outcome = paste.handle_paste(&mut editor, &mut event);
        assert!(outcome.intercepted);
        assert!(event.default_prevented());
        assert_eq!(editor.doc().children[0].kind, NodeKind::OrderedList { start: 1 });
    }

    #[test]
    fn prose_is_left_alone() {
        let plan = plan_paste(&Clipboard::plain("just talking normally"));
        assert_eq!(plan, PastePlan::default());
    }

    #[test]
    fn empty_or_missing_text_is_left_alone() {
        assert!(!plan_paste(&Clipboard::plain("")).proceed);
        assert!(!plan_paste(&Clipboard::default()).proceed);

        let paste = MarkdownPaste::new();
        let mut editor = Editor::new();
        let mut event = PasteEvent::default();
        assert!(!paste.handle_paste(&mut editor, &mut event).intercepted);
    }

    #[test]
    fn disabled_paste_passes_through() {
        let mut paste = MarkdownPaste::new();
        paste.set_enabled(false);
        assert!(!paste.plan(&Clipboard::plain("# Title")).proceed);
    }

    #[test]
    fn plan_carries_sanitized_html() {
        let plan = plan_paste(&Clipboard::plain("# Hi\n\n[x](javascript:alert(1))"));
        assert!(plan.proceed);
        let html = plan.sanitized_html.unwrap_or_default();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(!html.contains("javascript"));
    }
}
