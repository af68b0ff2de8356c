use std::ops::Range;

use tracing::debug;

use super::trigger::TriggerConfig;
use super::view::MenuEntry;
use crate::document::{Editor, WeakEditor};

/// The text typed after the trigger character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext<'a> {
    pub query: &'a str,
}

/// Where the trigger and its query sit: a textblock path plus an offset range in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRange {
    pub path: Vec<usize>,
    pub range: Range<usize>,
}

/// Everything an item command needs to mutate the editor safely.
#[derive(Debug, Clone)]
pub struct InsertionContext {
    pub editor: WeakEditor,
    pub range: TriggerRange,
    pub trigger: char,
}

impl InsertionContext {
    /// Runs `f` if the editor is still alive and the range still starts with the trigger.
    /// A command that outlives its popup (or the editor) becomes a no-op.
    pub fn apply<R>(&self, f: impl FnOnce(&mut Editor, &TriggerRange) -> R) -> Option<R> {
        self.editor
            .with_live(|editor| {
                let chars = editor.chars_in(&self.range.path, self.range.range.clone())?;
                if chars.first() != Some(&self.trigger) {
                    debug!(range = ?self.range, "trigger range no longer valid, skipping command");
                    return None;
                }
                Some(f(editor, &self.range))
            })
            .flatten()
    }
}

/// A popup feature (slash commands, mentions): what triggers it, what it lists,
/// and what picking an item does.
pub trait SuggestionAdapter {
    type Item: Clone + MenuEntry + 'static;

    fn trigger(&self) -> TriggerConfig;

    fn items(&self, ctx: &QueryContext<'_>) -> Vec<Self::Item>;

    fn command(&self, item: &Self::Item, ctx: &InsertionContext);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{EditorHandle, Fragment, Node};

    fn context(handle: &EditorHandle, range: Range<usize>) -> InsertionContext {
        InsertionContext {
            editor: handle.downgrade(),
            range: TriggerRange {
                path: vec![0],
                range,
            },
            trigger: '/',
        }
    }

    #[test]
    fn apply_runs_against_live_editor() {
        let handle = EditorHandle::new(Editor::from_fragment(Fragment::new(vec![
            Node::paragraph("/h1"),
        ])));
        let ctx = context(&handle, 0..3);
        let applied = ctx.apply(|editor, range| editor.delete_range(&range.path, range.range.clone()));
        assert_eq!(applied, Some(true));
        assert_eq!(handle.borrow().doc().text_content(), "");
    }

    #[test]
    fn apply_skips_when_range_lost_its_trigger() {
        let handle = EditorHandle::new(Editor::from_fragment(Fragment::new(vec![
            Node::paragraph("xh1"),
        ])));
        let ctx = context(&handle, 0..3);
        assert_eq!(ctx.apply(|_, _| ()), None);
    }

    #[test]
    fn apply_skips_after_editor_dropped() {
        let handle = EditorHandle::new(Editor::new());
        let ctx = context(&handle, 0..1);
        drop(handle);
        assert_eq!(ctx.apply(|_, _| ()), None);
    }
}
