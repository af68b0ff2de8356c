use std::rc::Rc;

use tracing::debug;

use super::adapter::{InsertionContext, QueryContext, SuggestionAdapter, TriggerRange};
use super::controller::{
    Commit, KeyOutcome, MenuKey, StartContext, SuggestionController, UpdateContext,
};
use super::position::{AnchorProvider, EditorSurface};
use super::trigger::find_trigger;
use super::view::ViewFactory;
use crate::document::EditorHandle;

/// What the host supplies so a popup can follow the cursor.
#[derive(Clone)]
pub struct PluginHost {
    pub anchor: AnchorProvider,
    pub surface: Rc<dyn EditorSurface>,
}

/// Binds an adapter to a controller: watches the text before the cursor for the
/// adapter's trigger and opens, refilters or closes the popup accordingly.
pub struct SuggestionPlugin<A, F>
where
    A: SuggestionAdapter,
    F: ViewFactory<A::Item>,
{
    adapter: Rc<A>,
    controller: SuggestionController<A::Item, F>,
    active: Option<TriggerRange>,
    /// Trigger start the user closed with Escape; stays closed until the trigger goes away.
    dismissed: Option<(Vec<usize>, usize)>,
}

impl<A, F> SuggestionPlugin<A, F>
where
    A: SuggestionAdapter + 'static,
    F: ViewFactory<A::Item>,
    F::View: 'static,
{
    pub fn new(adapter: A, factory: F, gap: u16) -> Self {
        Self {
            adapter: Rc::new(adapter),
            controller: SuggestionController::with_gap(factory, gap),
            active: None,
            dismissed: None,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn controller(&self) -> &SuggestionController<A::Item, F> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SuggestionController<A::Item, F> {
        &mut self.controller
    }

    pub fn is_active(&self) -> bool {
        self.controller.is_active()
    }

    pub fn active_range(&self) -> Option<&TriggerRange> {
        self.active.as_ref()
    }

    /// Re-evaluates the trigger after the document or the cursor changed.
    pub fn sync(&mut self, editor: &EditorHandle, host: &PluginHost) {
        let trigger = self.adapter.trigger();
        let found = {
            let editor = editor.borrow();
            if editor.selection().is_empty() {
                find_trigger(&editor.chars_before_cursor(), editor.cursor_offset(), trigger)
                    .map(|m| (editor.selection().path.clone(), m))
            } else {
                None
            }
        };

        let Some((path, found)) = found else {
            self.dismissed = None;
            self.exit();
            return;
        };
        if self
            .dismissed
            .as_ref()
            .is_some_and(|(p, start)| *p == path && *start == found.range.start)
        {
            return;
        }
        self.dismissed = None;

        let range = TriggerRange {
            path,
            range: found.range,
        };
        if self.active.as_ref() == Some(&range) && self.controller.is_active() {
            return;
        }
        let items = self.adapter.items(&QueryContext { query: &found.query });
        let commit = self.commit_for(editor, range.clone());
        let same_trigger = self
            .active
            .as_ref()
            .is_some_and(|r| r.path == range.path && r.range.start == range.range.start);

        if same_trigger && self.controller.is_active() {
            self.controller.on_update(UpdateContext {
                items,
                commit,
                anchor: Some(Rc::clone(&host.anchor)),
            });
        } else {
            debug!(trigger = %trigger.char, query = %found.query, "trigger detected");
            self.controller.on_start(StartContext {
                items,
                selected: None,
                commit,
                anchor: Rc::clone(&host.anchor),
                surface: Rc::clone(&host.surface),
            });
        }
        self.active = Some(range);
    }

    fn commit_for(&self, editor: &EditorHandle, range: TriggerRange) -> Commit<A::Item> {
        let adapter = Rc::clone(&self.adapter);
        let ctx = InsertionContext {
            editor: editor.downgrade(),
            range,
            trigger: adapter.trigger().char,
        };
        Rc::new(move |item: &A::Item| adapter.command(item, &ctx))
    }

    /// Routes a key to the open popup. Escape closes it; Enter commits and re-syncs.
    pub fn handle_key(&mut self, key: MenuKey, editor: &EditorHandle, host: &PluginHost) -> KeyOutcome {
        let outcome = self.controller.on_key_down(key);
        if !outcome.is_handled() {
            return outcome;
        }
        match key {
            MenuKey::Escape => {
                self.dismissed = self.active.take().map(|r| (r.path, r.range.start));
                self.controller.on_exit();
            }
            MenuKey::Enter => self.sync(editor, host),
            _ => {}
        }
        outcome
    }

    /// Commits the row at `index`, as a click on it does.
    pub fn select(&mut self, index: usize, editor: &EditorHandle, host: &PluginHost) {
        self.controller.select(index);
        self.sync(editor, host);
    }

    pub fn exit(&mut self) {
        self.active = None;
        self.controller.on_exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Editor;
    use crate::suggest::position::{AnchorRect, PopupPosition, Viewport, ViewportSurface};
    use crate::suggest::trigger::TriggerConfig;
    use crate::suggest::view::{MenuEntry, MenuProps, PopupView, Size};

    #[derive(Debug, Clone, PartialEq)]
    struct Word(&'static str);

    impl MenuEntry for Word {
        fn title(&self) -> &str {
            self.0
        }
    }

    struct Words;

    impl SuggestionAdapter for Words {
        type Item = Word;

        fn trigger(&self) -> TriggerConfig {
            TriggerConfig::new('#')
        }

        fn items(&self, ctx: &QueryContext<'_>) -> Vec<Word> {
            ["alpha", "beta", "gamma"]
                .into_iter()
                .filter(|w| w.contains(ctx.query))
                .map(Word)
                .collect()
        }

        fn command(&self, item: &Word, ctx: &InsertionContext) {
            ctx.apply(|editor, range| {
                editor.delete_range(&range.path, range.range.clone());
                editor.insert_text(item.0);
            });
        }
    }

    struct NullView;

    impl PopupView<Word> for NullView {
        fn mount(&mut self, _props: MenuProps<Word>) {}
        fn unmount(&mut self) {}
        fn rendered_size(&self) -> Option<Size> {
            Some(Size::default())
        }
        fn place(&mut self, _position: PopupPosition) {}
        fn reveal(&mut self, _index: usize) {}
    }

    struct NullFactory;

    impl ViewFactory<Word> for NullFactory {
        type View = NullView;
        fn create(&self) -> NullView {
            NullView
        }
    }

    fn host() -> PluginHost {
        PluginHost {
            anchor: Rc::new(|| Some(AnchorRect::cell(0, 0))),
            surface: Rc::new(ViewportSurface {
                scroll_parent: None,
                root: Rc::new(Viewport::new()),
            }),
        }
    }

    fn type_text(
        plugin: &mut SuggestionPlugin<Words, NullFactory>,
        editor: &EditorHandle,
        host: &PluginHost,
        text: &str,
    ) {
        for c in text.chars() {
            editor.borrow_mut().insert_text(&c.to_string());
            plugin.sync(editor, host);
        }
    }

    #[test]
    fn typing_trigger_opens_and_filters() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);

        type_text(&mut plugin, &editor, &host, "#");
        assert!(plugin.is_active());
        assert_eq!(plugin.controller().items_len(), 3);

        type_text(&mut plugin, &editor, &host, "et");
        assert_eq!(plugin.controller().items_len(), 1);
        assert_eq!(plugin.active_range().map(|r| r.range.clone()), Some(0..3));
    }

    #[test]
    fn whitespace_closes_popup() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);
        type_text(&mut plugin, &editor, &host, "#al ");
        assert!(!plugin.is_active());
    }

    #[test]
    fn enter_runs_command_and_closes() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);
        type_text(&mut plugin, &editor, &host, "x #ga");

        let outcome = plugin.handle_key(MenuKey::Enter, &editor, &host);
        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(editor.borrow().doc().text_content(), "x gamma");
        assert!(!plugin.is_active());
    }

    #[test]
    fn escape_dismisses_until_trigger_is_gone() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);
        type_text(&mut plugin, &editor, &host, "#a");

        assert!(plugin.handle_key(MenuKey::Escape, &editor, &host).is_handled());
        assert!(!plugin.is_active());

        type_text(&mut plugin, &editor, &host, "l");
        assert!(!plugin.is_active());

        type_text(&mut plugin, &editor, &host, " #");
        assert!(plugin.is_active());
    }

    #[test]
    fn other_keys_fall_through() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);
        type_text(&mut plugin, &editor, &host, "#");
        assert_eq!(
            plugin.handle_key(MenuKey::Other, &editor, &host),
            KeyOutcome::NotHandled
        );
        assert!(plugin.is_active());
    }

    #[test]
    fn click_selects_row() {
        let editor = EditorHandle::new(Editor::new());
        let host = host();
        let mut plugin = SuggestionPlugin::new(Words, NullFactory, 1);
        type_text(&mut plugin, &editor, &host, "#");
        plugin.select(1, &editor, &host);
        assert_eq!(editor.borrow().doc().text_content(), "beta");
        assert!(!plugin.is_active());
    }
}
