use std::cell::{Cell, RefCell};
use std::rc::Rc;

use editor_assist::document::{Editor, EditorHandle, Fragment, Node, NodeKind};
use editor_assist::mention::{Member, MentionMenu};
use editor_assist::slash::SlashMenu;
use editor_assist::suggest::{
    AnchorRect, InsertionContext, MenuEntry, MenuKey, MenuProps, PluginHost, PopupPosition,
    PopupView, QueryContext, Size, SuggestionAdapter, SuggestionPlugin, TriggerConfig, TriggerRange,
    ViewFactory, Viewport, ViewportSurface,
};

/// What a popup was told to do, shared between the test and the view it spawned.
#[derive(Default)]
struct Screen {
    mounted: Cell<bool>,
    titles: RefCell<Vec<String>>,
    selected: Cell<usize>,
    placed: Cell<Option<PopupPosition>>,
    painted: Cell<bool>,
}

struct ScreenView(Rc<Screen>);

impl<T: MenuEntry> PopupView<T> for ScreenView {
    fn mount(&mut self, props: MenuProps<T>) {
        self.0.mounted.set(true);
        *self.0.titles.borrow_mut() = props.items.iter().map(|i| i.title().to_string()).collect();
        self.0.selected.set(props.selected);
    }

    fn unmount(&mut self) {
        self.0.mounted.set(false);
        self.0.placed.set(None);
    }

    fn rendered_size(&self) -> Option<Size> {
        self.0.painted.get().then_some(Size {
            width: 20,
            height: 5,
        })
    }

    fn place(&mut self, position: PopupPosition) {
        self.0.placed.set(Some(position));
    }

    fn reveal(&mut self, _index: usize) {}
}

struct ScreenFactory(Rc<Screen>);

impl<T: MenuEntry> ViewFactory<T> for ScreenFactory {
    type View = ScreenView;

    fn create(&self) -> ScreenView {
        ScreenView(Rc::clone(&self.0))
    }
}

struct Fixture {
    editor: EditorHandle,
    viewport: Rc<Viewport>,
    host: PluginHost,
    screen: Rc<Screen>,
}

/// The cursor is drawn at (column = offset, row = 5 - scroll).
fn fixture(editor: Editor) -> Fixture {
    let editor = EditorHandle::new(editor);
    let viewport = Rc::new(Viewport::new());
    let anchor_editor = editor.downgrade();
    let anchor_viewport = Rc::clone(&viewport);
    let host = PluginHost {
        anchor: Rc::new(move || {
            let col = anchor_editor.with_live(|e| e.cursor_offset() as u16)?;
            let row = 5u16.checked_sub(anchor_viewport.offset())?;
            Some(AnchorRect::cell(col, row))
        }),
        surface: Rc::new(ViewportSurface {
            scroll_parent: Some(Rc::clone(&viewport)),
            root: Rc::new(Viewport::new()),
        }),
    };
    Fixture {
        editor,
        viewport,
        host,
        screen: Rc::new(Screen::default()),
    }
}

fn type_into<A>(f: &Fixture, plugin: &mut SuggestionPlugin<A, ScreenFactory>, text: &str)
where
    A: SuggestionAdapter + 'static,
{
    for c in text.chars() {
        f.editor.borrow_mut().insert_text(&c.to_string());
        plugin.sync(&f.editor, &f.host);
    }
}

fn team() -> MentionMenu {
    MentionMenu::new(vec![
        Member::new("u1", "Ada Lovelace"),
        Member::new("u2", "Alan Turing"),
        Member::new("u3", "Grace Hopper"),
    ])
}

#[test]
fn popup_is_placed_only_after_paint() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(SlashMenu, ScreenFactory(Rc::clone(&f.screen)), 1);

    type_into(&f, &mut plugin, "/");
    assert!(f.screen.mounted.get());
    assert!(plugin.controller().placement_pending());
    assert!(!plugin.controller_mut().on_paint());
    assert_eq!(f.screen.placed.get(), None);

    f.screen.painted.set(true);
    assert!(plugin.controller_mut().on_paint());
    assert_eq!(f.screen.placed.get(), Some(PopupPosition { left: 1, top: 7 }));
    assert!(!plugin.controller_mut().on_paint());
}

#[test]
fn scrolling_moves_open_popup_and_stops_after_exit() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(team(), ScreenFactory(Rc::clone(&f.screen)), 1);
    f.screen.painted.set(true);

    type_into(&f, &mut plugin, "@a");
    plugin.controller_mut().on_paint();
    assert_eq!(f.screen.placed.get().map(|p| p.top), Some(7));
    assert_eq!(f.viewport.listener_count(), 1);

    f.viewport.scroll_to(2);
    assert_eq!(f.screen.placed.get().map(|p| p.top), Some(5));

    plugin.exit();
    assert_eq!(f.viewport.listener_count(), 0);
    assert!(!f.screen.mounted.get());
}

#[test]
fn typing_refilters_and_resets_selection() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(team(), ScreenFactory(Rc::clone(&f.screen)), 1);

    type_into(&f, &mut plugin, "@a");
    assert_eq!(f.screen.titles.borrow().len(), 3);
    plugin.handle_key(MenuKey::ArrowDown, &f.editor, &f.host);
    assert_eq!(f.screen.selected.get(), 1);

    type_into(&f, &mut plugin, "d");
    assert_eq!(*f.screen.titles.borrow(), vec!["Ada Lovelace"]);
    assert_eq!(f.screen.selected.get(), 0);
}

#[test]
fn arrow_keys_wrap_around() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(team(), ScreenFactory(Rc::clone(&f.screen)), 1);
    type_into(&f, &mut plugin, "@");

    plugin.handle_key(MenuKey::ArrowUp, &f.editor, &f.host);
    assert_eq!(plugin.controller().selected(), Some(2));
    plugin.handle_key(MenuKey::ArrowDown, &f.editor, &f.host);
    assert_eq!(plugin.controller().selected(), Some(0));
}

#[test]
fn enter_on_mention_inserts_atom_and_space() {
    let f = fixture(Editor::from_fragment(Fragment::new(vec![Node::paragraph("ping ")])));
    let mut plugin = SuggestionPlugin::new(team(), ScreenFactory(Rc::clone(&f.screen)), 1);
    type_into(&f, &mut plugin, "@gra");

    assert!(plugin.handle_key(MenuKey::Enter, &f.editor, &f.host).is_handled());
    assert!(!plugin.is_active());

    let editor = f.editor.borrow();
    let para = &editor.doc().children[0];
    assert!(para.children.iter().any(|n| matches!(
        &n.kind,
        NodeKind::Mention { id, label } if id == "u3" && label == "Grace Hopper"
    )));
    assert_eq!(para.text_content(), "ping @Grace Hopper ");
    assert_eq!(editor.cursor_offset(), 7);
}

#[test]
fn slash_command_converts_block_and_removes_query() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(SlashMenu, ScreenFactory(Rc::clone(&f.screen)), 1);
    type_into(&f, &mut plugin, "/quote");
    assert_eq!(*f.screen.titles.borrow(), vec!["Blockquote"]);

    plugin.handle_key(MenuKey::Enter, &f.editor, &f.host);
    let editor = f.editor.borrow();
    assert_eq!(editor.doc().children[0].kind, NodeKind::Blockquote);
    assert_eq!(editor.doc().text_content(), "");
}

#[test]
fn escape_keeps_text_and_stays_closed() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(SlashMenu, ScreenFactory(Rc::clone(&f.screen)), 1);
    type_into(&f, &mut plugin, "/h");
    assert!(plugin.handle_key(MenuKey::Escape, &f.editor, &f.host).is_handled());
    assert!(!f.screen.mounted.get());

    type_into(&f, &mut plugin, "e");
    assert!(!plugin.is_active());
    assert_eq!(f.editor.borrow().doc().text_content(), "/he");
}

#[test]
fn other_keys_are_not_consumed() {
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(SlashMenu, ScreenFactory(Rc::clone(&f.screen)), 1);
    type_into(&f, &mut plugin, "/");
    assert!(!plugin.handle_key(MenuKey::Other, &f.editor, &f.host).is_handled());
    assert!(plugin.is_active());
}

#[derive(Debug, Clone)]
struct Emoji(&'static str);

impl MenuEntry for Emoji {
    fn title(&self) -> &str {
        self.0
    }
}

struct EmojiMenu {
    fired: Rc<Cell<u32>>,
}

impl SuggestionAdapter for EmojiMenu {
    type Item = Emoji;

    fn trigger(&self) -> TriggerConfig {
        TriggerConfig::new(':')
    }

    fn items(&self, ctx: &QueryContext<'_>) -> Vec<Emoji> {
        ["smile", "sob"]
            .into_iter()
            .filter(|e| e.starts_with(ctx.query))
            .map(Emoji)
            .collect()
    }

    fn command(&self, item: &Emoji, ctx: &InsertionContext) {
        let fired = Rc::clone(&self.fired);
        ctx.apply(|editor: &mut Editor, range: &TriggerRange| {
            fired.set(fired.get() + 1);
            editor.delete_range(&range.path, range.range.clone());
            editor.insert_text(item.0);
        });
    }
}

#[test]
fn commit_after_editor_is_gone_does_nothing() {
    let fired = Rc::new(Cell::new(0));
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(
        EmojiMenu {
            fired: Rc::clone(&fired),
        },
        ScreenFactory(Rc::clone(&f.screen)),
        1,
    );
    type_into(&f, &mut plugin, ":s");

    let Fixture { editor, host, .. } = f;
    drop(editor);
    let orphan = EditorHandle::new(Editor::new());
    plugin.select(0, &orphan, &host);
    assert_eq!(fired.get(), 0);
}

#[test]
fn commit_on_stale_range_does_nothing() {
    let fired = Rc::new(Cell::new(0));
    let f = fixture(Editor::new());
    let mut plugin = SuggestionPlugin::new(
        EmojiMenu {
            fired: Rc::clone(&fired),
        },
        ScreenFactory(Rc::clone(&f.screen)),
        1,
    );
    type_into(&f, &mut plugin, ":s");

    // The trigger is edited away without the plugin hearing about it.
    f.editor.borrow_mut().delete_range(&[0], 0..1);
    plugin.select(1, &f.editor, &f.host);
    assert_eq!(fired.get(), 0);
    assert_eq!(f.editor.borrow().doc().text_content(), "s");
}
