//! Popup placement and the scroll plumbing that keeps a popup glued to the cursor.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Rows between the cursor line and the top of a popup.
pub const DEFAULT_MENU_GAP: u16 = 1;

/// Screen rectangle of the text cursor, in terminal cells. `bottom` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorRect {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl AnchorRect {
    /// A one-cell rect at (`x`, `y`).
    pub fn cell(x: u16, y: u16) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(1),
            bottom: y.saturating_add(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopupPosition {
    pub left: u16,
    pub top: u16,
}

pub fn position_below(anchor: AnchorRect, gap: u16) -> PopupPosition {
    PopupPosition {
        left: anchor.left,
        top: anchor.bottom.saturating_add(gap),
    }
}

/// Returns the cursor rect on demand, or `None` when the cursor is not on screen.
pub type AnchorProvider = Rc<dyn Fn() -> Option<AnchorRect>>;

pub type ScrollListener = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// The listener never cancels the scroll.
    pub passive: bool,
}

pub trait ScrollContainer {
    fn add_scroll_listener(&self, listener: ScrollListener, options: ListenerOptions) -> ListenerId;

    fn remove_scroll_listener(&self, id: ListenerId) -> bool;
}

/// The editor's on-screen surface: where scroll events for the cursor come from.
pub trait EditorSurface {
    /// Nearest scrollable ancestor of the cursor, if any.
    fn scroll_parent(&self) -> Option<Rc<dyn ScrollContainer>>;

    fn root(&self) -> Rc<dyn ScrollContainer>;
}

struct Registration {
    id: ListenerId,
    listener: ScrollListener,
    options: ListenerOptions,
}

/// A vertically scrolling region with scroll listeners.
#[derive(Default)]
pub struct Viewport {
    offset: Cell<u16>,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Registration>>,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("offset", &self.offset.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u16 {
        self.offset.get()
    }

    pub fn scroll_by(&self, delta: i32) {
        let target = (i32::from(self.offset.get()) + delta).clamp(0, i32::from(u16::MAX));
        self.scroll_to(target as u16);
    }

    /// Moves the viewport and notifies listeners when the offset actually changed.
    pub fn scroll_to(&self, offset: u16) {
        if self.offset.replace(offset) == offset {
            return;
        }
        // Listeners may add or remove registrations, so call a snapshot.
        let snapshot: Vec<ScrollListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|r| Rc::clone(&r.listener))
            .collect();
        trace!(offset, listeners = snapshot.len(), "viewport scrolled");
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn listener_options(&self, id: ListenerId) -> Option<ListenerOptions> {
        self.listeners
            .borrow()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.options)
    }
}

impl ScrollContainer for Viewport {
    fn add_scroll_listener(&self, listener: ScrollListener, options: ListenerOptions) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Registration {
            id,
            listener,
            options,
        });
        id
    }

    fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }
}

/// An [`EditorSurface`] over concrete viewports.
#[derive(Debug, Clone)]
pub struct ViewportSurface {
    pub scroll_parent: Option<Rc<Viewport>>,
    pub root: Rc<Viewport>,
}

impl EditorSurface for ViewportSurface {
    fn scroll_parent(&self) -> Option<Rc<dyn ScrollContainer>> {
        self.scroll_parent
            .clone()
            .map(|v| v as Rc<dyn ScrollContainer>)
    }

    fn root(&self) -> Rc<dyn ScrollContainer> {
        Rc::clone(&self.root) as Rc<dyn ScrollContainer>
    }
}

/// Tracks the scroll container a popup listens on so it can be detached later.
#[derive(Default)]
pub struct PositionTracker {
    attached: Option<(Rc<dyn ScrollContainer>, ListenerId)>,
}

impl fmt::Debug for PositionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionTracker")
            .field("listener", &self.attached.as_ref().map(|(_, id)| *id))
            .finish()
    }
}

impl PositionTracker {
    /// Registers `on_scroll` on the surface's scroll parent, or its root when there is none.
    /// Any previous registration is removed first.
    pub fn attach(&mut self, surface: &dyn EditorSurface, on_scroll: ScrollListener) {
        self.detach();
        let container = surface.scroll_parent().unwrap_or_else(|| surface.root());
        let id = container.add_scroll_listener(on_scroll, ListenerOptions { passive: true });
        self.attached = Some((container, id));
    }

    pub fn detach(&mut self) {
        if let Some((container, id)) = self.attached.take() {
            container.remove_scroll_listener(id);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}

impl Drop for PositionTracker {
    fn drop(&mut self) {
        self.detach();
    }
}
