//! Lifecycle of a trigger-character popup: start, update, keyboard navigation, exit.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::position::{
    position_below, AnchorProvider, EditorSurface, PopupPosition, PositionTracker,
    DEFAULT_MENU_GAP,
};
use super::view::{MenuProps, PopupView, ViewFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    NotHandled,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

/// Keys the popup cares about. Everything else maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Other,
}

pub type Commit<T> = Rc<dyn Fn(&T)>;

pub struct StartContext<T> {
    pub items: Vec<T>,
    /// Requested initial selection, clamped into range. Defaults to the first item.
    pub selected: Option<usize>,
    pub commit: Commit<T>,
    pub anchor: AnchorProvider,
    pub surface: Rc<dyn EditorSurface>,
}

pub struct UpdateContext<T> {
    pub items: Vec<T>,
    pub commit: Commit<T>,
    /// Replaces the anchor provider when set.
    pub anchor: Option<AnchorProvider>,
}

struct Session<T, V> {
    items: Vec<T>,
    selected: usize,
    commit: Commit<T>,
    anchor: AnchorProvider,
    view: V,
    gap: u16,
    position: Option<PopupPosition>,
    placement_pending: bool,
}

impl<T: Clone, V: PopupView<T>> Session<T, V> {
    fn mount(&mut self, animate: bool) {
        self.view.mount(MenuProps {
            items: self.items.clone(),
            selected: self.selected,
            animate,
        });
        self.placement_pending = true;
    }

    /// Places the popup under the anchor. Skipped until both the anchor and the
    /// popup's rendered size are known.
    fn reposition(&mut self) -> bool {
        let Some(anchor) = (self.anchor)() else {
            trace!("anchor unavailable, placement skipped");
            return false;
        };
        if self.view.rendered_size().is_none() {
            trace!("popup not painted yet, placement skipped");
            return false;
        }
        let position = position_below(anchor, self.gap);
        self.view.place(position);
        if !self.items.is_empty() {
            self.view.reveal(self.selected);
        }
        trace!(left = position.left, top = position.top, "popup placed");
        self.position = Some(position);
        self.placement_pending = false;
        true
    }
}

/// Drives one popup at a time for a view factory. Owns the mounted view and
/// releases it on every exit path.
pub struct SuggestionController<T, F: ViewFactory<T>> {
    factory: F,
    gap: u16,
    session: Option<Rc<RefCell<Session<T, F::View>>>>,
    tracker: PositionTracker,
}

impl<T, F: ViewFactory<T>> fmt::Debug for SuggestionController<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionController")
            .field("gap", &self.gap)
            .field("active", &self.session.is_some())
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl<T, F> SuggestionController<T, F>
where
    T: Clone + 'static,
    F: ViewFactory<T>,
    F::View: 'static,
{
    pub fn new(factory: F) -> Self {
        Self::with_gap(factory, DEFAULT_MENU_GAP)
    }

    pub fn with_gap(factory: F, gap: u16) -> Self {
        Self {
            factory,
            gap,
            session: None,
            tracker: PositionTracker::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn on_start(&mut self, ctx: StartContext<T>) {
        if self.session.is_some() {
            debug!("popup already active, tearing down previous session");
            self.on_exit();
        }

        let selected = match ctx.items.len() {
            0 => 0,
            len => ctx.selected.unwrap_or(0).min(len - 1),
        };
        debug!(items = ctx.items.len(), selected, "popup session started");

        let mut session = Session {
            items: ctx.items,
            selected,
            commit: ctx.commit,
            anchor: ctx.anchor,
            view: self.factory.create(),
            gap: self.gap,
            position: None,
            placement_pending: false,
        };
        session.mount(true);
        let session = Rc::new(RefCell::new(session));

        let weak = Rc::downgrade(&session);
        self.tracker.attach(
            ctx.surface.as_ref(),
            Rc::new(move || {
                let Some(session) = weak.upgrade() else {
                    return;
                };
                if let Ok(mut session) = session.try_borrow_mut() {
                    session.reposition();
                };
            }),
        );
        self.session = Some(session);
    }

    pub fn on_update(&mut self, ctx: UpdateContext<T>) {
        let Some(session) = &self.session else {
            return;
        };
        let mut session = session.borrow_mut();
        debug!(items = ctx.items.len(), "popup items updated");
        session.items = ctx.items;
        session.commit = ctx.commit;
        if let Some(anchor) = ctx.anchor {
            session.anchor = anchor;
        }
        session.selected = 0;
        session.mount(false);
    }

    pub fn on_key_down(&mut self, key: MenuKey) -> KeyOutcome {
        let Some(session) = self.session.clone() else {
            return KeyOutcome::NotHandled;
        };
        match key {
            MenuKey::ArrowDown | MenuKey::ArrowUp => {
                let mut session = session.borrow_mut();
                let len = session.items.len();
                if len == 0 {
                    return KeyOutcome::NotHandled;
                }
                let step: isize = if key == MenuKey::ArrowDown { 1 } else { -1 };
                session.selected = (session.selected as isize + step).rem_euclid(len as isize) as usize;
                session.mount(false);
                KeyOutcome::Handled
            }
            MenuKey::Enter => {
                self.commit_at(&session, None);
                KeyOutcome::Handled
            }
            MenuKey::Escape => KeyOutcome::Handled,
            MenuKey::Other => KeyOutcome::NotHandled,
        }
    }

    /// Commits the item at `index` (a click on a row).
    pub fn select(&mut self, index: usize) {
        if let Some(session) = self.session.clone() {
            self.commit_at(&session, Some(index));
        }
    }

    fn commit_at(&self, session: &Rc<RefCell<Session<T, F::View>>>, index: Option<usize>) {
        let picked = {
            let session = session.borrow();
            let index = index.unwrap_or(session.selected);
            session
                .items
                .get(index)
                .cloned()
                .map(|item| (Rc::clone(&session.commit), item))
        };
        // The borrow is released so the commit may re-enter the editor or this popup.
        if let Some((commit, item)) = picked {
            debug!("popup item committed");
            commit(&item);
        }
    }

    /// Called by the host after each paint. Places a freshly mounted popup once its
    /// size is known; returns true when the position changed the screen.
    pub fn on_paint(&mut self) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let mut session = session.borrow_mut();
        session.placement_pending && session.reposition()
    }

    /// Repositions immediately, as a scroll of the tracked container does.
    pub fn reposition(&mut self) -> bool {
        match &self.session {
            Some(session) => session.borrow_mut().reposition(),
            None => false,
        }
    }

    pub fn on_exit(&mut self) {
        self.tracker.detach();
        let Some(session) = self.session.take() else {
            return;
        };
        if let Ok(mut session) = session.try_borrow_mut() {
            session.view.unmount();
        }
        debug!("popup session ended");
    }

    pub fn selected(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.borrow().selected)
    }

    pub fn items_len(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.borrow().items.len())
    }

    pub fn position(&self) -> Option<PopupPosition> {
        self.session.as_ref().and_then(|s| s.borrow().position)
    }

    pub fn placement_pending(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.borrow().placement_pending)
    }

    pub fn with_view<R>(&self, f: impl FnOnce(&F::View) -> R) -> Option<R> {
        self.session.as_ref().map(|s| f(&s.borrow().view))
    }
}

impl<T, F: ViewFactory<T>> Drop for SuggestionController<T, F> {
    fn drop(&mut self) {
        self.tracker.detach();
        if let Some(session) = self.session.take() {
            if let Ok(mut session) = session.try_borrow_mut() {
                session.view.unmount();
            }
        }
    }
}
