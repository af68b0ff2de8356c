use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use tracing::debug;

use super::editor::Editor;

/// Shared owner of the live editor. Menus only ever hold a [`WeakEditor`].
#[derive(Debug, Clone, Default)]
pub struct EditorHandle(Rc<RefCell<Editor>>);

impl EditorHandle {
    pub fn new(editor: Editor) -> Self {
        Self(Rc::new(RefCell::new(editor)))
    }

    pub fn borrow(&self) -> Ref<'_, Editor> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Editor> {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakEditor {
        WeakEditor(Rc::downgrade(&self.0))
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeakEditor(Weak<RefCell<Editor>>);

impl WeakEditor {
    /// Runs `f` against the editor if it is still alive and not already borrowed.
    pub fn with_live<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> Option<R> {
        let editor = self.0.upgrade()?;
        let Ok(mut guard) = editor.try_borrow_mut() else {
            debug!("editor already borrowed, skipping edit");
            return None;
        };
        Some(f(&mut guard))
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
