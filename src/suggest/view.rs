use super::position::PopupPosition;

/// Rendered size of a mounted popup, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// What a popup row shows for an item.
pub trait MenuEntry {
    fn title(&self) -> &str;

    fn detail(&self) -> Option<&str> {
        None
    }

    /// Short glyph shown before the title.
    fn icon(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuProps<T> {
    pub items: Vec<T>,
    pub selected: usize,
    /// Mount with an entry transition (first mount of a session only).
    pub animate: bool,
}

/// A mounted popup owned by one session. Dropping the view releases it.
pub trait PopupView<T> {
    /// Mounts or remounts the popup content.
    fn mount(&mut self, props: MenuProps<T>);

    fn unmount(&mut self);

    /// Size of the last paint, or `None` until the popup has been drawn.
    fn rendered_size(&self) -> Option<Size>;

    fn place(&mut self, position: PopupPosition);

    /// Scrolls the popup's list so `index` is visible, moving as little as possible.
    fn reveal(&mut self, index: usize);
}

pub trait ViewFactory<T> {
    type View: PopupView<T>;

    fn create(&self) -> Self::View;
}
