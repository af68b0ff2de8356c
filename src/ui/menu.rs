use std::cell::{RefCell, RefMut};
use std::marker::PhantomData;
use std::rc::Rc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Clear, Widget};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::suggest::{MenuEntry, MenuProps, PopupPosition, PopupView, Size, ViewFactory};

const MIN_WIDTH: usize = 16;
const EMPTY_TEXT: &str = "No results";

#[derive(Debug, Clone, PartialEq, Eq)]
struct MenuRow {
    icon: Option<String>,
    title: String,
    detail: Option<String>,
}

impl MenuRow {
    fn from_entry(entry: &impl MenuEntry) -> Self {
        Self {
            icon: entry.icon().map(str::to_string),
            title: entry.title().to_string(),
            detail: entry.detail().map(str::to_string),
        }
    }

    fn icon_width(&self) -> usize {
        self.icon.as_deref().map_or(0, |i| i.width() + 1)
    }

    fn width(&self) -> usize {
        self.icon_width()
            + self.title.width()
            + self.detail.as_deref().map_or(0, |d| d.width() + 2)
    }
}

#[derive(Debug)]
struct MenuSlot {
    id: u64,
    title: &'static str,
    max_visible: usize,
    mounted: bool,
    rows: Vec<MenuRow>,
    selected: usize,
    scroll: usize,
    position: Option<PopupPosition>,
    size: Option<Size>,
}

impl MenuSlot {
    fn visible_rows(&self) -> usize {
        self.rows.len().min(self.max_visible).max(1)
    }

    fn keep_visible(&mut self, index: usize) {
        let visible = self.visible_rows();
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + visible {
            self.scroll = index + 1 - visible;
        }
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(visible));
    }

    fn measure(&self, bounds: Rect) -> Size {
        let content = self
            .rows
            .iter()
            .map(MenuRow::width)
            .max()
            .unwrap_or(EMPTY_TEXT.len())
            .max(MIN_WIDTH);
        Size {
            width: ((content + 2) as u16).min(bounds.width),
            height: ((self.visible_rows() + 2) as u16).min(bounds.height),
        }
    }
}

#[derive(Debug, Default)]
struct LayerState {
    next_id: u64,
    slots: Vec<MenuSlot>,
}

/// Shared paint surface for popup menus. Views write into their slot; the
/// renderer measures every mounted slot and draws the placed ones on top.
#[derive(Debug, Clone, Default)]
pub struct OverlayLayer {
    inner: Rc<RefCell<LayerState>>,
    /// Slots released while the layer was borrowed; removed on the next access.
    closed: Rc<RefCell<Vec<u64>>>,
}

impl OverlayLayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> RefMut<'_, LayerState> {
        let mut state = self.inner.borrow_mut();
        let closed = std::mem::take(&mut *self.closed.borrow_mut());
        if !closed.is_empty() {
            state.slots.retain(|s| !closed.contains(&s.id));
        }
        state
    }

    fn open(&self, title: &'static str, max_visible: usize) -> u64 {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.slots.push(MenuSlot {
            id,
            title,
            max_visible: max_visible.max(1),
            mounted: false,
            rows: Vec::new(),
            selected: 0,
            scroll: 0,
            position: None,
            size: None,
        });
        id
    }

    fn close(&self, id: u64) {
        match self.inner.try_borrow_mut() {
            Ok(mut state) => state.slots.retain(|s| s.id != id),
            Err(_) => {
                debug!(id, "overlay busy, deferring popup release");
                self.closed.borrow_mut().push(id);
            }
        }
    }

    fn with_slot<R>(&self, id: u64, f: impl FnOnce(&mut MenuSlot) -> R) -> Option<R> {
        let mut state = self.state();
        state.slots.iter_mut().find(|s| s.id == id).map(f)
    }

    /// Number of popups currently mounted.
    #[cfg(test)]
    pub fn mounted(&self) -> usize {
        self.state().slots.iter().filter(|s| s.mounted).count()
    }

    pub fn render(&self, bounds: Rect, buf: &mut Buffer) {
        let mut state = self.state();
        for slot in state.slots.iter_mut().filter(|s| s.mounted) {
            let size = slot.measure(bounds);
            slot.size = Some(size);
            if let Some(position) = slot.position {
                paint(slot, position, size, bounds, buf);
            }
        }
    }
}

fn paint(slot: &MenuSlot, position: PopupPosition, size: Size, bounds: Rect, buf: &mut Buffer) {
    let x = position
        .left
        .max(bounds.x)
        .min(bounds.right().saturating_sub(size.width));
    let y = position
        .top
        .max(bounds.y)
        .min(bounds.bottom().saturating_sub(size.height));
    let area = Rect::new(x, y, size.width, size.height);

    Clear.render(area, buf);
    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray))
        .title(slot.title);
    let inner = block.inner(area);
    block.render(area, buf);

    if slot.rows.is_empty() {
        let line = Line::from(Span::styled(EMPTY_TEXT, Style::default().fg(Color::DarkGray)));
        line.render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
        return;
    }

    let width = inner.width as usize;
    for (i, row) in slot
        .rows
        .iter()
        .enumerate()
        .skip(slot.scroll)
        .take(inner.height as usize)
    {
        let style = if i == slot.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = Vec::new();
        if let Some(icon) = &row.icon {
            spans.push(Span::styled(format!("{icon} "), style.fg(Color::Cyan)));
        }
        spans.push(Span::styled(row.title.clone(), style));
        if let Some(detail) = &row.detail {
            spans.push(Span::styled(format!("  {detail}"), style.fg(Color::DarkGray)));
        }
        let used = row.width();
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), style));
        }

        let line_area = Rect::new(inner.x, inner.y + (i - slot.scroll) as u16, inner.width, 1);
        Line::from(spans).render(line_area, buf);
    }
}

/// A popup living in an [`OverlayLayer`] slot, released when dropped.
pub struct TerminalMenu<T> {
    layer: OverlayLayer,
    id: u64,
    _item: PhantomData<fn(T)>,
}

impl<T: MenuEntry> PopupView<T> for TerminalMenu<T> {
    fn mount(&mut self, props: MenuProps<T>) {
        let rows: Vec<MenuRow> = props.items.iter().map(MenuRow::from_entry).collect();
        self.layer.with_slot(self.id, |slot| {
            slot.mounted = true;
            slot.rows = rows;
            slot.selected = props.selected;
            if props.animate {
                slot.scroll = 0;
            }
            slot.keep_visible(props.selected);
        });
    }

    fn unmount(&mut self) {
        self.layer.with_slot(self.id, |slot| {
            slot.mounted = false;
            slot.rows.clear();
            slot.position = None;
            slot.size = None;
        });
    }

    fn rendered_size(&self) -> Option<Size> {
        self.layer.with_slot(self.id, |slot| slot.size).flatten()
    }

    fn place(&mut self, position: PopupPosition) {
        self.layer.with_slot(self.id, |slot| slot.position = Some(position));
    }

    fn reveal(&mut self, index: usize) {
        self.layer.with_slot(self.id, |slot| slot.keep_visible(index));
    }
}

impl<T> Drop for TerminalMenu<T> {
    fn drop(&mut self) {
        self.layer.close(self.id);
    }
}

pub struct TerminalMenuFactory {
    layer: OverlayLayer,
    title: &'static str,
    max_visible: usize,
}

impl TerminalMenuFactory {
    pub fn new(layer: OverlayLayer, title: &'static str, max_visible: usize) -> Self {
        Self {
            layer,
            title,
            max_visible,
        }
    }
}

impl<T: MenuEntry> ViewFactory<T> for TerminalMenuFactory {
    type View = TerminalMenu<T>;

    fn create(&self) -> TerminalMenu<T> {
        TerminalMenu {
            id: self.layer.open(self.title, self.max_visible),
            layer: self.layer.clone(),
            _item: PhantomData,
        }
    }
}
