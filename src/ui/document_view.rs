use std::cell::Cell;
use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::document::{Editor, Mark, Node, NodeKind, Selection};

/// Where the last paint put the cursor, in document lines and columns,
/// and the area the document was painted into.
#[derive(Debug, Default)]
pub struct CursorGeometry {
    area: Cell<Rect>,
    cursor: Cell<Option<(u16, u16)>>,
}

impl CursorGeometry {
    pub fn record(&self, area: Rect, cursor: Option<(u16, u16)>) {
        self.area.set(area);
        self.cursor.set(cursor);
    }

    pub fn area(&self) -> Rect {
        self.area.get()
    }

    pub fn cursor_line(&self) -> Option<u16> {
        self.cursor.get().map(|(line, _)| line)
    }

    /// Screen cell of the cursor with the document scrolled to `offset`, or
    /// `None` when that line is outside the painted area.
    pub fn screen_cell(&self, offset: u16) -> Option<(u16, u16)> {
        let (line, col) = self.cursor.get()?;
        let area = self.area.get();
        if line < offset || line - offset >= area.height {
            return None;
        }
        let x = area.x + col.min(area.width.saturating_sub(1));
        Some((x, area.y + line - offset))
    }
}

pub struct DocLayout {
    pub lines: Vec<Line<'static>>,
    /// `(line, column)` of the cursor in document space.
    pub cursor: Option<(u16, u16)>,
}

pub fn layout_document(doc: &Node, selection: &Selection, width: u16) -> DocLayout {
    let mut builder = LayoutBuilder {
        selection,
        width,
        lines: Vec::new(),
        current: Vec::new(),
        col: 0,
        cursor: None,
    };
    let mut path = Vec::new();
    for (i, block) in doc.children.iter().enumerate() {
        path.push(i);
        builder.block(block, &mut path, &mut Prefix::root());
        path.pop();
    }
    DocLayout {
        lines: builder.lines,
        cursor: builder.cursor,
    }
}

/// Gutter for one nesting level: the first line gets the marker, the rest get indentation.
struct Prefix {
    first: Option<Vec<Span<'static>>>,
    rest: Vec<Span<'static>>,
}

impl Prefix {
    fn root() -> Self {
        Self {
            first: None,
            rest: Vec::new(),
        }
    }

    fn line(&mut self) -> Vec<Span<'static>> {
        self.first.take().unwrap_or_else(|| self.rest.clone())
    }

    fn nest(&mut self, first: Span<'static>, rest: Span<'static>) -> Prefix {
        let mut head = self.line();
        head.push(first);
        let mut tail = self.rest.clone();
        tail.push(rest);
        Prefix {
            first: Some(head),
            rest: tail,
        }
    }
}

struct LayoutBuilder<'a> {
    selection: &'a Selection,
    width: u16,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    col: u16,
    cursor: Option<(u16, u16)>,
}

impl LayoutBuilder<'_> {
    fn block(&mut self, node: &Node, path: &mut Vec<usize>, prefix: &mut Prefix) {
        match &node.kind {
            NodeKind::Paragraph => self.textblock(node, path, prefix, Style::default(), None),
            NodeKind::Heading { level } => {
                let lead = Span::styled(
                    format!("{} ", "#".repeat(*level as usize)),
                    Style::default().fg(Color::DarkGray),
                );
                self.textblock(node, path, prefix, heading_style(*level), Some(lead));
            }
            NodeKind::CodeBlock { language } => {
                let fence = Style::default().fg(Color::DarkGray);
                let label = format!("```{}", language.as_deref().unwrap_or_default());
                self.begin(prefix.line());
                self.push(Span::styled(label, fence));
                self.end();
                self.textblock(node, path, prefix, Style::default().fg(Color::Green), None);
                self.begin(prefix.line());
                self.push(Span::styled("```", fence));
                self.end();
            }
            NodeKind::BulletList => {
                for (i, item) in node.children.iter().enumerate() {
                    let mut item_prefix = prefix.nest(
                        Span::styled("• ", Style::default().fg(Color::Cyan)),
                        Span::raw("  "),
                    );
                    self.nested(item, i, path, &mut item_prefix);
                }
            }
            NodeKind::OrderedList { start } => {
                for (i, item) in node.children.iter().enumerate() {
                    let marker = format!("{}. ", start + i as u64);
                    let indent = " ".repeat(marker.width());
                    let mut item_prefix = prefix.nest(
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::raw(indent),
                    );
                    self.nested(item, i, path, &mut item_prefix);
                }
            }
            NodeKind::TaskList => {
                for (i, item) in node.children.iter().enumerate() {
                    let checked = matches!(item.kind, NodeKind::TaskItem { checked: true });
                    let marker = if checked {
                        Span::styled("✓ ", Style::default().fg(Color::Green))
                    } else {
                        Span::styled("☐ ", Style::default().fg(Color::Red))
                    };
                    let mut item_prefix = prefix.nest(marker, Span::raw("  "));
                    self.nested(item, i, path, &mut item_prefix);
                }
            }
            NodeKind::Blockquote => {
                let bar = Style::default().fg(Color::DarkGray);
                let mut quote = prefix.nest(Span::styled("│ ", bar), Span::styled("│ ", bar));
                self.children(node, path, &mut quote);
            }
            NodeKind::HorizontalRule => {
                let line = prefix.line();
                let used = line.iter().map(Span::width).sum::<usize>() as u16;
                self.begin(line);
                self.push(Span::styled(
                    "─".repeat(self.width.saturating_sub(used).max(3) as usize),
                    Style::default().fg(Color::DarkGray),
                ));
                self.end();
            }
            NodeKind::Image { src, alt } => {
                self.begin(prefix.line());
                self.push(Span::styled(
                    format!("▣ {} ({})", alt.as_deref().unwrap_or("image"), src),
                    Style::default().fg(Color::Magenta),
                ));
                self.end();
            }
            NodeKind::Table => self.table(node, path, prefix),
            _ => self.children(node, path, prefix),
        }
    }

    fn nested(&mut self, node: &Node, index: usize, path: &mut Vec<usize>, prefix: &mut Prefix) {
        path.push(index);
        self.children(node, path, prefix);
        path.pop();
    }

    fn children(&mut self, node: &Node, path: &mut Vec<usize>, prefix: &mut Prefix) {
        for (i, child) in node.children.iter().enumerate() {
            path.push(i);
            self.block(child, path, prefix);
            path.pop();
        }
    }

    fn table(&mut self, table: &Node, path: &mut Vec<usize>, prefix: &mut Prefix) {
        let sep = Style::default().fg(Color::DarkGray);
        for (r, row) in table.children.iter().enumerate() {
            path.push(r);
            let rest = prefix.rest.clone();
            self.begin(prefix.line());
            for (c, cell) in row.children.iter().enumerate() {
                if c > 0 {
                    self.push(Span::styled(" │ ", sep));
                }
                let base = match cell.kind {
                    NodeKind::TableCell { header: true } => Style::default().add_modifier(Modifier::BOLD),
                    _ => Style::default(),
                };
                path.push(c);
                self.inline_run(cell, path, base, &rest);
                path.pop();
            }
            self.end();
            path.pop();
        }
    }

    fn textblock(
        &mut self,
        node: &Node,
        path: &[usize],
        prefix: &mut Prefix,
        base: Style,
        lead: Option<Span<'static>>,
    ) {
        let rest = prefix.rest.clone();
        self.begin(prefix.line());
        if let Some(lead) = lead {
            self.push(lead);
        }
        self.inline_run(node, path, base, &rest);
        self.end();
    }

    fn inline_run(&mut self, node: &Node, path: &[usize], base: Style, rest: &[Span<'static>]) {
        let here = self.selection.path == path;
        let cursor = here.then_some(self.selection.head);
        let selected: Range<usize> = if here {
            self.selection.from()..self.selection.to()
        } else {
            0..0
        };

        let mut offset = 0;
        for child in &node.children {
            match &child.kind {
                NodeKind::Text { text } => {
                    let style = mark_style(base, &child.marks);
                    let mut run = String::new();
                    let mut run_style = style;
                    for c in text.chars() {
                        self.mark_cursor(cursor, offset);
                        let char_style = if selected.contains(&offset) {
                            style.add_modifier(Modifier::REVERSED)
                        } else {
                            style
                        };
                        if char_style != run_style {
                            self.flush(&mut run, run_style);
                            run_style = char_style;
                        }
                        if c == '\n' {
                            self.flush(&mut run, run_style);
                            self.break_line(rest);
                        } else {
                            run.push(c);
                            self.col += c.width().unwrap_or(0) as u16;
                        }
                        offset += 1;
                    }
                    self.flush(&mut run, run_style);
                }
                NodeKind::HardBreak => {
                    self.mark_cursor(cursor, offset);
                    self.break_line(rest);
                    offset += 1;
                }
                NodeKind::Mention { label, .. } => {
                    self.mark_cursor(cursor, offset);
                    let mut style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
                    if selected.contains(&offset) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    self.push(Span::styled(format!("@{label}"), style));
                    offset += 1;
                }
                _ => {}
            }
        }
        self.mark_cursor(cursor, offset);
    }

    fn mark_cursor(&mut self, cursor: Option<usize>, offset: usize) {
        if cursor == Some(offset) && self.cursor.is_none() {
            self.cursor = Some((self.lines.len() as u16, self.col));
        }
    }

    fn begin(&mut self, prefix: Vec<Span<'static>>) {
        self.col = prefix.iter().map(Span::width).sum::<usize>() as u16;
        self.current = prefix;
    }

    fn push(&mut self, span: Span<'static>) {
        self.col += span.width() as u16;
        self.current.push(span);
    }

    fn flush(&mut self, run: &mut String, style: Style) {
        if !run.is_empty() {
            self.current.push(Span::styled(std::mem::take(run), style));
        }
    }

    fn break_line(&mut self, rest: &[Span<'static>]) {
        self.end();
        self.begin(rest.to_vec());
    }

    fn end(&mut self) {
        self.lines.push(Line::from(std::mem::take(&mut self.current)));
        self.col = 0;
    }
}

fn heading_style(level: u8) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        1 => style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        2 => style.fg(Color::Cyan),
        3 => style.fg(Color::Blue),
        _ => style,
    }
}

fn mark_style(base: Style, marks: &[Mark]) -> Style {
    marks.iter().fold(base, |style, mark| match mark {
        Mark::Bold => style.fg(Color::White).add_modifier(Modifier::BOLD),
        Mark::Italic => style.add_modifier(Modifier::ITALIC),
        Mark::Strike => style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
        Mark::Code => style.fg(Color::Green).bg(Color::DarkGray),
        Mark::Link { .. } => style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    })
}

/// The editable document, scrolled to `offset` lines.
pub struct DocumentView<'a> {
    pub editor: &'a Editor,
    pub offset: u16,
    pub geometry: &'a CursorGeometry,
}

impl Widget for DocumentView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = layout_document(self.editor.doc(), self.editor.selection(), area.width);
        self.geometry.record(area, layout.cursor);

        let visible: Vec<Line> = layout
            .lines
            .into_iter()
            .skip(self.offset as usize)
            .take(area.height as usize)
            .collect();
        Paragraph::new(visible).render(area, buf);
    }
}
