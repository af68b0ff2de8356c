use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

pub struct Header<'a> {
    pub document: &'a str,
    /// Kind of the block under the cursor, e.g. "Heading 2".
    pub block: &'a str,
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Span::styled(
            " assist ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let document = Span::styled(
            format!(" [{}] ", self.document),
            Style::default().fg(Color::Cyan).bg(Color::DarkGray),
        );

        let spacer_len = area.width.saturating_sub(
            title.width() as u16 + document.width() as u16 + self.block.width() as u16 + 1,
        );
        let bg = Style::default().bg(Color::DarkGray);
        let spacer = Span::styled(" ".repeat(spacer_len as usize), bg);

        let block = Span::styled(
            format!("{} ", self.block),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        );

        let line = Line::from(vec![title, document, spacer, block]);
        line.render(area, buf);
    }
}
