use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub struct StatusBar<'a> {
    pub hints: &'a [(String, &'static str)],
    pub message: Option<&'a str>,
    pub paste_markdown: bool,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        let (label, color) = if self.paste_markdown {
            (" MD ", Color::Green)
        } else {
            (" TXT ", Color::DarkGray)
        };
        spans.push(Span::styled(
            label,
            Style::default().fg(Color::Black).bg(color),
        ));
        spans.push(Span::raw(" "));

        if let Some(msg) = self.message {
            spans.push(Span::styled(
                msg.to_string(),
                Style::default().fg(Color::Yellow),
            ));
            Line::from(spans).render(area, buf);
            return;
        }

        for (i, (key, action)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                action.to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM),
            ));
        }

        Line::from(spans).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(bar: StatusBar) -> String {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        (0..area.width)
            .map(|x| {
                buf.cell((x, 0))
                    .unwrap()
                    .symbol()
                    .chars()
                    .next()
                    .unwrap_or(' ')
            })
            .collect()
    }

    #[test]
    fn status_bar_renders_hints() {
        let hints = vec![("Ctrl+q".to_string(), "quit"), ("F1".to_string(), "help")];
        let content = render(StatusBar {
            hints: &hints,
            message: None,
            paste_markdown: true,
        });

        assert!(content.contains("MD"));
        assert!(content.contains("[Ctrl+q]quit"));
        assert!(content.contains("[F1]help"));
    }

    #[test]
    fn message_replaces_hints() {
        let hints = vec![("Ctrl+q".to_string(), "quit")];
        let content = render(StatusBar {
            hints: &hints,
            message: Some("Pasted as markdown"),
            paste_markdown: true,
        });

        assert!(content.contains("Pasted as markdown"));
        assert!(!content.contains("[Ctrl+q]"));
    }

    #[test]
    fn shows_plain_text_paste_mode() {
        let content = render(StatusBar {
            hints: &[],
            message: None,
            paste_markdown: false,
        });
        assert!(content.contains("TXT"));
    }
}
