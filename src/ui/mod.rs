pub mod document_view;
pub mod header;
pub mod menu;
pub mod status_bar;

use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Clear};
use ratatui::Frame;

use crate::app::{AppState, UrlPrompt};

use document_view::DocumentView;
use header::Header;
use status_bar::StatusBar;

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let block_label = state.block_label();
    let header = Header {
        document: &state.title,
        block: &block_label,
    };
    frame.render_widget(header, chunks[0]);

    let offset = state.viewport.offset();
    {
        let editor = state.editor.borrow();
        let view = DocumentView {
            editor: &editor,
            offset,
            geometry: &state.geometry,
        };
        frame.render_widget(view, chunks[1]);
    }

    state.overlay.render(chunks[1], frame.buffer_mut());

    if let Some(prompt) = &state.url_prompt {
        render_url_prompt(frame, prompt, chunks[1]);
    } else if state.show_help {
        render_help_popup(frame, &state.hints, chunks[1]);
    } else if let Some((x, y)) = state.geometry.screen_cell(offset) {
        frame.set_cursor_position(Position::new(x, y));
    }

    let status = StatusBar {
        hints: &state.hints,
        message: state.status_message.as_deref(),
        paste_markdown: state.paste.is_enabled(),
    };
    frame.render_widget(status, chunks[2]);
}

fn centered(area: Rect, width_pct: u16, min_width: u16, height: u16) -> Rect {
    let width = (area.width * width_pct / 100).max(min_width).min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_url_prompt(frame: &mut Frame, prompt: &UrlPrompt, area: Rect) {
    let popup_area = centered(area, 60, 30, 5);
    frame.render_widget(Clear, popup_area);

    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Image URL ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    if inner.height == 0 {
        return;
    }

    let input = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::styled(prompt.input.clone(), Style::default().fg(Color::White)),
    ]);
    frame.render_widget(input, Rect::new(inner.x, inner.y, inner.width, 1));
    let cursor_x = inner.x + (2 + prompt.input.chars().count() as u16).min(inner.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(cursor_x, inner.y));

    let (text, color) = match &prompt.error {
        Some(err) => (err.as_str(), Color::Red),
        None => ("Enter to insert, Esc to cancel", Color::DarkGray),
    };
    if inner.height > 2 {
        let footer = Line::styled(text, Style::default().fg(color));
        frame.render_widget(footer, Rect::new(inner.x, inner.y + 2, inner.width, 1));
    }
}

fn render_help_popup(frame: &mut Frame, hints: &[(String, &str)], area: Rect) {
    let lines = help_lines(hints);
    let popup_area = centered(area, 60, 30, (lines.len() + 3) as u16); // +2 borders +1 footer
    frame.render_widget(Clear, popup_area);

    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Help ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, (key_str, action_name)) in lines.iter().enumerate() {
        if i as u16 >= inner.height.saturating_sub(1) {
            break;
        }
        let key_span = Span::styled(
            format!("{:>12}", key_str),
            Style::default().fg(Color::Yellow),
        );
        let sep = Span::styled("  ", Style::default());
        let action_span = Span::styled(action_name.to_string(), Style::default().fg(Color::White));
        let line = Line::from(vec![key_span, sep, action_span]);
        let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        frame.render_widget(line, line_area);
    }

    // Footer
    if inner.height > 0 {
        let footer_y = inner.y + inner.height - 1;
        let footer = Line::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        );
        let footer_area = Rect::new(inner.x, footer_y, inner.width, 1);
        frame.render_widget(footer, footer_area);
    }
}

/// Key hints followed by the trigger characters, which are typed rather than bound.
fn help_lines(hints: &[(String, &str)]) -> Vec<(String, String)> {
    hints
        .iter()
        .map(|(k, a)| (k.clone(), a.to_string()))
        .chain([
            ("/".to_string(), "block commands".to_string()),
            ("@".to_string(), "mention someone".to_string()),
            ("Esc".to_string(), "close menu".to_string()),
        ])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_helpers::{key, test_keymap, test_state, type_str};
    use crate::app::handle_key;
    use crossterm::event::KeyCode;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect()
            })
            .collect()
    }

    fn paint(terminal: &mut Terminal<TestBackend>, state: &mut AppState) {
        for _ in 0..3 {
            terminal.draw(|frame| render(frame, state)).unwrap();
            if !state.after_paint() {
                break;
            }
        }
    }

    #[test]
    fn slash_popup_opens_one_row_below_cursor() {
        let mut terminal = Terminal::new(TestBackend::new(50, 20)).unwrap();
        let mut state = test_state();
        let keys = test_keymap();
        paint(&mut terminal, &mut state);

        type_str(&mut state, &keys, "/");
        paint(&mut terminal, &mut state);

        let position = state.slash.controller().position().unwrap();
        // Cursor sits on screen row 1 (below the header); gap of one row.
        assert_eq!(position.top, 3);
        let rows = screen(&terminal);
        assert!(rows[3].contains("╭"));
        assert!(rows[4].contains("Heading 1"));
    }

    #[test]
    fn popup_follows_viewport_scroll() {
        let mut terminal = Terminal::new(TestBackend::new(50, 20)).unwrap();
        let mut state = test_state();
        let keys = test_keymap();
        for _ in 0..3 {
            handle_key(&mut state, &key(KeyCode::Enter), &keys);
        }
        type_str(&mut state, &keys, "@");
        paint(&mut terminal, &mut state);
        assert!(state.mentions.is_active());
        assert_eq!(state.mentions.controller().position().map(|p| p.top), Some(6));

        handle_key(&mut state, &key(KeyCode::PageDown), &keys);
        assert_eq!(state.mentions.controller().position().map(|p| p.top), Some(5));
    }

    #[test]
    fn help_popup_lists_triggers() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut state = test_state();
        state.show_help = true;
        paint(&mut terminal, &mut state);
        let text = screen(&terminal).join("\n");
        assert!(text.contains("block commands"));
        assert!(text.contains("Press any key to close"));
    }

    #[test]
    fn url_prompt_shows_error() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut state = test_state();
        state.url_prompt = Some(UrlPrompt {
            input: "ftp://x".into(),
            error: Some("Only http, https and mailto URLs are allowed".into()),
        });
        paint(&mut terminal, &mut state);
        let text = screen(&terminal).join("\n");
        assert!(text.contains("Image URL"));
        assert!(text.contains("> ftp://x"));
        assert!(text.contains("Only http"));
    }
}
