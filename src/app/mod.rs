mod input;
mod state;
pub use state::*;

pub use input::{handle_key, handle_paste};

#[cfg(test)]
pub(crate) mod test_helpers;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::document::Fragment;
use crate::error::Result;
use crate::keys::KeybindingMap;

/// Paints until nothing moved. A popup mounted this frame is measured by the
/// first paint and placed by the second.
fn draw(terminal: &mut DefaultTerminal, state: &mut AppState) -> Result<()> {
    for _ in 0..3 {
        terminal.draw(|frame| crate::ui::render(frame, state))?;
        if !state.after_paint() {
            break;
        }
    }
    Ok(())
}

pub async fn run(
    config: &AppConfig,
    title: &str,
    seed: Option<Fragment>,
    terminal: &mut DefaultTerminal,
) -> Result<()> {
    let keybindings =
        KeybindingMap::from_preset(&config.keybindings.preset, &config.keybindings.bindings)?;

    let mut state = AppState::new(config, title, keybindings.hints(), seed);
    info!(preset = %config.keybindings.preset, "editor started");

    let (tx, mut rx) = mpsc::unbounded_channel::<AppMessage>();

    // Spawn event reader task
    let event_tx = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            let msg = match reader.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    AppMessage::Key(key)
                }
                Some(Ok(Event::Paste(text))) => AppMessage::Paste(text),
                Some(Ok(Event::Resize(..))) => AppMessage::Resize,
                Some(Err(_)) | None => break,
                _ => continue,
            };
            if event_tx.send(msg).is_err() {
                break;
            }
        }
    });

    // Spawn tick timer
    let tick_tx = tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if tick_tx.send(AppMessage::Tick).is_err() {
                break;
            }
        }
    });

    // Main loop
    loop {
        draw(terminal, &mut state)?;

        let Some(msg) = rx.recv().await else {
            break;
        };
        match msg {
            AppMessage::Key(key) => handle_key(&mut state, &key, &keybindings),
            AppMessage::Paste(text) => {
                debug!(len = text.len(), "paste received");
                handle_paste(&mut state, text);
            }
            AppMessage::Resize => state.follow_cursor = true,
            AppMessage::Tick => state.tick(),
        }

        if state.should_quit {
            break;
        }
    }

    info!("editor closed");
    Ok(())
}
