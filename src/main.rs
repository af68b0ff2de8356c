// Re-export library modules so binary-internal modules can use crate::document:: and friends
pub(crate) use editor_assist::{document, error, markdown, mention, slash, suggest};

mod app;
mod cli;
mod config;
mod keys;
mod logging;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use tracing::warn;

use cli::{Cli, Command};
use config::AppConfig;

fn default_config_path() -> PathBuf {
    AppConfig::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

fn restore_terminal() {
    let _ = crossterm::execute!(
        std::io::stdout(),
        DisableBracketedPaste,
        PopKeyboardEnhancementFlags
    );
    ratatui::restore();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Convert { file, html }) = &cli.command {
        println!("{}", cli::convert(file, *html)?);
        return Ok(());
    }

    let path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let path = default_config_path();
            if !path.exists() {
                AppConfig::write_default(&path)?;
                eprintln!("Created default config at: {}", path.display());
            }
            path
        }
    };

    let config = match AppConfig::load_from_path(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", path.display(), e);
            eprintln!("Fix the config file or delete it to regenerate defaults.");
            return Ok(());
        }
    };

    if let Err(e) = logging::init(&config.log_path(), &config.log.level) {
        eprintln!("Logging disabled: {}", e);
    }

    let (title, seed) = match &cli.file {
        Some(file) => {
            let title = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            (title, Some(cli::seed_document(file)?))
        }
        None => ("untitled".to_string(), None),
    };

    let mut terminal = ratatui::init();

    // Disambiguated escape codes let Shift+Enter and Alt+Enter arrive as distinct keys;
    // bracketed paste delivers clipboard text as one event.
    if let Err(e) = crossterm::execute!(
        std::io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES),
        EnableBracketedPaste
    ) {
        warn!(error = %e, "terminal does not support keyboard enhancement or bracketed paste");
    }

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        hook(info);
    }));

    let result = app::run(&config, &title, seed, &mut terminal).await;

    restore_terminal();

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}
