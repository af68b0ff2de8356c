use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AssistError, Result};

/// Environment variable holding a log filter, e.g. `ASSIST_LOG=editor_assist=debug`.
pub const LOG_ENV: &str = "ASSIST_LOG";

/// `ASSIST_LOG` wins over the configured level.
pub fn filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| AssistError::Logging(format!("invalid log level '{level}': {e}"))),
    }
}

/// Sends tracing output to `path`. The terminal belongs to the UI, so nothing goes to stdout.
pub fn init(path: &Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| AssistError::Logging(e.to_string()))
}
