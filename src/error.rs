use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Logging error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, AssistError>;
