use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{AssistError, Result};
use crate::mention::{Member, MAX_SUGGESTIONS};
use crate::suggest::DEFAULT_MENU_GAP;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub popup: PopupConfig,
    #[serde(default)]
    pub mention: MentionConfig,
    #[serde(default)]
    pub paste: PasteConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PopupConfig {
    /// Rows between the cursor line and the popup.
    #[serde(default = "default_gap")]
    pub gap: u16,
    #[serde(default = "default_max_visible")]
    pub max_visible: u16,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            max_visible: default_max_visible(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MentionConfig {
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Default for MentionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PasteConfig {
    /// Convert markdown pasted as plain text into structured content.
    #[serde(default = "default_true")]
    pub markdown: bool,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self { markdown: true }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct KeybindingsConfig {
    #[serde(default = "default_preset")]
    pub preset: String,
    #[serde(default)]
    pub bindings: HashMap<String, String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            bindings: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Defaults to `assist.log` in the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_gap() -> u16 {
    DEFAULT_MENU_GAP
}

fn default_max_visible() -> u16 {
    8
}

fn default_max_suggestions() -> usize {
    MAX_SUGGESTIONS
}

fn default_true() -> bool {
    true
}

fn default_preset() -> String {
    "default".into()
}

fn default_level() -> String {
    "info".into()
}

impl AppConfig {
    /// Defaults, then the TOML file (if present), then `ASSIST_*` variables
    /// (`ASSIST_POPUP__GAP=2`). `ASSIST_LOG` is the log filter, not a config key.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("ASSIST_").split("__").ignore(&["log"]))
            .extract()
            .map_err(|e| AssistError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mention.max_suggestions == 0 {
            return Err(AssistError::Config(
                "mention.max_suggestions must be greater than 0".into(),
            ));
        }
        if self.popup.max_visible == 0 {
            return Err(AssistError::Config(
                "popup.max_visible must be greater than 0".into(),
            ));
        }
        if !matches!(self.keybindings.preset.as_str(), "default" | "emacs") {
            return Err(AssistError::Config(format!(
                "keybindings.preset must be \"default\" or \"emacs\", got \"{}\"",
                self.keybindings.preset
            )));
        }
        Ok(())
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("editor-assist"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("editor-assist"))
            })
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("assist.log")
        })
    }

    /// Writes the default settings, with a commented example of the optional ones.
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&AppConfig::default())?;
        let content = format!(
            r#"# editor-assist configuration
# Environment overrides use ASSIST_<SECTION>__<KEY>, e.g. ASSIST_POPUP__GAP=2.

{body}
# Mention candidates:
# [[mention.members]]
# id = "u1"
# label = "Ana Lima"

# Override specific keys (preset: default | emacs):
# [keybindings.bindings]
# quit = "Ctrl+q"
# exit_block = "Alt+Enter"
"#
        );

        std::fs::write(path, content)?;
        Ok(())
    }
}
