//! # Configuration
//!
//! Settings live in `config.json` inside the jotter home directory. A missing file means
//! defaults; a missing key means that key's default.
//!
//! ## Locations
//!
//! - `JOTTER_HOME`, when set, holds both the config file and a `logs/` directory. Tests
//!   point it at a temp dir.
//! - Otherwise the platform config directory (via `directories`) holds the config and the
//!   platform data directory holds the logs.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `sidebar_open` | `true` | Whether the sidebar starts open |
//! | `id_source` | `sequential` | `sequential`, `timestamp` or `uuid` |
//! | `welcome_page` | `true` | Start on "Getting Started" instead of an empty page |
//! | `log_level` | `warn` | `trace`, `debug`, `info`, `warn` or `error` |
//! | `sidebar_width` | `30` | Columns given to the sidebar in the terminal |

use crate::error::{JotterError, Result};
use crate::ids::IdSourceKind;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const HOME_ENV: &str = "JOTTER_HOME";
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_SIDEBAR_WIDTH: usize = 30;
const MIN_SIDEBAR_WIDTH: usize = 12;

/// Every key `jotter config` understands, in display order.
pub const KEYS: &[&str] = &[
    "sidebar_open",
    "id_source",
    "welcome_page",
    "log_level",
    "sidebar_width",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JotterConfig {
    #[serde(default = "default_true")]
    pub sidebar_open: bool,

    #[serde(default)]
    pub id_source: IdSourceKind,

    #[serde(default = "default_true")]
    pub welcome_page: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: usize,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_sidebar_width() -> usize {
    DEFAULT_SIDEBAR_WIDTH
}

impl Default for JotterConfig {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            id_source: IdSourceKind::default(),
            welcome_page: true,
            log_level: default_log_level(),
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
        }
    }
}

impl JotterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: JotterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory, creating it if needed
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// The value of `key` as shown to the user. Dashes and underscores are interchangeable.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "sidebar_open" => self.sidebar_open.to_string(),
            "id_source" => self.id_source.to_string(),
            "welcome_page" => self.welcome_page.to_string(),
            "log_level" => self.log_level.clone(),
            "sidebar_width" => self.sidebar_width.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match normalize_key(key).as_str() {
            "sidebar_open" => self.sidebar_open = parse_bool(value)?,
            "id_source" => self.id_source = value.parse()?,
            "welcome_page" => self.welcome_page = parse_bool(value)?,
            "log_level" => self.log_level = crate::logging::normalize_level(value)?.to_string(),
            "sidebar_width" => {
                let width: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("`{value}` is not a column count"))?;
                if width < MIN_SIDEBAR_WIDTH {
                    return Err(format!(
                        "sidebar_width must be at least {MIN_SIDEBAR_WIDTH}"
                    ));
                }
                self.sidebar_width = width;
            }
            _ => return Err(format!("Unknown config key: {key}")),
        }
        Ok(())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

fn parse_bool(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("`{other}` is not true or false")),
    }
}

/// Where config and logs live for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JotterPaths {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl JotterPaths {
    /// Everything under one directory, as used for `JOTTER_HOME`.
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            log_dir: home.join("logs"),
            config_dir: home,
        }
    }

    /// `JOTTER_HOME` if set, otherwise the platform directories.
    pub fn resolve() -> Result<Self> {
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::under(home));
        }
        let dirs = ProjectDirs::from("com", "jotter", "jotter").ok_or_else(|| {
            JotterError::Config("could not determine a home directory".to_string())
        })?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            log_dir: dirs.data_dir().join("logs"),
        })
    }
}
