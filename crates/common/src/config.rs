//! Process-wide configuration, read once at startup.
//!
//! Every field has a default so a partial YAML file is valid. Empty strings
//! for `map` and `map_path` are treated as unset.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Window settings consumed at window-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lumen".into(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profiler_enabled: bool,
    pub console_enabled: bool,
    pub cursor_visible: bool,
    /// Map file name, resolved against `data_dir`.
    pub map: Option<String>,
    /// Map file path, used verbatim.
    pub map_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub window: WindowConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profiler_enabled: false,
            console_enabled: false,
            cursor_visible: false,
            map: None,
            map_path: None,
            data_dir: PathBuf::from("data"),
            window: WindowConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Configured map name, if set and non-empty.
    pub fn map(&self) -> Option<&str> {
        self.map.as_deref().filter(|m| !m.is_empty())
    }

    /// Configured map path, if set and non-empty.
    pub fn map_path(&self) -> Option<&Path> {
        self.map_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.data_dir.join("screenshot.bmp")
    }
}
