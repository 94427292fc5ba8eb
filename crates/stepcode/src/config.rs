//! User configuration loaded from `config.toml`

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where the viewer starts after loading a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartAt {
    #[default]
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the line number gutter
    pub line_numbers: bool,
    /// Soft-wrap long code lines
    pub wrap: bool,
    /// Gutter marker for changed lines
    pub changed_marker: String,
    pub tab_width: u8,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            wrap: false,
            changed_marker: "▶".to_string(),
            tab_width: 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub start: StartAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub navigation: NavigationConfig,
}

impl Config {
    /// Default location: `<config dir>/stepcode/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stepcode").join("config.toml"))
    }

    /// Load from `path`; a missing file means defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, or the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Expand tabs in a code line to the configured width
    pub fn expand_tabs(&self, line: &str) -> String {
        line.replace('\t', &" ".repeat(usize::from(self.ui.tab_width)))
    }
}
