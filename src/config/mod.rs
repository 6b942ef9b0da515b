//! User configuration
//!
//! A small TOML file under `~/.rankup/` holding the user name, the history
//! page size, and an optional override for where the tracker data lives.
//! Every field has a serde default so a partial (or missing) file still
//! loads; CLI flags override file values after loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Default configuration written by `rankup init`
pub const DEFAULT_CONFIG: &str = r#"# RankUp configuration
# ====================
#
# The user name keys your progression and history. It is treated as an
# already-authenticated stable id; change it to track a separate ladder.
user = "player"

# Completed sessions shown per history page.
page_size = 5

# Where the tracker database and session scratch file live.
# Defaults to the config directory (~/.rankup).
# data_dir = "/somewhere/else"
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Stable user id the progression is keyed by
    #[serde(default = "default_user")]
    pub user: String,

    /// Completed sessions per history page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Override for the data directory; `None` means the config dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_user() -> String {
    "player".to_string()
}

fn default_page_size() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: default_user(),
            page_size: default_page_size(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Get the global config directory path (~/.rankup/)
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rankup")
    }

    /// Get the global config file path (~/.rankup/config.toml)
    pub fn global_config_path() -> PathBuf {
        Self::global_config_dir().join("config.toml")
    }

    /// Load configuration, from `path` when given, otherwise from the
    /// global file. A missing global file is a first run and yields the
    /// defaults; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let global = Self::global_config_path();
                if global.exists() {
                    Self::from_file(&global)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the commented default config to `path`. Refuses to overwrite
    /// an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "config file already exists: {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Directory holding the tracker database and session scratch file
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(Self::global_config_dir)
    }

    /// Page size with the floor the ledger expects
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
