//! Planner configuration at ~/.config/wpl/config.toml, overridable with
//! `WPL_*` environment variables (`WPL_VIEWER__NAME=Sam`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NAMESPACE, DEFAULT_SERVER_PORT, STORAGE_ENDPOINT};
use crate::date_key::WeekStart;
use crate::error::{WplError, WplResult};
use crate::kv::Namespace;
use crate::viewer::{Role, Viewer};

static DEFAULT_DATA_FILE: &str = "~/.local/share/wpl/storage.json";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Who is using this install. Stands in for the signed-in profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default)]
    pub name: String,
}

fn default_role() -> Role {
    Role::Coach
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            role: default_role(),
            name: "Coach".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WplConfig {
    /// Local key-value file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Storage endpoint of wpl-server. Sync is off when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,

    /// Only keys with this prefix are synced.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Anchor for weekday-indexed calendars from older releases.
    #[serde(default)]
    pub week_starts_on: WeekStart,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl Default for WplConfig {
    fn default() -> Self {
        WplConfig {
            data_file: default_data_file(),
            remote_url: None,
            namespace: default_namespace(),
            week_starts_on: WeekStart::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl WplConfig {
    pub fn config_path() -> WplResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WplError::Config("Could not determine config directory".into()))?
            .join("wpl");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the user's config, writing a commented template on first run.
    pub fn load() -> WplResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WplResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("WPL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| WplError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WplError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.namespace.clone())
    }

    pub fn viewer(&self) -> Viewer {
        Viewer {
            role: self.viewer.role,
            name: self.viewer.name.clone(),
        }
    }

    pub fn save(&self, path: &Path) -> WplResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| WplError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| WplError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WplResult<()> {
        let contents = format!(
            "\
# wpl configuration

# Where the planner keeps its local data:
# data_file = \"{DEFAULT_DATA_FILE}\"

# Sync with a wpl-server (leave unset to stay local):
# remote_url = \"http://127.0.0.1:{DEFAULT_SERVER_PORT}{STORAGE_ENDPOINT}\"

# Keys with this prefix are synced:
# namespace = \"{DEFAULT_NAMESPACE}\"

# First day of the week for calendars from older releases (sunday or monday):
# week_starts_on = \"sunday\"

# Who you are on the team:
# [viewer]
# role = \"coach\"
# name = \"Coach\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WplError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WplError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
