//! Runtime configuration: defaults, an optional YAML file named by `DISPENSARY_CONFIG`, then
//! environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::history::DEFAULT_HISTORY_PATH;
use crate::data::loader::DEFAULT_REGISTRY_PATH;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

pub const CONFIG_ENV: &str = "DISPENSARY_CONFIG";
pub const BIND_ENV: &str = "DISPENSARY_BIND";
pub const REGISTRY_ENV: &str = "DISPENSARY_REGISTRY";
pub const HISTORY_ENV: &str = "DISPENSARY_HISTORY";
pub const ASSETS_ENV: &str = "DISPENSARY_ASSETS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("column mapping references unknown column '{column}'")]
    UnknownColumn { column: String },
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub bind_addr: String,
    pub registry_path: PathBuf,
    pub history_path: PathBuf,
    /// Directory served under `/assets` (banner images and the like).
    pub assets_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            assets_dir: None,
        }
    }
}

impl DashboardConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_yaml_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw, &path.display().to_string())
    }

    pub fn from_yaml_str(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Apply `DISPENSARY_*` overrides; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(bind_addr) = value(BIND_ENV) {
            self.bind_addr = bind_addr;
        }
        if let Some(registry) = value(REGISTRY_ENV) {
            self.registry_path = PathBuf::from(registry);
        }
        if let Some(history) = value(HISTORY_ENV) {
            self.history_path = PathBuf::from(history);
        }
        if let Some(assets) = value(ASSETS_ENV) {
            self.assets_dir = Some(PathBuf::from(assets));
        }
    }
}
