//! Load: config loading from file and environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use super::model::MergeConfig;
use crate::error::ConfigError;

pub const CONFIG_FILE_ENV: &str = "LOGMERGE_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "logmerge.toml";

impl MergeConfig {
    /// Load configuration.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match std::env::var(CONFIG_FILE_ENV) {
                Ok(path) => (PathBuf::from(path), true),
                Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        let mut config = if required || config_path.exists() {
            tracing::debug!("Loading configuration from: {}", config_path.display());
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Environment variables override file config
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Apply `LOGMERGE_*` overrides from any variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("LOGMERGE_ALIAS_LEVEL") {
            self.alias_level = level.trim().parse().map_err(|_| ConfigError::Env {
                var: "LOGMERGE_ALIAS_LEVEL",
                value: level.clone(),
            })?;
        }
        if let Some(base) = lookup("LOGMERGE_LOG_BASE") {
            self.log_base = base;
        }
        if let Some(postfix) = lookup("LOGMERGE_LOG_POSTFIX") {
            self.log_postfix = postfix;
        }
        if let Some(tz) = lookup("LOGMERGE_DEFAULT_TZ") {
            self.default_tz = tz;
        }
        if let Some(mode) = lookup("LOGMERGE_MERGE_MODE") {
            self.merge_mode = mode.parse().map_err(|_| ConfigError::Env {
                var: "LOGMERGE_MERGE_MODE",
                value: mode.clone(),
            })?;
        }
        if let Some(dir) = lookup("LOGMERGE_CACHE_DIR") {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }
}
