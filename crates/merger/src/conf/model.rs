//! Model: MergeConfig.

use std::path::PathBuf;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::alias::MAX_ALIAS_LEVEL;
use crate::error::ConfigError;
use crate::merge::MergeMode;
use crate::parser::offset::parse_utc_offset;

pub const DEFAULT_LOG_LEVEL: &str = "warn,merger=info,logmerge=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Label shortening aggressiveness, 0..=3
    pub alias_level: u8,
    /// Prepended to every local source path
    pub log_base: String,
    /// Appended to every local source path
    pub log_postfix: String,
    /// UTC offset (`+HHMM`) for timestamps without a zone
    pub default_tz: String,
    pub merge_mode: MergeMode,
    /// Where remote sources are cached; a temp directory when unset
    pub cache_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            alias_level: 0,
            log_base: String::new(),
            log_postfix: String::new(),
            default_tz: "+0000".to_string(),
            merge_mode: MergeMode::default(),
            cache_dir: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl MergeConfig {
    /// Check every value that can be wrong. Returns the parsed default
    /// timezone.
    pub fn validate(&self) -> Result<FixedOffset, ConfigError> {
        if self.alias_level > MAX_ALIAS_LEVEL {
            return Err(ConfigError::AliasLevel {
                level: self.alias_level,
                max: MAX_ALIAS_LEVEL,
            });
        }
        self.default_offset()
    }

    pub fn default_offset(&self) -> Result<FixedOffset, ConfigError> {
        Ok(parse_utc_offset(&self.default_tz)?)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("logmerge-cache"))
    }
}
