use std::path::PathBuf;

use thiserror::Error;

use crate::parser::offset::OffsetError;
use crate::parser::{DetectError, ParseError};

/// Problems with the run configuration. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Timezone specification error: {0}")]
    Timezone(#[from] OffsetError),

    #[error("Alias level must be between 0 and {max}, got {level}")]
    AliasLevel { level: u8, max: u8 },

    #[error("Invalid value for {var}: {value}")]
    Env { var: &'static str, value: String },

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A single source could not be used. The run continues without it.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Remote sources are not supported here: {0}")]
    RemoteUnsupported(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Format(#[from] ParseError),

    #[error(transparent)]
    Detect(#[from] DetectError),
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write merged output: {0}")]
    Output(#[source] std::io::Error),
}

impl MergeError {
    /// True when the reader of the output went away (e.g. `| head`).
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, MergeError::Output(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
