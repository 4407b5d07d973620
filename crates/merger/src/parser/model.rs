use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogFormat {
    /// OpenStack default: `2016-02-01 10:22:59.239`
    OpenStack,
    /// /var/log/messages: `Oct 15 14:11:19` (year from the file mtime)
    Messages,
    /// /var/log/messages with microseconds: `Mar 13 15:19:08.525234`
    MessagesMicros,
    /// libvirtd and qemu domain logs
    Libvirt,
    /// RFC 5424 header: `<183>1 2017-04-03T21:48:21.781459-03:30`
    RawSyslog,
    /// Kernel/boot offsets: `[275514.814982]`
    Kernel,
    /// Slow general-purpose fallback
    Fuzzy,
}

impl LogFormat {
    /// Order in which detection tries each recognizer. More specific first.
    pub const DETECTION_ORDER: [LogFormat; 7] = [
        LogFormat::OpenStack,
        LogFormat::Messages,
        LogFormat::MessagesMicros,
        LogFormat::Libvirt,
        LogFormat::RawSyslog,
        LogFormat::Kernel,
        LogFormat::Fuzzy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::OpenStack => "openstack",
            LogFormat::Messages => "messages",
            LogFormat::MessagesMicros => "messages-ms",
            LogFormat::Libvirt => "libvirt",
            LogFormat::RawSyslog => "raw-syslog",
            LogFormat::Kernel => "kernel",
            LogFormat::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::DETECTION_ORDER
            .iter()
            .copied()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownFormat(s.to_string()))
    }
}

/// Fields extracted from a line that carries a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    pub timestamp: DateTime<FixedOffset>,
    /// Exactly the text consumed as the timestamp, reproduced verbatim on output
    pub raw_timestamp: &'a str,
    /// Everything after the timestamp, line terminator included
    pub remainder: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<'a> {
    Recognized(ParsedLine<'a>),
    Unrecognized,
}

impl<'a> ParseOutcome<'a> {
    pub fn is_recognized(&self) -> bool {
        matches!(self, ParseOutcome::Recognized(_))
    }

    pub fn recognized(self) -> Option<ParsedLine<'a>> {
        match self {
            ParseOutcome::Recognized(parsed) => Some(parsed),
            ParseOutcome::Unrecognized => None,
        }
    }
}

impl<'a> From<Option<ParsedLine<'a>>> for ParseOutcome<'a> {
    fn from(parsed: Option<ParsedLine<'a>>) -> Self {
        parsed.map_or(ParseOutcome::Unrecognized, ParseOutcome::Recognized)
    }
}

/// What a recognizer may need to know about its source at construction time.
#[derive(Debug, Clone)]
pub struct ParserContext {
    pub path: PathBuf,
    /// Applied to timestamps that carry no zone of their own
    pub default_tz: FixedOffset,
}

impl ParserContext {
    pub fn new(path: impl Into<PathBuf>, default_tz: FixedOffset) -> Self {
        Self {
            path: path.into(),
            default_tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Last-modified time of the source file
    pub fn modified(&self) -> Result<DateTime<Utc>, ParseError> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|source| ParseError::Io {
                path: self.display_path(),
                source,
            })?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

/// Failure to construct a recognizer for a source.
///
/// Per-line non-recognition is not an error; see [`ParseOutcome`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No timestamp found near the end of {0}")]
    NoReferenceTimestamp(String),

    #[error("Reference time out of range for {0}")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("Failed to detect format of {0}")]
    Undetected(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
