use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::parser::ParsedLine;

/// Prefix for continuation lines so multi-line records stay visually
/// distinguishable in merged output.
pub const CONTINUATION_PADDING: &str = "                                        ";

/// Stable identity of an input source, independent of its display alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One logical log record, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub source: SourceId,
    pub alias: Arc<str>,
    pub timestamp: DateTime<FixedOffset>,
    /// Timestamp text exactly as it appeared in the source
    pub raw_timestamp: String,
    /// Rest of the first line plus padded continuation lines
    pub payload: String,
}

impl LogEntry {
    pub fn new(source: SourceId, alias: Arc<str>, parsed: &ParsedLine<'_>) -> Self {
        Self {
            source,
            alias,
            timestamp: parsed.timestamp,
            raw_timestamp: parsed.raw_timestamp.to_string(),
            payload: parsed.remainder.to_string(),
        }
    }

    pub fn append_continuation(&mut self, line: &str) {
        self.payload.push_str(CONTINUATION_PADDING);
        self.payload.push_str(line);
    }

    /// Global output order: instant, then alias, then source position.
    ///
    /// Both merge modes sort with this and nothing else.
    pub fn merge_order(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.alias.cmp(&other.alias))
            .then_with(|| self.source.cmp(&other.source))
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.raw_timestamp,
            self.alias,
            self.payload.trim_end_matches(['\n', '\r'])
        )
    }
}
