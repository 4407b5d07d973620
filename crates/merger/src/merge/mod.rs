//! Merge module: combines per-source entry streams into one ordered stream.
//!
//! Both modes order entries with `LogEntry::merge_order` and produce the
//! same output for sources whose timestamps never go backwards.

pub mod buffered;
pub mod streaming;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::logs::LogEntry;
pub use buffered::buffered_merge;
pub use streaming::StreamingMerge;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Read every source fully, then sort
    Buffered,
    /// k-way merge holding one entry per open source
    #[default]
    Streaming,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::Buffered => "buffered",
            MergeMode::Streaming => "streaming",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buffered" => Ok(MergeMode::Buffered),
            "streaming" => Ok(MergeMode::Streaming),
            other => Err(format!("unknown merge mode '{}' (expected buffered or streaming)", other)),
        }
    }
}

/// Merged output of either mode.
pub enum Merged<I: Iterator<Item = LogEntry>> {
    Buffered(std::vec::IntoIter<LogEntry>),
    Streaming(StreamingMerge<I>),
}

impl<I: Iterator<Item = LogEntry>> Iterator for Merged<I> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        match self {
            Merged::Buffered(entries) => entries.next(),
            Merged::Streaming(merge) => merge.next(),
        }
    }
}

pub fn merge<I>(sources: Vec<I>, mode: MergeMode) -> Merged<I>
where
    I: Iterator<Item = LogEntry>,
{
    tracing::debug!(sources = sources.len(), mode = %mode, "merging sources");
    match mode {
        MergeMode::Buffered => Merged::Buffered(buffered_merge(sources).into_iter()),
        MergeMode::Streaming => Merged::Streaming(StreamingMerge::new(sources)),
    }
}
