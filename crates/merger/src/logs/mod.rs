//! Logs module: entries, per-source entry streams and output rendering.

pub mod lines;
pub mod entry;
pub mod stream;
pub mod stats;
pub mod output;

pub use entry::{LogEntry, SourceId, CONTINUATION_PADDING};
pub use stream::EntryStream;
pub use stats::StreamStats;
pub use output::write_entries;
