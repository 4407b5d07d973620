use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use super::entry::{LogEntry, SourceId};
use super::lines::LineReader;
use super::stats::StreamStats;
use crate::parser::{ParseOutcome, TimestampParser};

/// Lazy, one-pass sequence of entries for a single source.
///
/// A recognized line starts a new entry and releases the previous one;
/// an unrecognized line is folded into the entry in progress, or dropped
/// if no entry has started yet.
pub struct EntryStream<R> {
    lines: LineReader<R>,
    parser: Box<dyn TimestampParser>,
    source: SourceId,
    alias: Arc<str>,
    pending: Option<LogEntry>,
    stats: StreamStats,
    finished: bool,
}

impl EntryStream<BufReader<File>> {
    pub fn open(
        path: &Path,
        source: SourceId,
        alias: Arc<str>,
        parser: Box<dyn TimestampParser>,
    ) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), source, alias, parser))
    }
}

impl<R: BufRead> EntryStream<R> {
    pub fn new(reader: R, source: SourceId, alias: Arc<str>, parser: Box<dyn TimestampParser>) -> Self {
        Self {
            lines: LineReader::new(reader),
            parser,
            source,
            alias,
            pending: None,
            stats: StreamStats::default(),
            finished: false,
        }
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    fn finish(&mut self) -> Option<LogEntry> {
        self.finished = true;
        let last = self.pending.take();
        if last.is_some() {
            self.stats.record_entry();
        }
        tracing::debug!(
            source = %self.alias,
            lines = self.stats.lines_read,
            entries = self.stats.entries,
            continuations = self.stats.continuation_lines,
            dropped = self.stats.dropped_lines,
            "source drained"
        );
        last
    }
}

impl<R: BufRead> Iterator for EntryStream<R> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    tracing::warn!(source = %self.alias, error = %e, "read failed, ending source early");
                    return self.finish();
                }
                None => return self.finish(),
            };
            self.stats.record_line();

            match self.parser.parse(&line) {
                ParseOutcome::Recognized(parsed) => {
                    let entry = LogEntry::new(self.source, Arc::clone(&self.alias), &parsed);
                    if let Some(complete) = self.pending.replace(entry) {
                        self.stats.record_entry();
                        return Some(complete);
                    }
                }
                ParseOutcome::Unrecognized => match self.pending.as_mut() {
                    Some(entry) => {
                        entry.append_continuation(&line);
                        self.stats.record_continuation();
                    }
                    None => {
                        tracing::trace!(source = %self.alias, "dropping line before first timestamp");
                        self.stats.record_dropped();
                    }
                },
            }
        }
    }
}
