use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use chrono::{DateTime, Duration, FixedOffset};

use crate::parser::offset::fraction_nanos;
use crate::parser::traits::*;
use crate::parser::{ParseError, ParserContext, TAIL_SCAN_BYTES};

/// Kernel and boot logs stamped with seconds since an unspecified epoch:
/// `[275514.814982] usb 1-1: new high-speed USB device`.
///
/// The epoch is inferred once per source: the last offset found near the
/// end of the file is taken to have been written at the file's
/// last-modified time.
#[derive(Debug)]
pub struct KernelParser {
    start: DateTime<FixedOffset>,
}

impl KernelParser {
    pub fn new(ctx: &ParserContext) -> Result<Self, ParseError> {
        let modified = ctx.modified()?;
        let last = last_offset(ctx.path())
            .map_err(|source| ParseError::Io {
                path: ctx.display_path(),
                source,
            })?
            .ok_or_else(|| ParseError::NoReferenceTimestamp(ctx.display_path()))?;

        let start = modified
            .checked_sub_signed(last)
            .ok_or_else(|| ParseError::OutOfRange(ctx.display_path()))?;

        tracing::debug!(
            source = %ctx.display_path(),
            start = %start,
            "kernel log epoch inferred from file tail"
        );

        Ok(Self::starting_at(start.with_timezone(&ctx.default_tz)))
    }

    /// A parser anchored at a known epoch.
    pub fn starting_at(start: DateTime<FixedOffset>) -> Self {
        Self { start }
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }
}

/// Read the bracketed offset at the start of a line.
///
/// Returns the index of the closing bracket and the offset.
fn read_offset(line: &str) -> Option<(usize, Duration)> {
    let inner = line.strip_prefix('[')?;
    let close = inner.find(']')?;
    let number = inner[..close].trim();

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds = Duration::try_seconds(whole.parse().ok()?)?;
    let nanos = match fraction {
        Some(digits) => fraction_nanos(digits)?,
        None => 0,
    };

    let offset = seconds.checked_add(&Duration::nanoseconds(i64::from(nanos)))?;
    Some((close + 1, offset))
}

/// Scan only the final `TAIL_SCAN_BYTES` of the file for the last offset.
fn last_offset(path: &Path) -> std::io::Result<Option<Duration>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    file.seek(SeekFrom::Start(len.saturating_sub(TAIL_SCAN_BYTES)))?;

    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;

    // The seek may land mid-line or mid-character; such a fragment simply
    // fails to parse.
    let text = String::from_utf8_lossy(&tail);
    Ok(text
        .lines()
        .filter_map(|line| read_offset(line).map(|(_, offset)| offset))
        .last())
}

impl TimestampParser for KernelParser {
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a> {
        let Some((close, offset)) = read_offset(line) else {
            return ParseOutcome::Unrecognized;
        };
        self.start
            .checked_add_signed(offset)
            .map(|timestamp| ParsedLine {
                timestamp,
                raw_timestamp: &line[..=close],
                remainder: &line[close + 1..],
            })
            .into()
    }

    fn format(&self) -> LogFormat {
        LogFormat::Kernel
    }
}
