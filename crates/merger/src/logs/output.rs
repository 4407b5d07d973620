use std::io::{self, BufWriter, Write};

use super::entry::LogEntry;

/// Write each entry as one output record, newline-terminated.
///
/// Returns the number of entries written. Output is buffered and flushed
/// before returning.
pub fn write_entries<I, W>(entries: I, out: W) -> io::Result<u64>
where
    I: IntoIterator<Item = LogEntry>,
    W: Write,
{
    let mut out = BufWriter::new(out);
    let mut written = 0;
    for entry in entries {
        writeln!(out, "{entry}")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
