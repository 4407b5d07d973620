use crate::logs::LogEntry;

/// Drain every source, then sort.
///
/// The sort is stable, so entries with an identical key keep the order
/// their source produced them in.
pub fn buffered_merge<I>(sources: Vec<I>) -> Vec<LogEntry>
where
    I: Iterator<Item = LogEntry>,
{
    let mut entries: Vec<LogEntry> = sources.into_iter().flatten().collect();
    entries.sort_by(LogEntry::merge_order);
    entries
}
