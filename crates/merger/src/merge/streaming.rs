use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::logs::LogEntry;

/// Current head of one source, ordered for the min-heap.
struct Head {
    entry: LogEntry,
    slot: usize,
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        self.entry
            .merge_order(&other.entry)
            .then_with(|| self.slot.cmp(&other.slot))
    }
}

/// k-way merge holding exactly one pending entry per open source.
///
/// A source is dropped, and with it its open file, as soon as it runs
/// out of entries.
pub struct StreamingMerge<I> {
    sources: Vec<Option<I>>,
    heads: BinaryHeap<Reverse<Head>>,
}

impl<I: Iterator<Item = LogEntry>> StreamingMerge<I> {
    pub fn new(sources: Vec<I>) -> Self {
        let mut merge = Self {
            sources: sources.into_iter().map(Some).collect(),
            heads: BinaryHeap::new(),
        };
        for slot in 0..merge.sources.len() {
            merge.advance(slot);
        }
        merge
    }

    pub fn open_sources(&self) -> usize {
        self.sources.iter().filter(|source| source.is_some()).count()
    }

    fn advance(&mut self, slot: usize) {
        let Some(source) = self.sources[slot].as_mut() else {
            return;
        };
        match source.next() {
            Some(entry) => self.heads.push(Reverse(Head { entry, slot })),
            None => self.sources[slot] = None,
        }
    }
}

impl<I: Iterator<Item = LogEntry>> Iterator for StreamingMerge<I> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        let Reverse(Head { entry, slot }) = self.heads.pop()?;
        self.advance(slot);
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::testing::entry;

    #[test]
    fn test_exhausted_sources_are_released() {
        let short = vec![entry(0, "a", 100, "a1")];
        let long = vec![entry(1, "b", 200, "b1"), entry(1, "b", 300, "b2")];
        let mut merge = StreamingMerge::new(vec![short.into_iter(), long.into_iter()]);

        assert_eq!(merge.open_sources(), 2);
        assert_eq!(merge.next().unwrap().payload, "a1");
        assert_eq!(merge.open_sources(), 1);
        assert_eq!(merge.next().unwrap().payload, "b1");
        assert_eq!(merge.next().unwrap().payload, "b2");
        assert!(merge.next().is_none());
        assert_eq!(merge.open_sources(), 0);
    }

    #[test]
    fn test_empty_sources_never_opened() {
        let empty: Vec<LogEntry> = Vec::new();
        let merge = StreamingMerge::new(vec![empty.into_iter()]);
        assert_eq!(merge.open_sources(), 0);
    }

    #[test]
    fn test_duplicate_aliases_ordered_by_source() {
        let first = vec![entry(0, "same", 100, "from-0")];
        let second = vec![entry(1, "same", 100, "from-1")];
        let merged: Vec<LogEntry> = StreamingMerge::new(vec![second.into_iter(), first.into_iter()]).collect();
        assert_eq!(merged[0].payload, "from-0");
        assert_eq!(merged[1].payload, "from-1");
    }
}
