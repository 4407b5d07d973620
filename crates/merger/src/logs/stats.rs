/// Per-source counters, collected while an entry stream is drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines_read: u64,
    pub entries: u64,
    /// Unrecognized lines folded into the preceding entry
    pub continuation_lines: u64,
    /// Unrecognized lines seen before the first recognized one
    pub dropped_lines: u64,
}

impl StreamStats {
    pub fn record_line(&mut self) {
        self.lines_read += 1;
    }

    pub fn record_entry(&mut self) {
        self.entries += 1;
    }

    pub fn record_continuation(&mut self) {
        self.continuation_lines += 1;
    }

    pub fn record_dropped(&mut self) {
        self.dropped_lines += 1;
    }
}
