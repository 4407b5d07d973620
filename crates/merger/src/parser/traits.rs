pub use super::model::{LogFormat, ParseOutcome, ParsedLine};

pub trait TimestampParser: Send + Sync {
    /// Extract the leading timestamp of a line, or report that this
    /// format does not apply to it.
    fn parse<'a>(&self, line: &'a str) -> ParseOutcome<'a>;
    fn format(&self) -> LogFormat;
}
