/// Timestamp recognition and format detection
///
/// Turns raw, heterogeneous log lines into comparable timestamps.
///
/// # Architecture
///
/// - `traits.rs`: the `TimestampParser` capability
/// - `model.rs`: formats, parse outcomes and errors
/// - `offset.rs`: UTC offsets and date assembly from matched fields
/// - `detector.rs`: picks a recognizer from a small sample of lines
/// - `formats/`: individual recognizer implementations
///
/// Recognizers never fail on a line; a line they do not understand is
/// `ParseOutcome::Unrecognized` and becomes continuation text upstream.

pub mod traits;
pub mod model;
pub mod offset;
pub mod detector;
pub mod formats;

// Re-export commonly used types
pub use traits::TimestampParser;
pub use model::{DetectError, LogFormat, ParseError, ParseOutcome, ParsedLine, ParserContext};
pub use detector::FormatDetector;
pub use formats::build_parser;

// Constants
pub const DETECTION_SAMPLE_SIZE: usize = 5; // Lines to sample for detection
pub const TAIL_SCAN_BYTES: u64 = 1024; // Kernel log anchor search window
