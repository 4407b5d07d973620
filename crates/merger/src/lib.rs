// Module structure for the log merger.

// Core pipeline
pub mod parser;
pub mod logs;
pub mod alias;
pub mod merge;

// Sources, configuration and the end-to-end run
pub mod source;
pub mod conf;
pub mod error;
pub mod run;

pub use alias::{resolve_aliases, SourceSpec};
pub use conf::MergeConfig;
pub use error::{ConfigError, MergeError, SourceError};
pub use logs::{LogEntry, SourceId};
pub use merge::{merge, MergeMode};
pub use parser::{LogFormat, TimestampParser};
pub use run::{plan_sources, run, RunSummary, SourceArg};
pub use source::{Fetch, LocalFiles, Source};
