//! Alias module: source arguments and the short labels shown in merged output.

pub mod spec;
pub mod maps;
pub mod tree;
pub mod resolve;

pub use spec::SourceSpec;
pub use resolve::{resolve_aliases, MAX_ALIAS_LEVEL};
