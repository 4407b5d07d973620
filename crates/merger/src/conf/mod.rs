//! Conf module: run configuration model and loading.

pub mod model;
pub mod load;

pub use model::MergeConfig;
pub use load::{CONFIG_FILE_ENV, DEFAULT_CONFIG_FILE};
