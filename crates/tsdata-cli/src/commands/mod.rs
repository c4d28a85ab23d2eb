//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod from_file;
pub mod list;
pub mod load;

use std::path::Path;
use tsdata_core::LoaderConfig;

/// Builds the loader configuration, honouring `--data-dir`.
pub fn loader_config(data_dir: Option<&Path>) -> LoaderConfig {
    data_dir.map_or_else(LoaderConfig::default, LoaderConfig::with_data_root)
}
