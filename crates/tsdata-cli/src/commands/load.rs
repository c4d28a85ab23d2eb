//! Load command implementation.

use crate::cli::LoadArgs;
use crate::error::add_dataset_context;
use crate::output::DatasetOutcome;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tsdata_core::NoopProgress;
use tsdata_core::loader::DatasetLoader;

use super::loader_config;

pub fn execute(
    args: &LoadArgs,
    data_dir: Option<&Path>,
    show_progress: bool,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let mut config = loader_config(data_dir);
    config.download_timeout = Duration::from_secs(args.timeout);
    let loader = DatasetLoader::new(config);

    let dataset = if show_progress {
        let mut progress = CliProgress::new();
        add_dataset_context(loader.load(&args.name, &mut progress), &args.name)?
    } else {
        add_dataset_context(loader.load(&args.name, &mut NoopProgress), &args.name)?
    };

    formatter.format_dataset(
        "load",
        &DatasetOutcome {
            source: &args.name,
            written_to: None,
            summary: dataset.summary(),
        },
    )
}
