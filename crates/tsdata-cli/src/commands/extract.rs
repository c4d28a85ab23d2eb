//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::add_dataset_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::env;
use tsdata_core::NoopProgress;
use tsdata_core::SecurityConfig;
use tsdata_core::extract_tar_gz;

pub fn execute(
    args: &ExtractArgs,
    show_progress: bool,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let defaults = SecurityConfig::default();
    let config = SecurityConfig {
        max_file_count: args.max_files,
        max_total_size: args.max_total_size.unwrap_or(defaults.max_total_size),
        max_file_size: args.max_file_size.unwrap_or(defaults.max_file_size),
        max_path_depth: args.max_depth,
    };

    let archive = args.archive.display().to_string();
    let report = if show_progress {
        let mut progress = CliProgress::new();
        add_dataset_context(
            extract_tar_gz(&args.archive, &output_dir, &config, &mut progress),
            &archive,
        )?
    } else {
        add_dataset_context(
            extract_tar_gz(&args.archive, &output_dir, &config, &mut NoopProgress),
            &archive,
        )?
    };

    for warning in &report.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_extraction_result(&report)
}
