//! tsdata CLI - Command-line utility for fetching and preparing time-series
//! datasets.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli, formatter: &dyn output::OutputFormatter) -> Result<()> {
    let data_dir = cli.data_dir.as_deref();
    let show_progress = progress::CliProgress::should_show(cli.quiet, cli.json);

    match &cli.command {
        cli::Commands::Load(args) => {
            commands::load::execute(args, data_dir, show_progress, formatter)
        }
        cli::Commands::FromFile(args) => commands::from_file::execute(args, formatter),
        cli::Commands::Extract(args) => commands::extract::execute(args, show_progress, formatter),
        cli::Commands::List => commands::list::execute(data_dir, formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr. `RUST_LOG` overrides the level picked from the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
