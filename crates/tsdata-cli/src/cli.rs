//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::builder::RangedU64ValueParser;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsdata")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Dataset cache directory (default: $TSDATA_HOME or ~/.tsdata/datasets)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a named or custom(<path>) dataset, downloading it if needed
    Load(LoadArgs),
    /// Build a train/test dataset from a JSON-lines file
    FromFile(FromFileArgs),
    /// Extract a .tar.gz archive with security checks
    Extract(ExtractArgs),
    /// List downloadable and cached datasets
    List,
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct LoadArgs {
    /// Dataset name, or custom(<path>) for a dataset root on disk
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Download timeout in seconds
    #[arg(
        long,
        default_value = "600",
        value_name = "SECS",
        value_parser = RangedU64ValueParser::<u64>::new().range(1..)
    )]
    pub timeout: u64,
}

#[derive(clap::Args)]
pub struct FromFileArgs {
    /// JSON-lines file with one series per line (optionally gzipped)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sampling frequency, e.g. H, 5min, D, W-SUN
    #[arg(long)]
    pub freq: String,

    /// Number of trailing observations held out of the train split
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub prediction_length: usize,

    /// Write the dataset to this directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output directory
    #[arg(short, long, requires = "output")]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum number of files to extract
    #[arg(long, default_value = "10000")]
    pub max_files: usize,

    /// Maximum total extracted size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single file size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Maximum directory depth of an entry path
    #[arg(long, default_value = "32")]
    pub max_depth: usize,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_from_file_args() {
        let cli = Cli::try_parse_from([
            "tsdata",
            "from-file",
            "series.json",
            "--freq",
            "H",
            "--prediction-length",
            "24",
        ])
        .unwrap();
        match cli.command {
            Commands::FromFile(args) => {
                assert_eq!(args.freq, "H");
                assert_eq!(args.prediction_length, 24);
                assert!(args.output.is_none());
            }
            _ => panic!("expected from-file"),
        }
    }

    #[test]
    fn test_load_timeout() {
        let cli = Cli::try_parse_from(["tsdata", "load", "wiki2000_nips"]).unwrap();
        match cli.command {
            Commands::Load(args) => assert_eq!(args.timeout, 600),
            _ => panic!("expected load"),
        }

        let result = Cli::try_parse_from(["tsdata", "load", "wiki2000_nips", "--timeout", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_prediction_length_rejected() {
        let result = Cli::try_parse_from([
            "tsdata",
            "from-file",
            "series.json",
            "--freq",
            "H",
            "--prediction-length",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_data_dir() {
        let cli = Cli::try_parse_from(["tsdata", "list", "--data-dir", "/srv/data"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/data")));
    }
}
