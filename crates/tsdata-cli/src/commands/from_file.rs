//! From-file command implementation.

use crate::cli::FromFileArgs;
use crate::error::add_dataset_context;
use crate::output::DatasetOutcome;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::path::Path;
use tsdata_core::load_from_file;
use tsdata_core::write_dataset;

pub fn execute(args: &FromFileArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let source = args.file.display().to_string();
    let dataset = add_dataset_context(
        load_from_file(&args.file, &args.freq, args.prediction_length),
        &source,
    )?;

    if let Some(output) = &args.output {
        if !args.force && !is_empty_or_missing(output)? {
            bail!(
                "Output directory '{}' is not empty\n\
                 HINT: Use --force to overwrite the dataset files in it.",
                output.display()
            );
        }
        add_dataset_context(
            write_dataset(&dataset, output),
            &output.display().to_string(),
        )?;
    }

    formatter.format_dataset(
        "from-file",
        &DatasetOutcome {
            source: &source,
            written_to: args.output.as_deref(),
            summary: dataset.summary(),
        },
    )
}

fn is_empty_or_missing(dir: &Path) -> Result<bool> {
    match std::fs::read_dir(dir) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e).with_context(|| format!("failed to read '{}'", dir.display())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_empty_or_missing() {
        let temp = TempDir::new().unwrap();
        assert!(is_empty_or_missing(temp.path()).unwrap());
        assert!(is_empty_or_missing(&temp.path().join("missing")).unwrap());

        std::fs::write(temp.path().join("x"), b"").unwrap();
        assert!(!is_empty_or_missing(temp.path()).unwrap());
    }
}
