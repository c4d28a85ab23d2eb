//! Error conversion utilities for CLI.
//!
//! Converts tsdata-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use tsdata_core::DatasetError;

/// Converts `DatasetError` to user-friendly anyhow error with context.
///
/// `subject` names what was being processed: a dataset name, a file, or an
/// archive.
pub fn convert_dataset_error(err: DatasetError, subject: &str) -> anyhow::Error {
    match err {
        DatasetError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{subject}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                path.display()
            )
        }
        DatasetError::UnsupportedEntry { path, kind } => {
            anyhow!(
                "Security violation: Archive '{subject}' contains a {kind} entry '{}'\n\
                 HINT: Only regular files and directories are extracted. Repack the archive without links or device files.",
                path.display()
            )
        }
        DatasetError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{subject}': {resource}\n\
                 HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits."
            )
        }
        DatasetError::Download { url, reason } => {
            anyhow!(
                "Failed to download dataset '{subject}' from {url}: {reason}\n\
                 HINT: Check network access, or extract the dataset into --data-dir yourself."
            )
        }
        DatasetError::MissingFile { path } => {
            anyhow!(
                "Dataset '{subject}' is incomplete: {} not found\n\
                 HINT: A dataset root needs metadata.json (or metadata/metadata.json), train/train.json, and test/test.json.",
                path.display()
            )
        }
        err @ DatasetError::Json { .. } => anyhow::Error::from(err).context(format!(
            "Failed to read '{subject}'\n\
             HINT: Every line must be a JSON object with \"start\" and \"target\" fields."
        )),
        DatasetError::InvalidFrequency(freq) => {
            anyhow!(
                "Invalid frequency '{freq}'\n\
                 HINT: Use a pandas-style frequency such as H, 5min, D, W-SUN, M, Q, or Y."
            )
        }
        DatasetError::SeriesTooShort {
            line,
            length,
            prediction_length,
        } => {
            anyhow!(
                "Series on line {line} of '{subject}' has {length} observations, \
                 which does not leave any history before a prediction length of {prediction_length}\n\
                 HINT: Use a smaller --prediction-length or remove short series."
            )
        }
        DatasetError::UnknownDataset { name, known } => {
            anyhow!(
                "Unknown dataset '{name}'\n\
                 HINT: Downloadable datasets: {}. Use custom(<path>) for a dataset on disk.",
                known.join(", ")
            )
        }
        DatasetError::Io(io_err) => {
            anyhow!("I/O error while processing '{subject}': {io_err}")
        }
        _ => anyhow::Error::from(err).context(format!("Error processing '{subject}'")),
    }
}

/// Adds context to a core result.
pub fn add_dataset_context<T>(
    result: Result<T, DatasetError>,
    subject: &str,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_dataset_error(e, subject))
}
