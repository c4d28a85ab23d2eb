//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use tsdata_core::DatasetSummary;
use tsdata_core::ExtractionReport;

/// A dataset produced by `load` or `from-file`.
pub struct DatasetOutcome<'a> {
    /// Dataset name or source file as given on the command line.
    pub source: &'a str,
    /// Directory the dataset was written to, if any.
    pub written_to: Option<&'a Path>,
    pub summary: DatasetSummary,
}

/// One row of `tsdata list`.
#[derive(Debug, Serialize)]
pub struct ListedDataset {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub cached: bool,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a loaded or constructed dataset
    fn format_dataset(&self, operation: &str, outcome: &DatasetOutcome<'_>) -> Result<()>;

    /// Format extraction result
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()>;

    /// Format dataset listing
    fn format_dataset_list(&self, data_root: &Path, datasets: &[ListedDataset]) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
