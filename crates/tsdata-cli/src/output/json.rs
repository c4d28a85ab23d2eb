//! JSON output formatter for machine-readable results.

use super::formatter::DatasetOutcome;
use super::formatter::JsonOutput;
use super::formatter::ListedDataset;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use tsdata_core::DatasetSummary;
use tsdata_core::ExtractionReport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DatasetOutput<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
    #[serde(flatten)]
    summary: &'a DatasetSummary,
}

impl OutputFormatter for JsonFormatter {
    fn format_dataset(&self, operation: &str, outcome: &DatasetOutcome<'_>) -> Result<()> {
        let data = DatasetOutput {
            source: outcome.source,
            written_to: outcome.written_to.map(|p| p.display().to_string()),
            summary: &outcome.summary,
        };

        Self::output(&JsonOutput::success(operation, data))
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        #[derive(Serialize)]
        struct ExtractionOutput<'a> {
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            entries_skipped: usize,
            duration_ms: u128,
            warnings: &'a [String],
        }

        let data = ExtractionOutput {
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            entries_skipped: report.entries_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
        };

        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_dataset_list(&self, data_root: &Path, datasets: &[ListedDataset]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            data_root: String,
            datasets: &'a [ListedDataset],
        }

        let data = ListOutput {
            data_root: data_root.display().to_string(),
            datasets,
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("error", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    /// Warnings go to stderr so stdout stays a single JSON document.
    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        if let Ok(json) = serde_json::to_string(&JsonOutput::success(
            "warning",
            WarningData { message },
        )) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tsdata_core::dataset::SplitSummary;

    #[test]
    fn test_dataset_output_flattens_summary() {
        let summary = DatasetSummary {
            freq: "H".to_string(),
            prediction_length: Some(24),
            train: SplitSummary::default(),
            test: SplitSummary::default(),
        };
        let data = DatasetOutput {
            source: "wiki2000_nips",
            written_to: None,
            summary: &summary,
        };

        let value = serde_json::to_value(JsonOutput::success("load", data)).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["source"], "wiki2000_nips");
        assert_eq!(value["data"]["freq"], "H");
        assert_eq!(value["data"]["train"]["series"], 0);
        assert!(value["data"].get("written_to").is_none());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_output_structure() {
        let value = serde_json::to_value(JsonOutput::error("error", "boom")).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
        assert!(value.get("data").is_none());
    }
}
