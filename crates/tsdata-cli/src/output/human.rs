//! Human-readable output formatter with colors and styling.

use super::formatter::DatasetOutcome;
use super::formatter::ListedDataset;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use tsdata_core::ExtractionReport;
use tsdata_core::dataset::SplitSummary;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn heading(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn format_split(split: &SplitSummary) -> String {
        if split.series == 0 {
            return "0".to_string();
        }
        format!(
            "{} (length {}..{}, mean {:.1})",
            Self::format_number(split.series),
            Self::format_number(split.min_length),
            Self::format_number(split.max_length),
            split.mean_length
        )
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_dataset(&self, operation: &str, outcome: &DatasetOutcome<'_>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let verb = if operation == "load" { "loaded" } else { "built" };
        self.heading(&format!("Dataset {verb}: {}", outcome.source));

        let summary = &outcome.summary;
        let _ = self
            .term
            .write_line(&format!("  Frequency:          {}", summary.freq));
        if let Some(prediction_length) = summary.prediction_length {
            let _ = self
                .term
                .write_line(&format!("  Prediction length:  {prediction_length}"));
        }
        let _ = self.term.write_line(&format!(
            "  Train series:       {}",
            Self::format_split(&summary.train)
        ));
        let _ = self.term.write_line(&format!(
            "  Test series:        {}",
            Self::format_split(&summary.test)
        ));
        let missing = summary.train.missing_values + summary.test.missing_values;
        if missing > 0 {
            let _ = self.term.write_line(&format!(
                "  Missing values:     {}",
                Self::format_number(missing)
            ));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Observations:       {} train, {} test",
                Self::format_number(summary.train.observations),
                Self::format_number(summary.test.observations)
            ));
        }

        if let Some(dir) = outcome.written_to {
            let _ = self
                .term
                .write_line(&format!("  Written to:         {}", dir.display()));
        }

        Ok(())
    }

    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.heading("Extraction complete");

        let _ = self
            .term
            .write_line(&format!("  Files extracted: {}", report.files_extracted));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Entries skipped: {}", report.entries_skipped));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        Ok(())
    }

    fn format_dataset_list(&self, data_root: &Path, datasets: &[ListedDataset]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self
            .term
            .write_line(&format!("Data directory: {}", data_root.display()));
        if datasets.is_empty() {
            let _ = self.term.write_line("  (no datasets)");
            return Ok(());
        }

        let width = datasets.iter().map(|d| d.name.len()).max().unwrap_or(0);
        for dataset in datasets {
            let state = if dataset.cached { "cached" } else { "remote" };
            let state = if self.use_colors && dataset.cached {
                style(state).green().to_string()
            } else {
                state.to_string()
            };
            let mut line = format!("  {:<width$}  {state}", dataset.name);
            if self.verbose {
                if let Some(url) = &dataset.url {
                    line.push_str(&format!("  {url}"));
                }
            }
            let _ = self.term.write_line(&line);
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("Error:").red().bold()));
        } else {
            let _ = term.write_line(&format!("Error: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("Warning: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1_000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_split() {
        let split = SplitSummary {
            series: 2_000,
            min_length: 10,
            max_length: 792,
            mean_length: 401.5,
            observations: 802_500,
            missing_values: 0,
        };
        assert_eq!(
            HumanFormatter::format_split(&split),
            "2,000 (length 10..792, mean 401.5)"
        );
        assert_eq!(HumanFormatter::format_split(&SplitSummary::default()), "0");
    }
}
