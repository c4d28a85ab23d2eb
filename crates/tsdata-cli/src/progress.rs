//! Progress bar implementation for CLI operations.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use std::fmt::Write;
use std::path::Path;
use tsdata_core::ProgressCallback;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Downloading,
    Extracting,
}

/// CLI progress bar wrapper implementing `ProgressCallback`.
///
/// Shows transferred bytes while downloading and entry counts while
/// extracting. Automatically cleans up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    phase: Phase,
    bytes_written: u64,
}

impl CliProgress {
    /// Creates a hidden progress bar that appears on the first callback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            phase: Phase::Idle,
            bytes_written: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show(quiet: bool, json: bool) -> bool {
        !quiet && !json && Term::stderr().is_term()
    }

    fn start_download(&mut self, total_bytes: Option<u64>) {
        self.bar.finish_and_clear();
        self.bar = total_bytes.map_or_else(ProgressBar::new_spinner, ProgressBar::new);
        // Template: "Downloading [████████░░░░] 15.2 MB/42.0 MB (5.1 MB/s, 12s)"
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total} ({bytes_per_sec}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .with_key("bytes", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_bytes(state.pos())).unwrap_or(());
                })
                .with_key("total", |state: &ProgressState, w: &mut dyn Write| {
                    let total = state.len().map_or_else(|| "?".to_string(), humanize_bytes);
                    write!(w, "{total}").unwrap_or(());
                })
                .with_key("bytes_per_sec", |state: &ProgressState, w: &mut dyn Write| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let bytes_per_sec = state.per_sec() as u64;
                    write!(w, "{}/s", humanize_bytes(bytes_per_sec)).unwrap_or(());
                })
                .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                    write!(w, "{}", humanize_duration(state.eta())).unwrap_or(());
                })
                .progress_chars("█▓░"),
        );
        self.bar.set_message("Downloading");
        self.phase = Phase::Downloading;
    }

    fn start_extraction(&mut self, total: usize) {
        self.bar.finish_and_clear();
        self.bar = ProgressBar::new(total as u64);
        // Template: "Extracting (1.2 MB) [████████░░░░] 42/100 files"
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        self.bytes_written = 0;
        self.bar.set_message("Extracting");
        self.phase = Phase::Extracting;
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for CliProgress {
    fn on_download_start(&mut self, _url: &str, total_bytes: Option<u64>) {
        self.start_download(total_bytes);
    }

    fn on_entry_start(&mut self, _path: &Path, total: usize, _current: usize) {
        if self.phase != Phase::Extracting {
            self.start_extraction(total);
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        if self.phase == Phase::Downloading {
            self.bar.inc(bytes);
        }
    }

    fn on_entry_complete(&mut self, _path: &Path) {
        self.bar.inc(1);
        self.bar
            .set_message(format!("Extracting ({})", humanize_bytes(self.bytes_written)));
    }

    fn on_complete(&mut self) {
        self.bar.finish_and_clear();
        self.phase = Phase::Idle;
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
#[allow(clippy::cast_precision_loss)]
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Converts duration to human-readable format.
fn humanize_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{secs}s")
    }
}
