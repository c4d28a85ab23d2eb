//! Statistics returned by downloads and extraction, and the progress hook
//! both drive.

use std::path::Path;
use std::time::Duration;

/// What an archive extraction wrote.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Regular files written.
    pub files_extracted: usize,

    /// Directories created from directory entries.
    pub directories_created: usize,

    /// Bytes written across all files.
    pub bytes_written: u64,

    /// Pax and GNU header entries that were skipped.
    pub entries_skipped: usize,

    /// Wall time from opening the archive to committing the output.
    pub duration: Duration,

    /// Human-readable notes about anything unusual in the archive.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// What a download transferred.
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Bytes received.
    pub bytes_downloaded: u64,

    /// Size announced by the server, if any.
    pub content_length: Option<u64>,

    /// Duration of the transfer.
    pub duration: Duration,
}

/// Receives progress from [`download`](crate::fetch::download) and
/// [`extract_tar_gz`](crate::extract_tar_gz).
///
/// A dataset fetch calls `on_download_start`, then `on_bytes_written` per
/// received chunk, then the entry callbacks once per extracted entry, and
/// finally `on_complete`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tsdata_core::ProgressCallback;
///
/// #[derive(Default)]
/// struct Counter {
///     entries: usize,
/// }
///
/// impl ProgressCallback for Counter {
///     fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {
///         self.entries += 1;
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// A download is starting. `total_bytes` is the `Content-Length`, if sent.
    fn on_download_start(&mut self, _url: &str, _total_bytes: Option<u64>) {}

    /// Entry `current` of `total` (1-based) is about to be written.
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// `bytes` more were received or written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// An entry has been written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Extraction finished and the output is in place.
    fn on_complete(&mut self);
}

/// Ignores every callback.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
