//! Blocking HTTP download of dataset archives.

use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use crate::DatasetError;
use crate::DownloadReport;
use crate::LoaderConfig;
use crate::ProgressCallback;
use crate::Result;

const CHUNK_SIZE: usize = 64 * 1024;

/// Downloads `url` to `dest_file`.
///
/// The body is streamed into a temporary file next to `dest_file` and renamed
/// into place only once the transfer completed, so an interrupted download
/// never leaves a truncated archive behind.
///
/// # Errors
///
/// Returns `DatasetError::Download` on connection failures, non-success HTTP
/// status, or a body shorter than its `Content-Length`; `DatasetError::Io` if
/// the destination cannot be written.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tsdata_core::LoaderConfig;
/// use tsdata_core::NoopProgress;
/// use tsdata_core::fetch::download;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LoaderConfig::default();
/// let report = download(
///     "https://example.com/data.tar.gz",
///     Path::new("/tmp/data.tar.gz"),
///     &config,
///     &mut NoopProgress,
/// )?;
/// println!("{} bytes", report.bytes_downloaded);
/// # Ok(())
/// # }
/// ```
pub fn download(
    url: &str,
    dest_file: &Path,
    config: &LoaderConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<DownloadReport> {
    let start = Instant::now();
    let failed = |reason: String| DatasetError::Download {
        url: url.to_string(),
        reason,
    };

    let mut builder = reqwest::blocking::Client::builder()
        .timeout(config.download_timeout)
        .user_agent(config.user_agent.as_str());
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    let client = builder.build().map_err(|e| failed(e.to_string()))?;

    info!(%url, dest = %dest_file.display(), "downloading");
    let mut response = client.get(url).send().map_err(|e| failed(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("HTTP status {status}")));
    }

    let content_length = response.content_length();
    progress.on_download_start(url, content_length);

    let parent = match dest_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let mut partial = tempfile::Builder::new()
        .prefix(".download-")
        .tempfile_in(parent)?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut received: u64 = 0;
    loop {
        let n = response
            .read(&mut buf)
            .map_err(|e| failed(e.to_string()))?;
        if n == 0 {
            break;
        }
        partial.write_all(&buf[..n])?;
        received += n as u64;
        progress.on_bytes_written(n as u64);
    }
    partial.flush()?;

    if let Some(expected) = content_length {
        if received != expected {
            return Err(failed(format!(
                "body truncated: received {received} of {expected} bytes"
            )));
        }
    }

    partial
        .persist(dest_file)
        .map_err(|e| DatasetError::Io(e.error))?;
    debug!(bytes = received, "download complete");

    Ok(DownloadReport {
        bytes_downloaded: received,
        content_length,
        duration: start.elapsed(),
    })
}
