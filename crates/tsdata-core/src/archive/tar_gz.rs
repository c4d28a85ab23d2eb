//! Gzip-compressed tar extraction.

use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use flate2::read::GzDecoder;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::DatasetError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;
use crate::archive::staging;
use crate::security::EntryValidator;
use crate::security::ValidatedEntry;
use crate::types::DestDir;
use crate::types::EntryType;

type TarGzReader = tar::Archive<GzDecoder<BufReader<File>>>;

/// Extracts a `.tar.gz` archive into `output_dir`.
///
/// `output_dir` is created if missing. Every entry is validated before any
/// file is written; on error `output_dir` is left unchanged.
///
/// # Errors
///
/// - `PathTraversal` if an entry would land outside `output_dir`
/// - `UnsupportedEntry` for links, devices, and sparse files
/// - `QuotaExceeded` if a [`SecurityConfig`] limit is hit
/// - `Io` for unreadable or corrupt archives
///
/// # Examples
///
/// ```no_run
/// use tsdata_core::NoopProgress;
/// use tsdata_core::SecurityConfig;
/// use tsdata_core::extract_tar_gz;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = extract_tar_gz(
///     "wiki2000_nips.tar.gz",
///     "/tmp/datasets",
///     &SecurityConfig::default(),
///     &mut NoopProgress,
/// )?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_tar_gz<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &SecurityConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    let start = Instant::now();

    let dest = DestDir::create(output_dir.as_ref())?;
    let staging_dir = staging::create_staging(&dest)?;
    let staging_dest = DestDir::new(staging_dir.path())?;

    let plan = plan_extraction(archive_path, &staging_dest, config)?;
    let total = plan.iter().flatten().count();
    debug!(archive = %archive_path.display(), entries = total, "archive validated");

    let mut report = ExtractionReport::new();
    report.entries_skipped = plan.len() - total;
    if report.entries_skipped > 0 {
        warn!(
            archive = %archive_path.display(),
            skipped = report.entries_skipped,
            "skipped archive metadata entries"
        );
        report.add_warning(format!(
            "skipped {} archive metadata entries",
            report.entries_skipped
        ));
    }

    let mut archive = open_archive(archive_path)?;
    let mut current = 0;
    for (index, entry) in archive.entries()?.enumerate() {
        let mut entry = entry?;
        let planned = plan.get(index).ok_or_else(archive_changed)?;
        let Some(validated) = planned else {
            continue;
        };
        let unchanged = *entry.path()? == *validated.source;
        if !unchanged {
            return Err(archive_changed());
        }

        current += 1;
        let relative = validated.entry.safe_path.as_path();
        progress.on_entry_start(relative, total, current);
        write_entry(&mut entry, &validated.entry, &staging_dest, &mut report, progress)?;
        progress.on_entry_complete(relative);
    }
    if current != total {
        return Err(archive_changed());
    }

    staging::commit(staging_dir.path(), &dest)?;
    drop(staging_dir);

    report.duration = start.elapsed();
    progress.on_complete();
    info!(
        archive = %archive_path.display(),
        dest = %dest.as_path().display(),
        files = report.files_extracted,
        bytes = report.bytes_written,
        "archive extracted"
    );
    Ok(report)
}

/// An accepted entry along with its path as stored in the archive.
struct PlannedEntry {
    source: PathBuf,
    entry: ValidatedEntry,
}

/// First pass: validates every entry header. Returns one slot per archive
/// entry; `None` marks entries that are skipped.
fn plan_extraction(
    archive_path: &Path,
    dest: &DestDir,
    config: &SecurityConfig,
) -> Result<Vec<Option<PlannedEntry>>> {
    let mut archive = open_archive(archive_path)?;
    let mut validator = EntryValidator::new(config, dest);
    let mut plan = Vec::new();

    for entry in archive.entries()? {
        let entry = entry?;
        let source = entry.path()?.into_owned();
        let entry_type = EntryType::from(entry.header().entry_type());
        let size = entry.header().size()?;

        let validated = validator.validate_entry(&source, entry_type, size)?;
        if validated.is_none() {
            debug!(path = %source.display(), kind = entry_type.name(), "skipping entry");
        }
        plan.push(validated.map(|entry| PlannedEntry { source, entry }));
    }

    Ok(plan)
}

fn write_entry<R: Read>(
    reader: &mut R,
    validated: &ValidatedEntry,
    dest: &DestDir,
    report: &mut ExtractionReport,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    let output_path = dest.join(&validated.safe_path);

    if validated.entry_type == EntryType::Directory {
        std::fs::create_dir_all(&output_path)?;
        report.directories_created += 1;
        return Ok(());
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::with_capacity(64 * 1024, File::create(&output_path)?);
    // Never trust the reader to stop at the declared size.
    let written = std::io::copy(&mut reader.take(validated.size), &mut writer)?;
    writer.flush()?;

    progress.on_bytes_written(written);
    report.files_extracted += 1;
    report.bytes_written += written;
    Ok(())
}

fn open_archive(path: &Path) -> Result<TarGzReader> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}

fn archive_changed() -> DatasetError {
    DatasetError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        "archive contents changed between validation and extraction",
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use crate::error::QuotaResource;
    use crate::test_utils::TarGzTestBuilder;
    use tempfile::TempDir;

    fn write_archive(dir: &Path, data: &[u8]) -> PathBuf {
        let path = dir.join("archive.tar.gz");
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_extract_dataset_layout() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_directory("ds/")
                .add_file("ds/metadata/metadata.json", br#"{"freq":"D"}"#)
                .add_file("ds/train/train.json", b"{}\n")
                .add_file("ds/test/test.json", b"{}\n")
                .build(),
        );

        let report = extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut NoopProgress)
            .unwrap();

        assert_eq!(report.files_extracted, 3);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.bytes_written, 12 + 3 + 3);
        assert!(out.path().join("ds/train/train.json").is_file());
        let leftovers: Vec<_> = std::fs::read_dir(out.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("ds")]);
    }

    #[test]
    fn test_traversal_leaves_output_untouched() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_file("ds/ok.json", b"{}")
                .add_file_unchecked("../escape.txt", b"owned")
                .build(),
        );

        let result = extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut NoopProgress);

        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
        assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
        assert!(!out.path().parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn test_inner_parent_components_allowed() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_file_unchecked("ds/train/../test/test.json", b"{}")
                .build(),
        );

        extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut NoopProgress).unwrap();
        assert!(out.path().join("ds/test/test.json").is_file());
    }

    #[test]
    fn test_symlink_entry_rejected() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_symlink("ds/link", "/etc/passwd")
                .build(),
        );

        let result = extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut NoopProgress);
        assert!(matches!(
            result,
            Err(DatasetError::UnsupportedEntry { kind: "symlink", .. })
        ));
    }

    #[test]
    fn test_file_count_quota() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_file("a", b"1")
                .add_file("b", b"2")
                .build(),
        );
        let config = SecurityConfig {
            max_file_count: 1,
            ..Default::default()
        };

        let result = extract_tar_gz(&archive, out.path(), &config, &mut NoopProgress);
        assert!(matches!(
            result,
            Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::FileCount { .. }
            })
        ));
        assert!(!out.path().join("a").exists());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let target = out.path().join("nested/root");
        let archive = write_archive(src.path(), &TarGzTestBuilder::new().add_file("x.json", b"{}").build());

        extract_tar_gz(&archive, &target, &SecurityConfig::default(), &mut NoopProgress).unwrap();
        assert!(target.join("x.json").is_file());
    }

    #[test]
    fn test_corrupt_archive_is_io_error() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(src.path(), b"definitely not gzip");

        let result = extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut NoopProgress);
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_progress_callbacks() {
        #[derive(Default)]
        struct Recorder {
            started: Vec<(usize, usize)>,
            bytes: u64,
            completed: bool,
        }

        impl ProgressCallback for Recorder {
            fn on_entry_start(&mut self, _path: &Path, total: usize, current: usize) {
                self.started.push((current, total));
            }
            fn on_bytes_written(&mut self, bytes: u64) {
                self.bytes += bytes;
            }
            fn on_entry_complete(&mut self, _path: &Path) {}
            fn on_complete(&mut self) {
                self.completed = true;
            }
        }

        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let archive = write_archive(
            src.path(),
            &TarGzTestBuilder::new()
                .add_file("a.json", b"12345")
                .add_file("b.json", b"678")
                .build(),
        );
        let mut recorder = Recorder::default();

        extract_tar_gz(&archive, out.path(), &SecurityConfig::default(), &mut recorder).unwrap();
        assert_eq!(recorder.started, vec![(1, 2), (2, 2)]);
        assert_eq!(recorder.bytes, 8);
        assert!(recorder.completed);
    }
}
