//! Staging directory handling for extraction.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempDir;

use crate::Result;
use crate::types::DestDir;

/// Prefix of staging directories created inside the destination.
pub const STAGING_PREFIX: &str = ".tsdata-staging-";

/// Creates an empty staging directory inside `dest`.
///
/// The directory is removed when the returned guard is dropped, so a failed
/// extraction leaves `dest` as it was.
pub fn create_staging(dest: &DestDir) -> Result<TempDir> {
    Ok(tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(dest.as_path())?)
}

/// Moves every top-level item of `staging` into `dest`.
///
/// Directories present on both sides are merged; any other collision is
/// resolved in favour of the staged item, as `tar` itself would do.
pub fn commit(staging: &Path, dest: &DestDir) -> Result<()> {
    for child in fs::read_dir(staging)? {
        let child = child?;
        merge_into(&child.path(), &dest.as_path().join(child.file_name()))?;
    }
    Ok(())
}

fn merge_into(src: &Path, dst: &Path) -> io::Result<()> {
    let existing = match fs::symlink_metadata(dst) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return fs::rename(src, dst),
        Err(e) => return Err(e),
    };

    if existing.is_dir() && fs::symlink_metadata(src)?.is_dir() {
        for child in fs::read_dir(src)? {
            let child = child?;
            merge_into(&child.path(), &dst.join(child.file_name()))?;
        }
        return Ok(());
    }

    // symlink_metadata: a link at `dst` is replaced, never followed
    if existing.is_dir() {
        fs::remove_dir_all(dst)?;
    } else {
        fs::remove_file(dst)?;
    }
    fs::rename(src, dst)
}
