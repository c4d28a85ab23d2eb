//! Extraction target directory.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use super::SafePath;
use crate::DatasetError;
use crate::Result;

/// An existing, writable directory that archive entries are extracted into.
///
/// The path is stored canonicalized, so containment checks against it are
/// not fooled by `..` or by a symlinked data root.
///
/// # Examples
///
/// ```no_run
/// use tsdata_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("/tmp/datasets")?;
/// println!("extracting into {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Wraps an existing directory.
    ///
    /// # Errors
    ///
    /// `Io` when `path` is missing, is not a directory, or is read-only.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| {
            unusable(e.kind(), format!("data directory {}: {e}", path.display()))
        })?;
        if !meta.is_dir() {
            return Err(unusable(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }
        if meta.permissions().readonly() {
            return Err(unusable(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", path.display()),
            ));
        }

        Ok(Self(path.canonicalize()?))
    }

    /// Creates `path` with its parents when missing, then wraps it.
    ///
    /// # Errors
    ///
    /// Same as [`DestDir::new`], plus failures creating the directory.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(path.as_ref())?;
        Self::new(path)
    }

    /// Canonical directory path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Absolute output path for a validated entry.
    #[must_use]
    pub fn join(&self, entry: &SafePath) -> PathBuf {
        self.0.join(entry.as_path())
    }
}

fn unusable(kind: io::ErrorKind, message: String) -> DatasetError {
    DatasetError::Io(io::Error::new(kind, message))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_canonicalizes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("train")).unwrap();

        let dest = DestDir::new(temp.path().join("train/..")).unwrap();
        assert!(dest.as_path().is_absolute());
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_new_rejects_missing_and_files() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            DestDir::new(temp.path().join("missing")),
            Err(DatasetError::Io(_))
        ));

        let file = temp.path().join("metadata.json");
        fs::write(&file, "{}").unwrap();
        assert!(matches!(DestDir::new(&file), Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_create_makes_parents() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".tsdata/datasets");

        let dest = DestDir::create(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(dest.as_path(), root.canonicalize().unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn test_readonly_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        let result = DestDir::new(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(result.is_err());
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_root_resolves_to_target() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        std::os::unix::fs::symlink(&real, temp.path().join("datasets")).unwrap();

        let dest = DestDir::new(temp.path().join("datasets")).unwrap();
        assert_eq!(dest.as_path(), real.canonicalize().unwrap());
    }
}
