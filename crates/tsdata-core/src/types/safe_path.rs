//! Validated safe path type for archive extraction.

use crate::DatasetError;
use crate::Result;
use crate::SecurityConfig;
use crate::error::QuotaResource;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// A relative path that is known to resolve inside a [`DestDir`].
///
/// The stored path is lexically normalized: `.` components are dropped and
/// `..` components are applied against the components before them. A path
/// whose `..` would climb above the destination is rejected, as is any
/// absolute path.
///
/// An empty `SafePath` denotes the destination directory itself; archives
/// produced with `tar -C dir .` carry such an entry (`./`).
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use tsdata_core::SecurityConfig;
/// use tsdata_core::types::DestDir;
/// use tsdata_core::types::SafePath;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new(PathBuf::from("/tmp"))?;
/// let config = SecurityConfig::default();
///
/// let safe = SafePath::validate(&PathBuf::from("wiki/train/../test/test.json"), &dest, &config)?;
/// assert_eq!(safe.as_path(), PathBuf::from("wiki/test/test.json"));
///
/// assert!(SafePath::validate(&PathBuf::from("../etc/passwd"), &dest, &config).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Validates and constructs a `SafePath`.
    ///
    /// # Validation Steps
    ///
    /// 1. Reject empty paths and paths containing NUL bytes
    /// 2. Reject absolute paths, root and prefix components
    /// 3. Normalize `.` and `..` lexically; reject if `..` escapes
    /// 4. Enforce `max_path_depth`
    /// 5. Canonicalize the nearest existing ancestor and require it to stay
    ///    inside `dest`, so a symlink already on disk cannot redirect output
    ///
    /// # Errors
    ///
    /// - `DatasetError::PathTraversal` when the path leaves `dest`
    /// - `DatasetError::QuotaExceeded` when the path is too deep
    pub fn validate(path: &Path, dest: &DestDir, config: &SecurityConfig) -> Result<Self> {
        let traversal = || DatasetError::PathTraversal {
            path: path.to_path_buf(),
        };

        if path.as_os_str().is_empty() || has_null_bytes(path) {
            return Err(traversal());
        }

        let normalized = normalize(path).ok_or_else(traversal)?;

        let depth = normalized.components().count();
        if depth > config.max_path_depth {
            return Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::PathDepth {
                    depth,
                    max: config.max_path_depth,
                },
            });
        }

        let resolved = dest.as_path().join(&normalized);
        if !resolved.starts_with(dest.as_path()) {
            return Err(traversal());
        }

        if let Some(existing) = nearest_existing_ancestor(&resolved) {
            let canonical = existing.canonicalize().map_err(|e| {
                DatasetError::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to canonicalize {}: {e}", existing.display()),
                ))
            })?;
            if !canonical.starts_with(dest.as_path()) {
                return Err(traversal());
            }
        }

        Ok(Self(normalized))
    }

    /// Returns `true` if this path denotes the destination directory itself.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.as_os_str().is_empty()
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

/// Lexically normalizes a relative path. Returns `None` if the path is
/// absolute or a `..` would climb above its starting point.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

/// Walks up from `path` to the first ancestor that exists on disk,
/// without following a final symlink.
fn nearest_existing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors()
        .find(|candidate| candidate.symlink_metadata().is_ok())
}

#[cfg(unix)]
fn has_null_bytes(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().contains(&b'\0')
}

#[cfg(not(unix))]
fn has_null_bytes(path: &Path) -> bool {
    path.to_str().is_none_or(|s| s.contains('\0'))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path().to_path_buf()).expect("failed to create dest");
        (temp, dest)
    }

    #[test]
    fn test_empty_path() {
        let (_temp, dest) = create_test_dest();
        let result = SafePath::validate(Path::new(""), &dest, &SecurityConfig::default());
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }

    #[test]
    fn test_valid_relative() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(
            Path::new("wiki2000_nips/train/train.json"),
            &dest,
            &SecurityConfig::default(),
        )
        .expect("should be valid");
        assert_eq!(safe.as_path(), Path::new("wiki2000_nips/train/train.json"));
        assert!(!safe.is_root());
    }

    #[test]
    fn test_parent_dir_escape_rejected() {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig::default();
        for path in ["../etc/passwd", "a/../../etc/passwd", "./../x", "a/b/../../../x"] {
            let result = SafePath::validate(Path::new(path), &dest, &config);
            assert!(
                matches!(result, Err(DatasetError::PathTraversal { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_parent_dir_inside_is_normalized() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(
            Path::new("data/train/../test/./test.json"),
            &dest,
            &SecurityConfig::default(),
        )
        .unwrap();
        assert_eq!(safe.as_path(), Path::new("data/test/test.json"));
    }

    #[test]
    fn test_current_dir_is_root() {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::validate(Path::new("./"), &dest, &SecurityConfig::default()).unwrap();
        assert!(safe.is_root());
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_rejected() {
        let (_temp, dest) = create_test_dest();
        let result = SafePath::validate(Path::new("/etc/passwd"), &dest, &SecurityConfig::default());
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_null_byte_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let (_temp, dest) = create_test_dest();
        let path = Path::new(OsStr::from_bytes(b"data\0.json"));
        let result = SafePath::validate(path, &dest, &SecurityConfig::default());
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let (_temp, dest) = create_test_dest();
        let config = SecurityConfig {
            max_path_depth: 2,
            ..Default::default()
        };
        assert!(SafePath::validate(Path::new("a/b"), &dest, &config).is_ok());
        let result = SafePath::validate(Path::new("a/b/c"), &dest, &config);
        assert!(matches!(
            result,
            Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::PathDepth { depth: 3, max: 2 }
            })
        ));
    }

    #[test]
    fn test_sibling_with_common_prefix_rejected() {
        let temp = TempDir::new().unwrap();
        let data = temp.path().join("data");
        std::fs::create_dir(&data).unwrap();
        std::fs::create_dir(temp.path().join("database")).unwrap();
        let dest = DestDir::new(&data).unwrap();

        let result = SafePath::validate(Path::new("../database/x"), &dest, &SecurityConfig::default());
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_existing_symlink_escape_rejected() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();

        let result = SafePath::validate(
            Path::new("escape/owned.txt"),
            &dest,
            &SecurityConfig::default(),
        );
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }
}
