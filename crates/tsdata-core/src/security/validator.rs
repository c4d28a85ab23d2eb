//! Entry validation orchestrator.

use std::path::Path;

use crate::DatasetError;
use crate::Result;
use crate::SecurityConfig;
use crate::security::quota::QuotaTracker;
use crate::types::DestDir;
use crate::types::EntryType;
use crate::types::SafePath;

/// An archive entry that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    /// Normalized path inside the destination.
    pub safe_path: SafePath,

    /// Entry type; always [`EntryType::File`] or [`EntryType::Directory`].
    pub entry_type: EntryType,

    /// Declared uncompressed size.
    pub size: u64,
}

/// Coordinates the per-entry checks for one archive: path containment,
/// entry type policy, and quotas.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tsdata_core::SecurityConfig;
/// use tsdata_core::security::EntryValidator;
/// use tsdata_core::types::DestDir;
/// use tsdata_core::types::EntryType;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/datasets")?;
/// let config = SecurityConfig::default();
/// let mut validator = EntryValidator::new(&config, &dest);
///
/// let entry = validator.validate_entry(Path::new("wiki/train/train.json"), EntryType::File, 1024)?;
/// assert!(entry.is_some());
/// # Ok(())
/// # }
/// ```
pub struct EntryValidator<'a> {
    config: &'a SecurityConfig,
    dest: &'a DestDir,
    quota: QuotaTracker,
}

impl<'a> EntryValidator<'a> {
    /// Creates a validator for one extraction.
    #[must_use]
    pub fn new(config: &'a SecurityConfig, dest: &'a DestDir) -> Self {
        Self {
            config,
            dest,
            quota: QuotaTracker::new(),
        }
    }

    /// Validates one entry.
    ///
    /// Returns `Ok(None)` for entries that are skipped: archive metadata and
    /// directory entries that denote the destination itself.
    ///
    /// # Errors
    ///
    /// - `UnsupportedEntry` for links, devices, and sparse files
    /// - `PathTraversal` if the path leaves the destination
    /// - `QuotaExceeded` if a limit is hit
    pub fn validate_entry(
        &mut self,
        path: &Path,
        entry_type: EntryType,
        size: u64,
    ) -> Result<Option<ValidatedEntry>> {
        if entry_type == EntryType::Metadata {
            return Ok(None);
        }
        if entry_type.is_rejected() {
            return Err(DatasetError::UnsupportedEntry {
                path: path.to_path_buf(),
                kind: entry_type.name(),
            });
        }

        let safe_path = SafePath::validate(path, self.dest, self.config)?;
        if safe_path.is_root() {
            if entry_type == EntryType::Directory {
                return Ok(None);
            }
            return Err(DatasetError::PathTraversal {
                path: path.to_path_buf(),
            });
        }

        if entry_type == EntryType::File {
            self.quota.record_file(size, self.config)?;
        }

        Ok(Some(ValidatedEntry {
            safe_path,
            entry_type,
            size,
        }))
    }

    /// Returns the quota tracker state.
    #[must_use]
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DestDir, SecurityConfig) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        (temp, dest, SecurityConfig::default())
    }

    #[test]
    fn test_file_entry_validated() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = validator
            .validate_entry(Path::new("ds/train/train.json"), EntryType::File, 42)
            .unwrap()
            .unwrap();
        assert_eq!(entry.safe_path.as_path(), Path::new("ds/train/train.json"));
        assert_eq!(entry.size, 42);
        assert_eq!(validator.quota().files(), 1);
        assert_eq!(validator.quota().bytes(), 42);
    }

    #[test]
    fn test_directories_do_not_count_toward_quota() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        validator
            .validate_entry(Path::new("ds/"), EntryType::Directory, 0)
            .unwrap();
        assert_eq!(validator.quota().files(), 0);
    }

    #[test]
    fn test_root_directory_entry_skipped() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = validator
            .validate_entry(Path::new("./"), EntryType::Directory, 0)
            .unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn test_file_at_root_rejected() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let result = validator.validate_entry(Path::new("a/.."), EntryType::File, 1);
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }

    #[test]
    fn test_symlink_rejected() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let result = validator.validate_entry(Path::new("ds/link"), EntryType::Symlink, 0);
        assert!(matches!(
            result,
            Err(DatasetError::UnsupportedEntry { kind: "symlink", .. })
        ));
    }

    #[test]
    fn test_metadata_skipped_without_path_check() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let entry = validator
            .validate_entry(Path::new("../PaxHeaders/x"), EntryType::Metadata, 10)
            .unwrap();
        assert!(entry.is_none());
    }

    #[test]
    fn test_traversal_rejected() {
        let (_temp, dest, config) = setup();
        let mut validator = EntryValidator::new(&config, &dest);

        let result = validator.validate_entry(Path::new("../../evil.sh"), EntryType::File, 1);
        assert!(matches!(result, Err(DatasetError::PathTraversal { .. })));
    }
}
