//! Extraction quota tracking and validation.

use crate::DatasetError;
use crate::Result;
use crate::SecurityConfig;
use crate::error::QuotaResource;

/// Tracks resource usage across the entries of one archive.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    files: usize,
    bytes: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a file of `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExceeded` if the file itself, the running total, or the
    /// file count goes over the configured limit.
    pub fn record_file(&mut self, size: u64, config: &SecurityConfig) -> Result<()> {
        if size > config.max_file_size {
            return Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::FileSize {
                    size,
                    max: config.max_file_size,
                },
            });
        }

        self.files += 1;
        if self.files > config.max_file_count {
            return Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::FileCount {
                    current: self.files,
                    max: config.max_file_count,
                },
            });
        }

        self.bytes = self
            .bytes
            .checked_add(size)
            .ok_or(DatasetError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;
        if self.bytes > config.max_total_size {
            return Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes,
                    max: config.max_total_size,
                },
            });
        }

        Ok(())
    }

    /// Returns the number of files recorded.
    #[must_use]
    pub fn files(&self) -> usize {
        self.files
    }

    /// Returns the total bytes recorded.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_tracker_new() {
        let tracker = QuotaTracker::new();
        assert_eq!(tracker.files(), 0);
        assert_eq!(tracker.bytes(), 0);
    }

    #[test]
    fn test_quota_tracker_record_file() {
        let mut tracker = QuotaTracker::new();
        let config = SecurityConfig::default();

        assert!(tracker.record_file(1000, &config).is_ok());
        assert_eq!(tracker.files(), 1);
        assert_eq!(tracker.bytes(), 1000);
    }

    #[test]
    fn test_quota_tracker_exceed_file_count() {
        let mut tracker = QuotaTracker::new();
        let config = SecurityConfig {
            max_file_count: 2,
            ..Default::default()
        };

        assert!(tracker.record_file(100, &config).is_ok());
        assert!(tracker.record_file(100, &config).is_ok());
        let result = tracker.record_file(100, &config);
        assert!(matches!(
            result,
            Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::FileCount { current: 3, max: 2 }
            })
        ));
    }

    #[test]
    fn test_quota_tracker_exceed_total_size() {
        let mut tracker = QuotaTracker::new();
        let config = SecurityConfig {
            max_total_size: 1000,
            ..Default::default()
        };

        assert!(tracker.record_file(600, &config).is_ok());
        let result = tracker.record_file(500, &config);
        assert!(matches!(
            result,
            Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::TotalSize { .. }
            })
        ));
    }

    #[test]
    fn test_quota_tracker_exceed_file_size() {
        let mut tracker = QuotaTracker::new();
        let config = SecurityConfig {
            max_file_size: 1000,
            ..Default::default()
        };

        let result = tracker.record_file(2000, &config);
        assert!(matches!(
            result,
            Err(DatasetError::QuotaExceeded {
                resource: QuotaResource::FileSize { size: 2000, max: 1000 }
            })
        ));
        assert_eq!(tracker.files(), 0);
    }
}
