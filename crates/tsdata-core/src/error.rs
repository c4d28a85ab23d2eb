//! Error types for dataset resolution, download, and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `DatasetError`.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// File count quota exceeded.
    FileCount {
        /// Current file count.
        current: usize,
        /// Maximum allowed file count.
        max: usize,
    },
    /// Total size quota exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single file size quota exceeded.
    FileSize {
        /// File size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        max: u64,
    },
    /// Path depth quota exceeded.
    PathDepth {
        /// Depth of the offending path.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: file count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "quota exceeded: single file size ({size} > {max})")
            }
            Self::PathDepth { depth, max } => {
                write!(f, "quota exceeded: path depth ({depth} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Errors that can occur while resolving or building a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file the dataset layout requires is absent.
    #[error("missing file: {}", path.display())]
    MissingFile {
        /// The expected file.
        path: PathBuf,
    },

    /// An archive entry would land outside the extraction directory.
    #[error("path traversal detected: {}", path.display())]
    PathTraversal {
        /// The entry path as stored in the archive.
        path: PathBuf,
    },

    /// An archive entry has a type that is never extracted.
    #[error("unsupported archive entry {kind}: {}", path.display())]
    UnsupportedEntry {
        /// The entry path as stored in the archive.
        path: PathBuf,
        /// Entry kind (symlink, hardlink, device, ...).
        kind: &'static str,
    },

    /// Extraction quota exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// Downloading an archive failed.
    #[error("download of {url} failed: {reason}")]
    Download {
        /// Requested URL.
        url: String,
        /// Underlying failure.
        reason: String,
    },

    /// A JSON document or JSON line could not be decoded.
    #[error("malformed JSON in {}{}: {source}", path.display(), line.map(|l| format!(" line {l}")).unwrap_or_default())]
    Json {
        /// File being read.
        path: PathBuf,
        /// 1-based line number for line-delimited files.
        line: Option<usize>,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// Metadata is present but unusable.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Frequency string could not be parsed.
    #[error("invalid frequency: {0:?}")]
    InvalidFrequency(String),

    /// Start timestamp could not be parsed.
    #[error("invalid start timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A series is too short to hold back the prediction horizon.
    #[error(
        "series at line {line} has {length} observations, needs more than prediction length {prediction_length}"
    )]
    SeriesTooShort {
        /// 1-based line number in the source file.
        line: usize,
        /// Number of observations.
        length: usize,
        /// Requested prediction length.
        prediction_length: usize,
    },

    /// Caller supplied an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dataset name is neither cached, registered, nor a custom path.
    #[error("unknown dataset {name:?} (known: {})", known.join(", "))]
    UnknownDataset {
        /// Requested name.
        name: String,
        /// Names that can be resolved.
        known: Vec<String>,
    },
}

impl DatasetError {
    /// Returns `true` if this error was raised by an archive safety check.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use tsdata_core::DatasetError;
    ///
    /// let err = DatasetError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = DatasetError::InvalidFrequency("fortnightly".into());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::UnsupportedEntry { .. } | Self::QuotaExceeded { .. }
        )
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, line: Option<usize>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            line,
            source,
        }
    }
}
