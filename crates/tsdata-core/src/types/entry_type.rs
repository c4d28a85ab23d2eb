//! Archive entry type classification.

/// Type of entry in a dataset archive.
///
/// Only [`File`](EntryType::File) and [`Directory`](EntryType::Directory)
/// entries are ever written to disk. Link and device entries are rejected,
/// metadata entries (pax headers, GNU long names) are skipped.
///
/// # Examples
///
/// ```
/// use tsdata_core::types::EntryType;
///
/// let kind = EntryType::from(tar::EntryType::Symlink);
/// assert_eq!(kind, EntryType::Symlink);
/// assert!(kind.is_rejected());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    Symlink,

    /// Hard link entry.
    Hardlink,

    /// Character device, block device, or FIFO.
    Special,

    /// Sparse file; its holes cannot be reproduced faithfully.
    Sparse,

    /// Archive bookkeeping (pax extension headers, GNU long names).
    Metadata,
}

impl EntryType {
    /// Returns `true` if this entry is written to disk.
    #[must_use]
    pub const fn is_extracted(self) -> bool {
        matches!(self, Self::File | Self::Directory)
    }

    /// Returns `true` if encountering this entry aborts extraction.
    #[must_use]
    pub const fn is_rejected(self) -> bool {
        matches!(
            self,
            Self::Symlink | Self::Hardlink | Self::Special | Self::Sparse
        )
    }

    /// Short human-readable name, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Hardlink => "hardlink",
            Self::Special => "special file",
            Self::Sparse => "sparse file",
            Self::Metadata => "metadata",
        }
    }
}

impl From<tar::EntryType> for EntryType {
    fn from(kind: tar::EntryType) -> Self {
        match kind {
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::File,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Link => Self::Hardlink,
            tar::EntryType::Char | tar::EntryType::Block | tar::EntryType::Fifo => Self::Special,
            tar::EntryType::GNUSparse => Self::Sparse,
            _ => Self::Metadata,
        }
    }
}
