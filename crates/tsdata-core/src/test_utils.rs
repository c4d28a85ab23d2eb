//! Test utilities for building dataset archives in memory.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Builder for `.tar.gz` test archives.
///
/// # Examples
///
/// ```
/// use tsdata_core::test_utils::TarGzTestBuilder;
///
/// let data = TarGzTestBuilder::new()
///     .add_directory("ds/")
///     .add_file("ds/train/train.json", b"{}\n")
///     .add_file_unchecked("../escape.txt", b"x")
///     .build();
/// assert_eq!(&data[..2], &[0x1f, 0x8b]);
/// ```
pub struct TarGzTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarGzTestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is written verbatim, bypassing the
    /// `tar` crate's own path checks. Used to craft traversal entries.
    #[must_use]
    pub fn add_file_unchecked(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        let name = &mut header.as_old_mut().name;
        name.fill(0);
        name[..path.len()].copy_from_slice(path.as_bytes());
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Symlink);
        self
    }

    /// Adds a hardlink.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Link);
        self
    }

    fn add_link(&mut self, path: &str, target: &str, kind: tar::EntryType) {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(kind);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
    }

    /// Builds the gzip-compressed archive.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let tar_data = self.builder.into_inner().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(&tar_data).unwrap();
        encoder.finish().unwrap()
    }
}

impl Default for TarGzTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
