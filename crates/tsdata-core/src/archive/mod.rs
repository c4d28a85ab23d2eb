//! Safe extraction of dataset archives.
//!
//! Extraction runs in two passes over the archive. The first pass validates
//! every entry header; nothing touches the filesystem until the whole archive
//! has been accepted. The second pass writes into a staging directory inside
//! the destination, which is then merged into place.

pub mod staging;
pub mod tar_gz;

pub use tar_gz::extract_tar_gz;
