//! Type-safe wrappers used while extracting dataset archives.
//!
//! Security types are validated upon construction and have no `From<RawType>`
//! implementations.

pub mod dest_dir;
pub mod entry_type;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use entry_type::EntryType;
pub use safe_path::SafePath;
