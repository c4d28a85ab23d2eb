//! Dataset loading for time-series forecasting models.
//!
//! `tsdata-core` resolves a dataset name into metadata plus train and test
//! splits. Names refer to a dataset root on disk (`custom(<path>)`), a copy
//! cached under the data root, or a registered archive that is downloaded and
//! extracted on first use. Extraction rejects path traversal, links, and
//! oversized archives.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use tsdata_core::LoaderConfig;
//! use tsdata_core::get_dataset;
//! use tsdata_core::load_from_file;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LoaderConfig::default();
//! let wiki = get_dataset("wiki2000_nips", &config)?;
//! println!("{} series at {}", wiki.train.len(), wiki.metadata.freq);
//!
//! let own = load_from_file(Path::new("series.json"), "H", 24)?;
//! println!("{:?}", own.summary());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod registry;
pub mod report;
pub mod security;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

pub use archive::extract_tar_gz;
pub use config::LoaderConfig;
pub use config::SecurityConfig;
pub use dataset::DatasetSummary;
pub use dataset::MetaData;
pub use dataset::TimeSeries;
pub use dataset::TrainTestDataset;
pub use dataset::write_dataset;
pub use error::DatasetError;
pub use error::QuotaResource;
pub use error::Result;
pub use loader::get_dataset;
pub use loader::load_custom_root;
pub use loader::load_from_file;
pub use report::DownloadReport;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
