//! Dataset resolution: custom roots, the local cache, and downloadable
//! archives, plus building a dataset from a single JSON-lines file.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::DatasetError;
use crate::LoaderConfig;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::extract_tar_gz;
use crate::dataset::CategoricalFeatureInfo;
use crate::dataset::Frequency;
use crate::dataset::METADATA_FILE;
use crate::dataset::MetaData;
use crate::dataset::TimeSeries;
use crate::dataset::TrainTestDataset;
use crate::dataset::file::load_split;
use crate::dataset::file::read_numbered;
use crate::fetch::download;
use crate::registry::ArchiveDataset;
use crate::registry::DatasetName;
use crate::registry::Registry;

/// Resolves dataset names against a data root and a [`Registry`].
///
/// # Examples
///
/// ```no_run
/// use tsdata_core::LoaderConfig;
/// use tsdata_core::NoopProgress;
/// use tsdata_core::loader::DatasetLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let loader = DatasetLoader::new(LoaderConfig::with_data_root("/srv/datasets"));
/// let dataset = loader.load("wiki2000_nips", &mut NoopProgress)?;
/// println!("{} training series", dataset.train.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    config: LoaderConfig,
    registry: Registry,
}

impl DatasetLoader {
    /// Creates a loader using the built-in registry.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            registry: Registry::builtin(),
        }
    }

    /// Replaces the registry of downloadable datasets.
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the loader configuration.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the registry of downloadable datasets.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves `name` to a dataset.
    ///
    /// Tried in order: `custom(<path>)`, a cached copy under the data root,
    /// then a registered archive, which is downloaded and extracted into the
    /// data root on first use.
    ///
    /// # Errors
    ///
    /// - `UnknownDataset` if `name` is neither cached nor registered
    /// - `MissingFile` if the dataset layout is incomplete
    /// - `Download` or any extraction error while fetching an archive
    pub fn load(
        &self,
        name: &str,
        progress: &mut dyn ProgressCallback,
    ) -> Result<TrainTestDataset> {
        let name = match DatasetName::parse(name)? {
            DatasetName::Custom(path) => {
                let root = expand_home(path);
                let root = std::fs::canonicalize(&root).unwrap_or(root);
                debug!(root = %root.display(), "loading custom dataset");
                return load_custom_root(&root);
            }
            DatasetName::Named(name) => name,
        };

        let cached = self.config.data_root.join(name);
        if find_metadata_dir(&cached).is_some() {
            debug!(root = %cached.display(), "loading cached dataset");
            return load_custom_root(&cached);
        }

        let Some(archive) = self.registry.get(name) else {
            return Err(DatasetError::UnknownDataset {
                name: name.to_string(),
                known: self.registry.names(),
            });
        };

        std::fs::create_dir_all(&self.config.data_root)?;
        if !cached.exists() {
            self.fetch_archive(archive, progress)?;
        }
        load_custom_root(&cached)
    }

    /// Names of datasets already present under the data root.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the data root exists but cannot be listed.
    pub fn cached_datasets(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.config.data_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if find_metadata_dir(&path).is_none() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn fetch_archive(
        &self,
        archive: &ArchiveDataset,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()> {
        let root = &self.config.data_root;
        let archive_path = root.join(format!("{}.tar.gz", archive.name));
        info!(dataset = %archive.name, url = %archive.url, "fetching dataset archive");

        download(&archive.url, &archive_path, &self.config, progress)?;
        let extracted = extract_tar_gz(&archive_path, root, &self.config.security, progress);
        if let Err(e) = std::fs::remove_file(&archive_path) {
            warn!(path = %archive_path.display(), error = %e, "could not remove archive");
        }
        let report = extracted?;

        debug!(
            dataset = %archive.name,
            files = report.files_extracted,
            bytes = report.bytes_written,
            "dataset archive extracted"
        );
        Ok(())
    }
}

/// Resolves `name` with the built-in registry and no progress reporting.
///
/// See [`DatasetLoader::load`] for the resolution order.
///
/// # Errors
///
/// Same as [`DatasetLoader::load`].
///
/// # Examples
///
/// ```no_run
/// use tsdata_core::LoaderConfig;
/// use tsdata_core::get_dataset;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = get_dataset("custom(~/data/electricity)", &LoaderConfig::default())?;
/// println!("{}", dataset.metadata.freq);
/// # Ok(())
/// # }
/// ```
pub fn get_dataset(name: &str, config: &LoaderConfig) -> Result<TrainTestDataset> {
    DatasetLoader::new(config.clone()).load(name, &mut NoopProgress)
}

/// Loads a dataset laid out as
///
/// ```text
/// root/metadata.json            (or root/metadata/metadata.json)
/// root/train/train.json
/// root/test/test.json
/// ```
///
/// Every data file in `train/` and `test/` is read, not only the two
/// required ones.
///
/// # Errors
///
/// - `MissingFile` if metadata or either required split file is absent
/// - `Json`, `InvalidMetadata` for malformed content
pub fn load_custom_root(root: &Path) -> Result<TrainTestDataset> {
    let metadata_dir = find_metadata_dir(root).ok_or_else(|| DatasetError::MissingFile {
        path: root.join(METADATA_FILE),
    })?;

    let train_dir = root.join("train");
    let test_dir = root.join("test");
    for required in [train_dir.join("train.json"), test_dir.join("test.json")] {
        if !required.is_file() {
            return Err(DatasetError::MissingFile { path: required });
        }
    }

    let metadata = MetaData::load(&metadata_dir)?;
    let train = load_split(&train_dir)?;
    let test = load_split(&test_dir)?;

    info!(
        root = %root.display(),
        freq = %metadata.freq,
        train = train.len(),
        test = test.len(),
        "dataset loaded"
    );
    Ok(TrainTestDataset {
        metadata,
        train,
        test,
    })
}

/// Builds a dataset from a single JSON-lines file.
///
/// The test split holds every series as read; the train split holds the
/// same series with the last `prediction_length` observations removed.
///
/// # Errors
///
/// - `InvalidArgument` if `prediction_length` is zero or the file is empty
/// - `InvalidFrequency` if `freq` does not parse
/// - `SeriesTooShort` for a series not longer than `prediction_length`
/// - `MissingFile`, `Json` from reading the file
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tsdata_core::load_from_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dataset = load_from_file(Path::new("series.json"), "H", 24)?;
/// assert_eq!(dataset.train.len(), dataset.test.len());
/// # Ok(())
/// # }
/// ```
pub fn load_from_file(
    path: &Path,
    freq: &str,
    prediction_length: usize,
) -> Result<TrainTestDataset> {
    if prediction_length == 0 {
        return Err(DatasetError::InvalidArgument(
            "prediction length must be at least 1".to_string(),
        ));
    }
    let freq: Frequency = freq.parse()?;

    let records = read_numbered(path)?;
    if records.is_empty() {
        return Err(DatasetError::InvalidArgument(format!(
            "no time series in {}",
            path.display()
        )));
    }

    let mut train = Vec::with_capacity(records.len());
    for record in &records {
        let length = record.series.len();
        if length <= prediction_length {
            return Err(DatasetError::SeriesTooShort {
                line: record.line,
                length,
                prediction_length,
            });
        }
        train.push(record.series.truncated(prediction_length));
    }
    let test: Vec<_> = records.into_iter().map(|r| r.series).collect();

    let mut metadata = MetaData::new(&freq, Some(prediction_length));
    metadata.feat_static_cat = infer_static_cat(&test);

    info!(
        path = %path.display(),
        freq = %freq,
        prediction_length,
        series = test.len(),
        "dataset built from file"
    );
    Ok(TrainTestDataset {
        metadata,
        train,
        test,
    })
}

/// Cardinality of each static categorical column is `max + 1`. Nothing is
/// inferred when series disagree on the number of columns.
fn infer_static_cat(series: &[TimeSeries]) -> Vec<CategoricalFeatureInfo> {
    let mut widths = series.iter().map(|s| s.feat_static_cat.len());
    let Some(width) = widths.next() else {
        return Vec::new();
    };
    if width == 0 || widths.any(|w| w != width) {
        return Vec::new();
    }

    let mut max = BTreeMap::new();
    for s in series {
        for (column, value) in s.feat_static_cat.iter().enumerate() {
            let entry = max.entry(column).or_insert(0u64);
            *entry = (*entry).max(*value);
        }
    }
    max.into_iter()
        .map(|(column, value)| CategoricalFeatureInfo {
            name: format!("feat_static_cat_{column}"),
            cardinality: value.saturating_add(1),
        })
        .collect()
}

fn find_metadata_dir(root: &Path) -> Option<PathBuf> {
    if root.join(METADATA_FILE).is_file() {
        return Some(root.to_path_buf());
    }
    let nested = root.join("metadata");
    nested.join(METADATA_FILE).is_file().then_some(nested)
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match home::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}
