//! Dataset names and the registry of downloadable archives.

use std::path::Component;
use std::path::Path;

use crate::DatasetError;
use crate::Result;

/// Download location of the `wiki2000_nips` archive, pinned to a fixed
/// upstream revision.
pub const WIKI2000_NIPS_URL: &str = "https://github.com/awslabs/gluonts/raw/b89f203595183340651411a41eeb0ee60570a4d9/datasets/wiki2000_nips.tar.gz";

const CUSTOM_PREFIX: &str = "custom(";
const CUSTOM_SUFFIX: &str = ")";

/// A dataset name as given by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetName<'a> {
    /// `custom(<path>)`: a dataset root on the local filesystem.
    Custom(&'a str),
    /// A cached or registered dataset.
    Named(&'a str),
}

impl<'a> DatasetName<'a> {
    /// Parses `custom(<path>)` or a plain dataset name.
    ///
    /// Plain names must be a single path component so that they cannot
    /// address anything outside the data root.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty custom path or a plain name
    /// that is empty, contains a separator, or is `.`/`..`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsdata_core::registry::DatasetName;
    ///
    /// assert_eq!(
    ///     DatasetName::parse("custom(/data/ds)")?,
    ///     DatasetName::Custom("/data/ds")
    /// );
    /// assert_eq!(DatasetName::parse("solar")?, DatasetName::Named("solar"));
    /// assert!(DatasetName::parse("../etc").is_err());
    /// # Ok::<(), tsdata_core::DatasetError>(())
    /// ```
    pub fn parse(name: &'a str) -> Result<Self> {
        if let Some(path) = name
            .strip_prefix(CUSTOM_PREFIX)
            .and_then(|rest| rest.strip_suffix(CUSTOM_SUFFIX))
        {
            if path.is_empty() {
                return Err(DatasetError::InvalidArgument(
                    "custom() requires a path".to_string(),
                ));
            }
            return Ok(Self::Custom(path));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
                Ok(Self::Named(name))
            }
            _ => Err(DatasetError::InvalidArgument(format!(
                "invalid dataset name {name:?}"
            ))),
        }
    }
}

/// A dataset distributed as a `.tar.gz` archive whose top-level directory
/// carries the dataset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDataset {
    /// Dataset name and top-level directory inside the archive.
    pub name: String,
    /// Download URL.
    pub url: String,
}

/// Set of downloadable datasets.
#[derive(Debug, Clone)]
pub struct Registry {
    datasets: Vec<ArchiveDataset>,
}

impl Registry {
    /// Registry with the built-in datasets.
    #[must_use]
    pub fn builtin() -> Self {
        Self::empty().register("wiki2000_nips", WIKI2000_NIPS_URL)
    }

    /// Registry with no datasets.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            datasets: Vec::new(),
        }
    }

    /// Adds a dataset, replacing any existing entry of the same name.
    #[must_use]
    pub fn register(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        self.datasets.retain(|d| d.name != name);
        self.datasets.push(ArchiveDataset {
            name,
            url: url.into(),
        });
        self
    }

    /// Looks up a dataset by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArchiveDataset> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Iterates over the registered datasets.
    pub fn iter(&self) -> impl Iterator<Item = &ArchiveDataset> {
        self.datasets.iter()
    }

    /// Sorted list of registered names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.iter().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom() {
        assert_eq!(
            DatasetName::parse("custom(~/data/my ds)").unwrap(),
            DatasetName::Custom("~/data/my ds")
        );
        assert!(DatasetName::parse("custom()").is_err());
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(
            DatasetName::parse("wiki2000_nips").unwrap(),
            DatasetName::Named("wiki2000_nips")
        );
        // Not a complete custom(...) form, but still a valid directory name.
        assert_eq!(
            DatasetName::parse("custom(x").unwrap(),
            DatasetName::Named("custom(x")
        );
    }

    #[test]
    fn test_parse_rejects_paths() {
        for name in ["", ".", "..", "a/b", "/abs", "a\\b", "../x"] {
            assert!(
                matches!(DatasetName::parse(name), Err(DatasetError::InvalidArgument(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::builtin();
        let wiki = registry.get("wiki2000_nips").unwrap();
        assert_eq!(wiki.url, WIKI2000_NIPS_URL);
        assert!(registry.get("m4_hourly").is_none());
        assert_eq!(registry.names(), vec!["wiki2000_nips".to_string()]);
    }

    #[test]
    fn test_register_replaces() {
        let registry = Registry::empty()
            .register("b", "http://one")
            .register("a", "http://two")
            .register("b", "http://three");
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.get("b").unwrap().url, "http://three");
        assert_eq!(registry.iter().count(), 2);
    }
}
