//! Configuration for dataset resolution and archive extraction.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the default data root.
pub const DATA_HOME_ENV: &str = "TSDATA_HOME";

/// Security configuration with default-deny settings.
///
/// Controls the checks performed while extracting a dataset archive.
///
/// # Examples
///
/// ```
/// use tsdata_core::SecurityConfig;
///
/// let custom = SecurityConfig {
///     max_file_size: 100 * 1024 * 1024,
///     ..Default::default()
/// };
/// assert_eq!(custom.max_file_count, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Maximum size for a single file in bytes.
    pub max_file_size: u64,

    /// Maximum total size for all extracted files in bytes.
    pub max_total_size: u64,

    /// Maximum number of files that can be extracted.
    pub max_file_count: usize,

    /// Maximum path depth allowed.
    pub max_path_depth: usize,
}

impl Default for SecurityConfig {
    /// Default values:
    /// - `max_file_size`: 1 GB
    /// - `max_total_size`: 4 GB
    /// - `max_file_count`: 10,000
    /// - `max_path_depth`: 32
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024 * 1024,
            max_total_size: 4 * 1024 * 1024 * 1024,
            max_file_count: 10_000,
            max_path_depth: 32,
        }
    }
}

/// Configuration for [`get_dataset`](crate::get_dataset).
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Directory holding cached datasets and downloaded archives.
    pub data_root: PathBuf,

    /// Timeout applied to the whole download request.
    pub download_timeout: Duration,

    /// `User-Agent` header sent with downloads.
    pub user_agent: String,

    /// Honour `HTTP(S)_PROXY` / `NO_PROXY` from the environment.
    pub use_system_proxy: bool,

    /// Limits applied when extracting downloaded archives.
    pub security: SecurityConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            download_timeout: Duration::from_secs(600),
            user_agent: concat!("tsdata/", env!("CARGO_PKG_VERSION")).to_string(),
            use_system_proxy: true,
            security: SecurityConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Creates a configuration rooted at `data_root`.
    #[must_use]
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Default::default()
        }
    }
}

/// Returns the default data root.
///
/// `$TSDATA_HOME` wins when set and non-empty; otherwise
/// `~/.tsdata/datasets`. Falls back to a relative `.tsdata/datasets` when no
/// home directory can be determined.
#[must_use]
pub fn default_data_root() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    home::home_dir()
        .unwrap_or_default()
        .join(".tsdata")
        .join("datasets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_security_config() {
        let config = SecurityConfig::default();
        assert_eq!(config.max_file_count, 10_000);
        assert_eq!(config.max_path_depth, 32);
        assert!(config.max_total_size > config.max_file_size);
    }

    #[test]
    fn test_loader_config_with_data_root() {
        let config = LoaderConfig::with_data_root("/srv/datasets");
        assert_eq!(config.data_root, PathBuf::from("/srv/datasets"));
        assert_eq!(config.security, SecurityConfig::default());
        assert!(config.user_agent.starts_with("tsdata/"));
    }

    #[test]
    fn test_default_data_root_is_named_datasets() {
        let root = default_data_root();
        if std::env::var_os(DATA_HOME_ENV).is_none() {
            assert!(root.ends_with(".tsdata/datasets"));
        }
    }
}
