//! Dataset-level metadata (`metadata.json`).

use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use super::Frequency;
use crate::DatasetError;
use crate::Result;

/// File name of the metadata document.
pub const METADATA_FILE: &str = "metadata.json";

/// Name of a real-valued feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicFeatureInfo {
    /// Feature name.
    pub name: String,
}

/// Name and number of categories of a categorical feature.
///
/// The cardinality is written as a string and accepted as either a string or
/// a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalFeatureInfo {
    /// Feature name.
    pub name: String,

    /// Number of distinct categories.
    #[serde(serialize_with = "cardinality_out", deserialize_with = "cardinality_in")]
    pub cardinality: u64,
}

/// Metadata shared by the train and test splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    /// Sampling frequency string, e.g. `"H"`. Kept as written; see
    /// [`MetaData::frequency`] for the parsed form.
    pub freq: String,

    /// Forecast horizon, if the dataset defines one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_length: Option<usize>,

    /// Static categorical features.
    #[serde(default)]
    pub feat_static_cat: Vec<CategoricalFeatureInfo>,

    /// Static real-valued features.
    #[serde(default)]
    pub feat_static_real: Vec<BasicFeatureInfo>,

    /// Dynamic real-valued features.
    #[serde(default)]
    pub feat_dynamic_real: Vec<BasicFeatureInfo>,
}

impl MetaData {
    /// Creates metadata with no feature descriptions.
    #[must_use]
    pub fn new(freq: &Frequency, prediction_length: Option<usize>) -> Self {
        Self {
            freq: freq.to_string(),
            prediction_length,
            feat_static_cat: Vec::new(),
            feat_static_real: Vec::new(),
            feat_dynamic_real: Vec::new(),
        }
    }

    /// Parses the frequency string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFrequency` if `freq` is not recognized.
    pub fn frequency(&self) -> Result<Frequency> {
        self.freq.parse()
    }

    /// Reads `metadata.json` from `dir`.
    ///
    /// # Errors
    ///
    /// - `MissingFile` if `dir/metadata.json` does not exist
    /// - `Json` if it is not valid metadata
    /// - `InvalidMetadata` if the frequency is blank or the prediction length
    ///   is zero
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(METADATA_FILE);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DatasetError::MissingFile { path });
            }
            Err(e) => return Err(e.into()),
        };
        let metadata: Self =
            serde_json::from_slice(&data).map_err(|e| DatasetError::json(&path, None, e))?;
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<()> {
        if self.freq.trim().is_empty() {
            return Err(DatasetError::InvalidMetadata("freq is empty".to_string()));
        }
        if self.prediction_length == Some(0) {
            return Err(DatasetError::InvalidMetadata(
                "prediction_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn cardinality_out<S: Serializer>(value: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn cardinality_in<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid cardinality {s:?}"))),
    }
}
