//! Dataset model: metadata, series records, and the train/test triple.

mod entry;
pub mod file;
mod freq;
mod metadata;
mod timestamp;
mod writer;

pub use entry::TimeSeries;
pub use freq::Frequency;
pub use freq::FrequencyUnit;
pub use metadata::BasicFeatureInfo;
pub use metadata::CategoricalFeatureInfo;
pub use metadata::METADATA_FILE;
pub use metadata::MetaData;
pub use timestamp::Timestamp;
pub use writer::write_dataset;

use serde::Serialize;

/// Metadata plus the train and test splits of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestDataset {
    /// Dataset-level metadata.
    pub metadata: MetaData,

    /// Training series.
    pub train: Vec<TimeSeries>,

    /// Test series.
    pub test: Vec<TimeSeries>,
}

impl TrainTestDataset {
    /// Summarizes both splits.
    #[must_use]
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            freq: self.metadata.freq.clone(),
            prediction_length: self.metadata.prediction_length,
            train: SplitSummary::of(&self.train),
            test: SplitSummary::of(&self.test),
        }
    }
}

/// Shape statistics for one split.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SplitSummary {
    /// Number of series.
    pub series: usize,
    /// Length of the shortest series.
    pub min_length: usize,
    /// Length of the longest series.
    pub max_length: usize,
    /// Mean series length.
    pub mean_length: f64,
    /// Sum of all series lengths.
    pub observations: usize,
    /// Number of `NaN` observations.
    pub missing_values: usize,
}

impl SplitSummary {
    /// Computes statistics over `series`. All fields are zero when empty.
    #[must_use]
    pub fn of(series: &[TimeSeries]) -> Self {
        if series.is_empty() {
            return Self::default();
        }
        let lengths = series.iter().map(TimeSeries::len);
        let observations: usize = lengths.clone().sum();
        #[allow(clippy::cast_precision_loss)]
        let mean_length = observations as f64 / series.len() as f64;

        Self {
            series: series.len(),
            min_length: lengths.clone().min().unwrap_or(0),
            max_length: lengths.max().unwrap_or(0),
            mean_length,
            observations,
            missing_values: series.iter().map(TimeSeries::missing_values).sum(),
        }
    }
}

/// Summary of a [`TrainTestDataset`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// Frequency string from the metadata.
    pub freq: String,
    /// Forecast horizon from the metadata.
    pub prediction_length: Option<usize>,
    /// Training split statistics.
    pub train: SplitSummary,
    /// Test split statistics.
    pub test: SplitSummary,
}
