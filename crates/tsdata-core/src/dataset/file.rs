//! JSON-lines readers for dataset splits.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use tracing::debug;

use super::TimeSeries;
use crate::DatasetError;
use crate::Result;

const DATA_SUFFIXES: &[&str] = &[".json", ".jsonl", ".json.gz", ".jsonl.gz"];

/// A series together with the 1-based line it was read from.
#[derive(Debug, Clone)]
pub struct NumberedSeries {
    /// Line number in the source file.
    pub line: usize,
    /// The parsed record.
    pub series: TimeSeries,
}

/// Returns `true` if `path` has a dataset file extension.
#[must_use]
pub fn is_data_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| DATA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// Reads a JSON-lines file, transparently gunzipping `*.gz` files.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// - `MissingFile` if `path` does not exist
/// - `Json` with the offending line number if a record does not parse
pub fn read_json_lines(path: &Path) -> Result<Vec<TimeSeries>> {
    Ok(read_numbered(path)?
        .into_iter()
        .map(|numbered| numbered.series)
        .collect())
}

/// Like [`read_json_lines`], keeping the line number of every record.
///
/// # Errors
///
/// Same as [`read_json_lines`].
pub fn read_numbered(path: &Path) -> Result<Vec<NumberedSeries>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DatasetError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn Read> = if gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let series = serde_json::from_str(&line)
            .map_err(|e| DatasetError::json(path, Some(index + 1), e))?;
        records.push(NumberedSeries {
            line: index + 1,
            series,
        });
    }

    debug!(path = %path.display(), records = records.len(), "read json lines");
    Ok(records)
}

/// Loads a split from a directory of data files or a single file.
///
/// Directory entries are read in file-name order so that the result is
/// deterministic.
///
/// # Errors
///
/// - `MissingFile` if `path` does not exist
/// - any error from [`read_json_lines`]
pub fn load_split(path: &Path) -> Result<Vec<TimeSeries>> {
    if path.is_file() {
        return read_json_lines(path);
    }
    if !path.is_dir() {
        return Err(DatasetError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    files.retain(|file| file.is_file() && is_data_file(file));
    files.sort();

    let mut series = Vec::new();
    for file in &files {
        series.extend(read_json_lines(file)?);
    }
    Ok(series)
}
