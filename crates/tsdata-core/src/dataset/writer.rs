//! Writes a dataset in the on-disk layout the loader reads back.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use tracing::debug;
use tracing::info;

use super::METADATA_FILE;
use super::TimeSeries;
use super::TrainTestDataset;
use super::file::is_data_file;
use crate::DatasetError;
use crate::Result;

/// Writes `dataset` under `root`:
///
/// ```text
/// root/metadata/metadata.json
/// root/train/train.json
/// root/test/test.json
/// ```
///
/// Directories are created as needed. A dataset already under `root` is
/// replaced: a flat `root/metadata.json` and every data file in `train/` and
/// `test/` are removed first, since the loader would read them too.
///
/// # Errors
///
/// Returns `Io` if a file cannot be written.
pub fn write_dataset(dataset: &TrainTestDataset, root: &Path) -> Result<()> {
    clear_previous(root)?;

    let metadata_dir = root.join("metadata");
    std::fs::create_dir_all(&metadata_dir)?;
    let metadata_path = metadata_dir.join(METADATA_FILE);
    let mut metadata = BufWriter::new(File::create(&metadata_path)?);
    serde_json::to_writer(&mut metadata, &dataset.metadata)
        .map_err(|e| DatasetError::json(&metadata_path, None, e))?;
    metadata.write_all(b"\n")?;
    metadata.flush()?;

    write_split(&root.join("train"), "train.json", &dataset.train)?;
    write_split(&root.join("test"), "test.json", &dataset.test)?;

    info!(
        root = %root.display(),
        train = dataset.train.len(),
        test = dataset.test.len(),
        "dataset written"
    );
    Ok(())
}

fn clear_previous(root: &Path) -> Result<()> {
    remove_if_present(&root.join(METADATA_FILE))?;
    for split in ["train", "test"] {
        let entries = match std::fs::read_dir(root.join(split)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && is_data_file(&path) {
                debug!(path = %path.display(), "removing stale data file");
                remove_if_present(&path)?;
            }
        }
    }
    Ok(())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn write_split(dir: &Path, name: &str, series: &[TimeSeries]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let mut writer = BufWriter::new(File::create(&path)?);
    for (index, entry) in series.iter().enumerate() {
        serde_json::to_writer(&mut writer, entry)
            .map_err(|e| DatasetError::json(&path, Some(index + 1), e))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
