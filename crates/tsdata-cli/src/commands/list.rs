//! List command implementation.

use crate::error::add_dataset_context;
use crate::output::ListedDataset;
use crate::output::OutputFormatter;
use anyhow::Result;
use std::path::Path;
use tsdata_core::loader::DatasetLoader;

use super::loader_config;

pub fn execute(data_dir: Option<&Path>, formatter: &dyn OutputFormatter) -> Result<()> {
    let loader = DatasetLoader::new(loader_config(data_dir));
    let data_root = loader.config().data_root.clone();
    let cached = add_dataset_context(
        loader.cached_datasets(),
        &data_root.display().to_string(),
    )?;

    let datasets = merge(&loader, cached);
    formatter.format_dataset_list(&data_root, &datasets)
}

/// Registered datasets first, then datasets that exist only on disk.
fn merge(loader: &DatasetLoader, cached: Vec<String>) -> Vec<ListedDataset> {
    let mut datasets: Vec<ListedDataset> = loader
        .registry()
        .iter()
        .map(|d| ListedDataset {
            name: d.name.clone(),
            url: Some(d.url.clone()),
            cached: cached.contains(&d.name),
        })
        .collect();

    for name in cached {
        if loader.registry().get(&name).is_none() {
            datasets.push(ListedDataset {
                name,
                url: None,
                cached: true,
            });
        }
    }
    datasets
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdata_core::LoaderConfig;

    #[test]
    fn test_merge_marks_cached() {
        let loader = DatasetLoader::new(LoaderConfig::with_data_root("/nonexistent"));
        let datasets = merge(
            &loader,
            vec!["electricity".to_string(), "wiki2000_nips".to_string()],
        );

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].name, "wiki2000_nips");
        assert!(datasets[0].cached);
        assert!(datasets[0].url.is_some());
        assert_eq!(datasets[1].name, "electricity");
        assert!(datasets[1].url.is_none());
    }
}
