use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use crate::error::{PrepError, Result};
use crate::features::{filenames_path, write_filenames, FeatureTable, Screen};
use crate::io::ImageStore;

use super::types::{BatchStage, Progress, ProgressReporter};

/// Run `screen` over every image and write the table to `output` (JSON)
/// with the source file list beside it.
pub fn run_features(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    screen: &dyn Screen,
    output: &Path,
    reporter: &dyn ProgressReporter,
) -> Result<FeatureTable> {
    if paths.is_empty() {
        return Err(PrepError::EmptyInput("feature images"));
    }

    let progress = Progress::begin(reporter, BatchStage::Extracting, paths.len());
    let rows = paths
        .par_iter()
        .map(|path| {
            let image = store.read(path)?;
            let (values, names) = screen.feature_map(&image);
            progress.tick();
            Ok((screen.index(path), values, names))
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    let mut table = FeatureTable::new();
    for (sample, values, names) in rows {
        table.push(sample, values, names)?;
    }
    table.write_json(output)?;
    write_filenames(&filenames_path(output), paths)?;

    info!(
        screen = screen.name(),
        samples = table.len(),
        features = table.names.len(),
        path = %output.display(),
        "Feature table written"
    );
    Ok(table)
}
