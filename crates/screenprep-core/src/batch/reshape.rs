use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use crate::channels::cat_channels;
use crate::consts::{CHANNELS_PER_GROUP, CHANNELS_SUFFIX};
use crate::crop::{crop, CropBounds};
use crate::error::{PrepError, Result};
use crate::io::paths::{in_dir, with_suffix};
use crate::io::ImageStore;

use super::types::{BatchStage, Progress, ProgressReporter};

/// Crop every image to `bounds`, writing `<base><suffix>` next to the input
/// or inside `output_dir`.
pub fn run_crop(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    bounds: &CropBounds,
    suffix: &str,
    output_dir: Option<&Path>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    let progress = Progress::begin(reporter, BatchStage::Cropping, paths.len());
    let outputs = paths
        .par_iter()
        .map(|path| {
            let cropped = crop(&store.read(path)?, bounds)?;
            let out = in_dir(&with_suffix(path, suffix), output_dir);
            store.write(&out, &cropped)?;
            progress.tick();
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    info!(images = outputs.len(), ?bounds, "Crop complete");
    Ok(outputs)
}

/// Glue consecutive groups of three single-channel files into one color
/// image, written as `<base of first><CHANNELS_SUFFIX>`.
pub fn run_channel_concat(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Err(PrepError::EmptyInput("channel files"));
    }
    if paths.len() % CHANNELS_PER_GROUP != 0 {
        return Err(PrepError::parameter(format!(
            "channel concatenation needs a multiple of {CHANNELS_PER_GROUP} files, got {}",
            paths.len()
        )));
    }

    let groups: Vec<&[PathBuf]> = paths.chunks_exact(CHANNELS_PER_GROUP).collect();
    let progress = Progress::begin(reporter, BatchStage::Concatenating, groups.len());
    let outputs = groups
        .par_iter()
        .map(|group| {
            let images = group
                .iter()
                .map(|path| store.read(path))
                .collect::<Result<Vec<_>>>()?;
            let combined = cat_channels(&images)?;
            let out = with_suffix(&group[0], CHANNELS_SUFFIX);
            store.write_channels(&out, &combined)?;
            progress.tick();
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    info!(groups = outputs.len(), "Channel concatenation complete");
    Ok(outputs)
}
