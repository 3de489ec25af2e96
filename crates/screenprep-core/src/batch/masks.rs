use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::io::paths::with_suffix;
use crate::io::ImageStore;
use crate::mask::{estimate_mask, MaskParams};

use super::types::{BatchStage, Progress, ProgressReporter};

/// Counts from a mask batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskReport {
    /// Masks written (images with at least one artifact pixel).
    pub written: usize,
    /// Images attempted, including failures.
    pub processed: usize,
    /// Images that could not be read or whose mask could not be written.
    pub failed: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Written,
    Clean,
    Failed,
}

/// Estimate an artifact mask for every image and write `<base><mask_suffix>`
/// for those where an artifact was found. A clean image has any mask left
/// over from an earlier run removed, so a later correction never applies it.
///
/// A failure on one image is logged and counted; the batch carries on.
pub fn write_max_masks(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    params: &MaskParams,
    mask_suffix: &str,
    reporter: &dyn ProgressReporter,
) -> MaskReport {
    let progress = Progress::begin(reporter, BatchStage::Masking, paths.len());
    let outcomes: Vec<Outcome> = paths
        .par_iter()
        .map(|path| {
            let outcome = mask_one(store, path, params, mask_suffix);
            progress.tick();
            outcome
        })
        .collect();
    progress.finish();

    let count = |o: Outcome| outcomes.iter().filter(|&&x| x == o).count();
    let report = MaskReport {
        written: count(Outcome::Written),
        processed: outcomes.len(),
        failed: count(Outcome::Failed),
    };
    info!(
        written = report.written,
        processed = report.processed,
        failed = report.failed,
        "Mask batch complete"
    );
    report
}

fn mask_one(store: &dyn ImageStore, path: &Path, params: &MaskParams, suffix: &str) -> Outcome {
    let image = match store.read(path) {
        Ok(image) => image,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable image");
            return Outcome::Failed;
        }
    };

    let mask = estimate_mask(&image, params);
    let out = with_suffix(path, suffix);
    if !mask.any() {
        debug!(path = %path.display(), "No artifact found");
        if !store.exists(&out) {
            return Outcome::Clean;
        }
        return match store.remove(&out) {
            Ok(()) => {
                debug!(path = %out.display(), "Stale mask removed");
                Outcome::Clean
            }
            Err(e) => {
                warn!(path = %out.display(), error = %e, "Failed to remove stale mask");
                Outcome::Failed
            }
        };
    }

    match store.write_mask(&out, &mask) {
        Ok(()) => {
            debug!(path = %out.display(), pixels = mask.count(), "Mask written");
            Outcome::Written
        }
        Err(e) => {
            warn!(path = %out.display(), error = %e, "Failed to write mask");
            Outcome::Failed
        }
    }
}
