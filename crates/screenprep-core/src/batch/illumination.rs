use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{PrepError, Result};
use crate::illumination::{
    correct_illumination, local_background, CorrectionParams, FieldAccumulator,
    IlluminationField, IlluminationParams,
};
use crate::io::paths::with_suffix;
use crate::io::ImageStore;
use crate::mask::CorrectionMask;

use super::config::PrepConfig;
use super::types::{BatchStage, Progress, ProgressReporter};

/// One run of the illumination batch.
#[derive(Clone, Debug, Default)]
pub struct IlluminationJob {
    pub paths: Vec<PathBuf>,
    pub config: PrepConfig,
    /// Write the (normalized) field here after estimation.
    pub save_field: Option<PathBuf>,
    /// Use a previously saved field instead of estimating one.
    pub load_field: Option<PathBuf>,
}

/// Counts from correcting a batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CorrectionReport {
    pub outputs: Vec<PathBuf>,
    /// Images for which a mask file was found and honored.
    pub masked: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IlluminationReport {
    pub field_min: f32,
    pub field_max: f32,
    pub correction: CorrectionReport,
}

/// Estimate (or load) the illumination field, then correct every image.
///
/// Outputs are written next to their inputs as `<base><illum_suffix>`. An
/// image with a `<base><mask_suffix>` file next to it is corrected only
/// outside the masked artifact.
pub fn run_illumination(
    store: &dyn ImageStore,
    job: &IlluminationJob,
    reporter: &dyn ProgressReporter,
) -> Result<IlluminationReport> {
    job.config.validate()?;
    if job.paths.is_empty() {
        return Err(PrepError::EmptyInput("illumination batch"));
    }

    let field = match &job.load_field {
        Some(path) => {
            info!(path = %path.display(), "Loading illumination field");
            IlluminationField::from_image(&store.read(path)?)
        }
        None => estimate_from_paths(store, &job.paths, &job.config.illumination, reporter)?,
    };

    if let Some(path) = &job.save_field {
        store.write(path, &field.to_image()?)?;
        info!(path = %path.display(), "Illumination field saved");
    }

    let correction = correct_paths(
        store,
        &job.paths,
        &field,
        &job.config.correction,
        &job.config.naming.mask_suffix,
        &job.config.naming.illum_suffix,
        reporter,
    )?;

    Ok(IlluminationReport {
        field_min: field.min(),
        field_max: field.max(),
        correction,
    })
}

/// First and second pass of field estimation over files: local backgrounds
/// are computed in parallel and folded into per-worker accumulators.
pub fn estimate_from_paths(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    params: &IlluminationParams,
    reporter: &dyn ProgressReporter,
) -> Result<IlluminationField> {
    params.validate()?;
    if paths.is_empty() {
        return Err(PrepError::EmptyInput("illumination stack"));
    }

    let aggregation = params.aggregation;
    let progress = Progress::begin(reporter, BatchStage::Estimating, paths.len());
    let accumulator = paths
        .par_iter()
        .try_fold(
            || FieldAccumulator::new(aggregation),
            |mut acc, path| -> Result<FieldAccumulator> {
                let image = store.read(path)?;
                acc.push(local_background(&image, params)?)?;
                debug!(path = %path.display(), "Local background estimated");
                progress.tick();
                Ok(acc)
            },
        )
        .try_reduce(|| FieldAccumulator::new(aggregation), |a, b| a.merge(b))?;
    progress.finish();

    let field = accumulator.finish()?;
    info!(
        images = paths.len(),
        radius = params.radius,
        quantile = params.quantile,
        aggregation = %aggregation,
        min = field.min(),
        max = field.max(),
        "Illumination field estimated"
    );
    Ok(field)
}

/// Correct every image with `field` and write `<base><illum_suffix>`.
///
/// Stops at the first failure.
pub fn correct_paths(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    field: &IlluminationField,
    params: &CorrectionParams,
    mask_suffix: &str,
    illum_suffix: &str,
    reporter: &dyn ProgressReporter,
) -> Result<CorrectionReport> {
    params.validate()?;
    // Degenerate fields fail once, before any image is touched.
    field.normalized()?;

    let progress = Progress::begin(reporter, BatchStage::Correcting, paths.len());
    let results = paths
        .par_iter()
        .map(|path| {
            let result = correct_one(store, path, field, params, mask_suffix, illum_suffix);
            progress.tick();
            result
        })
        .collect::<Result<Vec<(PathBuf, bool)>>>()?;
    progress.finish();

    let masked = results.iter().filter(|(_, masked)| *masked).count();
    info!(images = results.len(), masked, "Illumination correction complete");
    Ok(CorrectionReport {
        outputs: results.into_iter().map(|(out, _)| out).collect(),
        masked,
    })
}

fn correct_one(
    store: &dyn ImageStore,
    path: &Path,
    field: &IlluminationField,
    params: &CorrectionParams,
    mask_suffix: &str,
    illum_suffix: &str,
) -> Result<(PathBuf, bool)> {
    let image = store.read(path)?;

    let mask_path = with_suffix(path, mask_suffix);
    let (mask, masked) = if store.exists(&mask_path) {
        let artifacts = store.read_mask(&mask_path)?;
        debug!(path = %mask_path.display(), pixels = artifacts.count(), "Using artifact mask");
        (CorrectionMask::from(&artifacts), true)
    } else {
        (CorrectionMask::all(image.dim()), false)
    };

    let corrected = correct_illumination(&image, field, params, &mask)?;
    let out = with_suffix(path, illum_suffix);
    store.write(&out, &corrected)?;
    Ok((out, masked))
}
