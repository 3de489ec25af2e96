use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{QUADRANTS_PER_FIELD, STITCHED_SUFFIX};
use crate::error::{PrepError, Result};
use crate::io::ImageStore;
use crate::stitch::{stitch_tiles, Quadrant, Tile};

use super::types::{BatchStage, Progress, ProgressReporter};

/// How input files are assigned to stitching groups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Consecutive runs of four files, in quadrant order.
    #[default]
    Sequential,
    /// Files grouped by name with the site token (`s1`..`s4`) removed;
    /// the site gives the quadrant.
    BySite,
}

/// Four input files and where their composite goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StitchGroup {
    pub output: PathBuf,
    pub tiles: Vec<(PathBuf, Quadrant)>,
}

/// Split a file stem on `_` and pull out its site token.
///
/// `plate1_A01_s2_w1.tif` → (`plate1_A01_w1`, [`Quadrant::TopRight`]).
/// When several tokens look like sites, the last one wins.
pub fn parse_site(path: &Path) -> Option<(String, Quadrant)> {
    let stem = path.file_stem()?.to_str()?;
    let tokens: Vec<&str> = stem.split('_').collect();
    let (pos, quadrant) = tokens
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, token)| site_token(token).map(|q| (i, q)))?;

    let key = tokens
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != pos)
        .map(|(_, t)| *t)
        .collect::<Vec<_>>()
        .join("_");
    Some((key, quadrant))
}

fn site_token(token: &str) -> Option<Quadrant> {
    let digits = token.strip_prefix('s').or_else(|| token.strip_prefix('S'))?;
    if digits.len() != 1 {
        return None;
    }
    Quadrant::from_site(digits.parse().ok()?)
}

/// Assign files to groups of four.
pub fn plan_stitch(paths: &[PathBuf], grouping: Grouping) -> Result<Vec<StitchGroup>> {
    if paths.is_empty() {
        return Err(PrepError::EmptyInput("stitch files"));
    }
    match grouping {
        Grouping::Sequential => plan_sequential(paths),
        Grouping::BySite => plan_by_site(paths),
    }
}

fn plan_sequential(paths: &[PathBuf]) -> Result<Vec<StitchGroup>> {
    if paths.len() % QUADRANTS_PER_FIELD != 0 {
        return Err(PrepError::parameter(format!(
            "quadrant stitching needs a multiple of {QUADRANTS_PER_FIELD} files, got {}",
            paths.len()
        )));
    }
    Ok(paths
        .chunks_exact(QUADRANTS_PER_FIELD)
        .map(|group| {
            let first = &group[0];
            let stem = first
                .with_extension("")
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            StitchGroup {
                output: sibling(first, &stem),
                tiles: group.iter().cloned().zip(Quadrant::ORDER).collect(),
            }
        })
        .collect())
}

fn plan_by_site(paths: &[PathBuf]) -> Result<Vec<StitchGroup>> {
    let mut groups: BTreeMap<PathBuf, Vec<(PathBuf, Quadrant)>> = BTreeMap::new();
    for path in paths {
        let (key, quadrant) = parse_site(path).ok_or_else(|| {
            PrepError::parameter(format!("no site token (s1..s4) in '{}'", path.display()))
        })?;
        groups
            .entry(sibling(path, &key))
            .or_default()
            .push((path.clone(), quadrant));
    }

    groups
        .into_iter()
        .map(|(output, tiles)| {
            if tiles.len() != QUADRANTS_PER_FIELD {
                return Err(PrepError::parameter(format!(
                    "'{}' has {} tiles, needs {QUADRANTS_PER_FIELD}",
                    output.display(),
                    tiles.len()
                )));
            }
            Ok(StitchGroup { output, tiles })
        })
        .collect()
}

fn sibling(path: &Path, key: &str) -> PathBuf {
    let name = format!("{key}{STITCHED_SUFFIX}");
    match path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Stitch every group and write `<dir>/<key>_stitched.tif`.
pub fn run_quadrant_stitch(
    store: &dyn ImageStore,
    paths: &[PathBuf],
    grouping: Grouping,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    let groups = plan_stitch(paths, grouping)?;

    let progress = Progress::begin(reporter, BatchStage::Stitching, groups.len());
    let outputs = groups
        .par_iter()
        .map(|group| {
            let tiles = group
                .tiles
                .iter()
                .map(|(path, quadrant)| {
                    Ok(Tile {
                        image: store.read(path)?,
                        quadrant: *quadrant,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let composite = stitch_tiles(tiles)?;
            store.write(&group.output, &composite)?;
            progress.tick();
            Ok(group.output.clone())
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    info!(groups = outputs.len(), ?grouping, "Quadrant stitching complete");
    Ok(outputs)
}
