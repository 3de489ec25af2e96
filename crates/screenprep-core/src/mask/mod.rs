//! Artifact mask estimation and the two mask polarities used downstream.
//!
//! [`ArtifactMask`] marks bright artifacts (`true` = excluded from
//! statistics). [`CorrectionMask`] marks pixels that illumination correction
//! may modify (`true` = corrected, `false` = passed through). They are
//! separate types so a mask is never silently used with the wrong polarity;
//! converting one into the other is an explicit inversion.

pub mod morphology;
pub mod threshold;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::image::Image;

/// Parameters of the artifact mask estimator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// Added to the automatic threshold, in sample units.
    pub offset: i32,
    /// Radius of the closing applied to the raw mask. 0 = none.
    pub close_radius: usize,
    /// Radius of the erosion applied after closing. 0 = none.
    pub erode_radius: usize,
}

/// `true` marks a bright artifact pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactMask {
    pub data: Array2<bool>,
}

impl ArtifactMask {
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Number of flagged pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether any pixel is flagged.
    pub fn any(&self) -> bool {
        self.data.iter().any(|&v| v)
    }
}

/// `true` marks a pixel that illumination correction may modify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrectionMask {
    pub data: Array2<bool>,
}

impl CorrectionMask {
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// Correct every pixel.
    pub fn all(dim: (usize, usize)) -> Self {
        Self {
            data: Array2::from_elem(dim, true),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// Artifact pixels are passed through uncorrected; everything else is corrected.
impl From<&ArtifactMask> for CorrectionMask {
    fn from(artifacts: &ArtifactMask) -> Self {
        Self {
            data: artifacts.data.mapv(|v| !v),
        }
    }
}

/// Estimate a mask of abnormally bright pixels.
///
/// Pixels strictly above Otsu's threshold plus `offset` are flagged, then the
/// mask is closed with `close_radius` and eroded with `erode_radius`. Radii of
/// 0 leave the mask unchanged.
pub fn estimate_mask(image: &Image, params: &MaskParams) -> ArtifactMask {
    let threshold = threshold::otsu_threshold(image) + params.offset as f32;
    let flagged = image.data.mapv(|v| v > threshold);
    let closed = morphology::closing(&flagged, params.close_radius);
    let data = morphology::erode(&closed, params.erode_radius);
    ArtifactMask { data }
}
