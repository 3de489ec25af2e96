use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ILLUMINATION_QUANTILE, DEFAULT_ILLUMINATION_RADIUS};
use crate::error::{check_fraction, check_stretch_limit, PrepError, Result};
use crate::mask::MaskParams;

/// How per-image background estimates are combined across the stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Per-pixel minimum. Streams; sensitive to a single dark image.
    Min,
    /// Per-pixel median. Buffers every per-image estimate, so memory grows
    /// as images x height x width; prefer `Min` or `Mean` for very large stacks.
    #[default]
    Median,
    /// Per-pixel mean. Streams.
    Mean,
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Min => write!(f, "Min"),
            Self::Median => write!(f, "Median"),
            Self::Mean => write!(f, "Mean"),
        }
    }
}

impl std::str::FromStr for Aggregation {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            _ => Err(PrepError::parameter(format!(
                "unknown aggregation '{s}' (expected min, median or mean)"
            ))),
        }
    }
}

/// Parameters for estimating an illumination field from a stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IlluminationParams {
    /// Radius of the disk window the quantile is taken over.
    pub radius: usize,
    /// Quantile of the window used as background, in [0.0, 1.0].
    pub quantile: f32,
    /// Stretch each input with limits (stretch_in, 1 - stretch_in) first. 0.0 = off.
    pub stretch_in: f32,
    /// Exclude bright artifacts found by the mask estimator.
    pub use_mask: bool,
    /// Mask estimator parameters, used when `use_mask` is set.
    pub mask: MaskParams,
    pub aggregation: Aggregation,
}

impl Default for IlluminationParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_ILLUMINATION_RADIUS,
            quantile: DEFAULT_ILLUMINATION_QUANTILE,
            stretch_in: 0.0,
            use_mask: false,
            mask: MaskParams::default(),
            aggregation: Aggregation::default(),
        }
    }
}

impl IlluminationParams {
    pub fn validate(&self) -> Result<()> {
        check_fraction("quantile", self.quantile)?;
        check_stretch_limit("stretch_in", self.stretch_in)
    }
}

/// Parameters for applying an illumination field to one image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionParams {
    /// Stretch the corrected image with limits (stretch_out, 1 - stretch_out). 0.0 = off.
    pub stretch_out: f32,
}

impl CorrectionParams {
    pub fn validate(&self) -> Result<()> {
        check_stretch_limit("stretch_out", self.stretch_out)
    }
}
