use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CROP_SUFFIX, DEFAULT_ILLUM_SUFFIX, DEFAULT_MASK_SUFFIX};
use crate::error::Result;
use crate::illumination::{CorrectionParams, IlluminationParams};
use crate::mask::MaskParams;

/// All tunable batch parameters, as loaded from a TOML config file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Parameters of the standalone `mask` batch.
    pub mask: MaskParams,
    pub illumination: IlluminationParams,
    pub correction: CorrectionParams,
    pub naming: NamingConfig,
}

impl PrepConfig {
    pub fn validate(&self) -> Result<()> {
        self.illumination.validate()?;
        self.correction.validate()
    }
}

/// Suffixes replacing the extension of input files to name outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub mask_suffix: String,
    pub illum_suffix: String,
    pub crop_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            mask_suffix: DEFAULT_MASK_SUFFIX.into(),
            illum_suffix: DEFAULT_ILLUM_SUFFIX.into(),
            crop_suffix: DEFAULT_CROP_SUFFIX.into(),
        }
    }
}
