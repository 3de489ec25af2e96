use std::path::PathBuf;

use thiserror::Error;

use crate::image::SampleType;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Sample type mismatch: expected {expected:?}, got {actual:?}")]
    SampleTypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    #[error("Invalid parameter: {0}")]
    Parameter(String),

    #[error("Illumination field has no positive value")]
    DegenerateField,

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("Feature table serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;

/// Check that a fraction lies in `[0.0, 1.0]`.
pub fn check_fraction(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PrepError::parameter(format!(
            "{name} must lie in [0.0, 1.0], got {value}"
        )));
    }
    Ok(())
}

/// Check a symmetric stretch-limit fraction: limits are `(value, 1 - value)`,
/// so anything above 0.5 would swap black and white points.
pub fn check_stretch_limit(name: &str, value: f32) -> Result<()> {
    if !(0.0..=0.5).contains(&value) {
        return Err(PrepError::parameter(format!(
            "{name} must lie in [0.0, 0.5], got {value}"
        )));
    }
    Ok(())
}

/// Check that two grids share `(height, width)`.
pub fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(PrepError::ShapeMismatch { expected, actual });
    }
    Ok(())
}
