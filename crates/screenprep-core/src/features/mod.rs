//! Feature extraction: per-screen plugins map each image to a named feature
//! vector, and the vectors are collected into a table keyed by sample ID.

pub mod screens;
pub mod table;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image::Image;

pub use screens::{available_screens, screen_by_name, IntensityScreen, SCREENS};
pub use table::{filenames_path, write_filenames, FeatureRow, FeatureTable};

/// Identifier of the biological sample an image belongs to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SampleId(pub String);

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feature-mapping plugin for one screen.
///
/// `feature_map` must return the same names, in the same order, for every
/// image of the screen.
pub trait Screen: Send + Sync {
    fn name(&self) -> &str;

    /// Sample identifier for an image file.
    fn index(&self, filename: &Path) -> SampleId;

    /// Feature vector and its ordered feature names.
    fn feature_map(&self, image: &Image) -> (Vec<f64>, Vec<String>);
}
