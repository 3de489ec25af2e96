use std::path::Path;

use crate::error::{PrepError, Result};
use crate::filters::stretch::select_quantile;
use crate::image::Image;
use crate::mask::threshold::otsu_threshold;

use super::{SampleId, Screen};

pub type ScreenFactory = fn() -> Box<dyn Screen>;

/// Registered screens, by name.
pub const SCREENS: &[(&str, ScreenFactory)] = &[("intensity", intensity_screen)];

fn intensity_screen() -> Box<dyn Screen> {
    Box::new(IntensityScreen)
}

/// Look up a screen by name.
pub fn screen_by_name(name: &str) -> Result<Box<dyn Screen>> {
    SCREENS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, factory)| factory())
        .ok_or_else(|| PrepError::UnknownScreen(name.to_string()))
}

pub fn available_screens() -> impl Iterator<Item = &'static str> {
    SCREENS.iter().map(|(n, _)| *n)
}

/// Reference screen built on whole-image intensity statistics.
///
/// Samples are indexed by the file name up to its first `.`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntensityScreen;

const INTENSITY_FEATURES: [&str; 9] = [
    "mean",
    "std",
    "min",
    "max",
    "p05",
    "p50",
    "p95",
    "otsu_threshold",
    "bright_fraction",
];

impl Screen for IntensityScreen {
    fn name(&self) -> &str {
        "intensity"
    }

    fn index(&self, filename: &Path) -> SampleId {
        let name = filename
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let id = name.split('.').next().unwrap_or(name);
        SampleId(id.to_string())
    }

    fn feature_map(&self, image: &Image) -> (Vec<f64>, Vec<String>) {
        let names = INTENSITY_FEATURES.iter().map(|s| s.to_string()).collect();

        let mut samples: Vec<f32> = image.data.iter().copied().filter(|v| !v.is_nan()).collect();
        let n = samples.len();
        if n == 0 {
            return (vec![0.0; INTENSITY_FEATURES.len()], names);
        }

        let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
        let var = samples
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let (min, max) = image.min_max().unwrap_or((0.0, 0.0));
        let threshold = otsu_threshold(image);
        let bright = samples.iter().filter(|&&v| v > threshold).count();

        let mut quantile = |q: f32| select_quantile(&mut samples, q).unwrap_or(0.0) as f64;
        let p05 = quantile(0.05);
        let p50 = quantile(0.5);
        let p95 = quantile(0.95);

        let values = vec![
            mean,
            var.sqrt(),
            min as f64,
            max as f64,
            p05,
            p50,
            p95,
            threshold as f64,
            bright as f64 / n as f64,
        ];
        (values, names)
    }
}
