use ndarray::Array2;

use crate::error::{PrepError, Result};
use crate::image::{Image, SampleType};

/// Estimated background intensity per pixel, in the units of the images it
/// was estimated from. Non-negative.
#[derive(Clone, Debug)]
pub struct IlluminationField {
    pub data: Array2<f32>,
}

impl IlluminationField {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(0.0, f32::max)
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// The field divided by its maximum, so its peak is 1.
    pub fn normalized(&self) -> Result<Array2<f32>> {
        let max = self.max();
        if max <= 0.0 {
            return Err(PrepError::DegenerateField);
        }
        Ok(self.data.mapv(|v| v / max))
    }

    /// The normalized field as a float image, for saving.
    pub fn to_image(&self) -> Result<Image> {
        Ok(Image::new(self.normalized()?, SampleType::F32))
    }

    /// Reuse a previously saved field. Only relative values matter, so the
    /// image's sample units are kept as-is.
    pub fn from_image(image: &Image) -> Self {
        Self {
            data: image.data.mapv(|v| v.max(0.0)),
        }
    }
}
