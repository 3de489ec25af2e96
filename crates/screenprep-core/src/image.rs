use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

/// Sample type an image was acquired with.
///
/// Pixel data is always held as `f32`, but in the native units of this type,
/// so thresholds and offsets keep their acquisition meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    U8,
    U16,
    /// Floating point, nominal range [0.0, 1.0].
    F32,
}

impl SampleType {
    pub fn min_value(self) -> f32 {
        0.0
    }

    pub fn max_value(self) -> f32 {
        match self {
            Self::U8 => u8::MAX as f32,
            Self::U16 => u16::MAX as f32,
            Self::F32 => 1.0,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Self::F32)
    }

    pub fn bit_depth(self) -> u8 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::F32 => 32,
        }
    }

    /// Saturate a value into this type's representable range.
    ///
    /// Integer types round to the nearest integer. `+inf` maps to the
    /// maximum, `-inf` and NaN to zero.
    pub fn quantize(self, v: f32) -> f32 {
        if v.is_nan() {
            return self.min_value();
        }
        let v = v.clamp(self.min_value(), self.max_value());
        if self.is_integer() {
            v.round()
        } else {
            v
        }
    }
}

/// A single-channel image.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    pub sample_type: SampleType,
}

impl Image {
    pub fn new(data: Array2<f32>, sample_type: SampleType) -> Self {
        Self { data, sample_type }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Smallest and largest sample, or `None` for an empty image.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.data.iter().copied().filter(|v| !v.is_nan());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// A multi-channel image, shape = (height, width, channels).
#[derive(Clone, Debug)]
pub struct ChannelImage {
    pub data: Array3<f32>,
    pub sample_type: SampleType,
}

impl ChannelImage {
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn dim(&self) -> (usize, usize) {
        let (h, w, _) = self.data.dim();
        (h, w)
    }
}
