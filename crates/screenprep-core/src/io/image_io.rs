use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, Pixel, Rgb};
use ndarray::Array2;
use num_traits::{Bounded, NumCast};

use crate::consts::{CHANNEL_FALLBACK_STRETCH, EPSILON};
use crate::error::{PrepError, Result};
use crate::filters::stretch::select_quantile;
use crate::image::{ChannelImage, Image, SampleType};
use crate::mask::ArtifactMask;

/// Load a grayscale image, keeping its bit depth.
///
/// 8- and 16-bit grayscale load as `U8`/`U16`. Colour images are converted
/// to luminance at their own depth; float images load as `F32`.
pub fn load_image(path: &Path) -> Result<Image> {
    let img = image::open(path).map_err(|e| PrepError::image(path, e))?;
    let (w, h) = (img.width() as usize, img.height() as usize);

    let (raw, sample_type): (Vec<f32>, SampleType) = match &img {
        DynamicImage::ImageLuma8(buf) => (widen(buf.as_raw()), SampleType::U8),
        DynamicImage::ImageLuma16(buf) => (widen(buf.as_raw()), SampleType::U16),
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
            (widen(img.to_luma8().as_raw()), SampleType::U8)
        }
        DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => (widen(img.to_luma16().as_raw()), SampleType::U16),
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            (img.to_luma32f().into_raw(), SampleType::F32)
        }
        other => {
            return Err(PrepError::UnsupportedImage(format!(
                "{}: pixel format {:?}",
                path.display(),
                other.color()
            )))
        }
    };

    let data = Array2::from_shape_vec((h, w), raw)
        .map_err(|e| PrepError::UnsupportedImage(format!("{}: {e}", path.display())))?;
    Ok(Image::new(data, sample_type))
}

/// Save an image, choosing the format from the file extension.
///
/// Integer images keep their bit depth. Float images are written as 16-bit,
/// scaled from [0.0, 1.0].
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    let (h, w) = image.dim();
    match image.sample_type {
        SampleType::U8 => save_buffer::<Luma<u8>>(path, w, h, narrow(image.data.iter(), 1.0)),
        SampleType::U16 => save_buffer::<Luma<u16>>(path, w, h, narrow(image.data.iter(), 1.0)),
        SampleType::F32 => save_buffer::<Luma<u16>>(
            path,
            w,
            h,
            narrow(image.data.iter(), u16::MAX as f32),
        ),
    }
}

/// Save a three-channel image as RGB.
///
/// Float data does not fit an integer container directly, so it is stretched
/// between its 5% and 95% quantiles and written as 8-bit.
pub fn save_channel_image(image: &ChannelImage, path: &Path) -> Result<()> {
    if image.channels() != 3 {
        return Err(PrepError::UnsupportedImage(format!(
            "{}: cannot write {} channels as RGB",
            path.display(),
            image.channels()
        )));
    }
    let (h, w) = image.dim();
    match image.sample_type {
        SampleType::U8 => save_buffer::<Rgb<u8>>(path, w, h, narrow(image.data.iter(), 1.0)),
        SampleType::U16 => save_buffer::<Rgb<u16>>(path, w, h, narrow(image.data.iter(), 1.0)),
        SampleType::F32 => {
            let mut samples: Vec<f32> = image.data.iter().copied().filter(|v| !v.is_nan()).collect();
            let (low, high) = CHANNEL_FALLBACK_STRETCH;
            let black = select_quantile(&mut samples, low).unwrap_or(0.0);
            let white = select_quantile(&mut samples, high).unwrap_or(1.0);
            let range = if (white - black).abs() < EPSILON {
                1.0
            } else {
                white - black
            };
            let stretched = image
                .data
                .iter()
                .map(|&v| ((v - black) / range).clamp(0.0, 1.0));
            let pixels: Vec<u8> = stretched.map(|v| saturate(v * u8::MAX as f32)).collect();
            save_buffer::<Rgb<u8>>(path, w, h, pixels)
        }
    }
}

/// Load an artifact mask: any non-zero pixel is an artifact.
pub fn load_mask(path: &Path) -> Result<ArtifactMask> {
    let image = load_image(path)?;
    Ok(ArtifactMask::new(image.data.mapv(|v| v > 0.0)))
}

/// Save an artifact mask as 8-bit, 255 = artifact.
pub fn save_mask(mask: &ArtifactMask, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();
    let pixels: Vec<u8> = mask.data.iter().map(|&v| if v { u8::MAX } else { 0 }).collect();
    save_buffer::<Luma<u8>>(path, w, h, pixels)
}

fn save_buffer<P>(path: &Path, w: usize, h: usize, pixels: Vec<P::Subpixel>) -> Result<()>
where
    P: Pixel + image::PixelWithColorType,
    [P::Subpixel]: image::EncodableLayout,
{
    let img = ImageBuffer::<P, Vec<P::Subpixel>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| {
            PrepError::UnsupportedImage(format!(
                "{}: buffer does not match {w}x{h}",
                path.display()
            ))
        })?;
    img.save(path).map_err(|e| PrepError::image(path, e))
}

fn widen<T: Copy + Into<f32>>(raw: &[T]) -> Vec<f32> {
    raw.iter().map(|&v| v.into()).collect()
}

fn narrow<'a, T: Bounded + NumCast>(values: impl Iterator<Item = &'a f32>, scale: f32) -> Vec<T> {
    values.map(|&v| saturate(v * scale)).collect()
}

/// Round and clamp into `T`'s range. NaN becomes the minimum.
fn saturate<T: Bounded + NumCast>(v: f32) -> T {
    let lo: f32 = NumCast::from(T::min_value()).unwrap_or(0.0);
    let hi: f32 = NumCast::from(T::max_value()).unwrap_or(f32::MAX);
    let v = if v.is_nan() { lo } else { v.round().clamp(lo, hi) };
    NumCast::from(v).unwrap_or_else(T::min_value)
}
