use ndarray::Array2;

use crate::consts::EPSILON;
use crate::error::{check_fraction, check_shape, PrepError, Result};
use crate::image::Image;

/// Linear stretch: maps [black_point, white_point] onto the sample type's
/// full range, clipping values outside it.
pub fn stretch_range(image: &Image, black_point: f32, white_point: f32) -> Image {
    let range = white_point - black_point;
    let range = if range.abs() < EPSILON { 1.0 } else { range };
    let sample_type = image.sample_type;
    let out_min = sample_type.min_value();
    let out_span = sample_type.max_value() - out_min;

    let data = image.data.mapv(|v| {
        let t = ((v - black_point) / range).clamp(0.0, 1.0);
        sample_type.quantize(out_min + t * out_span)
    });
    Image::new(data, sample_type)
}

/// Stretch limits: the `low_fraction` and `high_fraction` quantiles of the
/// image map to the sample type's minimum and maximum.
pub fn stretch(image: &Image, low_fraction: f32, high_fraction: f32) -> Result<Image> {
    stretch_masked(image, low_fraction, high_fraction, None)
}

/// Like [`stretch`], with quantiles taken only over pixels where `include` is true.
///
/// If `include` selects no pixel the image is returned unchanged.
/// `low_fraction` above `high_fraction` is rejected rather than inverting
/// the image.
pub fn stretch_masked(
    image: &Image,
    low_fraction: f32,
    high_fraction: f32,
    include: Option<&Array2<bool>>,
) -> Result<Image> {
    check_fraction("low stretch fraction", low_fraction)?;
    check_fraction("high stretch fraction", high_fraction)?;
    if low_fraction > high_fraction {
        return Err(PrepError::parameter(format!(
            "low stretch fraction {low_fraction} exceeds high fraction {high_fraction}"
        )));
    }

    let mut samples: Vec<f32> = match include {
        Some(mask) => {
            check_shape(image.dim(), mask.dim())?;
            image
                .data
                .iter()
                .zip(mask.iter())
                .filter(|(v, &keep)| keep && !v.is_nan())
                .map(|(&v, _)| v)
                .collect()
        }
        None => image.data.iter().copied().filter(|v| !v.is_nan()).collect(),
    };

    let (Some(black_point), Some(white_point)) = (
        select_quantile(&mut samples, low_fraction),
        select_quantile(&mut samples, high_fraction),
    ) else {
        return Ok(image.clone());
    };

    Ok(stretch_range(image, black_point, white_point))
}

/// Value at `fraction` of the sorted samples, using `select_nth_unstable`
/// rather than a full sort. Reorders `samples`. `None` when empty.
pub fn select_quantile(samples: &mut [f32], fraction: f32) -> Option<f32> {
    let n = samples.len();
    if n == 0 {
        return None;
    }
    let idx = ((n as f32 * fraction) as usize).min(n - 1);
    Some(*samples.select_nth_unstable_by(idx, |a, b| a.total_cmp(b)).1)
}
