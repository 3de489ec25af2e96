use ndarray::Zip;

use crate::error::{check_shape, Result};
use crate::filters::stretch::stretch_masked;
use crate::image::Image;
use crate::mask::CorrectionMask;

use super::config::CorrectionParams;
use super::field::IlluminationField;

/// Flat-field one image with an illumination field.
///
/// The field is normalized to a peak of 1, so correction is relative. Pixels
/// where `mask` is true are divided by the normalized field; pixels where it
/// is false keep their original value. With `stretch_out > 0` the result is
/// stretched using quantiles of the corrected pixels only.
///
/// The output has the input's sample type. Values beyond its range saturate
/// (division by a zero field value gives the maximum), never wrap.
pub fn correct_illumination(
    image: &Image,
    field: &IlluminationField,
    params: &CorrectionParams,
    mask: &CorrectionMask,
) -> Result<Image> {
    params.validate()?;
    check_shape(image.dim(), field.dim())?;
    check_shape(image.dim(), mask.dim())?;

    let normalized = field.normalized()?;
    let mut data = image.data.clone();
    Zip::from(&mut data)
        .and(&normalized)
        .and(&mask.data)
        .for_each(|v, &f, &correct| {
            if correct {
                *v /= f;
            }
        });
    let corrected = Image::new(data, image.sample_type);

    if params.stretch_out > 0.0 {
        return stretch_masked(
            &corrected,
            params.stretch_out,
            1.0 - params.stretch_out,
            Some(&mask.data),
        );
    }

    let sample_type = corrected.sample_type;
    Ok(Image::new(
        corrected.data.mapv(|v| sample_type.quantize(v)),
        sample_type,
    ))
}
