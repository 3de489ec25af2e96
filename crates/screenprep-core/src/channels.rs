use ndarray::{stack, Axis};

use crate::error::{check_shape, PrepError, Result};
use crate::image::{ChannelImage, Image};

/// Glue same-shape single-channel images into one multi-channel image,
/// channel `i` taken from `images[i]`.
pub fn cat_channels(images: &[Image]) -> Result<ChannelImage> {
    let Some(first) = images.first() else {
        return Err(PrepError::EmptyInput("channel group"));
    };
    for image in &images[1..] {
        check_shape(first.dim(), image.dim())?;
        if image.sample_type != first.sample_type {
            return Err(PrepError::SampleTypeMismatch {
                expected: first.sample_type,
                actual: image.sample_type,
            });
        }
    }

    let views: Vec<_> = images.iter().map(|im| im.data.view()).collect();
    let data = stack(Axis(2), &views).map_err(|e| PrepError::parameter(e.to_string()))?;
    Ok(ChannelImage {
        data,
        sample_type: first.sample_type,
    })
}

/// Split a multi-channel image back into single-channel images.
pub fn split_channels(image: &ChannelImage) -> Vec<Image> {
    image
        .data
        .axis_iter(Axis(2))
        .map(|channel| Image::new(channel.to_owned(), image.sample_type))
        .collect()
}
