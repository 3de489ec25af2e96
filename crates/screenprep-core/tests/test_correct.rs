mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use screenprep_core::error::PrepError;
use screenprep_core::image::{Image, SampleType};
use screenprep_core::illumination::{correct_illumination, CorrectionParams, IlluminationField};
use screenprep_core::mask::CorrectionMask;

use common::{constant, noise_image, vignette};

fn no_stretch() -> CorrectionParams {
    CorrectionParams::default()
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn test_constant_field_leaves_image_unchanged() {
    let noise = noise_image(12, 9, 4);
    let image = Image::new(noise.data.mapv(|v| v * 200.0), SampleType::U16);
    let field = IlluminationField::new(Array2::from_elem((12, 9), 37.5));

    let out = correct_illumination(&image, &field, &no_stretch(), &CorrectionMask::all(image.dim()))
        .unwrap();
    assert_eq!(out.sample_type, SampleType::U16);
    assert_eq!(out.data, image.data);
}

#[test]
fn test_vignetted_image_is_flattened() {
    let profile = vignette(16, 20, 0.8);
    let image = Image::new(profile.clone(), SampleType::F32);
    let field = IlluminationField::new(profile);

    let out = correct_illumination(&image, &field, &no_stretch(), &CorrectionMask::all(image.dim()))
        .unwrap();
    let peak = field.max();
    for &v in out.data.iter() {
        assert_abs_diff_eq!(v, peak, epsilon = 1e-5);
    }
}

#[test]
fn test_field_normalized_peak_is_one() {
    let field = IlluminationField::new(vignette(8, 8, 250.0));
    let normalized = field.normalized().unwrap();
    let max = normalized.iter().copied().fold(0.0, f32::max);
    assert_abs_diff_eq!(max, 1.0, epsilon = 1e-6);
}

// ---------------------------------------------------------------------------
// Saturation
// ---------------------------------------------------------------------------

#[test]
fn test_correction_saturates_integer_output() {
    let image = constant(3, 3, 200.0, SampleType::U8);
    let mut field = Array2::from_elem((3, 3), 100.0);
    field[[0, 0]] = 1.0;
    field[[2, 2]] = 0.0;

    let out = correct_illumination(
        &image,
        &IlluminationField::new(field),
        &no_stretch(),
        &CorrectionMask::all((3, 3)),
    )
    .unwrap();
    assert_eq!(out.data[[0, 0]], 255.0);
    assert_eq!(out.data[[2, 2]], 255.0);
    assert_eq!(out.data[[1, 1]], 200.0);
}

#[test]
fn test_zero_over_zero_is_zero() {
    let mut data = Array2::from_elem((2, 2), 50.0);
    data[[0, 0]] = 0.0;
    let image = Image::new(data, SampleType::U8);
    let mut field = Array2::from_elem((2, 2), 10.0);
    field[[0, 0]] = 0.0;

    let out = correct_illumination(
        &image,
        &IlluminationField::new(field),
        &no_stretch(),
        &CorrectionMask::all((2, 2)),
    )
    .unwrap();
    assert_eq!(out.data[[0, 0]], 0.0);
}

// ---------------------------------------------------------------------------
// Masking and stretching
// ---------------------------------------------------------------------------

#[test]
fn test_pixels_outside_correction_mask_pass_through() {
    let image = constant(4, 4, 60.0, SampleType::U8);
    let mut field = Array2::from_elem((4, 4), 1.0);
    field.column_mut(0).fill(0.5);
    let mut mask = CorrectionMask::all((4, 4));
    mask.data[[0, 0]] = false;

    let out = correct_illumination(&image, &IlluminationField::new(field), &no_stretch(), &mask)
        .unwrap();
    assert_eq!(out.data[[0, 0]], 60.0);
    assert_eq!(out.data[[1, 0]], 120.0);
    assert_eq!(out.data[[1, 1]], 60.0);
}

#[test]
fn test_stretch_out_uses_full_range() {
    let image = noise_image(20, 20, 8);
    let field = IlluminationField::new(Array2::from_elem((20, 20), 5.0));
    let params = CorrectionParams { stretch_out: 0.1 };

    let out = correct_illumination(&image, &field, &params, &CorrectionMask::all((20, 20))).unwrap();
    let (lo, hi) = out.min_max().unwrap();
    assert_eq!(lo, 0.0);
    assert_eq!(hi, 255.0);
    assert!(out.data.iter().all(|v| v.fract() == 0.0));
}

#[test]
fn test_stretch_out_limits_ignore_pass_through_pixels() {
    let mut data = Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f32);
    let mut mask = CorrectionMask::all((10, 10));
    for c in 0..3 {
        data[[0, c]] = 250.0;
        mask.data[[0, c]] = false;
    }
    mask.data[[5, 5]] = false;
    let image = Image::new(data, SampleType::U8);
    let mut field = Array2::from_elem((10, 10), 1.0);
    field[[5, 5]] = 0.5;
    let params = CorrectionParams { stretch_out: 0.1 };

    let out = correct_illumination(&image, &IlluminationField::new(field), &params, &mask).unwrap();
    // Limits come from the 96 corrected pixels only: black 12, white 90.
    assert_eq!(out.data[[9, 0]], 255.0);
    assert_eq!(out.data[[1, 2]], 0.0);
    assert_eq!(out.data[[2, 0]], 26.0);
    // Not divided by the field, but still remapped with the same limits.
    assert_eq!(out.data[[5, 5]], 141.0);
    assert_eq!(out.data[[0, 0]], 255.0);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn test_field_shape_mismatch_rejected() {
    let image = noise_image(4, 5, 1);
    let field = IlluminationField::new(Array2::from_elem((4, 4), 1.0));
    let result = correct_illumination(&image, &field, &no_stretch(), &CorrectionMask::all((4, 5)));
    assert!(matches!(result, Err(PrepError::ShapeMismatch { .. })));
}

#[test]
fn test_mask_shape_mismatch_rejected() {
    let image = noise_image(4, 4, 1);
    let field = IlluminationField::new(Array2::from_elem((4, 4), 1.0));
    let result = correct_illumination(&image, &field, &no_stretch(), &CorrectionMask::all((3, 4)));
    assert!(matches!(result, Err(PrepError::ShapeMismatch { .. })));
}

#[test]
fn test_degenerate_field_rejected() {
    let image = noise_image(3, 3, 1);
    let field = IlluminationField::new(Array2::zeros((3, 3)));
    let result = correct_illumination(&image, &field, &no_stretch(), &CorrectionMask::all((3, 3)));
    assert!(matches!(result, Err(PrepError::DegenerateField)));
}

#[test]
fn test_invalid_stretch_out_rejected() {
    let image = noise_image(3, 3, 1);
    let field = IlluminationField::new(Array2::from_elem((3, 3), 1.0));
    let params = CorrectionParams { stretch_out: 1.5 };
    let result = correct_illumination(&image, &field, &params, &CorrectionMask::all((3, 3)));
    assert!(matches!(result, Err(PrepError::Parameter(_))));
}

#[test]
fn test_stretch_out_above_half_rejected() {
    let image = Image::new(Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f32), SampleType::U8);
    let field = IlluminationField::new(Array2::from_elem((10, 10), 1.0));
    let params = CorrectionParams { stretch_out: 0.6 };
    let result = correct_illumination(&image, &field, &params, &CorrectionMask::all((10, 10)));
    assert!(matches!(result, Err(PrepError::Parameter(_))));
}
