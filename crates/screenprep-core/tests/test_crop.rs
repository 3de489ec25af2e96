use ndarray::Array2;

use screenprep_core::crop::{crop, CropBounds};
use screenprep_core::error::PrepError;
use screenprep_core::image::{Image, SampleType};

fn grid(h: usize, w: usize) -> Image {
    Image::new(
        Array2::from_shape_fn((h, w), |(r, c)| (r * w + c) as f32),
        SampleType::U16,
    )
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_bounds() {
    let bounds = CropBounds::parse(&["10", "None", "-5", ""]).unwrap();
    assert_eq!(
        bounds,
        CropBounds {
            row_start: Some(10),
            row_stop: None,
            col_start: Some(-5),
            col_stop: None,
        }
    );
}

#[test]
fn test_parse_from_str() {
    let bounds: CropBounds = "1, 3, none, -1".parse().unwrap();
    assert_eq!(bounds.row_start, Some(1));
    assert_eq!(bounds.row_stop, Some(3));
    assert_eq!(bounds.col_start, None);
    assert_eq!(bounds.col_stop, Some(-1));
}

#[test]
fn test_parse_rejects_wrong_count() {
    assert!(matches!(
        CropBounds::parse(&["1", "2", "3"]),
        Err(PrepError::Parameter(_))
    ));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(matches!(
        CropBounds::parse(&["1", "x", "3", "4"]),
        Err(PrepError::Parameter(_))
    ));
}

// ---------------------------------------------------------------------------
// Cropping
// ---------------------------------------------------------------------------

#[test]
fn test_crop_interior() {
    let image = grid(6, 8);
    let bounds = CropBounds::parse(&["1", "4", "2", "5"]).unwrap();
    let out = crop(&image, &bounds).unwrap();
    assert_eq!(out.dim(), (3, 3));
    assert_eq!(out.data[[0, 0]], 10.0);
    assert_eq!(out.sample_type, SampleType::U16);
}

#[test]
fn test_crop_negative_and_open_bounds() {
    let image = grid(6, 8);
    let bounds = CropBounds::parse(&["None", "-2", "-3", "None"]).unwrap();
    let out = crop(&image, &bounds).unwrap();
    assert_eq!(out.dim(), (4, 3));
    assert_eq!(out.data[[0, 0]], 5.0);
}

#[test]
fn test_crop_clamps_out_of_range() {
    let image = grid(4, 4);
    let bounds = CropBounds::parse(&["-100", "100", "2", "100"]).unwrap();
    let out = crop(&image, &bounds).unwrap();
    assert_eq!(out.dim(), (4, 2));
}

#[test]
fn test_crop_empty_result_rejected() {
    let image = grid(4, 4);
    let bounds = CropBounds::parse(&["3", "1", "None", "None"]).unwrap();
    assert!(matches!(crop(&image, &bounds), Err(PrepError::Parameter(_))));
}
