use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};

use screenprep_core::error::PrepError;
use screenprep_core::image::{ChannelImage, Image, SampleType};
use screenprep_core::io::image_io::{
    load_image, load_mask, save_channel_image, save_image, save_mask,
};
use screenprep_core::io::paths::{base_name, in_dir, read_file_list, with_suffix};
use screenprep_core::io::{FsImageStore, ImageStore};
use screenprep_core::mask::ArtifactMask;

// ---------------------------------------------------------------------------
// Image round trips
// ---------------------------------------------------------------------------

#[test]
fn test_u8_png_roundtrip() {
    let data = Array2::from_shape_fn((5, 7), |(r, c)| (r * 30 + c) as f32);
    let image = Image::new(data, SampleType::U8);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    save_image(&image, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.sample_type, SampleType::U8);
    assert_eq!(loaded.dim(), (5, 7));
    assert_eq!(loaded.data, image.data);
}

#[test]
fn test_u16_tiff_roundtrip() {
    let data = Array2::from_shape_fn((4, 6), |(r, c)| (r * 10_000 + c * 7) as f32);
    let image = Image::new(data, SampleType::U16);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.tif");
    save_image(&image, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.sample_type, SampleType::U16);
    assert_eq!(loaded.data, image.data);
}

#[test]
fn test_float_saved_as_16_bit() {
    let mut data = Array2::<f32>::zeros((2, 2));
    data[[0, 1]] = 0.5;
    data[[1, 1]] = 1.0;
    let image = Image::new(data, SampleType::F32);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("field.tif");
    save_image(&image, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.sample_type, SampleType::U16);
    assert_eq!(loaded.data[[0, 0]], 0.0);
    assert_eq!(loaded.data[[0, 1]], 32768.0);
    assert_eq!(loaded.data[[1, 1]], 65535.0);
}

#[test]
fn test_out_of_range_values_saturate() {
    let mut data = Array2::<f32>::zeros((1, 3));
    data[[0, 0]] = -20.0;
    data[[0, 1]] = 300.0;
    data[[0, 2]] = f32::NAN;
    let image = Image::new(data, SampleType::U8);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sat.png");
    save_image(&image, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded.data.as_slice().unwrap(), &[0.0, 255.0, 0.0]);
}

#[test]
fn test_load_missing_file_names_path() {
    let err = load_image(Path::new("/nonexistent/screenprep/missing.tif")).unwrap_err();
    match err {
        PrepError::Image { path, .. } => assert!(path.ends_with("missing.tif")),
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Masks and channel images
// ---------------------------------------------------------------------------

#[test]
fn test_mask_roundtrip() {
    let mut data = Array2::from_elem((6, 5), false);
    data[[1, 2]] = true;
    data[[5, 4]] = true;
    let mask = ArtifactMask::new(data);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mask.tif");
    save_mask(&mask, &path).unwrap();
    assert_eq!(load_mask(&path).unwrap(), mask);
}

#[test]
fn test_channel_image_saved_as_rgb() {
    let data = Array3::from_shape_fn((4, 4, 3), |(r, c, ch)| (r * 4 + c) as f32 / 16.0 + ch as f32 * 0.01);
    let image = ChannelImage {
        data,
        sample_type: SampleType::F32,
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.chs.tif");
    save_channel_image(&image, &path).unwrap();

    let reloaded = image::open(&path).unwrap();
    assert_eq!(reloaded.color(), image::ColorType::Rgb8);
    assert_eq!((reloaded.width(), reloaded.height()), (4, 4));
}

#[test]
fn test_channel_image_needs_three_channels() {
    let image = ChannelImage {
        data: Array3::zeros((2, 2, 2)),
        sample_type: SampleType::U8,
    };
    let dir = tempfile::tempdir().unwrap();
    let result = save_channel_image(&image, &dir.path().join("x.tif"));
    assert!(matches!(result, Err(PrepError::UnsupportedImage(_))));
}

#[test]
fn test_fs_store_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.png");
    assert!(!FsImageStore.exists(&path));
    FsImageStore
        .write(&path, &Image::new(Array2::zeros((2, 2)), SampleType::U8))
        .unwrap();
    assert!(FsImageStore.exists(&path));
}

#[test]
fn test_fs_store_remove() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mask.tif");
    FsImageStore
        .write_mask(&path, &ArtifactMask::new(Array2::from_elem((2, 2), true)))
        .unwrap();
    FsImageStore.remove(&path).unwrap();
    assert!(!FsImageStore.exists(&path));
    // Already gone.
    FsImageStore.remove(&path).unwrap();
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn test_output_naming() {
    let path = Path::new("plate/A01_s1.tif");
    assert_eq!(base_name(path), PathBuf::from("plate/A01_s1"));
    assert_eq!(
        with_suffix(path, ".illum.tif"),
        PathBuf::from("plate/A01_s1.illum.tif")
    );
    assert_eq!(
        in_dir(&with_suffix(path, ".crop.tif"), Some(Path::new("out"))),
        PathBuf::from("out/A01_s1.crop.tif")
    );
    assert_eq!(in_dir(path, None), path);
}

#[test]
fn test_read_file_list_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("files.txt");
    std::fs::write(&list, "a.tif\n\nb/c.tif  \n").unwrap();
    assert_eq!(
        read_file_list(&list).unwrap(),
        vec![PathBuf::from("a.tif"), PathBuf::from("b/c.tif")]
    );
}
