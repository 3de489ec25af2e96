mod common;

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;

use screenprep_core::batch::{run_features, NoOpReporter};
use screenprep_core::error::PrepError;
use screenprep_core::features::{
    available_screens, filenames_path, screen_by_name, FeatureTable, IntensityScreen, SampleId,
    Screen,
};
use screenprep_core::image::SampleType;

use common::{constant, spot_image, MemoryStore};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[test]
fn test_intensity_screen_registered() {
    assert!(available_screens().any(|name| name == "intensity"));
    let screen = screen_by_name("intensity").unwrap();
    assert_eq!(screen.name(), "intensity");
}

#[test]
fn test_unknown_screen_rejected() {
    assert!(matches!(
        screen_by_name("no-such-screen"),
        Err(PrepError::UnknownScreen(name)) if name == "no-such-screen"
    ));
}

// ---------------------------------------------------------------------------
// IntensityScreen
// ---------------------------------------------------------------------------

#[test]
fn test_intensity_index_strips_extensions() {
    let screen = IntensityScreen;
    assert_eq!(
        screen.index(Path::new("plate1/A01_s1.illum.tif")),
        SampleId("A01_s1".into())
    );
}

#[test]
fn test_intensity_features_of_constant_image() {
    let (values, names) = IntensityScreen.feature_map(&constant(4, 4, 50.0, SampleType::U8));
    assert_eq!(values.len(), names.len());
    assert_eq!(names[0], "mean");
    assert_abs_diff_eq!(values[0], 50.0);
    assert_abs_diff_eq!(values[1], 0.0);
    assert_abs_diff_eq!(values[5], 50.0);
    assert_abs_diff_eq!(values[8], 0.0);
}

#[test]
fn test_intensity_bright_fraction() {
    let (values, names) = IntensityScreen.feature_map(&spot_image(10, 10, 0, 0, 5));
    let idx = names.iter().position(|n| n == "bright_fraction").unwrap();
    assert_abs_diff_eq!(values[idx], 0.25);
    let max = names.iter().position(|n| n == "max").unwrap();
    assert_abs_diff_eq!(values[max], 200.0);
}

// ---------------------------------------------------------------------------
// FeatureTable
// ---------------------------------------------------------------------------

#[test]
fn test_table_rejects_mismatched_names() {
    let mut table = FeatureTable::new();
    table
        .push(SampleId("a".into()), vec![1.0], vec!["x".into()])
        .unwrap();
    let result = table.push(SampleId("b".into()), vec![1.0], vec!["y".into()]);
    assert!(matches!(result, Err(PrepError::Parameter(_))));
    let result = table.push(SampleId("c".into()), vec![1.0, 2.0], vec!["x".into()]);
    assert!(matches!(result, Err(PrepError::Parameter(_))));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_table_json_round_trip() {
    let mut table = FeatureTable::new();
    table
        .push(SampleId("a".into()), vec![1.0, 2.5], vec!["x".into(), "y".into()])
        .unwrap();
    table
        .push(SampleId("b".into()), vec![3.0, -1.0], vec!["x".into(), "y".into()])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.json");
    table.write_json(&path).unwrap();
    assert_eq!(FeatureTable::read_json(&path).unwrap(), table);
}

#[test]
fn test_filenames_path_beside_table() {
    assert_eq!(
        filenames_path(Path::new("out/features.json")),
        PathBuf::from("out/features.filenames.txt")
    );
}

// ---------------------------------------------------------------------------
// Batch extraction
// ---------------------------------------------------------------------------

#[test]
fn test_run_features_writes_table_and_file_list() {
    let store = MemoryStore::new();
    let paths: Vec<PathBuf> = ["A01.tif", "A02.tif", "B01.tif"]
        .iter()
        .map(PathBuf::from)
        .collect();
    for (i, path) in paths.iter().enumerate() {
        store.insert(path, constant(4, 4, 10.0 * (i + 1) as f32, SampleType::U8));
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("features.json");
    let table = run_features(&store, &paths, &IntensityScreen, &output, &NoOpReporter).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.rows[1].sample, SampleId("A02".into()));
    assert_abs_diff_eq!(table.rows[2].values[0], 30.0);
    assert_eq!(FeatureTable::read_json(&output).unwrap(), table);

    let listed = std::fs::read_to_string(filenames_path(&output)).unwrap();
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines, ["A01.tif", "A02.tif", "B01.tif"]);
}

#[test]
fn test_run_features_empty_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_features(
        &MemoryStore::new(),
        &[],
        &IntensityScreen,
        &dir.path().join("f.json"),
        &NoOpReporter,
    );
    assert!(matches!(result, Err(PrepError::EmptyInput(_))));
}
