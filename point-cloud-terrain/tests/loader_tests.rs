/// Tests for scan loading and region filtering
use point_cloud_terrain::{MalformedPolicy, PointCloudLoader, Region, TerrainError};
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn scan_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn keeps_only_points_inside_region() {
    let file = scan_file(&[
        "0.0 0.5 1.0 255 255 255",
        "0.5 0.5 9.0 255 255 255",
        "-0.39 0.01 2.0 0 0 0",
        "0.1 1.0 3.0 0 0 0",
        "-0.4 0.5 4.0 0 0 0",
    ]);

    let (points, stats) = PointCloudLoader::new(Region::default())
        .load(file.path())
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(stats.kept, 2);
    assert_eq!(stats.outside_region, 3);
    assert!(points.iter().all(|p| p.x != 0.5));
    assert_eq!(points.as_slice()[0].z, 1.0);
    assert_eq!(points.as_slice()[1].z, 2.0);
}

#[test]
fn tolerates_extra_fields_and_skips_bad_rows() {
    let file = scan_file(&[
        "X Y Z R G B",
        "0.1 0.2 0.3 1 2 3 extra fields here",
        "",
        "0.1 0.2",
        "0.1 abc 0.3 1 2 3",
        "0.2 0.3 0.4",
    ]);

    let (points, stats) = PointCloudLoader::new(Region::default())
        .load(file.path())
        .unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(stats.lines, 6);
    assert_eq!(stats.blank, 1);
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.unparseable, 2);
    assert_eq!(stats.kept, 1);
}

#[test]
fn rows_without_colour_do_not_reach_the_mean() {
    let data = "0.1 0.5 7.0\n0.1 0.5 1.0 0 0 0\n0.1 0.5 3.0 0 0\n";

    let (points, stats) = PointCloudLoader::new(Region::default())
        .load_from_reader(Path::new("memory"), Cursor::new(data))
        .unwrap();

    assert_eq!(stats.kept, 1);
    assert_eq!(stats.malformed, 2);
    assert_eq!(points.mean_z(), 1.0);
}

#[test]
fn strict_policy_rejects_row_without_colour() {
    let data = "0.1 0.5 1.0 0 0 0\n0.1 0.5 7.0\n";

    let err = PointCloudLoader::new(Region::default())
        .with_policy(MalformedPolicy::Strict)
        .load_from_reader(Path::new("memory"), Cursor::new(data))
        .unwrap_err();

    assert!(matches!(err, TerrainError::MalformedRecord { line: 2, .. }));
}

#[test]
fn strict_policy_reports_line_number() {
    let file = scan_file(&["0.1 0.2 0.3 1 2 3", "0.1 0.2 0.3 1 2 3", "0.1"]);

    let err = PointCloudLoader::new(Region::default())
        .with_policy(MalformedPolicy::Strict)
        .load(file.path())
        .unwrap_err();

    match err {
        TerrainError::MalformedRecord { line, .. } => assert_eq!(line, 3),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn missing_file_is_input_not_found() {
    let err = PointCloudLoader::new(Region::default())
        .load(Path::new("/definitely/not/here.xyz"))
        .unwrap_err();
    assert!(matches!(err, TerrainError::InputNotFound { .. }));
}

#[test]
fn directory_is_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = PointCloudLoader::new(Region::default())
        .load(dir.path())
        .unwrap_err();
    assert!(matches!(err, TerrainError::InputNotFound { .. }));
}

#[test]
fn custom_region_filters_from_reader() {
    let region = Region::new(0.0, 2.0, 0.0, 2.0).unwrap();
    let data = "1.0 1.0 5.0 0 0 0\n-0.5 1.0 6.0 0 0 0\n1.5 0.5 7.0 0 0 0\n";

    let (points, stats) = PointCloudLoader::new(region)
        .load_from_reader(Path::new("memory"), Cursor::new(data))
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(stats.outside_region, 1);
    assert_eq!(points.region(), &region);
}

#[test]
fn empty_file_yields_empty_set() {
    let file = scan_file(&[]);
    let (points, stats) = PointCloudLoader::new(Region::default())
        .load(file.path())
        .unwrap();
    assert!(points.is_empty());
    assert_eq!(stats.lines, 0);
}
