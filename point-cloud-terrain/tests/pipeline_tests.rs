/// End-to-end tests for the pipeline and the command line binary
use point_cloud_terrain::{
    MalformedPolicy, PipelineConfig, Stage, TerrainError, TerrainPipeline,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Synthetic dome over the default region with noise rows mixed in
fn write_scan(dir: &Path) -> PathBuf {
    let mut text = String::new();
    let steps = 60;
    for i in 0..steps {
        for j in 0..steps {
            let x = -0.39 + 0.78 * i as f64 / (steps - 1) as f64;
            let y = 0.01 + 0.98 * j as f64 / (steps - 1) as f64;
            let z = 0.2 - x * x - (y - 0.5) * (y - 0.5);
            writeln!(text, "{x} {y} {z} 120 130 140").unwrap();
        }
    }
    text.push_str("0.5 0.5 99.0 0 0 0\n");
    text.push_str("x y z r g b\n");
    text.push_str("0.1 0.2\n");
    let path = dir.join("scan.xyz");
    std::fs::write(&path, text).unwrap();
    path
}

fn config_in(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        cell_size: 0.05,
        output_dir: dir.join("plots"),
        ..PipelineConfig::default()
    }
}

#[test]
fn full_run_writes_plots_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_scan(dir.path());
    let config = PipelineConfig {
        export: true,
        ..config_in(dir.path())
    };

    let output = TerrainPipeline::new(config.clone()).run(&input).unwrap();

    assert!(output.render.is_complete());
    assert_eq!(output.render.written.len(), 3);
    assert_eq!(output.load_stats.kept, 3600);
    assert_eq!(output.load_stats.outside_region, 1);
    assert_eq!(output.load_stats.malformed, 1);
    assert_eq!(output.load_stats.unparseable, 1);
    assert!(output.field.filled_cells() > 0);
    assert!(output.field.values().iter().all(|v| v.is_nan() || *v < 1.0));

    assert_eq!(output.exports.len(), 2);
    let dds = std::fs::read(config.output_dir.join("heightfield.dds")).unwrap();
    assert_eq!(&dds[..4], b"DDS ");

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(config.output_dir.join("heightfield.json")).unwrap(),
    )
    .unwrap();
    let (rows, cols) = output.field.shape();
    assert_eq!(summary["grid"]["rows"], rows);
    assert_eq!(summary["grid"]["cols"], cols);
    assert_eq!(summary["load"]["kept"], 3600);
    assert_eq!(summary["plots"].as_array().unwrap().len(), 3);
}

#[test]
fn missing_input_fails_in_load_stage() {
    let dir = tempfile::tempdir().unwrap();
    let err = TerrainPipeline::new(config_in(dir.path()))
        .run(&dir.path().join("missing.xyz"))
        .unwrap_err();

    assert_eq!(err.stage, Stage::Load);
    assert!(matches!(err.source, TerrainError::InputNotFound { .. }));
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn degenerate_grid_fails_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        cell_size: 0.5,
        ..config_in(dir.path())
    };

    // The input does not exist; the grid check must trip first.
    let err = TerrainPipeline::new(config)
        .run(&dir.path().join("missing.xyz"))
        .unwrap_err();

    assert_eq!(err.stage, Stage::Aggregate);
    assert!(matches!(err.source, TerrainError::InvalidGridSize(_)));
}

#[test]
fn oversized_grid_fails_in_aggregate_stage() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_scan(dir.path());
    let config = PipelineConfig {
        cell_size: 1e-6,
        ..config_in(dir.path())
    };

    let err = TerrainPipeline::new(config).run(&input).unwrap_err();

    assert_eq!(err.stage, Stage::Aggregate);
    assert!(matches!(err.source, TerrainError::InvalidGridSize(_)));
    assert_eq!(err.stage.exit_code(), 3);
}

#[test]
fn strict_policy_fails_on_short_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_scan(dir.path());
    let config = PipelineConfig {
        malformed_policy: MalformedPolicy::Strict,
        ..config_in(dir.path())
    };

    let err = TerrainPipeline::new(config).run(&input).unwrap_err();

    assert_eq!(err.stage, Stage::Load);
    assert!(matches!(err.source, TerrainError::MalformedRecord { line: 3603, .. }));
}

// ============================================================================
// Binary
// ============================================================================

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_point-cloud-terrain"))
}

#[test]
fn cli_succeeds_with_default_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_scan(dir.path());

    let status = binary()
        .current_dir(dir.path())
        .arg(&input)
        .args(["--cell-size", "0.05", "--log-level", "warn"])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.path().join("plots").join("profile.png").exists());
    assert!(dir.path().join("plots").join("terrain_coordinates.png").exists());
    assert!(dir.path().join("plots").join("terrain_dataarray.png").exists());
}

#[test]
fn cli_exit_codes_name_stage() {
    let dir = tempfile::tempdir().unwrap();

    let missing = binary()
        .current_dir(dir.path())
        .arg("missing.xyz")
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("load stage failed"));

    let input = write_scan(dir.path());
    let coarse = binary()
        .current_dir(dir.path())
        .arg(&input)
        .args(["--cell-size", "0.5"])
        .output()
        .unwrap();
    assert_eq!(coarse.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&coarse.stderr).contains("aggregate stage failed"));
}

#[test]
fn cli_accepts_negative_region_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_scan(dir.path());

    let status = binary()
        .current_dir(dir.path())
        .arg(&input)
        .args(["--x-min", "-0.2", "--x-max", "0.2", "--cell-size", "0.05"])
        .args(["--output-dir", "out", "--export", "--log-level", "error"])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(dir.path().join("out").join("heightfield.json").exists());
}
