/// Height field raster and JSON summary export
use crate::bounds::Region;
use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::loader::LoadStats;
use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Write the field as a single channel R32F texture.
/// Width runs along y and height along x; no-data cells stay NaN.
pub fn write_heightfield_dds(path: &Path, field: &HeightField) -> Result<()> {
    let (rows, cols) = field.shape();
    let mut bytes = Vec::with_capacity(rows * cols * 4);
    for &height in field.values().iter() {
        bytes.extend_from_slice(&(height as f32).to_le_bytes());
    }

    let params = NewDxgiParams {
        height: rows as u32,
        width: cols as u32,
        depth: None,
        format: DxgiFormat::R32_Float,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params)?;
    dds.data = bytes;
    let mut file = File::create(path).map_err(|source| TerrainError::write(path, source))?;
    dds.write(&mut file)?;
    info!(path = %path.display(), rows, cols, "Saved height field raster (R32F)");
    Ok(())
}

/// Grid description in the summary file.
#[derive(Serialize)]
pub struct GridSummary {
    pub region: Region,
    pub cell_size: f64,
    pub nx: usize,
    pub ny: usize,
    pub rows: usize,
    pub cols: usize,
}

/// Everything known about one run, written next to the plots.
#[derive(Serialize)]
pub struct HeightFieldSummary {
    pub input: PathBuf,
    pub grid: GridSummary,
    pub load: LoadStats,
    pub filled_cells: usize,
    pub empty_cells: usize,
    pub z_min: Option<f64>,
    pub z_max: Option<f64>,
    pub weighted_mean: Option<f64>,
    pub x_centers: Vec<f64>,
    pub y_centers: Vec<f64>,
    pub plots: Vec<PathBuf>,
}

impl HeightFieldSummary {
    pub fn new(input: &Path, field: &HeightField, load: &LoadStats, plots: &[PathBuf]) -> Self {
        let grid = field.grid();
        let (rows, cols) = grid.shape();
        let filled = field.filled_cells();
        let mean = field.weighted_mean();
        Self {
            input: input.to_path_buf(),
            grid: GridSummary {
                region: grid.region,
                cell_size: grid.cell_size,
                nx: grid.nx(),
                ny: grid.ny(),
                rows,
                cols,
            },
            load: load.clone(),
            filled_cells: filled,
            empty_cells: grid.cell_count() - filled,
            z_min: field.z_range().map(|r| r.0),
            z_max: field.z_range().map(|r| r.1),
            weighted_mean: (!mean.is_nan()).then_some(mean),
            x_centers: field.x_centers().to_vec(),
            y_centers: field.y_centers().to_vec(),
            plots: plots.to_vec(),
        }
    }

    /// Write as pretty printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| TerrainError::write(path, source))?;
        info!(path = %path.display(), "Saved height field summary");
        Ok(())
    }
}
