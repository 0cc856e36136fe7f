/// PNG plots of a height field: two surface views and a cross-section profile chart
pub mod canvas;
pub mod colormap;
pub mod profile;
pub mod surface;

use crate::error::{Result, TerrainError};
use crate::height_field::{HeightField, SurfaceMesh};
use crate::labeled::{LabeledField, Profile};
use constants::render_settings::{
    FIELD_VIEW_AZIMUTH, FIELD_VIEW_ELEVATION, MESH_VIEW_AZIMUTH, MESH_VIEW_ELEVATION,
    PROFILE_FILE, PROFILE_OFFSETS, SURFACE_COORDINATES_FILE, SURFACE_DATAARRAY_FILE,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use surface::{View, render_surface};
use tracing::{error, info};

/// The plots produced for every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Surface drawn from the broadcast coordinate meshes.
    SurfaceCoordinates,
    /// Surface drawn from the labelled field.
    SurfaceDataArray,
    /// Height against y at fixed x locations.
    Profiles,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [
        PlotKind::SurfaceCoordinates,
        PlotKind::SurfaceDataArray,
        PlotKind::Profiles,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            PlotKind::SurfaceCoordinates => SURFACE_COORDINATES_FILE,
            PlotKind::SurfaceDataArray => SURFACE_DATAARRAY_FILE,
            PlotKind::Profiles => PROFILE_FILE,
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlotKind::SurfaceCoordinates => "coordinate surface",
            PlotKind::SurfaceDataArray => "field surface",
            PlotKind::Profiles => "profiles",
        };
        f.write_str(name)
    }
}

/// Outcome of attempting every plot.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<(PlotKind, TerrainError)>,
}

impl RenderReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes plots into one output directory.
///
/// Every plot is independent; `render_all` attempts each one and reports failures
/// individually so a single unwritable file does not hide the others.
pub struct PlotRenderer {
    output_dir: PathBuf,
    profile_offsets: Vec<f64>,
}

impl PlotRenderer {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            profile_offsets: PROFILE_OFFSETS.to_vec(),
        }
    }

    /// Replace the cross-section offsets measured from the region centre
    pub fn with_profile_offsets(mut self, offsets: Vec<f64>) -> Self {
        self.profile_offsets = offsets;
        self
    }

    /// Attempt every plot for the field, collecting per-plot failures
    pub fn render_all(&self, field: &HeightField) -> RenderReport {
        let mut report = RenderReport::default();
        let mesh = field.mesh();
        let labeled = field.labeled();
        let center_x = field.grid().region.center_x();

        for kind in PlotKind::ALL {
            let result = match kind {
                PlotKind::SurfaceCoordinates => self.surface_from_mesh(&mesh),
                PlotKind::SurfaceDataArray => self.surface_from_field(&labeled),
                PlotKind::Profiles => self.profiles(&labeled, center_x),
            };
            match result {
                Ok(path) => {
                    info!(plot = %kind, path = %path.display(), "Saved plot");
                    report.written.push(path);
                }
                Err(err) => {
                    error!(plot = %kind, error = %err, "Plot failed");
                    report.failures.push((kind, err));
                }
            }
        }
        report
    }

    /// Surface from x/y meshes and values, with colour bar
    pub fn surface_from_mesh(&self, mesh: &SurfaceMesh) -> Result<PathBuf> {
        let view = View::new(MESH_VIEW_ELEVATION, MESH_VIEW_AZIMUTH);
        let canvas = render_surface(&mesh.xs, &mesh.ys, &mesh.zs, view, true);
        let path = self.plot_path(PlotKind::SurfaceCoordinates)?;
        canvas.save(&path)?;
        Ok(path)
    }

    /// Surface from the labelled field, meshes rebuilt from its coordinates
    pub fn surface_from_field(&self, field: &LabeledField) -> Result<PathBuf> {
        let shape = field.values().dim();
        let xs = ndarray::Array2::from_shape_fn(shape, |(i, _)| field.x()[i]);
        let ys = ndarray::Array2::from_shape_fn(shape, |(_, j)| field.y()[j]);
        let view = View::new(FIELD_VIEW_ELEVATION, FIELD_VIEW_AZIMUTH);
        let canvas = render_surface(&xs, &ys, field.values(), view, false);
        let path = self.plot_path(PlotKind::SurfaceDataArray)?;
        canvas.save(&path)?;
        Ok(path)
    }

    /// Height against y at each offset from `center_x`
    pub fn profiles(&self, field: &LabeledField, center_x: f64) -> Result<PathBuf> {
        let profiles: Vec<Profile> = self
            .profile_offsets
            .iter()
            .map(|offset| field.interp_x(center_x + offset))
            .collect();
        let canvas = profile::render_profiles(&profiles);
        let path = self.plot_path(PlotKind::Profiles)?;
        canvas.save(&path)?;
        Ok(path)
    }

    /// Ensure the output directory exists and return the file path for a plot
    fn plot_path(&self, kind: PlotKind) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|source| TerrainError::write(&self.output_dir, source))?;
        Ok(self.output_dir.join(kind.file_name()))
    }
}
