/// Dense per-cell mean heights with their coordinate axes
use crate::grid::GridSpec;
use crate::labeled::LabeledField;
use ndarray::{Array1, Array2};

/// Mean z per grid cell, NaN where a cell received no points.
///
/// Rows run along x and columns along y, matching `GridSpec::shape`.
#[derive(Debug, Clone)]
pub struct HeightField {
    grid: GridSpec,
    values: Array2<f64>,
    counts: Array2<usize>,
    x_centers: Array1<f64>,
    y_centers: Array1<f64>,
}

/// Coordinate meshes and values of identical shape, ready for surface rendering.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    pub xs: Array2<f64>,
    pub ys: Array2<f64>,
    pub zs: Array2<f64>,
}

impl HeightField {
    pub(crate) fn new(grid: GridSpec, values: Array2<f64>, counts: Array2<usize>) -> Self {
        let x_centers = Array1::from(grid.x_centers());
        let y_centers = Array1::from(grid.y_centers());
        Self {
            grid,
            values,
            counts,
            x_centers,
            y_centers,
        }
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Points contributing to each cell; boundary points count in every cell they touch
    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn x_centers(&self) -> &Array1<f64> {
        &self.x_centers
    }

    pub fn y_centers(&self) -> &Array1<f64> {
        &self.y_centers
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn value(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Cells holding at least one point
    pub fn filled_cells(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Smallest and largest cell value, ignoring no-data cells
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Count-weighted mean of cell values, NaN when every cell is empty
    pub fn weighted_mean(&self) -> f64 {
        let (sum, total) = self
            .values
            .iter()
            .zip(self.counts.iter())
            .filter(|(_, count)| **count > 0)
            .fold((0.0, 0usize), |(sum, total), (value, count)| {
                (sum + value * *count as f64, total + count)
            });
        if total == 0 { f64::NAN } else { sum / total as f64 }
    }

    /// Broadcast the centre axes to full meshes: `xs[i, j] = xc[i]`, `ys[i, j] = yc[j]`
    pub fn mesh(&self) -> SurfaceMesh {
        let shape = self.shape();
        let xs = Array2::from_shape_fn(shape, |(i, _)| self.x_centers[i]);
        let ys = Array2::from_shape_fn(shape, |(_, j)| self.y_centers[j]);
        SurfaceMesh {
            xs,
            ys,
            zs: self.values.clone(),
        }
    }

    /// Package the values with `x` and `y` coordinate labels
    pub fn labeled(&self) -> LabeledField {
        LabeledField::new(
            self.x_centers.clone(),
            self.y_centers.clone(),
            self.values.clone(),
        )
    }
}
