/// Regular grid definition: boundary cut points, cell centres and cell lookup
use crate::bounds::Region;
use crate::error::{Result, TerrainError};
use constants::grid::{MAX_CELLS, MIN_BOUNDARIES};
use serde::Serialize;
use std::ops::Range;

/// Grid over a region at a fixed cell size.
///
/// `nx` and `ny` are boundary counts, so the grid holds `(nx - 1) * (ny - 1)` cells.
/// Boundaries are evenly spaced and include both region edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSpec {
    pub region: Region,
    pub cell_size: f64,
    x_boundaries: Vec<f64>,
    y_boundaries: Vec<f64>,
}

impl GridSpec {
    /// Build the grid, failing when either axis cannot form a single cell
    pub fn new(region: Region, cell_size: f64) -> Result<Self> {
        region.validate()?;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(TerrainError::invalid_grid(format!(
                "cell size must be a positive number, got {}",
                cell_size
            )));
        }

        let nx = boundary_count(region.width(), cell_size);
        let ny = boundary_count(region.height(), cell_size);
        for (axis, count, span) in [("x", nx, region.width()), ("y", ny, region.height())] {
            if count < MIN_BOUNDARIES {
                return Err(TerrainError::invalid_grid(format!(
                    "{axis} span {span} at cell size {cell_size} gives {count} boundaries, \
                     at least {MIN_BOUNDARIES} required"
                )));
            }
        }
        let cells = (nx - 1).checked_mul(ny - 1).filter(|&c| c <= MAX_CELLS);
        if cells.is_none() {
            return Err(TerrainError::invalid_grid(format!(
                "cell size {cell_size} gives {} x {} cells, at most {MAX_CELLS} allowed",
                nx - 1,
                ny - 1
            )));
        }

        Ok(Self {
            region,
            cell_size,
            x_boundaries: linspace(region.min_x, region.max_x, nx),
            y_boundaries: linspace(region.min_y, region.max_y, ny),
        })
    }

    /// Boundary count along x
    pub fn nx(&self) -> usize {
        self.x_boundaries.len()
    }

    /// Boundary count along y
    pub fn ny(&self) -> usize {
        self.y_boundaries.len()
    }

    /// Cell counts as (rows along x, columns along y)
    pub fn shape(&self) -> (usize, usize) {
        (self.nx() - 1, self.ny() - 1)
    }

    pub fn cell_count(&self) -> usize {
        let (rows, cols) = self.shape();
        rows * cols
    }

    pub fn x_boundaries(&self) -> &[f64] {
        &self.x_boundaries
    }

    pub fn y_boundaries(&self) -> &[f64] {
        &self.y_boundaries
    }

    pub fn x_centers(&self) -> Vec<f64> {
        midpoints(&self.x_boundaries)
    }

    pub fn y_centers(&self) -> Vec<f64> {
        midpoints(&self.y_boundaries)
    }

    /// Row-major flat index, x outer and y inner
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        i * (self.ny() - 1) + j
    }

    /// Cells along x whose closed interval holds `x`
    pub fn x_cells(&self, x: f64) -> Range<usize> {
        closed_cells(&self.x_boundaries, x)
    }

    /// Cells along y whose closed interval holds `y`
    pub fn y_cells(&self, y: f64) -> Range<usize> {
        closed_cells(&self.y_boundaries, y)
    }
}

/// `floor(span / cell_size)` as a boundary count
fn boundary_count(span: f64, cell_size: f64) -> usize {
    let count = (span / cell_size).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

/// Evenly spaced samples over `[start, stop]` with both endpoints included.
/// Samples are `start + i * step` and the last one is pinned to `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
            values[num - 1] = stop;
            values
        }
    }
}

/// Midpoints of adjacent values
pub fn midpoints(boundaries: &[f64]) -> Vec<f64> {
    boundaries.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Indices of cells `k` with `b[k] <= v <= b[k + 1]`.
/// Empty when `v` lies outside the boundaries; two cells when `v` sits on an interior boundary.
fn closed_cells(boundaries: &[f64], v: f64) -> Range<usize> {
    if boundaries.len() < 2 {
        return 0..0;
    }
    let cells = boundaries.len() - 1;
    let first = boundaries[1..].partition_point(|&upper| upper < v);
    let end = boundaries[..cells].partition_point(|&lower| lower <= v);
    if first >= end { 0..0 } else { first..end }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let values = linspace(-0.4, 0.4, 5);
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], -0.4);
        assert_eq!(values[4], 0.4);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn default_grid_shape() {
        let grid = GridSpec::new(Region::default(), 0.01).unwrap();
        assert_eq!(grid.nx(), 80);
        assert_eq!(grid.ny(), 100);
        assert_eq!(grid.shape(), (79, 99));
        assert_eq!(grid.x_centers().len(), 79);
        assert_eq!(grid.y_centers().len(), 99);
    }

    #[test]
    fn coarse_cell_size_is_rejected() {
        let err = GridSpec::new(Region::default(), 0.5).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidGridSize(_)));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = GridSpec::new(Region::default(), 1e-6).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidGridSize(_)));
        let err = GridSpec::new(Region::default(), f64::MIN_POSITIVE).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidGridSize(_)));
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        for size in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                GridSpec::new(Region::default(), size),
                Err(TerrainError::InvalidGridSize(_))
            ));
        }
    }

    #[test]
    fn closed_cells_double_count_interior_boundaries() {
        let b = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(closed_cells(&b, 0.5), 0..1);
        assert_eq!(closed_cells(&b, 1.0), 0..2);
        assert_eq!(closed_cells(&b, 0.0), 0..1);
        assert_eq!(closed_cells(&b, 3.0), 2..3);
        assert_eq!(closed_cells(&b, 3.5), 0..0);
        assert_eq!(closed_cells(&b, -0.5), 0..0);
    }
}
