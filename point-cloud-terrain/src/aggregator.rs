/// Spatial mean binning of a point set onto a regular grid
use crate::error::Result;
use crate::grid::GridSpec;
use crate::height_field::HeightField;
use crate::point::{Point, PointSet};
use crate::progress::progress_bar;
use constants::grid::NO_DATA;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How points are matched to cells. Both strategies produce bit-identical fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStrategy {
    /// Bucket points by cell once, then reduce each bucket. O(points log n + cells).
    #[default]
    Indexed,
    /// Scan every point for every cell. O(cells * points).
    Naive,
}

/// Bins points into grid cells and averages their heights.
pub struct GridAggregator {
    grid: GridSpec,
    strategy: AggregationStrategy,
}

impl GridAggregator {
    /// Create an aggregator for an already validated grid
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            strategy: AggregationStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: AggregationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Consume the point set and produce the height field.
    ///
    /// A cell averages every point inside its closed interval on both axes, so a point
    /// lying exactly on a shared boundary contributes to each neighbouring cell.
    pub fn aggregate(&self, points: PointSet) -> Result<HeightField> {
        let (rows, cols) = self.grid.shape();
        info!(
            points = points.len(),
            rows,
            cols,
            strategy = ?self.strategy,
            "Aggregating height field"
        );

        let cells = match self.strategy {
            AggregationStrategy::Indexed => self.indexed_cells(points.as_slice()),
            AggregationStrategy::Naive => self.naive_cells(points.as_slice()),
        };

        let (values, counts): (Vec<f64>, Vec<usize>) = cells.into_iter().unzip();
        let values = Array2::from_shape_vec((rows, cols), values)?;
        let counts = Array2::from_shape_vec((rows, cols), counts)?;
        let field = HeightField::new(self.grid.clone(), values, counts);

        match field.z_range() {
            Some((lo, hi)) => info!(
                filled = field.filled_cells(),
                empty = self.grid.cell_count() - field.filled_cells(),
                z_min = lo,
                z_max = hi,
                "Height field ready"
            ),
            None => info!(cells = self.grid.cell_count(), "Height field has no data"),
        }
        Ok(field)
    }

    /// Counting sort of point indices by cell, then a parallel mean per bucket.
    fn indexed_cells(&self, points: &[Point]) -> Vec<(f64, usize)> {
        let cell_count = self.grid.cell_count();

        // Each point touches one cell, or several when it sits on a boundary.
        let memberships: Vec<(usize, usize)> = points
            .iter()
            .enumerate()
            .flat_map(|(idx, p)| {
                let ys = self.grid.y_cells(p.y);
                self.grid
                    .x_cells(p.x)
                    .flat_map(move |i| ys.clone().map(move |j| (i, j)))
                    .map(move |(i, j)| (self.grid.cell_index(i, j), idx))
            })
            .collect();
        debug!(
            memberships = memberships.len(),
            points = points.len(),
            "Cell memberships computed"
        );

        let mut offsets = vec![0usize; cell_count + 1];
        for &(cell, _) in &memberships {
            offsets[cell + 1] += 1;
        }
        for c in 0..cell_count {
            offsets[c + 1] += offsets[c];
        }

        // Filling in membership order keeps each bucket in input order.
        let mut cursor = offsets.clone();
        let mut bucketed = vec![0usize; memberships.len()];
        for &(cell, idx) in &memberships {
            bucketed[cursor[cell]] = idx;
            cursor[cell] += 1;
        }

        let pb = progress_bar(cell_count as u64, "cells", "Averaging cells");
        let cells = (0..cell_count)
            .into_par_iter()
            .map(|cell| {
                let bucket = &bucketed[offsets[cell]..offsets[cell + 1]];
                let result = mean_z(bucket.iter().map(|&idx| points[idx].z));
                pb.inc(1);
                result
            })
            .collect();
        pb.finish_with_message("Cells averaged");
        cells
    }

    /// Direct double loop over cells and points.
    fn naive_cells(&self, points: &[Point]) -> Vec<(f64, usize)> {
        let xb = self.grid.x_boundaries();
        let yb = self.grid.y_boundaries();
        let (rows, cols) = self.grid.shape();

        let pb = progress_bar(self.grid.cell_count() as u64, "cells", "Averaging cells");
        let cells = (0..rows)
            .into_par_iter()
            .flat_map_iter(|i| {
                let pb = &pb;
                (0..cols).map(move |j| {
                    let (lbx, ubx) = (xb[i], xb[i + 1]);
                    let (lby, uby) = (yb[j], yb[j + 1]);
                    let result = mean_z(
                        points
                            .iter()
                            .filter(|p| between(p.x, lbx, ubx) && between(p.y, lby, uby))
                            .map(|p| p.z),
                    );
                    pb.inc(1);
                    result
                })
            })
            .collect();
        pb.finish_with_message("Cells averaged");
        cells
    }
}

/// Inclusive interval test on both ends
fn between(v: f64, lower: f64, upper: f64) -> bool {
    v >= lower && v <= upper
}

/// Sequential sum in iteration order divided by count; no-data when empty
fn mean_z(zs: impl Iterator<Item = f64>) -> (f64, usize) {
    let (sum, count) = zs.fold((0.0f64, 0usize), |(sum, count), z| (sum + z, count + 1));
    if count == 0 {
        (NO_DATA, 0)
    } else {
        (sum / count as f64, count)
    }
}
