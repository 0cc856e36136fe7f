/// Default grid cell size in metres
pub const DEFAULT_CELL_SIZE: f64 = 0.01;

/// Minimum boundary count per axis; two boundaries bound a single cell
pub const MIN_BOUNDARIES: usize = 2;

/// Upper bound on grid cells; finer grids are rejected before any allocation
pub const MAX_CELLS: usize = 1 << 24;

/// No-data marker written to cells without samples
pub const NO_DATA: f64 = f64::NAN;
