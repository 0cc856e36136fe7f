/// Height field values addressed by coordinate, used for cross-section slicing
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Dimension names in storage order
pub const DIMS: [&str; 2] = ["x", "y"];

/// 2D field with coordinate labels for both axes.
#[derive(Debug, Clone)]
pub struct LabeledField {
    x: Array1<f64>,
    y: Array1<f64>,
    values: Array2<f64>,
}

/// Values along one axis at a fixed coordinate on the other.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Name of the fixed dimension.
    pub fixed_dim: &'static str,
    /// Coordinate the slice was taken at.
    pub location: f64,
    /// Coordinates along the free dimension.
    pub coords: Array1<f64>,
    pub values: Array1<f64>,
}

impl Profile {
    /// Legend text in `dim = value` form
    pub fn label(&self) -> String {
        format!("{} = {}", self.fixed_dim, self.location)
    }
}

impl LabeledField {
    pub fn new(x: Array1<f64>, y: Array1<f64>, values: Array2<f64>) -> Self {
        debug_assert_eq!(values.dim(), (x.len(), y.len()));
        Self { x, y, values }
    }

    pub fn dims(&self) -> [&'static str; 2] {
        DIMS
    }

    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Linearly interpolate along x, returning the profile over y
    pub fn interp_x(&self, x: f64) -> Profile {
        let values = interp_lanes(&self.x, x, |k| self.values.index_axis(Axis(0), k));
        Profile {
            fixed_dim: DIMS[0],
            location: x,
            coords: self.y.clone(),
            values,
        }
    }

    /// Linearly interpolate along y, returning the profile over x
    pub fn interp_y(&self, y: f64) -> Profile {
        let values = interp_lanes(&self.y, y, |k| self.values.index_axis(Axis(1), k));
        Profile {
            fixed_dim: DIMS[1],
            location: y,
            coords: self.x.clone(),
            values,
        }
    }
}

/// Interpolate whole lanes of the field at coordinate `v` on an ascending axis.
///
/// Outside the axis every entry is NaN. The bracketing pair is chosen by a left-sided
/// search, so an exact hit on node `k > 0` is computed from nodes `k - 1` and `k`, and
/// a hit on the first node from nodes 0 and 1. A NaN in either lane of the pair gives NaN.
fn interp_lanes<'a>(
    axis: &Array1<f64>,
    v: f64,
    lane: impl Fn(usize) -> ArrayView1<'a, f64>,
) -> Array1<f64> {
    let n = axis.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    let first = lane(0);
    if v.is_nan() || v < axis[0] || v > axis[n - 1] {
        return Array1::from_elem(first.len(), f64::NAN);
    }
    if n == 1 {
        return first.to_owned();
    }

    // first index with axis[k] >= v, clamped so both neighbours exist
    let hi = axis
        .as_slice()
        .map(|s| s.partition_point(|&a| a < v))
        .unwrap_or_else(|| axis.iter().take_while(|&&a| a < v).count())
        .clamp(1, n - 1);
    let lo = hi - 1;
    let (x0, x1) = (axis[lo], axis[hi]);
    lane(lo)
        .iter()
        .zip(lane(hi).iter())
        .map(|(&y0, &y1)| {
            let slope = (y1 - y0) / (x1 - x0);
            slope * (v - x0) + y0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn field() -> LabeledField {
        LabeledField::new(
            array![0.0, 1.0, 2.0],
            array![10.0, 20.0],
            array![[0.0, 10.0], [2.0, f64::NAN], [4.0, 30.0]],
        )
    }

    #[test]
    fn interpolates_between_nodes() {
        let profile = field().interp_x(0.5);
        assert_eq!(profile.values[0], 1.0);
        assert!(profile.values[1].is_nan());
        assert_eq!(profile.coords, array![10.0, 20.0]);
        assert_eq!(profile.label(), "x = 0.5");
    }

    #[test]
    fn exact_node_uses_left_neighbour() {
        let profile = field().interp_x(2.0);
        assert_eq!(profile.values[0], 4.0);
        assert!(profile.values[1].is_nan());

        let profile = field().interp_x(1.0);
        assert_eq!(profile.values[0], 2.0);
        assert!(profile.values[1].is_nan());
    }

    #[test]
    fn first_node_uses_right_neighbour() {
        let profile = field().interp_x(0.0);
        assert_eq!(profile.values[0], 0.0);
        assert!(profile.values[1].is_nan());
    }

    #[test]
    fn outside_axis_is_nan() {
        let profile = field().interp_x(-0.1);
        assert!(profile.values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn interp_along_y() {
        let profile = field().interp_y(15.0);
        assert_eq!(profile.values[0], 5.0);
        assert!(profile.values[1].is_nan());
        assert_eq!(profile.values[2], 17.0);
    }
}
