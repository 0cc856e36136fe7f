/// Region of interest filtering and point cloud extent tracking
use crate::error::{Result, TerrainError};
use crate::point::Point;
use constants::region::{DEFAULT_X_MAX, DEFAULT_X_MIN, DEFAULT_Y_MAX, DEFAULT_Y_MIN};
use serde::{Deserialize, Serialize};

/// Axis-aligned analysis window in the xy plane.
/// Membership is strict on every edge; the grid spans the closed rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            min_x: DEFAULT_X_MIN,
            max_x: DEFAULT_X_MAX,
            min_y: DEFAULT_Y_MIN,
            max_y: DEFAULT_Y_MAX,
        }
    }
}

impl Region {
    /// Create a region, rejecting non-finite or unordered bounds
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        let region = Self {
            min_x,
            max_x,
            min_y,
            max_y,
        };
        region.validate()?;
        Ok(region)
    }

    /// Check bounds are finite and strictly ordered
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(TerrainError::invalid_region(format!(
                "bounds must be finite, got {:?}",
                self
            )));
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(TerrainError::invalid_region(format!(
                "expected min < max on both axes, got x ({}, {}) y ({}, {})",
                self.min_x, self.max_x, self.min_y, self.max_y
            )));
        }
        Ok(())
    }

    /// Strict containment test used by the loader filter
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Midpoint of the x range, origin for cross-section offsets
    pub fn center_x(&self) -> f64 {
        (self.min_x + self.max_x) / 2.0
    }
}

/// Smallest box holding every point seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    min: [f64; 3],
    max: [f64; 3],
}

impl Default for Extents {
    fn default() -> Self {
        Self::empty()
    }
}

impl Extents {
    /// Inverted box that any point will replace
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn include(&mut self, point: &Point) {
        for (k, v) in [point.x, point.y, point.z].into_iter().enumerate() {
            self.min[k] = self.min[k].min(v);
            self.max[k] = self.max[k].max(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0]
    }

    /// `(min, max)` along axis 0 (x), 1 (y) or 2 (z)
    pub fn axis(&self, k: usize) -> (f64, f64) {
        (self.min[k], self.max[k])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_excludes_edges() {
        let region = Region::default();
        assert!(region.contains(0.0, 0.5));
        assert!(!region.contains(0.5, 0.5));
        assert!(!region.contains(-0.4, 0.5));
        assert!(!region.contains(0.0, 0.0));
        assert!(!region.contains(0.0, 1.0));
    }

    #[test]
    fn rejects_unordered_region() {
        assert!(Region::new(0.4, -0.4, 0.0, 1.0).is_err());
        assert!(Region::new(-0.4, 0.4, 1.0, 1.0).is_err());
        assert!(Region::new(f64::NAN, 0.4, 0.0, 1.0).is_err());
    }

    #[test]
    fn extents_grow_with_points() {
        let mut extents = Extents::empty();
        assert!(extents.is_empty());
        extents.include(&Point::new(0.1, 0.2, -1.0));
        extents.include(&Point::new(-0.3, 0.9, 2.0));
        assert!(!extents.is_empty());
        assert_eq!(extents.axis(0), (-0.3, 0.1));
        assert_eq!(extents.axis(1), (0.2, 0.9));
        assert_eq!(extents.axis(2), (-1.0, 2.0));
    }
}
