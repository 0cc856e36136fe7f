/// Scan samples and the filtered set handed to the aggregator
use crate::bounds::Region;

/// Single scan sample; colour channels are not kept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Ordered points that all lie strictly inside one region.
#[derive(Debug, Clone)]
pub struct PointSet {
    region: Region,
    points: Vec<Point>,
}

impl PointSet {
    /// Empty set bound to a region
    pub fn new(region: Region) -> Self {
        Self {
            region,
            points: Vec::new(),
        }
    }

    /// Build a set keeping only points inside the region, in input order
    pub fn from_points(region: Region, points: impl IntoIterator<Item = Point>) -> Self {
        let mut set = Self::new(region);
        for point in points {
            set.push(point);
        }
        set
    }

    /// Add a point if it passes the region filter. Returns whether it was kept.
    pub fn push(&mut self, point: Point) -> bool {
        if self.region.contains(point.x, point.y) {
            self.points.push(point);
            true
        } else {
            false
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Arithmetic mean of z, NaN when empty
    pub fn mean_z(&self) -> f64 {
        if self.points.is_empty() {
            return f64::NAN;
        }
        self.points.iter().map(|p| p.z).sum::<f64>() / self.points.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_filters_outside_points() {
        let mut set = PointSet::new(Region::default());
        assert!(set.push(Point::new(0.1, 0.5, 1.0)));
        assert!(!set.push(Point::new(0.5, 0.5, 9.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.mean_z(), 1.0);
    }

    #[test]
    fn empty_set_mean_is_nan() {
        assert!(PointSet::new(Region::default()).mean_z().is_nan());
    }
}
