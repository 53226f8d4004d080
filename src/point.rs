//! 2-D coordinates shared by points, centroids and chart markers.

use core::fmt;

/// A 2-D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        self.squared_distance(other).sqrt()
    }

    /// Squared Euclidean distance to `other`.
    pub fn squared_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    /// Componentwise mean of `points`, or `None` if there are none.
    pub fn mean<'a, I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut count = 0usize;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        for p in points {
            sum_x += p.x;
            sum_y += p.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(sum_x / count as f64, sum_y / count as f64))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_345() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.squared_distance(&b), 25.0);
    }

    #[test]
    fn test_mean() {
        let pts = [Point::new(0.0, 0.0), Point::new(0.0, 1.0)];
        assert_eq!(Point::mean(&pts), Some(Point::new(0.0, 0.5)));
        assert_eq!(Point::mean(&[] as &[Point]), None);
    }
}
