//! Random point and label generation.
//!
//! Pure functions of the random source they are given: a seeded `StdRng`
//! reproduces the same data set, `rand::rng()` gives a fresh one.

use core::ops::Range;

use rand::Rng;

use crate::point::Point;

/// Coordinate range used for clustering runs.
pub const CLUSTER_RANGE: Range<f64> = 0.0..10.0;

/// Coordinate range used for classification samples.
pub const UNIT_RANGE: Range<f64> = 0.0..1.0;

/// A point carrying a binary class label (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledPoint {
    /// Position.
    pub point: Point,
    /// Class label, 0 or 1.
    pub label: usize,
}

/// `n` points with each coordinate drawn independently and uniformly from `range`.
pub fn uniform_points<R: Rng + ?Sized>(rng: &mut R, n: usize, range: Range<f64>) -> Vec<Point> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(range.clone());
            let y = rng.random_range(range.clone());
            Point::new(x, y)
        })
        .collect()
}

/// `n` points uniform in the unit square, labelled 1 when an independent
/// uniform draw exceeds 0.5.
pub fn labeled_points<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<LabeledPoint> {
    (0..n)
        .map(|_| {
            let x = rng.random_range(UNIT_RANGE);
            let y = rng.random_range(UNIT_RANGE);
            let label = usize::from(rng.random::<f64>() > 0.5);
            LabeledPoint {
                point: Point::new(x, y),
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_points_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts = uniform_points(&mut rng, 500, CLUSTER_RANGE);
        assert_eq!(pts.len(), 500);
        for p in &pts {
            assert!((0.0..10.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((0.0..10.0).contains(&p.y), "y out of range: {}", p.y);
        }
    }

    #[test]
    fn test_uniform_points_deterministic_with_seed() {
        let a = uniform_points(&mut StdRng::seed_from_u64(42), 10, CLUSTER_RANGE);
        let b = uniform_points(&mut StdRng::seed_from_u64(42), 10, CLUSTER_RANGE);
        assert_eq!(a, b, "same seed should give same points");
    }

    #[test]
    fn test_labeled_points_binary_labels() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = labeled_points(&mut rng, 200);
        assert_eq!(data.len(), 200);
        assert!(data.iter().all(|d| d.label <= 1));
        assert!(data.iter().all(|d| UNIT_RANGE.contains(&d.point.x)));
        // 200 fair draws: both classes show up
        assert!(data.iter().any(|d| d.label == 0));
        assert!(data.iter().any(|d| d.label == 1));
    }

    #[test]
    fn test_zero_points() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(uniform_points(&mut rng, 0, CLUSTER_RANGE).is_empty());
    }
}
