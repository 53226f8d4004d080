//! Quality measures for clustering rounds and classification results.
//!
//! | Metric | Range | Best | Used for |
//! |--------|-------|------|----------|
//! | [`wcss`] | [0, ∞) | 0 | K-means objective, logged per round |
//! | [`accuracy`] | [0, 1] | 1 | Training-set accuracy of a classifier |
//!
//! # Example
//!
//! ```rust
//! use plotmeans::metrics::{accuracy, cluster_sizes};
//!
//! assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]), 0.75);
//! assert_eq!(cluster_sizes(&[0, 0, 1], 3), vec![2, 1, 0]);
//! ```

use crate::point::Point;

/// Within-cluster sum of squares.
///
/// ```text
/// WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
/// ```
///
/// Points whose label is not a valid centroid index contribute nothing.
pub fn wcss(points: &[Point], centroids: &[Point], labels: &[usize]) -> f64 {
    points
        .iter()
        .zip(labels)
        .filter_map(|(p, &k)| centroids.get(k).map(|c| p.squared_distance(c)))
        .sum()
}

/// Number of members per cluster index in `0..k`.
///
/// Labels `>= k` are ignored.
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &label in labels {
        if let Some(slot) = sizes.get_mut(label) {
            *slot += 1;
        }
    }
    sizes
}

/// Fraction of positions where `pred` equals `truth`.
///
/// Returns 0.0 for empty or mismatched inputs.
pub fn accuracy(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let hits = pred.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / pred.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wcss_zero_at_members() {
        let pts = [Point::new(1.0, 1.0), Point::new(4.0, 4.0)];
        assert_eq!(wcss(&pts, &pts, &[0, 1]), 0.0);
    }

    #[test]
    fn test_wcss_known_value() {
        let pts = [Point::new(0.0, 0.0), Point::new(0.0, 1.0)];
        let centroids = [Point::new(0.0, 0.5)];
        assert!((wcss(&pts, &centroids, &[0, 0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_wcss_ignores_bad_labels() {
        let pts = [Point::new(3.0, 4.0)];
        assert_eq!(wcss(&pts, &[Point::default()], &[7]), 0.0);
    }

    #[test]
    fn test_cluster_sizes() {
        assert_eq!(cluster_sizes(&[1, 1, 0, 5], 2), vec![1, 2]);
    }

    #[test]
    fn test_accuracy_edge_cases() {
        assert_eq!(accuracy(&[], &[]), 0.0);
        assert_eq!(accuracy(&[0], &[0, 1]), 0.0);
        assert_eq!(accuracy(&[1, 1], &[1, 1]), 1.0);
    }
}
