//! Batch K-means on top of the step engine.
//!
//! [`Kmeans`] is the configuration builder used both by one-shot callers
//! (through [`Clustering::fit_predict`]) and by the demo shell, which asks it
//! for a fresh [`KmeansEngine`] at the start of every run.
//!
//! Initial centroids are drawn uniformly from `[0, 10)` rather than sampled
//! from the data, so a centroid can start far from every point and stay
//! frozen for the whole run.

use rand::prelude::*;

use super::engine::{KmeansEngine, DEFAULT_ROUNDS};
use super::state::ClusterState;
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::generate::{uniform_points, CLUSTER_RANGE};
use crate::point::Point;

/// Points generated per clustering run unless configured otherwise.
pub const DEFAULT_POINTS: usize = 50;

/// Clusters per run unless configured otherwise.
pub const DEFAULT_CLUSTERS: usize = 2;

/// K-means configuration.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Points generated by [`Kmeans::engine`].
    n_points: usize,
    /// Rounds per run.
    rounds: usize,
    /// Random seed.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new K-means configuration with `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_points: DEFAULT_POINTS,
            rounds: DEFAULT_ROUNDS,
            seed: None,
        }
    }

    /// Set the number of generated points.
    pub fn with_points(mut self, n: usize) -> Self {
        self.n_points = n;
        self
    }

    /// Set the number of rounds.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rounds per run.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Generate a fresh point set and centroids from `rng` and wrap them in an engine.
    pub fn engine<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<KmeansEngine> {
        let state = ClusterState::initialize(self.n_points, self.k, rng)?;
        KmeansEngine::new(state, self.rounds)
    }

    /// Engine over caller-supplied points with random initial centroids.
    pub fn engine_for<R: Rng + ?Sized>(&self, data: &[Point], rng: &mut R) -> Result<KmeansEngine> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let state = ClusterState::from_parts(data.to_vec(), self.random_centroids(rng)?)?;
        KmeansEngine::new(state, self.rounds)
    }

    fn random_centroids<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Point>> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "at least one cluster is required",
            });
        }
        Ok(uniform_points(rng, self.k, CLUSTER_RANGE))
    }

    fn rng(&self) -> Box<dyn RngCore> {
        match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        }
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(DEFAULT_CLUSTERS)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Point]) -> Result<Vec<usize>> {
        let mut rng = self.rng();
        let mut engine = self.engine_for(data, &mut rng)?;
        let last = engine.run_to_completion(|_| {});
        Ok(last.map(|s| s.assignment).unwrap_or_default())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(0.1, 0.1),
            Point::new(0.2, 0.0),
            Point::new(9.8, 9.9),
            Point::new(9.9, 9.8),
            Point::new(9.7, 9.7),
        ]
    }

    #[test]
    fn test_kmeans_all_points_assigned() {
        let data: Vec<Point> = (0..50)
            .map(|i| Point::new(i as f64 * 0.1, (i % 5) as f64))
            .collect();

        let kmeans = Kmeans::new(5).with_seed(123);
        let labels = kmeans.fit_predict(&data).unwrap();

        assert_eq!(labels.len(), data.len());
        for &label in &labels {
            assert!(label < 5, "label {} out of range", label);
        }
    }

    #[test]
    fn test_kmeans_deterministic_with_seed() {
        let kmeans1 = Kmeans::new(2).with_seed(42);
        let kmeans2 = Kmeans::new(2).with_seed(42);

        let labels1 = kmeans1.fit_predict(&two_blobs()).unwrap();
        let labels2 = kmeans2.fit_predict(&two_blobs()).unwrap();

        assert_eq!(labels1, labels2, "same seed should give same result");
    }

    #[test]
    fn test_kmeans_blob_members_agree() {
        // Tight blobs never end split, even when one centroid starts empty.
        for seed in 0..20 {
            let labels = Kmeans::new(2).with_seed(seed).fit_predict(&two_blobs()).unwrap();
            assert_eq!(labels[0], labels[1]);
            assert_eq!(labels[0], labels[2]);
            assert_eq!(labels[3], labels[4]);
            assert_eq!(labels[3], labels[5]);
        }
    }

    #[test]
    fn test_kmeans_empty_input_error() {
        let result = Kmeans::new(2).fit_predict(&[]);
        assert_eq!(result, Err(Error::EmptyInput));
    }

    #[test]
    fn test_kmeans_zero_clusters_error() {
        let result = Kmeans::new(0).fit_predict(&two_blobs());
        assert!(matches!(result, Err(Error::InvalidParameter { name: "k", .. })));
    }

    #[test]
    fn test_engine_uses_configured_sizes() {
        let mut rng = StdRng::seed_from_u64(5);
        let engine = Kmeans::new(3)
            .with_points(12)
            .with_rounds(4)
            .engine(&mut rng)
            .unwrap();
        assert_eq!(engine.state().n_points(), 12);
        assert_eq!(engine.state().n_clusters(), 3);
        assert_eq!(engine.max_rounds(), 4);
        assert_eq!(Kmeans::default().n_clusters(), 2);
    }
}
