//! Cluster state: points, centroids and the current assignment.
//!
//! The state is created fresh for every run and mutated in place by the
//! [`KmeansEngine`](super::KmeansEngine). Point and centroid counts never change
//! after construction, and every stored assignment is a valid centroid index.

use rand::Rng;

use crate::error::{Error, IndexKind, Result};
use crate::generate::{uniform_points, CLUSTER_RANGE};
use crate::point::Point;

/// Points, centroids and per-point cluster assignment for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterState {
    points: Vec<Point>,
    centroids: Vec<Point>,
    /// `None` until the first assignment step.
    assignment: Vec<Option<usize>>,
}

impl ClusterState {
    /// Draw `n` points and `k` centroids uniformly from `[0, 10)`.
    ///
    /// Fails fast when `n` or `k` is zero.
    pub fn initialize<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Result<Self> {
        check_sizes(n, k)?;
        let points = uniform_points(rng, n, CLUSTER_RANGE);
        let centroids = uniform_points(rng, k, CLUSTER_RANGE);
        Ok(Self::unchecked(points, centroids))
    }

    /// Build a state from explicit points and starting centroids.
    pub fn from_parts(points: Vec<Point>, centroids: Vec<Point>) -> Result<Self> {
        check_sizes(points.len(), centroids.len())?;
        Ok(Self::unchecked(points, centroids))
    }

    fn unchecked(points: Vec<Point>, centroids: Vec<Point>) -> Self {
        let assignment = vec![None; points.len()];
        Self {
            points,
            centroids,
            assignment,
        }
    }

    /// Number of points.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// All points in generation order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// All centroids by cluster index.
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// Per-point assignment, `None` where unassigned.
    pub fn assignment(&self) -> &[Option<usize>] {
        &self.assignment
    }

    /// Set the cluster of point `point`.
    pub fn assign(&mut self, point: usize, cluster: usize) -> Result<()> {
        self.check_point(point)?;
        self.check_cluster(cluster)?;
        self.assignment[point] = Some(cluster);
        Ok(())
    }

    /// The last cluster assigned to `point`, or `None` before round 1
    /// (or if `point` is out of range).
    pub fn assignment_of(&self, point: usize) -> Option<usize> {
        self.assignment.get(point).copied().flatten()
    }

    /// Centroid of cluster `i`.
    pub fn centroid_at(&self, i: usize) -> Option<Point> {
        self.centroids.get(i).copied()
    }

    /// Move the centroid of cluster `i`.
    pub fn set_centroid_at(&mut self, i: usize, coord: Point) -> Result<()> {
        self.check_cluster(i)?;
        self.centroids[i] = coord;
        Ok(())
    }

    /// Points currently assigned to cluster `i`.
    pub fn members(&self, i: usize) -> impl Iterator<Item = &Point> + '_ {
        self.points
            .iter()
            .zip(&self.assignment)
            .filter(move |(_, a)| **a == Some(i))
            .map(|(p, _)| p)
    }

    /// Whether every point has a cluster.
    pub fn is_fully_assigned(&self) -> bool {
        self.assignment.iter().all(Option::is_some)
    }

    /// Split borrow for the engine: points read-only, centroids and assignment mutable.
    pub(super) fn parts_mut(&mut self) -> (&[Point], &mut [Point], &mut [Option<usize>]) {
        (&self.points, &mut self.centroids, &mut self.assignment)
    }

    fn check_point(&self, index: usize) -> Result<()> {
        if index >= self.points.len() {
            return Err(Error::IndexOutOfRange {
                kind: IndexKind::Point,
                index,
                len: self.points.len(),
            });
        }
        Ok(())
    }

    fn check_cluster(&self, index: usize) -> Result<()> {
        if index >= self.centroids.len() {
            return Err(Error::IndexOutOfRange {
                kind: IndexKind::Cluster,
                index,
                len: self.centroids.len(),
            });
        }
        Ok(())
    }
}

fn check_sizes(n: usize, k: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidParameter {
            name: "n",
            message: "at least one point is required",
        });
    }
    if k == 0 {
        return Err(Error::InvalidParameter {
            name: "k",
            message: "at least one cluster is required",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_initialize_sizes_and_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = ClusterState::initialize(50, 2, &mut rng).unwrap();

        assert_eq!(state.n_points(), 50);
        assert_eq!(state.n_clusters(), 2);
        for p in state.points().iter().chain(state.centroids()) {
            assert!((0.0..10.0).contains(&p.x));
            assert!((0.0..10.0).contains(&p.y));
        }
        assert!(state.assignment().iter().all(Option::is_none));
    }

    #[test]
    fn test_initialize_deterministic_with_seed() {
        let a = ClusterState::initialize(20, 3, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = ClusterState::initialize(20, 3, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_initialize_rejects_zero_sizes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            ClusterState::initialize(0, 2, &mut rng),
            Err(Error::InvalidParameter { name: "n", .. })
        ));
        assert!(matches!(
            ClusterState::initialize(10, 0, &mut rng),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_assign_and_lookup() {
        let mut state = ClusterState::from_parts(
            vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
        )
        .unwrap();

        assert_eq!(state.assignment_of(0), None);
        state.assign(0, 1).unwrap();
        assert_eq!(state.assignment_of(0), Some(1));
        assert!(!state.is_fully_assigned());

        state.assign(1, 1).unwrap();
        assert!(state.is_fully_assigned());
        assert_eq!(state.members(1).count(), 2);
        assert_eq!(state.members(0).count(), 0);
    }

    #[test]
    fn test_assign_out_of_range() {
        let mut state =
            ClusterState::from_parts(vec![Point::new(1.0, 1.0)], vec![Point::default()]).unwrap();

        assert_eq!(
            state.assign(0, 1),
            Err(Error::IndexOutOfRange {
                kind: IndexKind::Cluster,
                index: 1,
                len: 1,
            })
        );
        assert!(matches!(
            state.assign(4, 0),
            Err(Error::IndexOutOfRange {
                kind: IndexKind::Point,
                ..
            })
        ));
        // failed assignment leaves the state untouched
        assert_eq!(state.assignment_of(0), None);
    }

    #[test]
    fn test_centroid_read_write() {
        let mut state =
            ClusterState::from_parts(vec![Point::new(1.0, 1.0)], vec![Point::default()]).unwrap();
        state.set_centroid_at(0, Point::new(3.0, 4.0)).unwrap();
        assert_eq!(state.centroid_at(0), Some(Point::new(3.0, 4.0)));
        assert_eq!(state.centroid_at(1), None);
        assert!(state.set_centroid_at(1, Point::default()).is_err());
    }
}
