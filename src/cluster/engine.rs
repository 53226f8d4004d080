//! Step-driven Lloyd iteration.
//!
//! [`KmeansEngine`] owns a [`ClusterState`] and advances it one round per
//! [`step`](KmeansEngine::step) call:
//!
//! 1. **Assign**: each point goes to the nearest centroid (Euclidean distance,
//!    lowest index wins ties).
//! 2. **Update**: each non-empty cluster's centroid moves to the mean of its
//!    members. Empty clusters keep their centroid.
//! 3. **Publish**: the round returns an owned [`Snapshot`].
//!
//! The round that reaches the bound returns [`Step::Finished`]; after that,
//! `step` is a no-op returning [`Step::Idle`]. The engine has no notion of time:
//! a timer, a UI loop, or a test calls `step` whenever it likes.
//!
//! ```rust
//! use plotmeans::cluster::{ClusterState, KmeansEngine, Step};
//! use plotmeans::Point;
//!
//! let state = ClusterState::from_parts(
//!     vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(9.0, 9.0), Point::new(9.0, 8.0)],
//!     vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)],
//! )?;
//! let mut engine = KmeansEngine::new(state, 2)?;
//!
//! let Step::Round(first) = engine.step() else { unreachable!() };
//! assert_eq!(first.assignment, vec![0, 0, 1, 1]);
//! assert_eq!(first.centroids[0], Point::new(0.0, 0.5));
//!
//! assert!(engine.step().is_finished());
//! assert_eq!(engine.step(), Step::Idle);
//! # Ok::<(), plotmeans::Error>(())
//! ```

use tracing::debug;

use super::state::ClusterState;
use crate::error::{Error, Result};
use crate::metrics::wcss;
use crate::point::Point;

/// Rounds per run unless configured otherwise.
pub const DEFAULT_ROUNDS: usize = 10;

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has run; every point is unassigned.
    Ready,
    /// At least one round has run and the bound is not reached.
    Running,
    /// The final round has run.
    Finished,
}

/// Immutable view of the state after a round.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 1-based number of the round that produced this snapshot.
    pub round: usize,
    /// Points in generation order.
    pub points: Vec<Point>,
    /// Cluster index per point.
    pub assignment: Vec<usize>,
    /// Centroids after the update step.
    pub centroids: Vec<Point>,
    /// Points whose cluster changed during this round's assignment step.
    pub reassigned: usize,
    /// Within-cluster sum of squares against the updated centroids.
    pub wcss: f64,
}

impl Snapshot {
    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Points grouped by cluster index.
    pub fn groups(&self) -> Vec<Vec<Point>> {
        let mut groups = vec![Vec::new(); self.centroids.len()];
        for (p, &k) in self.points.iter().zip(&self.assignment) {
            if let Some(group) = groups.get_mut(k) {
                group.push(*p);
            }
        }
        groups
    }
}

/// Outcome of one [`KmeansEngine::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A round ran and more remain.
    Round(Snapshot),
    /// The final round ran; the run is complete.
    Finished(Snapshot),
    /// The run was already complete; nothing changed.
    Idle,
}

impl Step {
    /// Snapshot published by this step, if a round ran.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Step::Round(s) | Step::Finished(s) => Some(s),
            Step::Idle => None,
        }
    }

    /// Whether this step completed the run.
    pub fn is_finished(&self) -> bool {
        matches!(self, Step::Finished(_))
    }
}

/// Index of the centroid nearest to `point`; the first minimum wins.
///
/// Returns `None` when `centroids` is empty.
pub fn nearest_centroid(point: &Point, centroids: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (k, c) in centroids.iter().enumerate() {
        let dist = point.distance(c);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((k, dist)),
        }
    }
    best.map(|(k, _)| k)
}

/// Bounded Lloyd iteration over a [`ClusterState`].
#[derive(Debug, Clone)]
pub struct KmeansEngine {
    state: ClusterState,
    round: usize,
    max_rounds: usize,
    phase: Phase,
}

impl KmeansEngine {
    /// Wrap `state` in an engine that runs exactly `max_rounds` rounds.
    pub fn new(state: ClusterState, max_rounds: usize) -> Result<Self> {
        if max_rounds == 0 {
            return Err(Error::InvalidParameter {
                name: "max_rounds",
                message: "must be at least 1",
            });
        }
        Ok(Self {
            state,
            round: 0,
            max_rounds,
            phase: Phase::Ready,
        })
    }

    /// Current state.
    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    /// Consume the engine, returning its state.
    pub fn into_state(self) -> ClusterState {
        self.state
    }

    /// Rounds completed so far.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Round bound.
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the final round has run.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Run one round, or do nothing if the run is complete.
    pub fn step(&mut self) -> Step {
        if self.is_finished() {
            return Step::Idle;
        }

        let reassigned = self.assign_step();
        self.update_step();
        self.round += 1;

        let snapshot = self.snapshot(reassigned);
        debug!(
            round = snapshot.round,
            reassigned,
            wcss = snapshot.wcss,
            "k-means round"
        );

        if self.round >= self.max_rounds {
            self.phase = Phase::Finished;
            Step::Finished(snapshot)
        } else {
            self.phase = Phase::Running;
            Step::Round(snapshot)
        }
    }

    /// Step until finished, calling `on_round` with every published snapshot.
    ///
    /// Returns the final snapshot, or `None` if the engine had already finished.
    pub fn run_to_completion<F>(&mut self, mut on_round: F) -> Option<Snapshot>
    where
        F: FnMut(&Snapshot),
    {
        loop {
            match self.step() {
                Step::Round(s) => on_round(&s),
                Step::Finished(s) => {
                    on_round(&s);
                    return Some(s);
                }
                Step::Idle => return None,
            }
        }
    }

    /// Assignment step. Returns how many points changed cluster.
    pub fn assign_step(&mut self) -> usize {
        let (points, centroids, assignment) = self.state.parts_mut();
        let mut changed = 0;
        for (point, slot) in points.iter().zip(assignment.iter_mut()) {
            if let Some(best) = nearest_centroid(point, centroids) {
                if *slot != Some(best) {
                    changed += 1;
                }
                *slot = Some(best);
            }
        }
        changed
    }

    /// Update step: move every non-empty cluster's centroid to its members' mean.
    pub fn update_step(&mut self) {
        let (points, centroids, assignment) = self.state.parts_mut();
        let k = centroids.len();
        let mut sums = vec![(0.0f64, 0.0f64); k];
        let mut counts = vec![0usize; k];

        for (p, a) in points.iter().zip(assignment.iter()) {
            if let Some(c) = *a {
                sums[c].0 += p.x;
                sums[c].1 += p.y;
                counts[c] += 1;
            }
        }

        for (c, centroid) in centroids.iter_mut().enumerate() {
            // Empty cluster: keep the previous position.
            if counts[c] > 0 {
                let n = counts[c] as f64;
                *centroid = Point::new(sums[c].0 / n, sums[c].1 / n);
            }
        }
    }

    fn snapshot(&self, reassigned: usize) -> Snapshot {
        let assignment: Vec<usize> = self.state.assignment().iter().flatten().copied().collect();
        let points = self.state.points().to_vec();
        let centroids = self.state.centroids().to_vec();
        let wcss = wcss(&points, &centroids, &assignment);
        Snapshot {
            round: self.round,
            points,
            assignment,
            centroids,
            reassigned,
            wcss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn four_points() -> ClusterState {
        ClusterState::from_parts(
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(9.0, 9.0),
                Point::new(9.0, 8.0),
            ],
            vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_centroid_tie_goes_to_lowest_index() {
        let centroids = [Point::new(0.0, 0.0), Point::new(2.0, 0.0)];
        assert_eq!(nearest_centroid(&Point::new(1.0, 0.0), &centroids), Some(0));
        assert_eq!(nearest_centroid(&Point::new(1.5, 0.0), &centroids), Some(1));
        assert_eq!(nearest_centroid(&Point::new(1.0, 0.0), &[]), None);
    }

    #[test]
    fn test_first_round_known_scenario() {
        let mut engine = KmeansEngine::new(four_points(), DEFAULT_ROUNDS).unwrap();
        assert_eq!(engine.phase(), Phase::Ready);

        let step = engine.step();
        let snap = step.snapshot().unwrap();
        assert_eq!(snap.round, 1);
        assert_eq!(snap.assignment, vec![0, 0, 1, 1]);
        assert!((snap.centroids[0].x - 0.0).abs() < 1e-9);
        assert!((snap.centroids[0].y - 0.5).abs() < 1e-9);
        assert!((snap.centroids[1].x - 9.0).abs() < 1e-9);
        assert!((snap.centroids[1].y - 8.5).abs() < 1e-9);
        assert_eq!(snap.reassigned, 4);
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_fixed_point_after_first_round() {
        let mut engine = KmeansEngine::new(four_points(), DEFAULT_ROUNDS).unwrap();
        let first = engine.step().snapshot().cloned().unwrap();
        let second = engine.step().snapshot().cloned().unwrap();

        assert_eq!(first.assignment, second.assignment);
        assert_eq!(first.centroids, second.centroids);
        assert_eq!(second.reassigned, 0);
    }

    #[test]
    fn test_exactly_bound_rounds_then_idle() {
        let mut rng = StdRng::seed_from_u64(42);
        let state = ClusterState::initialize(50, 2, &mut rng).unwrap();
        let mut engine = KmeansEngine::new(state, DEFAULT_ROUNDS).unwrap();

        let mut published = 0;
        let mut finished = 0;
        for _ in 0..25 {
            match engine.step() {
                Step::Round(_) => published += 1,
                Step::Finished(_) => {
                    published += 1;
                    finished += 1;
                }
                Step::Idle => {}
            }
        }
        assert_eq!(published, 10);
        assert_eq!(finished, 1);
        assert_eq!(engine.round(), 10);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_empty_cluster_keeps_centroid() {
        let far = Point::new(9.5, 9.5);
        let state = ClusterState::from_parts(
            vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            vec![Point::new(1.5, 1.5), far],
        )
        .unwrap();
        let mut engine = KmeansEngine::new(state, 3).unwrap();
        let last = engine.run_to_completion(|s| assert_eq!(s.centroids[1], far));
        let last = last.unwrap();
        assert_eq!(last.assignment, vec![0, 0]);
        assert_eq!(last.centroids[1], far);
    }

    #[test]
    fn test_run_to_completion_counts_rounds() {
        let mut engine = KmeansEngine::new(four_points(), 4).unwrap();
        let mut rounds = Vec::new();
        let last = engine.run_to_completion(|s| rounds.push(s.round));
        assert_eq!(rounds, vec![1, 2, 3, 4]);
        assert_eq!(last.map(|s| s.round), Some(4));
        assert!(engine.run_to_completion(|_| panic!("no rounds after finish")).is_none());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(matches!(
            KmeansEngine::new(four_points(), 0),
            Err(Error::InvalidParameter {
                name: "max_rounds",
                ..
            })
        ));
    }

    #[test]
    fn test_snapshot_groups() {
        let mut engine = KmeansEngine::new(four_points(), 1).unwrap();
        let Step::Finished(snap) = engine.step() else {
            panic!("single-round engine should finish on first step");
        };
        let groups = snap.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(groups[1], vec![Point::new(9.0, 9.0), Point::new(9.0, 8.0)]);
    }
}
