//! K-means clustering as an explicit, step-driven state machine.
//!
//! ## Pieces
//!
//! - [`ClusterState`]: points, centroids, per-point assignment.
//! - [`KmeansEngine`]: Lloyd's algorithm, one round per [`KmeansEngine::step`].
//! - [`Kmeans`]: configuration builder; one-shot [`Clustering::fit_predict`]
//!   or a fresh engine per run.
//!
//! ## Lloyd's Algorithm
//!
//! 1. **Assign**: each point goes to its nearest centroid
//! 2. **Update**: each centroid moves to the mean of its points
//! 3. Repeat for a fixed number of rounds
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Neither step can increase `J`, so the per-round WCSS reported in every
//! [`Snapshot`] is non-increasing.
//!
//! ## Empty clusters
//!
//! A centroid that loses all its points stays where it is. There is no
//! reseeding, so with random initial centroids a cluster may stay empty for
//! the rest of the run.
//!
//! ## Usage
//!
//! ```rust
//! use plotmeans::cluster::{Clustering, Kmeans};
//! use plotmeans::Point;
//!
//! let data = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.1, 0.1),
//!     Point::new(9.0, 9.0),
//!     Point::new(9.1, 9.1),
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(7).fit_predict(&data).unwrap();
//! assert_eq!(labels.len(), 4);
//! assert_eq!(labels[0], labels[1]);
//! ```

mod engine;
mod kmeans;
mod state;
mod traits;

pub use engine::{nearest_centroid, KmeansEngine, Phase, Snapshot, Step, DEFAULT_ROUNDS};
pub use kmeans::{Kmeans, DEFAULT_CLUSTERS, DEFAULT_POINTS};
pub use state::ClusterState;
pub use traits::Clustering;
