//! # plotmeans
//!
//! Step-driven K-means for animated scatter-plot demos.
//!
//! The core is [`cluster::KmeansEngine`]: an explicit state machine that runs
//! one Lloyd round (assign, update, publish) per `step()` call and stops after
//! a fixed number of rounds. Time never enters the engine. A [`demo::Demo`]
//! owns the chart handle and status text and turns run tokens into rounds,
//! and [`schedule::Scheduler`] paces those tokens on a virtual clock.
//!
//! Point generation, rendering and classification sit behind small seams
//! ([`generate`], [`render::Renderer`], [`classify::Trainer`]) so each run is
//! reproducible from a seed and testable without a screen.

pub mod classify;
pub mod cluster;
pub mod demo;
/// Error types used across `plotmeans`.
pub mod error;
pub mod generate;
pub mod metrics;
pub mod point;
pub mod render;
pub mod schedule;


pub use cluster::{ClusterState, Clustering, Kmeans, KmeansEngine, Snapshot, Step};
pub use demo::{Algorithm, Demo, DemoConfig, RunToken, Tick};
pub use error::{Error, Result};
pub use point::Point;
pub use render::{AsciiRenderer, Renderer, Scatter};
pub use schedule::Scheduler;
