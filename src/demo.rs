//! Demo shell: run trigger, status text and chart ownership.
//!
//! A [`Demo`] holds at most one live chart and at most one active clustering
//! run. Every [`start`](Demo::start) or [`reset`](Demo::reset) destroys the
//! current chart and bumps the run generation, so [`RunToken`]s handed out for
//! earlier runs turn into no-ops when their timers fire.
//!
//! ```rust
//! use plotmeans::demo::{Algorithm, Demo, DemoConfig, Tick, STATUS_KMEANS_DONE};
//! use plotmeans::classify::NearestMeanTrainer;
//! use plotmeans::render::{FnRenderer, Scatter};
//!
//! let renderer = FnRenderer::new(|_: &Scatter| {});
//! let mut demo = Demo::new(renderer, NearestMeanTrainer, DemoConfig::new().with_seed(1));
//!
//! let token = demo.start(Algorithm::KMeans)?;
//! while let Tick::Again(_delay) = demo.tick(token) {}
//! assert_eq!(demo.status(), STATUS_KMEANS_DONE);
//! # Ok::<(), plotmeans::Error>(())
//! ```

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use rand::prelude::*;
use tracing::{debug, info};

use crate::classify::{predict_all, Trainer};
use crate::cluster::{Kmeans, KmeansEngine, Step, DEFAULT_CLUSTERS, DEFAULT_POINTS, DEFAULT_ROUNDS};
use crate::error::{Error, Result};
use crate::generate::labeled_points;
use crate::metrics::accuracy;
use crate::render::{Renderer, Scatter};

/// Status shown while no run has produced a result.
pub const STATUS_IDLE: &str = "Output will appear here...";
/// Status after the final clustering round.
pub const STATUS_KMEANS_DONE: &str = "K-Means clustering completed!";
/// Status after classification training.
pub const STATUS_CLASSIFY_DONE: &str = "Classification training completed!";

/// Pause between clustering rounds unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);
/// Labelled samples per classification run unless configured otherwise.
pub const DEFAULT_SAMPLES: usize = 100;

/// Algorithm picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Animated K-means clustering.
    KMeans,
    /// One-shot binary classification.
    Classification,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::KMeans => write!(f, "kmeans"),
            Algorithm::Classification => write!(f, "classification"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(Algorithm::KMeans),
            "classification" | "svm" => Ok(Algorithm::Classification),
            _ => Err(Error::InvalidParameter {
                name: "algorithm",
                message: "expected 'kmeans' or 'classification'",
            }),
        }
    }
}

/// Identifies one run. Tokens from older runs are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    /// Run generation this token belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What the caller should do after a [`Demo::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Call `tick` again with the same token after this delay.
    Again(Duration),
    /// The run is complete.
    Done,
    /// The token belongs to an earlier run; nothing happened.
    Stale,
}

/// Demo parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Points per clustering run.
    pub points: usize,
    /// Clusters per clustering run.
    pub clusters: usize,
    /// Rounds per clustering run.
    pub rounds: usize,
    /// Pause between rounds.
    pub delay: Duration,
    /// Labelled samples per classification run.
    pub samples: usize,
    /// Seed for all random data; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl DemoConfig {
    /// Default parameters.
    pub fn new() -> Self {
        Self {
            points: DEFAULT_POINTS,
            clusters: DEFAULT_CLUSTERS,
            rounds: DEFAULT_ROUNDS,
            delay: DEFAULT_DELAY,
            samples: DEFAULT_SAMPLES,
            seed: None,
        }
    }

    /// Set points per clustering run.
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Set clusters per clustering run.
    pub fn with_clusters(mut self, clusters: usize) -> Self {
        self.clusters = clusters;
        self
    }

    /// Set rounds per clustering run.
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Set the pause between rounds.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set labelled samples per classification run.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn kmeans(&self) -> Kmeans {
        Kmeans::new(self.clusters)
            .with_points(self.points)
            .with_rounds(self.rounds)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The demo shell.
pub struct Demo<R: Renderer, T> {
    renderer: R,
    trainer: T,
    config: DemoConfig,
    rng: Box<dyn RngCore>,
    chart: Option<R::Chart>,
    status: String,
    generation: u64,
    engine: Option<KmeansEngine>,
}

impl<R: Renderer, T: Trainer> Demo<R, T> {
    /// Create an idle demo.
    pub fn new(renderer: R, trainer: T, config: DemoConfig) -> Self {
        let rng: Box<dyn RngCore> = match config.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        Self {
            renderer,
            trainer,
            config,
            rng,
            chart: None,
            status: STATUS_IDLE.to_string(),
            generation: 0,
            engine: None,
        }
    }

    /// Replace the random source.
    pub fn with_rng<G: RngCore + 'static>(mut self, rng: G) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Current status text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Parameters.
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The live chart, if a frame has been drawn since the last reset.
    pub fn chart(&self) -> Option<&R::Chart> {
        self.chart.as_ref()
    }

    /// Active clustering engine.
    pub fn engine(&self) -> Option<&KmeansEngine> {
        self.engine.as_ref()
    }

    /// Token for the current run generation.
    pub fn current_token(&self) -> RunToken {
        RunToken {
            generation: self.generation,
        }
    }

    /// Whether a clustering run still has rounds to go.
    pub fn is_running(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| !e.is_finished())
    }

    /// Destroy the chart, drop the active run and invalidate outstanding tokens.
    pub fn reset(&mut self) {
        if let Some(chart) = self.chart.take() {
            self.renderer.destroy(chart);
        }
        self.engine = None;
        self.generation += 1;
        self.status = STATUS_IDLE.to_string();
    }

    /// Reset, then start `algorithm`.
    ///
    /// Clustering only prepares the run; rounds happen on [`tick`](Self::tick).
    /// Classification trains and draws before returning.
    pub fn start(&mut self, algorithm: Algorithm) -> Result<RunToken> {
        self.reset();
        let token = self.current_token();
        info!(%algorithm, generation = token.generation, "starting run");

        match algorithm {
            Algorithm::KMeans => {
                let engine = self.config.kmeans().engine(&mut self.rng)?;
                self.engine = Some(engine);
            }
            Algorithm::Classification => self.classify()?,
        }
        Ok(token)
    }

    /// Advance the run identified by `token` by one round.
    pub fn tick(&mut self, token: RunToken) -> Tick {
        if token.generation != self.generation {
            debug!(
                stale = token.generation,
                current = self.generation,
                "dropping tick from earlier run"
            );
            return Tick::Stale;
        }

        let step = match self.engine.as_mut() {
            Some(engine) => engine.step(),
            None => return Tick::Done,
        };

        match step {
            Step::Round(snapshot) => {
                self.draw(&Scatter::clusters(&snapshot));
                Tick::Again(self.config.delay)
            }
            Step::Finished(snapshot) => {
                self.draw(&Scatter::clusters(&snapshot));
                self.status = STATUS_KMEANS_DONE.to_string();
                info!(
                    rounds = snapshot.round,
                    wcss = snapshot.wcss,
                    "k-means clustering completed"
                );
                Tick::Done
            }
            Step::Idle => Tick::Done,
        }
    }

    fn classify(&mut self) -> Result<()> {
        let data = labeled_points(&mut self.rng, self.config.samples);
        let model = self.trainer.fit(&data)?;

        let truth: Vec<usize> = data.iter().map(|d| d.label).collect();
        let acc = accuracy(&predict_all(&model, &data), &truth);

        self.draw(&Scatter::classes(&data));
        self.status = STATUS_CLASSIFY_DONE.to_string();
        info!(samples = data.len(), accuracy = acc, "classification training completed");
        Ok(())
    }

    fn draw(&mut self, scatter: &Scatter) {
        if let Some(chart) = self.chart.as_mut() {
            self.renderer.update(chart, scatter);
            return;
        }
        self.chart = Some(self.renderer.create(scatter));
    }
}

impl<R: Renderer, T> Drop for Demo<R, T> {
    fn drop(&mut self) {
        if let Some(chart) = self.chart.take() {
            self.renderer.destroy(chart);
        }
    }
}
