//! plotmeans CLI
//!
//! Runs one demo and draws every frame as an ASCII scatter plot on stdout.
//! Status lines and logs go to stderr.
//!
//! ```text
//! plotmeans --algorithm kmeans --seed 7 --delay-ms 250
//! plotmeans --algorithm classification -v
//! ```

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use plotmeans::classify::NearestMeanTrainer;
use plotmeans::demo::{Algorithm, Demo, DemoConfig};
use plotmeans::schedule::{drive, start_run, Scheduler};
use plotmeans::AsciiRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum AlgorithmArg {
    /// Animated K-means clustering.
    #[default]
    Kmeans,
    /// Binary classification of labelled points.
    Classification,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Kmeans => Algorithm::KMeans,
            AlgorithmArg::Classification => Algorithm::Classification,
        }
    }
}

/// Watch toy machine-learning algorithms on random 2-D points.
#[derive(Parser, Debug)]
#[command(name = "plotmeans")]
#[command(version)]
#[command(about = "Watch K-means converge on random 2-D points")]
struct Cli {
    /// Algorithm to run.
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Kmeans)]
    algorithm: AlgorithmArg,

    /// Points per clustering run.
    #[arg(long, default_value_t = 50)]
    points: usize,

    /// Number of clusters.
    #[arg(short = 'k', long, default_value_t = 2)]
    clusters: usize,

    /// Clustering rounds.
    #[arg(long, default_value_t = 10)]
    rounds: usize,

    /// Pause between rounds, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Labelled samples per classification run.
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Plot width in characters.
    #[arg(long, default_value_t = 60)]
    width: usize,

    /// Plot height in lines.
    #[arg(long, default_value_t = 20)]
    height: usize,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = DemoConfig::new()
        .with_points(cli.points)
        .with_clusters(cli.clusters)
        .with_rounds(cli.rounds)
        .with_delay(Duration::from_millis(cli.delay_ms))
        .with_samples(cli.samples);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let renderer = AsciiRenderer::new(io::stdout().lock())
        .with_width(cli.width)
        .with_height(cli.height);
    let mut demo = Demo::new(renderer, NearestMeanTrainer, config);
    eprintln!("{}", demo.status());

    let mut scheduler = Scheduler::new();
    if let Err(e) = start_run(&mut demo, &mut scheduler, cli.algorithm.into()) {
        error!(error = %e, "run failed to start");
        eprintln!("{}", demo.status());
        return ExitCode::FAILURE;
    }
    drive(&mut demo, &mut scheduler, std::thread::sleep);

    eprintln!("{}", demo.status());
    ExitCode::SUCCESS
}
