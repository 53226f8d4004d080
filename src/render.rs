//! Renderer boundary: scatter descriptions and the [`Renderer`] trait.
//!
//! The core never inspects what a renderer does with a frame. It builds a
//! [`Scatter`] (named point series plus optional markers), and the renderer
//! creates, updates and finally destroys a chart handle it owns.
//!
//! [`Renderer::destroy`] takes the handle by value, so a released chart cannot
//! be drawn into again.

use core::fmt;
use std::io::{self, Write};

use tracing::warn;

use crate::cluster::Snapshot;
use crate::generate::LabeledPoint;
use crate::point::Point;

/// An RGBA colour, alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity.
    pub a: f32,
}

impl Rgba {
    /// Create a colour.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Translucent teal.
    pub const TEAL: Rgba = Rgba::new(75, 192, 192, 0.6);
    /// Translucent rose.
    pub const ROSE: Rgba = Rgba::new(255, 99, 132, 0.6);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Colours for cluster series, cycled when there are more clusters.
pub const CLUSTER_PALETTE: [Rgba; 2] = [Rgba::TEAL, Rgba::ROSE];

/// Colours for classes 0 and 1.
pub const CLASS_PALETTE: [Rgba; 2] = [Rgba::ROSE, Rgba::TEAL];

/// Marker radius used for centroids.
pub const CENTROID_RADIUS: f32 = 8.0;

/// A named group of points drawn in one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// Points in the group.
    pub points: Vec<Point>,
    /// Fill colour.
    pub color: Rgba,
}

/// Distinguished points drawn on top of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct Markers {
    /// Legend label.
    pub label: String,
    /// Marker positions.
    pub points: Vec<Point>,
    /// Fill colour.
    pub color: Rgba,
    /// Marker radius.
    pub radius: f32,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scatter {
    /// Point series, in legend order.
    pub series: Vec<Series>,
    /// Optional markers.
    pub markers: Option<Markers>,
}

impl Scatter {
    /// Frame for a clustering round: `Cluster 1..k` series and white `Centroids` markers.
    pub fn clusters(snapshot: &Snapshot) -> Self {
        let series = snapshot
            .groups()
            .into_iter()
            .enumerate()
            .map(|(i, points)| Series {
                label: format!("Cluster {}", i + 1),
                points,
                color: CLUSTER_PALETTE[i % CLUSTER_PALETTE.len()],
            })
            .collect();
        Self {
            series,
            markers: Some(Markers {
                label: "Centroids".to_string(),
                points: snapshot.centroids.clone(),
                color: Rgba::WHITE,
                radius: CENTROID_RADIUS,
            }),
        }
    }

    /// Frame for a classification data set: `Class 0` and `Class 1` series.
    pub fn classes(data: &[LabeledPoint]) -> Self {
        let series = CLASS_PALETTE
            .iter()
            .enumerate()
            .map(|(label, &color)| Series {
                label: format!("Class {label}"),
                points: data
                    .iter()
                    .filter(|d| d.label == label)
                    .map(|d| d.point)
                    .collect(),
                color,
            })
            .collect();
        Self {
            series,
            markers: None,
        }
    }

    /// All series points followed by marker points.
    pub fn all_points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .chain(self.markers.iter().flat_map(|m| m.points.iter()))
    }
}

/// Draws scatter frames into a chart it owns.
pub trait Renderer {
    /// Handle to a live chart.
    type Chart;

    /// Draw the first frame of a run and return its chart.
    fn create(&mut self, scatter: &Scatter) -> Self::Chart;

    /// Redraw an existing chart.
    fn update(&mut self, chart: &mut Self::Chart, scatter: &Scatter);

    /// Release a chart.
    fn destroy(&mut self, chart: Self::Chart);
}

/// A renderer built from a closure called on every frame.
///
/// The chart handle counts frames drawn into it.
#[derive(Clone)]
pub struct FnRenderer<F> {
    f: F,
}

impl<F> FnRenderer<F>
where
    F: FnMut(&Scatter),
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Renderer for FnRenderer<F>
where
    F: FnMut(&Scatter),
{
    type Chart = usize;

    fn create(&mut self, scatter: &Scatter) -> usize {
        (self.f)(scatter);
        1
    }

    fn update(&mut self, chart: &mut usize, scatter: &Scatter) {
        (self.f)(scatter);
        *chart += 1;
    }

    fn destroy(&mut self, _chart: usize) {}
}

const SERIES_GLYPHS: [char; 6] = ['o', 'x', '+', '*', '#', '%'];
const MARKER_GLYPH: char = '@';

/// Chart handle for [`AsciiRenderer`].
#[derive(Debug, PartialEq, Eq)]
pub struct AsciiChart {
    frames: usize,
}

impl AsciiChart {
    /// Frames drawn so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

/// Plain-text scatter plot written to any [`Write`].
///
/// Axes start at zero and grow to fit the data (at least `1.0`).
#[derive(Debug)]
pub struct AsciiRenderer<W> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> AsciiRenderer<W> {
    /// Render into `out` with a 60x20 grid.
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: 60,
            height: 20,
        }
    }

    /// Set grid width in characters (minimum 2).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(2);
        self
    }

    /// Set grid height in lines (minimum 2).
    pub fn with_height(mut self, height: usize) -> Self {
        self.height = height.max(2);
        self
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: usize, scatter: &Scatter) {
        if let Err(e) = self.write_frame(frame, scatter) {
            warn!(error = %e, frame, "failed to draw scatter frame");
        }
    }

    fn write_frame(&mut self, frame: usize, scatter: &Scatter) -> io::Result<()> {
        let (x_min, x_max, y_min, y_max) = extent(scatter);
        let mut grid = vec![vec![' '; self.width]; self.height];

        let (w, h) = (self.width, self.height);
        let mut plot = |p: &Point, glyph: char| {
            let col = scale(p.x, x_min, x_max, w);
            let row = h - 1 - scale(p.y, y_min, y_max, h);
            grid[row][col] = glyph;
        };

        for (i, s) in scatter.series.iter().enumerate() {
            let glyph = SERIES_GLYPHS[i % SERIES_GLYPHS.len()];
            for p in &s.points {
                plot(p, glyph);
            }
        }
        if let Some(m) = &scatter.markers {
            for p in &m.points {
                plot(p, MARKER_GLYPH);
            }
        }

        writeln!(self.out, "frame {frame}")?;
        writeln!(self.out, "{y_max:>6.2} +{}+", "-".repeat(self.width))?;
        for row in &grid {
            writeln!(self.out, "       |{}|", row.iter().collect::<String>())?;
        }
        writeln!(self.out, "{y_min:>6.2} +{}+", "-".repeat(self.width))?;
        writeln!(
            self.out,
            "        {x_min:<8.2}{:>width$.2}",
            x_max,
            width = self.width.saturating_sub(8)
        )?;

        let mut legend: Vec<String> = scatter
            .series
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let glyph = SERIES_GLYPHS[i % SERIES_GLYPHS.len()];
                format!("{glyph} {} ({})", s.label, s.points.len())
            })
            .collect();
        if let Some(m) = &scatter.markers {
            legend.push(format!("{MARKER_GLYPH} {} ({})", m.label, m.points.len()));
        }
        writeln!(self.out, "        {}", legend.join("  "))?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for AsciiRenderer<W> {
    type Chart = AsciiChart;

    fn create(&mut self, scatter: &Scatter) -> AsciiChart {
        self.draw(1, scatter);
        AsciiChart { frames: 1 }
    }

    fn update(&mut self, chart: &mut AsciiChart, scatter: &Scatter) {
        chart.frames += 1;
        self.draw(chart.frames, scatter);
    }

    fn destroy(&mut self, _chart: AsciiChart) {}
}

fn extent(scatter: &Scatter) -> (f64, f64, f64, f64) {
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (0.0f64, 1.0f64, 0.0f64, 1.0f64);
    for p in scatter.all_points() {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    (x_min, x_max, y_min, y_max)
}

fn scale(v: f64, lo: f64, hi: f64, cells: usize) -> usize {
    let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };
    let idx = (t * (cells - 1) as f64).round();
    (idx.max(0.0) as usize).min(cells - 1)
}
