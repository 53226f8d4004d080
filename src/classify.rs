//! Classification seam.
//!
//! Fitting a real classifier is delegated to whatever implements [`Trainer`]
//! (a numeric library, a remote service, a closure). The crate ships one
//! trivial built-in, [`NearestMeanTrainer`], which predicts the class whose
//! mean is closer and performs no optimisation.

use crate::error::{Error, Result};
use crate::generate::LabeledPoint;
use crate::point::Point;

/// A fitted binary classifier.
pub trait Predictor {
    /// Predicted class (0 or 1) for `point`.
    fn predict(&self, point: Point) -> usize;
}

/// Fits a [`Predictor`] to labelled points.
pub trait Trainer {
    /// Model produced by [`fit`](Trainer::fit).
    type Model: Predictor;

    /// Fit a model to `data`.
    fn fit(&self, data: &[LabeledPoint]) -> Result<Self::Model>;
}

impl<F: Fn(Point) -> usize> Predictor for F {
    fn predict(&self, point: Point) -> usize {
        self(point)
    }
}

/// Model returned by [`NearestMeanTrainer`].
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMeanModel {
    /// Per-class mean, `None` if the class had no samples.
    pub means: [Option<Point>; 2],
}

impl Predictor for NearestMeanModel {
    fn predict(&self, point: Point) -> usize {
        match self.means {
            [Some(a), Some(b)] => usize::from(point.distance(&b) < point.distance(&a)),
            [None, Some(_)] => 1,
            _ => 0,
        }
    }
}

/// Nearest-class-mean classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestMeanTrainer;

impl Trainer for NearestMeanTrainer {
    type Model = NearestMeanModel;

    fn fit(&self, data: &[LabeledPoint]) -> Result<NearestMeanModel> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if let Some(bad) = data.iter().find(|d| d.label > 1) {
            return Err(Error::Training(format!(
                "label {} is not a binary class",
                bad.label
            )));
        }
        let class_mean = |label: usize| {
            Point::mean(data.iter().filter(|d| d.label == label).map(|d| &d.point))
        };
        Ok(NearestMeanModel {
            means: [class_mean(0), class_mean(1)],
        })
    }
}

/// A trainer built from a closure.
#[derive(Clone)]
pub struct FnTrainer<F> {
    f: F,
}

impl<F> FnTrainer<F> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, M> Trainer for FnTrainer<F>
where
    F: Fn(&[LabeledPoint]) -> Result<M>,
    M: Predictor,
{
    type Model = M;

    fn fit(&self, data: &[LabeledPoint]) -> Result<M> {
        (self.f)(data)
    }
}

/// Predictions of `model` for every sample, in order.
pub fn predict_all<P: Predictor + ?Sized>(model: &P, data: &[LabeledPoint]) -> Vec<usize> {
    data.iter().map(|d| model.predict(d.point)).collect()
}
