// SPDX-License-Identifier: AGPL-3.0-or-later
//! Linear support-vector models trained by seeded stochastic subgradient
//! descent (Pegasos-style schedule: step 1/(λt), shrink (1 − 1/t)).
//!
//! The classifier minimizes hinge loss, one weight vector per class
//! (one-vs-rest); the regressor minimizes ε-insensitive loss. Bias is an
//! augmented constant column. Sampling uses [`Lcg64`], so a fixed seed
//! reproduces the fit exactly.

use crate::error::{Error, Result};
use crate::ml::metrics::{accuracy, r2_score};
use crate::ml::rng::Lcg64;
use std::collections::BTreeSet;

/// Classifier hyperparameters.
#[derive(Debug, Clone)]
pub struct SvcParams {
    /// L2 regularization strength.
    pub lambda: f64,
    /// Passes over the training set (each pass draws n random samples).
    pub epochs: usize,
    /// RNG seed for sample order.
    pub seed: u64,
}

impl Default for SvcParams {
    fn default() -> Self {
        Self {
            lambda: 1e-2,
            epochs: 60,
            seed: 42,
        }
    }
}

/// Regressor hyperparameters.
#[derive(Debug, Clone)]
pub struct SvrParams {
    /// L2 regularization strength.
    pub lambda: f64,
    /// Half-width of the no-penalty tube around the target.
    pub epsilon: f64,
    /// Passes over the training set.
    pub epochs: usize,
    /// RNG seed for sample order.
    pub seed: u64,
}

impl Default for SvrParams {
    fn default() -> Self {
        Self {
            lambda: 1e-3,
            epsilon: 0.2,
            epochs: 200,
            seed: 42,
        }
    }
}

fn validate_rows(features: &[Vec<f64>], n_labels: usize) -> Result<usize> {
    if features.len() != n_labels {
        return Err(Error::InvalidInput(format!(
            "{} feature rows but {} labels",
            features.len(),
            n_labels
        )));
    }
    let first = features
        .first()
        .ok_or_else(|| Error::InvalidInput("cannot fit on no rows".into()))?;
    let width = first.len();
    if width == 0 {
        return Err(Error::InvalidInput("feature rows are empty".into()));
    }
    if features.iter().any(|r| r.len() != width) {
        return Err(Error::InvalidInput("ragged feature rows".into()));
    }
    Ok(width)
}

/// Dot product of a weight vector (bias last) with a feature row.
fn decision(weights: &[f64], row: &[f64]) -> f64 {
    let (bias, w) = weights.split_last().map_or((0.0, &[] as &[f64]), |(b, w)| (*b, w));
    w.iter()
        .zip(row.iter().chain(std::iter::repeat(&0.0)))
        .map(|(wi, xi)| wi * xi)
        .sum::<f64>()
        + bias
}

/// One Pegasos run on ±1 targets. Returns weights with bias last.
fn fit_hinge(
    features: &[Vec<f64>],
    targets: &[f64],
    lambda: f64,
    epochs: usize,
    rng: &mut Lcg64,
) -> Vec<f64> {
    let width = features[0].len();
    let n = features.len();
    let mut w = vec![0.0; width + 1];
    let mut t = 0_u64;
    for _ in 0..epochs {
        for _ in 0..n {
            t += 1;
            #[allow(clippy::cast_precision_loss)]
            let eta = 1.0 / (lambda * t as f64);
            let i = rng.next_index(n);
            let margin = targets[i] * decision(&w, &features[i]);
            let shrink = 1.0 - eta * lambda;
            for wi in &mut w {
                *wi *= shrink;
            }
            if margin < 1.0 {
                let step = eta * targets[i];
                for (wi, xi) in w.iter_mut().zip(&features[i]) {
                    *wi += step * xi;
                }
                w[width] += step; // bias column
            }
        }
    }
    w
}

/// A linear SVM classifier (one-vs-rest).
#[derive(Debug, Clone)]
pub struct LinearSvc {
    classes: Vec<usize>,
    /// One weight vector per class, bias last. Empty for a single class.
    weights: Vec<Vec<f64>>,
}

impl LinearSvc {
    /// Fit one hinge-loss separator per class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on empty input, ragged rows, a
    /// length mismatch, or non-positive hyperparameters.
    pub fn fit(features: &[Vec<f64>], labels: &[usize], params: &SvcParams) -> Result<Self> {
        validate_rows(features, labels.len())?;
        if params.lambda <= 0.0 || params.epochs == 0 {
            return Err(Error::InvalidInput(
                "lambda and epochs must be positive".into(),
            ));
        }
        let classes: Vec<usize> = labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if classes.len() < 2 {
            // degenerate training set: always predict the one class
            return Ok(Self {
                classes,
                weights: Vec::new(),
            });
        }

        let mut rng = Lcg64::new(params.seed);
        let weights = classes
            .iter()
            .map(|&class| {
                let targets: Vec<f64> = labels
                    .iter()
                    .map(|&l| if l == class { 1.0 } else { -1.0 })
                    .collect();
                fit_hinge(features, &targets, params.lambda, params.epochs, &mut rng)
            })
            .collect();
        Ok(Self { classes, weights })
    }

    /// The class labels seen during training, ascending.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Per-class decision values for one row, in class order.
    #[must_use]
    pub fn decision_values(&self, row: &[f64]) -> Vec<f64> {
        self.weights.iter().map(|w| decision(w, row)).collect()
    }

    /// Classify one row (argmax decision value; ties go to the lower
    /// class label).
    ///
    /// Panics if the model was fitted on an empty class set.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> usize {
        if self.weights.is_empty() {
            return self.classes[0];
        }
        let scores = self.decision_values(row);
        let mut best = 0;
        for (i, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = i;
            }
        }
        self.classes[best]
    }

    /// Classify multiple rows.
    #[must_use]
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<usize> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    /// Mean accuracy on the given evaluation set.
    ///
    /// Panics if the slices differ in length or are empty.
    #[must_use]
    pub fn score(&self, rows: &[Vec<f64>], labels: &[usize]) -> f64 {
        accuracy(labels, &self.predict_batch(rows))
    }
}

/// A linear SVM regressor (ε-insensitive loss).
#[derive(Debug, Clone)]
pub struct LinearSvr {
    /// Weights, bias last.
    weights: Vec<f64>,
}

impl LinearSvr {
    /// Fit by stochastic subgradient descent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on empty input, ragged rows, a
    /// length mismatch, or non-positive `lambda`/`epochs`/negative
    /// `epsilon`.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: &SvrParams) -> Result<Self> {
        let width = validate_rows(features, targets.len())?;
        if params.lambda <= 0.0 || params.epochs == 0 || params.epsilon < 0.0 {
            return Err(Error::InvalidInput(
                "lambda and epochs must be positive, epsilon non-negative".into(),
            ));
        }

        let n = features.len();
        let mut rng = Lcg64::new(params.seed);
        let mut w = vec![0.0; width + 1];
        let mut t = 0_u64;
        for _ in 0..params.epochs {
            for _ in 0..n {
                t += 1;
                #[allow(clippy::cast_precision_loss)]
                let eta = 1.0 / (params.lambda * t as f64);
                let i = rng.next_index(n);
                let err = decision(&w, &features[i]) - targets[i];
                let shrink = 1.0 - eta * params.lambda;
                for wi in &mut w {
                    *wi *= shrink;
                }
                if err.abs() > params.epsilon {
                    let step = eta * err.signum();
                    for (wi, xi) in w.iter_mut().zip(&features[i]) {
                        *wi -= step * xi;
                    }
                    w[width] -= step;
                }
            }
        }
        Ok(Self { weights: w })
    }

    /// Predict one row.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        decision(&self.weights, row)
    }

    /// Predict multiple rows.
    #[must_use]
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict(r)).collect()
    }

    /// R² on the given evaluation set.
    ///
    /// Panics if the slices differ in length or are empty.
    #[must_use]
    pub fn score(&self, rows: &[Vec<f64>], targets: &[f64]) -> f64 {
        r2_score(targets, &self.predict_batch(rows))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Two well-separated 2-D clusters.
    fn separable() -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            let jitter = f64::from(i) * 0.05;
            features.push(vec![jitter, jitter]);
            labels.push(0);
            features.push(vec![10.0 - jitter, 10.0 + jitter]);
            labels.push(1);
        }
        (features, labels)
    }

    #[test]
    fn separable_clusters_classify_perfectly() {
        let (features, labels) = separable();
        let model = LinearSvc::fit(&features, &labels, &SvcParams::default()).unwrap();
        assert!((model.score(&features, &labels) - 1.0).abs() < 1e-12);
        assert_eq!(model.predict(&[0.1, 0.1]), 0);
        assert_eq!(model.predict(&[9.0, 9.0]), 1);
    }

    #[test]
    fn three_class_one_vs_rest() {
        // corner clusters: each class linearly separable from the rest
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..8 {
            let jitter = f64::from(i) * 0.05;
            features.push(vec![jitter, jitter]);
            labels.push(3);
            features.push(vec![10.0 - jitter, jitter]);
            labels.push(5);
            features.push(vec![jitter, 10.0 - jitter]);
            labels.push(9);
        }
        let model = LinearSvc::fit(&features, &labels, &SvcParams::default()).unwrap();
        assert_eq!(model.classes(), &[3, 5, 9]);
        assert_eq!(model.predict(&[0.2, 0.2]), 3);
        assert_eq!(model.predict(&[9.8, 0.2]), 5);
        assert_eq!(model.predict(&[0.2, 9.8]), 9);
    }

    #[test]
    fn single_class_training_set_predicts_it() {
        let model = LinearSvc::fit(
            &[vec![1.0], vec![2.0]],
            &[4, 4],
            &SvcParams::default(),
        )
        .unwrap();
        assert_eq!(model.predict(&[100.0]), 4);
    }

    #[test]
    fn fit_is_deterministic_per_seed() {
        let (features, labels) = separable();
        let a = LinearSvc::fit(&features, &labels, &SvcParams::default()).unwrap();
        let b = LinearSvc::fit(&features, &labels, &SvcParams::default()).unwrap();
        let grid: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i), f64::from(i)]).collect();
        for row in &grid {
            assert_eq!(a.decision_values(row), b.decision_values(row));
        }
    }

    #[test]
    fn svr_learns_a_linear_relation() {
        // y = 2x + 1 on standardized-scale inputs
        let features: Vec<Vec<f64>> = (0..21).map(|i| vec![f64::from(i - 10) / 5.0]).collect();
        let targets: Vec<f64> = features.iter().map(|r| 2.0 * r[0] + 1.0).collect();
        let model = LinearSvr::fit(&features, &targets, &SvrParams::default()).unwrap();
        let r2 = model.score(&features, &targets);
        assert!(r2 > 0.5, "R² {r2} too low for a noiseless linear relation");
        // monotone in x
        assert!(model.predict(&[1.0]) > model.predict(&[-1.0]));
    }

    #[test]
    fn svr_deterministic_per_seed() {
        let features: Vec<Vec<f64>> = (0..10).map(|i| vec![f64::from(i)]).collect();
        let targets: Vec<f64> = (0..10).map(f64::from).collect();
        let a = LinearSvr::fit(&features, &targets, &SvrParams::default()).unwrap();
        let b = LinearSvr::fit(&features, &targets, &SvrParams::default()).unwrap();
        for i in 0..10 {
            let row = [f64::from(i)];
            assert!((a.predict(&row) - b.predict(&row)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(LinearSvc::fit(&[], &[], &SvcParams::default()).is_err());
        assert!(LinearSvc::fit(&[vec![1.0]], &[0, 1], &SvcParams::default()).is_err());
        let bad = SvcParams {
            lambda: 0.0,
            ..SvcParams::default()
        };
        assert!(LinearSvc::fit(&[vec![1.0], vec![2.0]], &[0, 1], &bad).is_err());

        assert!(LinearSvr::fit(&[], &[], &SvrParams::default()).is_err());
        let bad = SvrParams {
            epsilon: -1.0,
            ..SvrParams::default()
        };
        assert!(LinearSvr::fit(&[vec![1.0], vec![2.0]], &[0.0, 1.0], &bad).is_err());
    }
}
