// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gaussian Naive Bayes classifier.
//!
//! Per-class priors, per-feature Gaussians, and log-space scoring: the
//! predicted class maximizes `log prior + Σ log N(x_f; μ, σ²)`. Variances
//! get the standard smoothing term (1e-9 × the largest per-feature
//! variance of the whole training set) so constant features stay finite.
//!
//! Training and inference are both deterministic.

use crate::error::{Error, Result};
use crate::ml::metrics::accuracy;
use std::collections::BTreeMap;

/// Relative variance-smoothing factor.
const VAR_SMOOTHING: f64 = 1e-9;

/// A fitted Gaussian Naive Bayes model.
#[derive(Debug, Clone)]
pub struct GaussianNb {
    classes: Vec<usize>,
    log_priors: Vec<f64>,
    /// Per class: per-feature mean.
    means: Vec<Vec<f64>>,
    /// Per class: per-feature smoothed variance.
    variances: Vec<Vec<f64>>,
}

impl GaussianNb {
    /// Fit the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on empty input, ragged rows, or a
    /// feature/label length mismatch.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(features: &[Vec<f64>], labels: &[usize]) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
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

        // global per-feature variance sets the smoothing scale
        let n = features.len() as f64;
        let mut global_mean = vec![0.0; width];
        for row in features {
            for (m, x) in global_mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut global_mean {
            *m /= n;
        }
        let mut max_var = 0.0_f64;
        for f in 0..width {
            let var = features.iter().map(|r| (r[f] - global_mean[f]).powi(2)).sum::<f64>() / n;
            max_var = max_var.max(var);
        }
        let epsilon = if max_var > 0.0 {
            VAR_SMOOTHING * max_var
        } else {
            VAR_SMOOTHING
        };

        let mut groups: BTreeMap<usize, Vec<&Vec<f64>>> = BTreeMap::new();
        for (row, &label) in features.iter().zip(labels) {
            groups.entry(label).or_default().push(row);
        }

        let mut classes = Vec::with_capacity(groups.len());
        let mut log_priors = Vec::with_capacity(groups.len());
        let mut means = Vec::with_capacity(groups.len());
        let mut variances = Vec::with_capacity(groups.len());
        for (label, rows) in groups {
            let k = rows.len() as f64;
            let mut mean = vec![0.0; width];
            for row in &rows {
                for (m, x) in mean.iter_mut().zip(row.iter()) {
                    *m += x;
                }
            }
            for m in &mut mean {
                *m /= k;
            }
            let mut var = vec![0.0; width];
            for row in &rows {
                for ((v, m), x) in var.iter_mut().zip(&mean).zip(row.iter()) {
                    *v += (x - m).powi(2);
                }
            }
            for v in &mut var {
                *v = *v / k + epsilon;
            }

            classes.push(label);
            log_priors.push((k / n).ln());
            means.push(mean);
            variances.push(var);
        }

        Ok(Self {
            classes,
            log_priors,
            means,
            variances,
        })
    }

    /// The class labels seen during training, ascending.
    #[must_use]
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Joint log-likelihood of `row` for each class, in class order.
    #[must_use]
    pub fn log_likelihoods(&self, row: &[f64]) -> Vec<f64> {
        self.classes
            .iter()
            .enumerate()
            .map(|(ci, _)| {
                let mut score = self.log_priors[ci];
                for (f, (&mean, &var)) in self.means[ci].iter().zip(&self.variances[ci]).enumerate()
                {
                    let x = row.get(f).copied().unwrap_or(0.0);
                    score += -0.5 * (std::f64::consts::TAU * var).ln()
                        - (x - mean).powi(2) / (2.0 * var);
                }
                score
            })
            .collect()
    }

    /// Classify a single row (argmax of the joint log-likelihood; ties go
    /// to the lower class label).
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> usize {
        let scores = self.log_likelihoods(row);
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
