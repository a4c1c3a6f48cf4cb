// SPDX-License-Identifier: AGPL-3.0-or-later
//! Evaluation metrics: accuracy, confusion matrix, R².

use std::collections::BTreeSet;
use std::fmt;

/// Fraction of predictions matching the truth.
///
/// Panics if the slices differ in length or are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn accuracy(truth: &[usize], predictions: &[usize]) -> f64 {
    assert_eq!(truth.len(), predictions.len(), "length mismatch");
    assert!(!truth.is_empty(), "no samples");
    let hits = truth
        .iter()
        .zip(predictions)
        .filter(|(t, p)| t == p)
        .count();
    hits as f64 / truth.len() as f64
}

/// Confusion matrix over the union of observed label values.
///
/// Rows are true labels, columns are predictions, both in ascending label
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    labels: Vec<usize>,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Tally a confusion matrix.
    ///
    /// Panics if the slices differ in length or are empty.
    #[must_use]
    pub fn compute(truth: &[usize], predictions: &[usize]) -> Self {
        assert_eq!(truth.len(), predictions.len(), "length mismatch");
        assert!(!truth.is_empty(), "no samples");
        let labels: Vec<usize> = truth
            .iter()
            .chain(predictions)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let k = labels.len();
        let index =
            |label: usize| labels.binary_search(&label).unwrap_or(0);
        let mut counts = vec![0_usize; k * k];
        for (&t, &p) in truth.iter().zip(predictions) {
            counts[index(t) * k + index(p)] += 1;
        }
        Self { labels, counts }
    }

    /// The label values, ascending.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Count of rows with true label `t` predicted as `p` (0 for labels
    /// never observed).
    #[must_use]
    pub fn count(&self, t: usize, p: usize) -> usize {
        let (Ok(i), Ok(j)) = (
            self.labels.binary_search(&t),
            self.labels.binary_search(&p),
        ) else {
            return 0;
        };
        self.counts[i * self.labels.len() + j]
    }

    /// Total number of samples.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of correctly classified samples (the diagonal).
    #[must_use]
    pub fn diagonal(&self) -> usize {
        let k = self.labels.len();
        (0..k).map(|i| self.counts[i * k + i]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let k = self.labels.len();
        write!(f, "{:>10}", "true\\pred")?;
        for label in &self.labels {
            write!(f, " {label:>6}")?;
        }
        writeln!(f)?;
        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{label:>10}")?;
            for j in 0..k {
                write!(f, " {:>6}", self.counts[i * k + j])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Coefficient of determination, as the original pipeline's regressor
/// scoring defines it: `1 - ss_res / ss_tot`, with the degenerate
/// constant-truth case scored 1 for a perfect fit and 0 otherwise.
///
/// Panics if the slices differ in length or are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn r2_score(truth: &[f64], predictions: &[f64]) -> f64 {
    assert_eq!(truth.len(), predictions.len(), "length mismatch");
    assert!(!truth.is_empty(), "no samples");
    let mean = truth.iter().sum::<f64>() / truth.len() as f64;
    let ss_tot: f64 = truth.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = truth
        .iter()
        .zip(predictions)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
