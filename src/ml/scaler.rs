// SPDX-License-Identifier: AGPL-3.0-or-later
//! Per-feature standardization (zero mean, unit variance).
//!
//! Fitted on the training partition only, then applied to both partitions
//! — fitting on the full dataset would leak evaluation statistics into
//! training.

use crate::error::{Error, Result};

/// A fitted standardizer: per-column mean and standard deviation.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit column statistics.
    ///
    /// Constant columns (σ = 0) are centered but not scaled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] on an empty input or ragged rows.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::InvalidInput("cannot fit scaler on no rows".into()))?;
        let width = first.len();
        if rows.iter().any(|r| r.len() != width) {
            return Err(Error::InvalidInput("ragged feature rows".into()));
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, m), x) in stds.iter_mut().zip(&means).zip(row) {
                *s += (x - m).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
        }

        Ok(Self { means, stds })
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        self.means.len()
    }

    /// Standardize rows with the fitted statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a row's width differs from the
    /// fitted width.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.width() {
                    return Err(Error::InvalidInput(format!(
                        "row has {} columns, scaler fitted on {}",
                        row.len(),
                        self.width()
                    )));
                }
                Ok(row
                    .iter()
                    .zip(&self.means)
                    .zip(&self.stds)
                    .map(|((x, m), s)| if *s > 0.0 { (x - m) / s } else { x - m })
                    .collect())
            })
            .collect()
    }

    /// Fit and transform in one step.
    ///
    /// # Errors
    ///
    /// As [`StandardScaler::fit`].
    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>)> {
        let scaler = Self::fit(rows)?;
        let transformed = scaler.transform(rows)?;
        Ok((scaler, transformed))
    }
}
