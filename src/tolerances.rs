// SPDX-License-Identifier: AGPL-3.0-or-later
//! Centralized validation tolerances with documented origin.
//!
//! Every threshold used in validation binaries is defined here.
//! No ad-hoc magic numbers.

/// Operations that must be exact (integer counts, partition sizes,
/// deterministic re-runs of seeded code paths).
pub const EXACT: f64 = 0.0;

/// Analytical formulas with minimal f64 rounding (accuracy ratios,
/// standardized-column means).
///
/// f64 has ~15.9 significant digits; 1e-12 allows a few digits of
/// accumulated rounding in simple arithmetic chains.
pub const ANALYTICAL_F64: f64 = 1e-12;

/// R² floor for the SGD regressor on noiseless synthetic linear data.
///
/// The ε-insensitive SGD fit is deterministic but inexact after a finite
/// epoch budget; on a clean linear relation it must explain at least half
/// the variance or something is structurally wrong.
pub const R2_FLOOR: f64 = 0.5;
