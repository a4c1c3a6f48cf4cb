// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dataset assembly and first-party estimators.

pub mod dataset;
pub mod gaussian_nb;
pub mod metrics;
pub mod rng;
pub mod scaler;
pub mod svm;
