// SPDX-License-Identifier: AGPL-3.0-or-later
//! Matroid domain types: GF(2) matrices, named invariants, oracle seam.

pub mod features;
pub mod matrix;
pub mod oracle;
