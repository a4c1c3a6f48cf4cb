// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pluggable invariant oracle.
//!
//! Minor detection, circuit/cocircuit enumeration, and connectivity
//! testing are computationally hard (minimum cocircuit size is the
//! minimum-distance problem, NP-hard) and are delegated to an external
//! computer-algebra system. This crate only defines the seam: an oracle
//! takes a matroid and returns its invariant record.
//!
//! The one shipped implementation, [`PrecomputedOracle`], serves
//! invariants from an attribute file produced by such a system.

use crate::error::{Error, Result};
use crate::io::attributes::{MatroidRecord, load_attributes};
use crate::matroid::features::FeatureRecord;
use crate::matroid::matrix::BinaryMatrix;
use std::collections::HashMap;
use std::path::Path;

/// Computes the invariant record of a binary matroid.
pub trait InvariantOracle {
    /// Invariants of the matroid given by `matrix`, with `representation`
    /// as its corpus identity.
    ///
    /// # Errors
    ///
    /// Implementation-specific; [`PrecomputedOracle`] fails on a lookup
    /// miss rather than inventing a default record.
    fn invariants(&self, representation: &str, matrix: &BinaryMatrix) -> Result<FeatureRecord>;
}

/// Collapse runs of whitespace so corpus lines and attribute-file
/// repstrings compare equal regardless of trailing-space quirks.
#[must_use]
pub fn normalize_representation(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// An oracle backed by a table of precomputed invariants.
pub struct PrecomputedOracle {
    table: HashMap<String, FeatureRecord>,
}

impl PrecomputedOracle {
    /// Build the lookup table from loaded records.
    #[must_use]
    pub fn from_records(records: Vec<MatroidRecord>) -> Self {
        let table = records
            .into_iter()
            .map(|r| (normalize_representation(&r.representation), r.features))
            .collect();
        Self { table }
    }

    /// Build the lookup table from an attribute file (any supported form).
    ///
    /// # Errors
    ///
    /// Propagates [`load_attributes`] errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_records(load_attributes(path)?))
    }

    /// Number of matroids with precomputed invariants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl InvariantOracle for PrecomputedOracle {
    fn invariants(&self, representation: &str, _matrix: &BinaryMatrix) -> Result<FeatureRecord> {
        self.table
            .get(&normalize_representation(representation))
            .cloned()
            .ok_or_else(|| {
                Error::Attributes(format!(
                    "no precomputed invariants for '{representation}'"
                ))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::matroid::features::{AttributeName, FeatureValue};

    fn tiny_record(rep: &str, girth: u32) -> MatroidRecord {
        MatroidRecord {
            representation: rep.to_string(),
            features: FeatureRecord::from_pairs(vec![(
                AttributeName::Girth,
                FeatureValue::Count(girth),
            )])
            .unwrap(),
        }
    }

    fn any_matrix() -> BinaryMatrix {
        BinaryMatrix::from_columns(2, &[1, 2], false).unwrap()
    }

    #[test]
    fn normalization_collapses_whitespace() {
        assert_eq!(normalize_representation("  4  1 2 4 7 \n"), "4 1 2 4 7");
        assert_eq!(normalize_representation("4 1 2 4 7"), "4 1 2 4 7");
    }

    #[test]
    fn lookup_ignores_whitespace_differences() {
        let oracle = PrecomputedOracle::from_records(vec![tiny_record("4 1 2 4 7 ", 3)]);
        let features = oracle.invariants("4 1 2 4 7", &any_matrix()).unwrap();
        assert_eq!(features.count(AttributeName::Girth).unwrap(), 3);
    }

    #[test]
    fn miss_is_an_error_not_a_default() {
        let oracle = PrecomputedOracle::from_records(vec![tiny_record("2 1 2", 2)]);
        let err = oracle.invariants("2 1 3", &any_matrix()).unwrap_err();
        assert!(matches!(err, Error::Attributes(_)));
        assert!(err.to_string().contains("2 1 3"));
    }

    #[test]
    fn len_counts_distinct_representations() {
        let oracle = PrecomputedOracle::from_records(vec![
            tiny_record("2 1 2", 2),
            tiny_record("2 1 2 ", 2), // same after normalization
            tiny_record("2 1 3", 2),
        ]);
        assert_eq!(oracle.len(), 2);
        assert!(!oracle.is_empty());
    }
}
