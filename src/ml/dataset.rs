// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dataset assembly: by-name feature selection, label derivation,
//! leakage guard, and the deterministic train/test split.
//!
//! The original pipeline selected features by raw position and relied on a
//! comment ("without this, the model will work with 100% accuracy") to
//! keep label-defining attributes out of the model inputs. Here the guard
//! is enforced: assembling a dataset whose inputs intersect the label's
//! defining attributes is an [`Error::Leakage`], not a warning.

use crate::error::{Error, Result};
use crate::matroid::features::{
    AttributeName, FeatureRecord, GRAPHIC_LABEL_FLAGS, FeatureValue, is_graphic,
};
use crate::ml::rng::Lcg64;
use std::collections::BTreeMap;

/// What the model predicts, and which attributes define it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSpec {
    /// The derived graphic/non-graphic label (1 = graphic).
    Graphic,
    /// A raw attribute held out as the label (e.g. girth).
    Attribute(AttributeName),
}

impl LabelSpec {
    /// The attributes that participate in computing this label. Model
    /// inputs must not intersect this set.
    #[must_use]
    pub fn label_attributes(&self) -> Vec<AttributeName> {
        match self {
            Self::Graphic => GRAPHIC_LABEL_FLAGS.to_vec(),
            Self::Attribute(name) => vec![*name],
        }
    }

    /// Compute the label for one record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if a defining attribute is missing.
    #[allow(clippy::cast_possible_truncation)]
    pub fn compute(&self, record: &FeatureRecord) -> Result<usize> {
        match self {
            Self::Graphic => Ok(usize::from(is_graphic(record)?)),
            Self::Attribute(name) => match record.get(*name) {
                Some(FeatureValue::Count(c)) => Ok(c as usize),
                Some(FeatureValue::Flag(b)) => Ok(usize::from(b)),
                None => Err(Error::Schema(format!("attribute '{name}' is missing"))),
            },
        }
    }
}

impl std::fmt::Display for LabelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graphic => f.write_str("graphic"),
            Self::Attribute(name) => write!(f, "{name}"),
        }
    }
}

/// An assembled dataset: parallel feature rows and labels.
///
/// Row i of `features` always corresponds to `labels[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The selected attribute names, in input-column order.
    pub selected: Vec<AttributeName>,
    /// Numeric feature rows (flags as 0/1, counts as their value).
    pub features: Vec<Vec<f64>>,
    /// One label per row.
    pub labels: Vec<usize>,
}

/// Train/evaluation partitions of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDataset {
    /// Training feature rows.
    pub train_features: Vec<Vec<f64>>,
    /// Training labels, paired with `train_features`.
    pub train_labels: Vec<usize>,
    /// Evaluation feature rows.
    pub test_features: Vec<Vec<f64>>,
    /// Evaluation labels, paired with `test_features`.
    pub test_labels: Vec<usize>,
}

/// Build a dataset from invariant records.
///
/// Every record must carry every selected attribute and every attribute
/// the label needs.
///
/// # Errors
///
/// - [`Error::Leakage`] if `selected` intersects the label-defining set.
/// - [`Error::InvalidInput`] if `selected` is empty or repeats a name.
/// - [`Error::Schema`] if a record is missing a required attribute.
pub fn assemble(
    records: &[FeatureRecord],
    selected: &[AttributeName],
    label: &LabelSpec,
) -> Result<Dataset> {
    if selected.is_empty() {
        return Err(Error::InvalidInput("no feature attributes selected".into()));
    }
    for (i, name) in selected.iter().enumerate() {
        if selected[..i].contains(name) {
            return Err(Error::InvalidInput(format!(
                "attribute '{name}' selected twice"
            )));
        }
    }
    let forbidden = label.label_attributes();
    let leaked: Vec<&AttributeName> =
        selected.iter().filter(|n| forbidden.contains(n)).collect();
    if !leaked.is_empty() {
        let names: Vec<String> = leaked.iter().map(ToString::to_string).collect();
        return Err(Error::Leakage(format!(
            "selected attributes {{{}}} define the '{label}' label",
            names.join(", ")
        )));
    }

    let mut features = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(selected.len());
        for &name in selected {
            let value = record.get(name).ok_or_else(|| {
                Error::Schema(format!("record {idx}: attribute '{name}' is missing"))
            })?;
            row.push(value.as_f64());
        }
        features.push(row);
        labels.push(label.compute(record).map_err(|e| match e {
            Error::Schema(msg) => Error::Schema(format!("record {idx}: {msg}")),
            other => other,
        })?);
    }

    Ok(Dataset {
        selected: selected.to_vec(),
        features,
        labels,
    })
}

/// Deterministic train/evaluation split.
///
/// Shuffles row indices with a seeded [`Lcg64`] and takes
/// `ceil(n · test_fraction)` rows for evaluation (the convention of the
/// original pipeline's splitter for fractional test sizes). Feature/label
/// pairing is preserved; the two partitions are disjoint and cover the
/// input exactly.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the dataset is empty, the fraction
/// is outside (0, 1), or either partition would be empty.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<SplitDataset> {
    let n = dataset.features.len();
    if n == 0 {
        return Err(Error::InvalidInput("cannot split an empty dataset".into()));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidInput(format!(
            "test_fraction {test_fraction} must be in (0, 1)"
        )));
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(Error::InvalidInput(format!(
            "split of {n} rows at fraction {test_fraction} leaves an empty partition"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    Lcg64::new(seed).shuffle(&mut order);

    let (test_idx, train_idx) = order.split_at(n_test);
    let gather = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<usize>) {
        (
            idx.iter().map(|&i| dataset.features[i].clone()).collect(),
            idx.iter().map(|&i| dataset.labels[i]).collect(),
        )
    };
    let (test_features, test_labels) = gather(test_idx);
    let (train_features, train_labels) = gather(train_idx);

    Ok(SplitDataset {
        train_features,
        train_labels,
        test_features,
        test_labels,
    })
}

/// Count of each label value, in label order. Reported by the prediction
/// binaries as a class-balance diagnostic; not part of the split contract.
#[must_use]
pub fn class_balance(labels: &[usize]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}
