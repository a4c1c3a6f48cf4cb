// SPDX-License-Identifier: AGPL-3.0-or-later
//! Predict girth from the other invariants.
//!
//! Girth is the held-out label, so it never enters the inputs (enforced by
//! the leakage guard). `triangle` is excluded too: it is exactly
//! "girth ≤ 3" for matroids with circuits, a near-copy of the label.
//!
//! Two estimators, as in the original study: a linear SVM classifier
//! (accuracy + confusion matrix over girth values) and a standardized
//! linear SVM regressor (R²).
//!
//! Usage: `predict_girth [attribute-file]` — the optional positional
//! argument overrides the default path.

use matroidlab::io::attributes::load_attributes;
use matroidlab::matroid::features::{AttributeName, FeatureRecord};
use matroidlab::ml::dataset::{LabelSpec, assemble, train_test_split};
use matroidlab::ml::metrics::ConfusionMatrix;
use matroidlab::ml::scaler::StandardScaler;
use matroidlab::ml::svm::{LinearSvc, LinearSvr, SvcParams, SvrParams};
use matroidlab::validation::data_dir;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

/// Fraction of rows held out for evaluation.
const TEST_FRACTION: f64 = 0.2;
/// Split seed; fixed so runs are reproducible.
const SPLIT_SEED: u64 = 42;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn run() -> matroidlab::Result<()> {
    let path: PathBuf = std::env::args().nth(1).map_or_else(
        || data_dir("MATROIDLAB_ATTRIBUTES", "data/demo-attributes.json"),
        PathBuf::from,
    );
    println!("attributes: {}", path.display());

    let records = load_attributes(&path)?;
    println!("number of matroids: {}", records.len());
    let first = records.first().ok_or_else(|| {
        matroidlab::Error::InvalidInput("attribute file contains no records".into())
    })?;

    let excluded = [AttributeName::Girth, AttributeName::Triangle];
    let selected: Vec<AttributeName> = AttributeName::all()
        .into_iter()
        .filter(|n| first.features.contains(*n) && !excluded.contains(n))
        .collect();
    let names: Vec<&str> = selected.iter().map(|n| n.as_str()).collect();
    println!("model inputs: {}", names.join(", "));

    let features: Vec<FeatureRecord> = records.into_iter().map(|r| r.features).collect();
    let dataset = assemble(
        &features,
        &selected,
        &LabelSpec::Attribute(AttributeName::Girth),
    )?;
    let split = train_test_split(&dataset, TEST_FRACTION, SPLIT_SEED)?;

    if let Some(example) = split.train_features.first() {
        println!("example event: {example:?}");
    }
    let girths: BTreeSet<usize> = dataset.labels.iter().copied().collect();
    println!("possible girth values: {girths:?}");

    println!("\n── girth classification ──");
    let clf = LinearSvc::fit(
        &split.train_features,
        &split.train_labels,
        &SvcParams::default(),
    )?;
    let predictions = clf.predict_batch(&split.test_features);
    let matrix = ConfusionMatrix::compute(&split.test_labels, &predictions);
    println!(
        "accuracy: {:.4}",
        clf.score(&split.test_features, &split.test_labels)
    );
    println!("confusion matrix:\n{matrix}");

    println!("── girth regression ──");
    let (scaler, train_scaled) = StandardScaler::fit_transform(&split.train_features)?;
    let test_scaled = scaler.transform(&split.test_features)?;
    let train_targets: Vec<f64> = split.train_labels.iter().map(|&l| l as f64).collect();
    let test_targets: Vec<f64> = split.test_labels.iter().map(|&l| l as f64).collect();
    let regr = LinearSvr::fit(&train_scaled, &train_targets, &SvrParams::default())?;
    println!("R²: {:.4}", regr.score(&test_scaled, &test_targets));

    Ok(())
}
