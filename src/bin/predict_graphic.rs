// SPDX-License-Identifier: AGPL-3.0-or-later
//! Predict whether a binary matroid is graphic from its other invariants.
//!
//! Loads an attribute file (any supported form), derives the graphic
//! label, assembles the non-leaky input subset — every attribute except
//! the six minor/dual flags that define the label — and trains Gaussian
//! Naive Bayes on a deterministic 80/20 split. Reports class balance, the
//! confusion matrix, accuracy, and how many all-zero feature rows were
//! predicted graphic (rows the inputs cannot distinguish).
//!
//! Usage: `predict_graphic [attribute-file]` — the optional positional
//! argument overrides the default path.

use matroidlab::io::attributes::load_attributes;
use matroidlab::matroid::features::{AttributeName, FeatureRecord, GRAPHIC_LABEL_FLAGS};
use matroidlab::ml::dataset::{LabelSpec, assemble, class_balance, train_test_split};
use matroidlab::ml::gaussian_nb::GaussianNb;
use matroidlab::ml::metrics::ConfusionMatrix;
use matroidlab::validation::data_dir;
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

    let selected: Vec<AttributeName> = AttributeName::all()
        .into_iter()
        .filter(|n| first.features.contains(*n) && !GRAPHIC_LABEL_FLAGS.contains(n))
        .collect();
    let names: Vec<&str> = selected.iter().map(|n| n.as_str()).collect();
    println!("model inputs: {}", names.join(", "));

    let features: Vec<FeatureRecord> = records.into_iter().map(|r| r.features).collect();
    let dataset = assemble(&features, &selected, &LabelSpec::Graphic)?;
    let split = train_test_split(&dataset, TEST_FRACTION, SPLIT_SEED)?;

    let train_balance = class_balance(&split.train_labels);
    let test_balance = class_balance(&split.test_labels);
    println!(
        "graphic matroids in training data: {}",
        train_balance.get(&1).copied().unwrap_or(0)
    );
    println!(
        "non-graphic matroids in training data: {}",
        train_balance.get(&0).copied().unwrap_or(0)
    );
    println!(
        "graphic matroids in test data: {}",
        test_balance.get(&1).copied().unwrap_or(0)
    );
    println!(
        "non-graphic matroids in test data: {}",
        test_balance.get(&0).copied().unwrap_or(0)
    );

    let model = GaussianNb::fit(&split.train_features, &split.train_labels)?;
    let predictions = model.predict_batch(&split.test_features);
    let matrix = ConfusionMatrix::compute(&split.test_labels, &predictions);
    println!("\nconfusion matrix:\n{matrix}");
    println!(
        "accuracy: {:.4}",
        model.score(&split.test_features, &split.test_labels)
    );

    // rows whose selected inputs are all zero carry no signal; predicting
    // them graphic is the model leaning on the prior alone
    let uninformative_positives = split
        .test_features
        .iter()
        .zip(&predictions)
        .filter(|&(row, &p)| p == 1 && row.iter().all(|x| x.abs() < f64::EPSILON))
        .count();
    println!("all-zero feature rows predicted graphic: {uninformative_positives}");

    Ok(())
}
