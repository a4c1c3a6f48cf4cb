// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation: dataset assembly and estimators on synthetic matroids.
//!
//! Covers the pipeline laws that do not need real corpus data: the graphic
//! predicate truth table, the label-leakage guard, the split size and
//! disjointness laws, seeded determinism, Gaussian NB on a separable
//! synthetic set, the SGD regressor sanity floor, and the cogirth fast
//! path. Explicit pass/fail, exit code 0/1.

use matroidlab::Error;
use matroidlab::matroid::features::{
    AttributeName, FeatureRecord, FeatureValue, GRAPHIC_LABEL_FLAGS, cogirth_fast_path, is_graphic,
};
use matroidlab::ml::dataset::{LabelSpec, assemble, train_test_split};
use matroidlab::ml::gaussian_nb::GaussianNb;
use matroidlab::ml::scaler::StandardScaler;
use matroidlab::ml::svm::{LinearSvr, SvrParams};
use matroidlab::tolerances;
use matroidlab::validation::Validator;

/// A 13-attribute record with the given minor/dual flags; `girth` doubles
/// as a unique row id for the disjointness check.
#[allow(clippy::expect_used)]
fn synthetic_record(flags: [bool; 6], id: u32) -> FeatureRecord {
    let mut entries: Vec<(AttributeName, FeatureValue)> = GRAPHIC_LABEL_FLAGS
        .iter()
        .zip(flags)
        .map(|(&name, set)| (name, FeatureValue::Flag(set)))
        .collect();
    entries.extend([
        (AttributeName::Triangle, FeatureValue::Flag(id % 2 == 0)),
        (AttributeName::Cosimple, FeatureValue::Flag(true)),
        (AttributeName::Connected, FeatureValue::Flag(true)),
        (AttributeName::ThreeConnected, FeatureValue::Flag(false)),
        (AttributeName::FourConnected, FeatureValue::Flag(false)),
        (AttributeName::Girth, FeatureValue::Count(id)),
        (AttributeName::Cogirth, FeatureValue::Count(2)),
    ]);
    FeatureRecord::from_pairs(entries).expect("synthetic record is well-formed")
}

#[allow(
    clippy::expect_used,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::too_many_lines
)]
fn main() {
    let mut v = Validator::new("Pipeline Laws on Synthetic Matroids");

    v.section("Graphic predicate truth table");
    let clean = synthetic_record([false; 6], 0);
    v.check_true(
        "all six flags false → graphic",
        is_graphic(&clean).expect("predicate on full record"),
    );
    let mut rejected = 0_usize;
    for i in 0..6 {
        let mut flags = [false; 6];
        flags[i] = true;
        if !is_graphic(&synthetic_record(flags, 0)).expect("predicate on full record") {
            rejected += 1;
        }
    }
    v.check_count("each single flag set → non-graphic", rejected, 6);

    v.section("Label-leakage guard");
    let records: Vec<FeatureRecord> = (0..30)
        .map(|i| synthetic_record([false, false, i % 3 == 0, false, false, false], i))
        .collect();
    let leaky = assemble(
        &records,
        &[AttributeName::K33Minor, AttributeName::Girth],
        &LabelSpec::Graphic,
    );
    v.check_true(
        "selecting a minor flag for the graphic label is rejected",
        matches!(leaky, Err(Error::Leakage(_))),
    );
    let self_label = assemble(
        &records,
        &[AttributeName::Girth],
        &LabelSpec::Attribute(AttributeName::Girth),
    );
    v.check_true(
        "selecting the held-out label attribute is rejected",
        matches!(self_label, Err(Error::Leakage(_))),
    );

    v.section("Split laws");
    let safe = [
        AttributeName::Triangle,
        AttributeName::Cosimple,
        AttributeName::Girth,
        AttributeName::Cogirth,
    ];
    let dataset = assemble(&records, &safe, &LabelSpec::Graphic).expect("non-leaky assembly");
    let split = train_test_split(&dataset, 0.2, 42).expect("split 30 rows");
    v.check_count("test partition is ceil(30 · 0.2)", split.test_features.len(), 6);
    v.check_count(
        "partition sizes sum to the input size",
        split.train_features.len() + split.test_features.len(),
        30,
    );
    let mut ids: Vec<u64> = split
        .train_features
        .iter()
        .chain(&split.test_features)
        .map(|row| row[2] as u64) // girth column = unique row id
        .collect();
    ids.sort_unstable();
    v.check_true(
        "partitions are disjoint and cover every row",
        ids == (0..30).collect::<Vec<u64>>(),
    );
    let again = train_test_split(&dataset, 0.2, 42).expect("re-split");
    v.check_true("same seed reproduces the split exactly", again == split);

    v.section("Gaussian NB on a separable set");
    let mut features = Vec::new();
    let mut labels = Vec::new();
    for i in 0..20 {
        let jitter = f64::from(i) * 0.01;
        features.push(vec![jitter, 3.0 + jitter]);
        labels.push(0);
        features.push(vec![8.0 + jitter, 7.0 - jitter]);
        labels.push(1);
    }
    let nb = GaussianNb::fit(&features, &labels).expect("NB fit");
    v.check(
        "NB accuracy on separable clusters",
        nb.score(&features, &labels),
        1.0,
        tolerances::EXACT,
    );

    v.section("SGD regressor sanity");
    let xs: Vec<Vec<f64>> = (0..25).map(|i| vec![f64::from(i)]).collect();
    let ys: Vec<f64> = xs.iter().map(|r| 1.5f64.mul_add(r[0], 4.0)).collect();
    let (scaler, xs_scaled) = StandardScaler::fit_transform(&xs).expect("scaler fit");
    let col_mean: f64 = xs_scaled.iter().map(|r| r[0]).sum::<f64>() / xs_scaled.len() as f64;
    v.check(
        "standardized column mean",
        col_mean,
        0.0,
        tolerances::ANALYTICAL_F64,
    );
    let svr = LinearSvr::fit(&xs_scaled, &ys, &SvrParams::default()).expect("SVR fit");
    let r2 = svr.score(&scaler.transform(&xs).expect("transform"), &ys);
    v.check_true(
        &format!("SVR R² {r2:.4} above {} floor", tolerances::R2_FLOOR),
        r2 > tolerances::R2_FLOOR,
    );

    v.section("Cogirth fast path");
    v.check_true(
        "coloop forces cogirth 1 regardless of enumeration",
        cogirth_fast_path(true, false, Some(5)) == Some(1),
    );
    v.check_true(
        "non-cosimple without coloop forces cogirth 2",
        cogirth_fast_path(false, false, Some(5)) == Some(2),
    );
    v.check_true(
        "cosimple falls through to the smallest cocircuit",
        cogirth_fast_path(false, true, Some(4)) == Some(4),
    );

    v.finish();
}
