// SPDX-License-Identifier: AGPL-3.0-or-later
//! Decode a raw corpus file and emit a v1 attribute file.
//!
//! Streams corpus lines (skipping and reporting malformed ones), pulls
//! each matroid's invariants from a precomputed attribute table — minor
//! detection and circuit enumeration stay with the external algebra
//! system — and writes the result in the versioned v1 form.
//!
//! The matroid rank comes from `MATROIDLAB_RANK`. Without it, every line
//! falls back to the bit-length-of-last-column heuristic, which is wrong
//! whenever the widest column is not last; the fallback warns loudly.
//!
//! Usage: `analyze_corpus [corpus-file]` — the optional positional
//! argument overrides the default path. The invariant table is resolved
//! via `MATROIDLAB_ATTRIBUTES`.

use matroidlab::io::attributes::{MatroidRecord, write_attributes_v1};
use matroidlab::io::corpus::parse_corpus_lenient;
use matroidlab::matroid::oracle::{InvariantOracle, PrecomputedOracle};
use matroidlab::validation::{data_dir, exit_skipped};
use std::path::PathBuf;
use std::process::ExitCode;

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
    let corpus: PathBuf = std::env::args().nth(1).map_or_else(
        || data_dir("MATROIDLAB_CORPUS", "data/demo-corpus"),
        PathBuf::from,
    );
    let table = data_dir("MATROIDLAB_ATTRIBUTES", "data/demo-attributes.json");
    if !table.exists() {
        exit_skipped(&format!(
            "no precomputed invariant table at {} (set MATROIDLAB_ATTRIBUTES)",
            table.display()
        ));
    }

    let rank = match std::env::var("MATROIDLAB_RANK") {
        Ok(text) => Some(text.parse::<usize>().map_err(|_| {
            matroidlab::Error::InvalidInput(format!("MATROIDLAB_RANK '{text}' is not an integer"))
        })?),
        Err(_) => {
            eprintln!(
                "warning: MATROIDLAB_RANK not set; inferring rank per line from \
                 the last column's bit length (unreliable unless the widest \
                 column comes last)"
            );
            None
        }
    };

    println!("corpus: {}", corpus.display());
    let oracle = PrecomputedOracle::from_file(&table)?;
    println!("invariant table: {} matroids from {}", oracle.len(), table.display());

    let parsed = parse_corpus_lenient(&corpus, rank)?;
    println!("decoded lines: {}", parsed.decoded.len());
    if !parsed.skipped.is_empty() {
        println!("skipped lines: {}", parsed.skipped.len());
        for skip in &parsed.skipped {
            println!("  line {}: {}", skip.line_number, skip.reason);
        }
    }
    let inferred = parsed
        .decoded
        .iter()
        .filter(|d| d.matrix.rank_inferred())
        .count();
    if inferred > 0 {
        eprintln!("warning: rank inferred heuristically for {inferred} lines");
    }

    let mut records = Vec::with_capacity(parsed.decoded.len());
    let mut misses = 0_usize;
    for line in &parsed.decoded {
        match oracle.invariants(&line.representation, &line.matrix) {
            Ok(features) => records.push(MatroidRecord {
                representation: line.representation.clone(),
                features,
            }),
            Err(_) => misses += 1,
        }
    }
    println!(
        "invariant coverage: {}/{} decoded matroids",
        records.len(),
        parsed.decoded.len()
    );
    if misses > 0 {
        println!("  ({misses} matroids absent from the table were dropped)");
    }

    let out = {
        let mut name = corpus
            .file_name()
            .map_or_else(|| std::ffi::OsString::from("corpus"), ToOwned::to_owned);
        name.push("-attributes.v1.json");
        corpus.with_file_name(name)
    };
    write_attributes_v1(&out, &records)?;
    println!("wrote {} records to {}", records.len(), out.display());
    Ok(())
}
