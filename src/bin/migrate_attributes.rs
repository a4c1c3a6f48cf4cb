// SPDX-License-Identifier: AGPL-3.0-or-later
//! Migrate a legacy attribute file to the versioned v1 form.
//!
//! Legacy files come in two revisions: tuple records with native types,
//! and flattened records with every feature as a string (booleans as the
//! literals `"True"`/`"False"`). Both load through the same detector; the
//! output is always the v1 object form with native types, keyed by
//! attribute name.
//!
//! Usage: `migrate_attributes [attribute-file]` — the optional positional
//! argument overrides the default path. Writes `<stem>.v1.json` next to
//! the input.

use matroidlab::io::attributes::{
    AttributeFileForm, load_attributes_with_form, write_attributes_v1,
};
use matroidlab::validation::data_dir;
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
    let path: PathBuf = std::env::args().nth(1).map_or_else(
        || data_dir("MATROIDLAB_ATTRIBUTES", "data/demo-attributes.json"),
        PathBuf::from,
    );

    let (records, form) = load_attributes_with_form(&path)?;
    println!("{}: {form}, {} records", path.display(), records.len());
    if let Some(first) = records.first() {
        println!("attributes per record: {}", first.features.len());
    }
    if form == AttributeFileForm::V1 {
        println!("input is already v1; rewriting in canonical attribute order");
    }

    let stem = path.file_stem().map_or_else(
        || "attributes".to_string(),
        |s| s.to_string_lossy().into_owned(),
    );
    let out = path.with_file_name(format!("{stem}.v1.json"));
    write_attributes_v1(&out, &records)?;
    println!("wrote {} records to {}", records.len(), out.display());
    Ok(())
}
