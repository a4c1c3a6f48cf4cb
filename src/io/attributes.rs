// SPDX-License-Identifier: AGPL-3.0-or-later
//! Attribute-file ingestion and the versioned v1 schema.
//!
//! Three on-disk forms exist. Two are legacy revisions of the original
//! pipeline's JSON dump:
//!
//! - **tuple form**: `[[repstring, [v1, ..., vK]], ...]` with native
//!   booleans and integers;
//! - **flattened form**: `[[repstring, "True", "False", ..., "3"], ...]`
//!   with every feature serialized as a string, booleans as the literals
//!   `"True"`/`"False"`.
//!
//! Legacy features are positional: 13 entries means no `simple` attribute,
//! 14 means `simple` is present after `triangle`. Any other length is a
//! schema error — never padded, never wrapped.
//!
//! The **v1 form** is the schema-versioned replacement: a top-level object
//! with native types, keyed by attribute name so field order stops
//! mattering:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "records": [
//!     { "representation": "4 1 2 4 7",
//!       "attributes": { "fano": false, "girth": 3, ... } }
//!   ]
//! }
//! ```
//!
//! [`load_attributes`] detects the form; `migrate_attributes` (the binary)
//! is the legacy→v1 adapter.

use crate::error::{Error, Result};
use crate::matroid::features::{AttributeName, FeatureRecord, FeatureValue};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

/// Current attribute-file schema version.
pub const SCHEMA_VERSION: u64 = 1;

/// Legacy 13-field order (the revision without `simple`).
const LEGACY_13: [AttributeName; 13] = [
    AttributeName::FanoMinor,
    AttributeName::FanoDualMinor,
    AttributeName::K33Minor,
    AttributeName::K33DualMinor,
    AttributeName::K5Minor,
    AttributeName::K5DualMinor,
    AttributeName::Triangle,
    AttributeName::Cosimple,
    AttributeName::Connected,
    AttributeName::ThreeConnected,
    AttributeName::FourConnected,
    AttributeName::Girth,
    AttributeName::Cogirth,
];

/// Legacy 14-field order (the revision with `simple`).
const LEGACY_14: [AttributeName; 14] = AttributeName::all();

/// One matroid with its invariant record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatroidRecord {
    /// The corpus line this matroid came from (trimmed).
    pub representation: String,
    /// Named invariants.
    pub features: FeatureRecord,
}

/// Which on-disk form a file was detected as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFileForm {
    /// Legacy `[repstring, [features]]` tuples (also reported for an
    /// empty legacy array, which carries no evidence either way).
    LegacyTuple,
    /// Legacy flattened `[repstring, "True", ...]` string records.
    LegacyFlat,
    /// Versioned object form.
    V1,
}

impl fmt::Display for AttributeFileForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LegacyTuple => "legacy tuple form",
            Self::LegacyFlat => "legacy flattened form",
            Self::V1 => "v1",
        })
    }
}

/// Load an attribute file, whatever its form.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::Attributes`]
/// if it is not JSON of a recognized shape, or [`Error::Schema`] for
/// malformed records (wrong feature count, unknown name, bad value kind).
pub fn load_attributes(path: &Path) -> Result<Vec<MatroidRecord>> {
    load_attributes_with_form(path).map(|(records, _)| records)
}

/// Load an attribute file and report which form was detected.
///
/// # Errors
///
/// Same as [`load_attributes`].
pub fn load_attributes_with_form(path: &Path) -> Result<(Vec<MatroidRecord>, AttributeFileForm)> {
    let text = fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| Error::Attributes(format!("{}: {e}", path.display())))?;
    match value {
        Value::Object(map) => Ok((parse_v1(&map)?, AttributeFileForm::V1)),
        Value::Array(items) => parse_legacy(&items),
        _ => Err(Error::Attributes(
            "top level must be an object (v1) or an array (legacy)".into(),
        )),
    }
}

/// Write records in the v1 form, attributes in record order.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_attributes_v1(path: &Path, records: &[MatroidRecord]) -> Result<()> {
    let mut recs = Vec::with_capacity(records.len());
    for record in records {
        let mut attrs = serde_json::Map::new();
        for (name, value) in &record.features {
            let v = match value {
                FeatureValue::Flag(b) => Value::Bool(b),
                FeatureValue::Count(c) => Value::from(c),
            };
            attrs.insert(name.as_str().to_string(), v);
        }
        let mut obj = serde_json::Map::new();
        obj.insert(
            "representation".into(),
            Value::String(record.representation.clone()),
        );
        obj.insert("attributes".into(), Value::Object(attrs));
        recs.push(Value::Object(obj));
    }
    let mut top = serde_json::Map::new();
    top.insert("schema_version".into(), Value::from(SCHEMA_VERSION));
    top.insert("records".into(), Value::Array(recs));

    let text = serde_json::to_string_pretty(&Value::Object(top))
        .map_err(|e| Error::Attributes(e.to_string()))?;
    fs::write(path, text).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

// ── v1 ───────────────────────────────────────────────────────────

fn parse_v1(map: &serde_json::Map<String, Value>) -> Result<Vec<MatroidRecord>> {
    let version = map
        .get("schema_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::Schema("missing or non-integer schema_version".into()))?;
    if version != SCHEMA_VERSION {
        return Err(Error::Schema(format!(
            "unsupported schema_version {version} (expected {SCHEMA_VERSION})"
        )));
    }
    let items = map
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Schema("missing records array".into()))?;

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| Error::Schema(format!("record {idx}: expected an object")))?;
        let representation = obj
            .get("representation")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Schema(format!("record {idx}: missing representation")))?
            .trim()
            .to_string();
        let attrs = obj
            .get("attributes")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Schema(format!("record {idx}: missing attributes object")))?;

        // collect in canonical order; the reader accepts any key order
        let mut entries = Vec::with_capacity(attrs.len());
        for name in AttributeName::all() {
            if let Some(value) = attrs.get(name.as_str()) {
                entries.push((name, feature_from_value(name, value, idx)?));
            }
        }
        if entries.len() != attrs.len() {
            let unknown = attrs
                .keys()
                .find(|k| k.parse::<AttributeName>().is_err())
                .cloned()
                .unwrap_or_default();
            return Err(Error::Schema(format!(
                "record {idx}: unknown attribute '{unknown}'"
            )));
        }
        records.push(MatroidRecord {
            representation,
            features: FeatureRecord::from_pairs(entries)?,
        });
    }
    Ok(records)
}

// ── legacy ───────────────────────────────────────────────────────

fn parse_legacy(items: &[Value]) -> Result<(Vec<MatroidRecord>, AttributeFileForm)> {
    let Some(first) = items.first() else {
        return Ok((Vec::new(), AttributeFileForm::LegacyTuple));
    };
    let tuple_form = first
        .as_array()
        .and_then(|arr| arr.get(1))
        .is_some_and(Value::is_array);
    let form = if tuple_form {
        AttributeFileForm::LegacyTuple
    } else {
        AttributeFileForm::LegacyFlat
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let arr = item
            .as_array()
            .ok_or_else(|| Error::Schema(format!("record {idx}: expected an array")))?;
        let representation = arr
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::Schema(format!("record {idx}: first entry must be the repstring"))
            })?
            .trim()
            .to_string();

        let feature_values: &[Value] = if tuple_form {
            if arr.len() != 2 {
                return Err(Error::Schema(format!(
                    "record {idx}: tuple form expects [repstring, features]"
                )));
            }
            arr[1].as_array().ok_or_else(|| {
                Error::Schema(format!("record {idx}: second entry must be a feature list"))
            })?
        } else {
            &arr[1..]
        };

        let names = labels_for_len(feature_values.len(), idx)?;
        let mut entries = Vec::with_capacity(names.len());
        for (&name, value) in names.iter().zip(feature_values) {
            entries.push((name, feature_from_value(name, value, idx)?));
        }
        records.push(MatroidRecord {
            representation,
            features: FeatureRecord::from_pairs(entries)?,
        });
    }
    Ok((records, form))
}

/// Map a legacy feature-vector length to its positional label set.
fn labels_for_len(n: usize, idx: usize) -> Result<&'static [AttributeName]> {
    match n {
        13 => Ok(&LEGACY_13),
        14 => Ok(&LEGACY_14),
        _ => Err(Error::Schema(format!(
            "record {idx}: feature vector has {n} entries (expected 13 or 14)"
        ))),
    }
}

/// Coerce a JSON value to the kind the attribute expects.
///
/// Flags accept native booleans and the legacy `"True"`/`"False"` string
/// literals; counts accept native non-negative integers and decimal
/// strings. Everything else is a schema error.
fn feature_from_value(name: AttributeName, value: &Value, idx: usize) -> Result<FeatureValue> {
    if name.is_count() {
        let n = match value {
            Value::Number(num) => num.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            Error::Schema(format!(
                "record {idx}: attribute '{name}' expects a non-negative integer, got {value}"
            ))
        })?;
        let n = u32::try_from(n).map_err(|_| {
            Error::Schema(format!(
                "record {idx}: attribute '{name}' value {n} out of range"
            ))
        })?;
        Ok(FeatureValue::Count(n))
    } else {
        let b = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim() {
                "True" => Some(true),
                "False" => Some(false),
                _ => None,
            },
            _ => None,
        }
        .ok_or_else(|| {
            Error::Schema(format!(
                "record {idx}: attribute '{name}' expects a boolean, got {value}"
            ))
        })?;
        Ok(FeatureValue::Flag(b))
    }
}
