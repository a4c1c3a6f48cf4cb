// SPDX-License-Identifier: AGPL-3.0-or-later
//! Named matroid invariant records.
//!
//! The attribute schema drifted across corpus revisions (13 vs 14 fields,
//! order changes), so nothing in this crate indexes features by position.
//! [`FeatureRecord`] is an ordered name→value mapping and every consumer
//! goes through [`AttributeName`].

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The known matroid invariants, in canonical order.
///
/// `Simple` appears only in one legacy corpus revision and is optional in
/// records; everything else is present in all revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    /// Fano minor present.
    FanoMinor,
    /// Dual Fano minor present.
    FanoDualMinor,
    /// M(K3,3) minor present.
    K33Minor,
    /// Dual M(K3,3) minor present.
    K33DualMinor,
    /// M(K5) minor present.
    K5Minor,
    /// Dual M(K5) minor present.
    K5DualMinor,
    /// A circuit of size 3 exists.
    Triangle,
    /// No loops or parallel elements.
    Simple,
    /// The dual has no loops or parallel elements.
    Cosimple,
    /// Connected.
    Connected,
    /// 3-connected.
    ThreeConnected,
    /// 4-connected.
    FourConnected,
    /// Size of the smallest circuit.
    Girth,
    /// Size of the smallest cocircuit.
    Cogirth,
}

impl AttributeName {
    /// All attribute names in canonical order.
    #[must_use]
    pub const fn all() -> [Self; 14] {
        [
            Self::FanoMinor,
            Self::FanoDualMinor,
            Self::K33Minor,
            Self::K33DualMinor,
            Self::K5Minor,
            Self::K5DualMinor,
            Self::Triangle,
            Self::Simple,
            Self::Cosimple,
            Self::Connected,
            Self::ThreeConnected,
            Self::FourConnected,
            Self::Girth,
            Self::Cogirth,
        ]
    }

    /// Wire name used in attribute files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FanoMinor => "fano",
            Self::FanoDualMinor => "fano_dual",
            Self::K33Minor => "k33",
            Self::K33DualMinor => "k33_dual",
            Self::K5Minor => "k5",
            Self::K5DualMinor => "k5_dual",
            Self::Triangle => "triangle",
            Self::Simple => "simple",
            Self::Cosimple => "cosimple",
            Self::Connected => "connected",
            Self::ThreeConnected => "3connected",
            Self::FourConnected => "4connected",
            Self::Girth => "girth",
            Self::Cogirth => "cogirth",
        }
    }

    /// Whether this attribute is an integer count rather than a flag.
    #[must_use]
    pub const fn is_count(self) -> bool {
        matches!(self, Self::Girth | Self::Cogirth)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::Schema(format!("unknown attribute name '{s}'")))
    }
}

/// The six minor/dual flags that define the graphic label.
///
/// [`is_graphic`] consults exactly this set, and the dataset assembler
/// rejects any model-input selection that intersects it — sharing the
/// constant keeps the predicate and the leakage guard from drifting apart.
pub const GRAPHIC_LABEL_FLAGS: [AttributeName; 6] = [
    AttributeName::FanoMinor,
    AttributeName::FanoDualMinor,
    AttributeName::K33Minor,
    AttributeName::K33DualMinor,
    AttributeName::K5Minor,
    AttributeName::K5DualMinor,
];

/// A single invariant value: boolean flag or non-negative count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureValue {
    /// Boolean invariant (minor containment, connectivity, ...).
    Flag(bool),
    /// Integer invariant (girth, cogirth).
    Count(u32),
}

impl FeatureValue {
    /// Numeric encoding used for model inputs: flags as 0/1, counts as-is.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Flag(b) => f64::from(u8::from(b)),
            Self::Count(c) => f64::from(c),
        }
    }
}

/// An ordered mapping from attribute name to value for one matroid.
///
/// Lookup is by name only. Missing attributes and kind mismatches fail
/// explicitly — never zero-padded, never index-wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    entries: Vec<(AttributeName, FeatureValue)>,
}

impl FeatureRecord {
    /// Build a record from (name, value) pairs, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] on a duplicate attribute name.
    pub fn from_pairs(entries: Vec<(AttributeName, FeatureValue)>) -> Result<Self> {
        for (i, (name, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == name) {
                return Err(Error::Schema(format!("duplicate attribute '{name}'")));
            }
        }
        Ok(Self { entries })
    }

    /// Number of attributes in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the record carries this attribute.
    #[must_use]
    pub fn contains(&self, name: AttributeName) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    /// Look up a value by name.
    #[must_use]
    pub fn get(&self, name: AttributeName) -> Option<FeatureValue> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    /// Iterate over (name, value) pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeName, FeatureValue)> + '_ {
        self.entries.iter().copied()
    }

    /// A boolean attribute, failing explicitly when absent or a count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the attribute is missing or not a flag.
    pub fn flag(&self, name: AttributeName) -> Result<bool> {
        match self.get(name) {
            Some(FeatureValue::Flag(b)) => Ok(b),
            Some(FeatureValue::Count(_)) => {
                Err(Error::Schema(format!("attribute '{name}' is not a flag")))
            }
            None => Err(Error::Schema(format!("attribute '{name}' is missing"))),
        }
    }

    /// A count attribute, failing explicitly when absent or a flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the attribute is missing or not a count.
    pub fn count(&self, name: AttributeName) -> Result<u32> {
        match self.get(name) {
            Some(FeatureValue::Count(c)) => Ok(c),
            Some(FeatureValue::Flag(_)) => {
                Err(Error::Schema(format!("attribute '{name}' is not a count")))
            }
            None => Err(Error::Schema(format!("attribute '{name}' is missing"))),
        }
    }
}

impl<'a> IntoIterator for &'a FeatureRecord {
    type Item = (AttributeName, FeatureValue);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (AttributeName, FeatureValue)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

/// Whether a binary matroid is graphic, from its invariant record.
///
/// A binary matroid is graphic iff it has no Fano, K5, or K3,3 minor; this
/// attribute set carries the dual flags as well and the label consults all
/// six (see [`GRAPHIC_LABEL_FLAGS`]). Computed from the record only —
/// minor detection itself belongs to the invariant oracle.
///
/// # Errors
///
/// Returns [`Error::Schema`] if any of the six flags is missing.
pub fn is_graphic(record: &FeatureRecord) -> Result<bool> {
    for name in GRAPHIC_LABEL_FLAGS {
        if record.flag(name)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Cogirth with the structural fast paths applied.
///
/// A coloop is a one-element cocircuit, so its presence forces cogirth 1
/// no matter what the enumeration found; a matroid that is not cosimple
/// has a cocircuit of size 2. Only past both gates does the smallest
/// enumerated cocircuit size decide.
#[must_use]
pub fn cogirth_fast_path(
    has_coloop: bool,
    is_cosimple: bool,
    smallest_cocircuit: Option<u32>,
) -> Option<u32> {
    if has_coloop {
        Some(1)
    } else if !is_cosimple {
        Some(2)
    } else {
        smallest_cocircuit
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A 13-attribute record (no `simple`) with the given minor flags,
    /// everything else benign.
    fn record_with_flags(flags: [bool; 6]) -> FeatureRecord {
        let mut entries: Vec<(AttributeName, FeatureValue)> = GRAPHIC_LABEL_FLAGS
            .iter()
            .zip(flags)
            .map(|(&name, set)| (name, FeatureValue::Flag(set)))
            .collect();
        entries.extend([
            (AttributeName::Triangle, FeatureValue::Flag(false)),
            (AttributeName::Cosimple, FeatureValue::Flag(true)),
            (AttributeName::Connected, FeatureValue::Flag(true)),
            (AttributeName::ThreeConnected, FeatureValue::Flag(false)),
            (AttributeName::FourConnected, FeatureValue::Flag(false)),
            (AttributeName::Girth, FeatureValue::Count(3)),
            (AttributeName::Cogirth, FeatureValue::Count(2)),
        ]);
        FeatureRecord::from_pairs(entries).unwrap()
    }

    #[test]
    fn name_string_round_trip() {
        for name in AttributeName::all() {
            assert_eq!(name.as_str().parse::<AttributeName>().unwrap(), name);
        }
        assert!("fano7".parse::<AttributeName>().is_err());
    }

    #[test]
    fn counts_are_girth_and_cogirth_only() {
        let counts: Vec<AttributeName> = AttributeName::all()
            .into_iter()
            .filter(|n| n.is_count())
            .collect();
        assert_eq!(counts, vec![AttributeName::Girth, AttributeName::Cogirth]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let err = FeatureRecord::from_pairs(vec![
            (AttributeName::Girth, FeatureValue::Count(3)),
            (AttributeName::Girth, FeatureValue::Count(4)),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn typed_accessors_fail_explicitly() {
        let record = record_with_flags([false; 6]);
        assert!(record.flag(AttributeName::Simple).is_err()); // missing
        assert!(record.count(AttributeName::Triangle).is_err()); // flag, not count
        assert!(record.flag(AttributeName::Girth).is_err()); // count, not flag
        assert_eq!(record.count(AttributeName::Girth).unwrap(), 3);
        assert!(!record.flag(AttributeName::Triangle).unwrap());
    }

    #[test]
    fn graphic_when_all_six_flags_false() {
        assert!(is_graphic(&record_with_flags([false; 6])).unwrap());
    }

    #[test]
    fn any_single_flag_makes_non_graphic() {
        for i in 0..6 {
            let mut flags = [false; 6];
            flags[i] = true;
            assert!(
                !is_graphic(&record_with_flags(flags)).unwrap(),
                "flag {i} set should mean non-graphic"
            );
        }
    }

    #[test]
    fn graphic_fails_on_missing_flag() {
        let record = FeatureRecord::from_pairs(vec![(
            AttributeName::FanoMinor,
            FeatureValue::Flag(false),
        )])
        .unwrap();
        assert!(is_graphic(&record).is_err());
    }

    #[test]
    fn cogirth_coloop_wins_over_everything() {
        assert_eq!(cogirth_fast_path(true, false, Some(5)), Some(1));
        assert_eq!(cogirth_fast_path(true, true, None), Some(1));
    }

    #[test]
    fn cogirth_not_cosimple_is_two() {
        assert_eq!(cogirth_fast_path(false, false, Some(5)), Some(2));
        assert_eq!(cogirth_fast_path(false, false, None), Some(2));
    }

    #[test]
    fn cogirth_falls_through_to_enumeration() {
        assert_eq!(cogirth_fast_path(false, true, Some(4)), Some(4));
        assert_eq!(cogirth_fast_path(false, true, None), None);
    }

    #[test]
    fn record_order_is_preserved() {
        let record = record_with_flags([false; 6]);
        let names: Vec<AttributeName> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names[0], AttributeName::FanoMinor);
        assert_eq!(names[12], AttributeName::Cogirth);
        assert_eq!(record.len(), 13);
    }

    #[test]
    fn feature_value_numeric_encoding() {
        assert!((FeatureValue::Flag(true).as_f64() - 1.0).abs() < f64::EPSILON);
        assert!(FeatureValue::Flag(false).as_f64().abs() < f64::EPSILON);
        assert!((FeatureValue::Count(7).as_f64() - 7.0).abs() < f64::EPSILON);
    }
}
