// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for matroidlab I/O and dataset assembly.
//!
//! All parser and pipeline errors use [`Error`], with variants for each
//! failure mode. No external error crates — zero-dependency error type.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by matroidlab parsers and pipeline stages.
#[derive(Debug)]
pub enum Error {
    /// File I/O error with path context.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Corpus line decoding error (bad token, bit-width overflow, count mismatch).
    Corpus(String),
    /// Attribute-file error (malformed JSON, unknown form, missing lookup key).
    Attributes(String),
    /// Schema error (wrong feature count, unknown attribute name, wrong value kind).
    Schema(String),
    /// Label leakage: a selected model input participates in computing the label.
    Leakage(String),
    /// Invalid input parameters (dimensions, ranges, constraints).
    InvalidInput(String),
}

/// Result type alias for matroidlab operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Corpus(msg) => write!(f, "corpus decode error: {msg}"),
            Self::Attributes(msg) => write!(f, "attribute file error: {msg}"),
            Self::Schema(msg) => write!(f, "schema error: {msg}"),
            Self::Leakage(msg) => write!(f, "label leakage: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corpus(_)
            | Self::Attributes(_)
            | Self::Schema(_)
            | Self::Leakage(_)
            | Self::InvalidInput(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_io_error() {
        let err = Error::Io {
            path: PathBuf::from("data/hr-sz13-rk05"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("hr-sz13-rk05"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn display_all_variants() {
        let cases: Vec<(Error, &str)> = vec![
            (Error::Corpus("bad token".into()), "corpus decode error"),
            (Error::Attributes("not JSON".into()), "attribute file error"),
            (Error::Schema("15 entries".into()), "schema error"),
            (Error::Leakage("k33 selected".into()), "label leakage"),
            (Error::InvalidInput("empty dataset".into()), "invalid input"),
        ];
        for (err, expected_prefix) in cases {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "'{msg}' should start with '{expected_prefix}'"
            );
        }
    }

    #[test]
    fn error_source_chain() {
        let io_err = Error::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("inner"),
        };
        assert!(std::error::Error::source(&io_err).is_some());

        let parse_err = Error::Corpus("bad line".into());
        assert!(std::error::Error::source(&parse_err).is_none());
    }
}
