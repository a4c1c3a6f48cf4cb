// SPDX-License-Identifier: AGPL-3.0-or-later
//! Corpus line decoder — Gordon Royle's binary matroid text format.
//!
//! One matroid per line: an element count N followed by N non-negative
//! decimal integers, each the MSB-first R-bit encoding of one column of
//! the representing matrix. `"4 1 2 4 7"` at rank 3 decodes to columns
//! [0,0,1], [0,1,0], [1,0,0], [1,1,1].
//!
//! Handles both plain and gzip-compressed files (`.gz` extension, via
//! `flate2::read::GzDecoder`).
//!
//! [`parse_corpus`] collects all matroids and fails on the first bad line
//! (the original batch behavior). [`parse_corpus_lenient`] skips malformed
//! lines and reports them, for corpora of mixed provenance. [`CorpusIter`]
//! streams without buffering the whole file.

use crate::error::{Error, Result};
use crate::matroid::matrix::{BinaryMatrix, bit_length};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One decoded corpus line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// The line as written (trimmed), used as the lookup key for
    /// precomputed invariants.
    pub representation: String,
    /// The decoded R×N matrix.
    pub matrix: BinaryMatrix,
}

/// A line skipped by [`parse_corpus_lenient`].
#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// Why decoding failed.
    pub reason: String,
}

/// Result of a lenient batch parse: survivors plus a skip report.
#[derive(Debug)]
pub struct LenientCorpus {
    /// Successfully decoded lines, in file order.
    pub decoded: Vec<DecodedLine>,
    /// Malformed lines, in file order.
    pub skipped: Vec<SkippedLine>,
}

/// Decode one corpus line into an R×N binary matrix.
///
/// The first token is the declared element count; the remaining tokens are
/// column values. With `rank = None` the rank falls back to the legacy
/// heuristic — the bit length of the **last** value — which assumes the
/// widest value comes last. The result's
/// [`rank_inferred`](BinaryMatrix::rank_inferred) flag records that the
/// heuristic fired; prefer an explicit rank.
///
/// Pure function of `(line, rank)`.
///
/// # Errors
///
/// Returns [`Error::Corpus`] if the line is empty, a token is not a
/// non-negative integer, the declared count disagrees with the number of
/// value tokens, the rank cannot be inferred, or a value needs more bits
/// than the rank allows (high bits are never truncated).
pub fn decode_line(line: &str, rank: Option<usize>) -> Result<BinaryMatrix> {
    let mut tokens = line.split_whitespace();
    let count_token = tokens
        .next()
        .ok_or_else(|| Error::Corpus("empty line".into()))?;
    let declared: usize = count_token.parse().map_err(|_| {
        Error::Corpus(format!(
            "element count '{count_token}' is not a non-negative integer"
        ))
    })?;

    let mut values = Vec::with_capacity(declared);
    for (pos, token) in tokens.enumerate() {
        let value: u64 = token.parse().map_err(|_| {
            Error::Corpus(format!(
                "column {pos} token '{token}' is not a non-negative integer"
            ))
        })?;
        values.push(value);
    }
    if values.len() != declared {
        return Err(Error::Corpus(format!(
            "declared {declared} elements but found {}",
            values.len()
        )));
    }

    let (rank, inferred) = match rank {
        Some(r) => (r, false),
        None => {
            let last = values.last().ok_or_else(|| {
                Error::Corpus("cannot infer rank: line has no column values".into())
            })?;
            (bit_length(*last), true)
        }
    };
    if rank == 0 {
        return Err(Error::Corpus(
            "rank is 0 (inferred from a zero last column?); supply an explicit rank".into(),
        ));
    }
    for (j, &value) in values.iter().enumerate() {
        let needed = bit_length(value);
        if needed > rank {
            return Err(Error::Corpus(format!(
                "column {j} value {value} needs {needed} bits but rank is {rank}"
            )));
        }
    }
    BinaryMatrix::from_columns(rank, &values, inferred)
}

// ── Internal helpers ─────────────────────────────────────────────

/// Open a corpus file for buffered reading, gzip-aware by extension.
fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let ext = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("");
    if ext.eq_ignore_ascii_case("gz") {
        let decoder = flate2::read::GzDecoder::new(file);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Prefix decode errors with the source line number; pass I/O through.
fn with_line(line_number: usize, err: Error) -> Error {
    match err {
        Error::Corpus(msg) => Error::Corpus(format!("line {line_number}: {msg}")),
        Error::InvalidInput(msg) => Error::Corpus(format!("line {line_number}: {msg}")),
        other => other,
    }
}

// ── Public API ───────────────────────────────────────────────────

/// Streaming corpus iterator — one decoded matroid per line.
///
/// Blank lines are skipped. Decode errors are yielded per line and do not
/// stop iteration, so callers choose fail-fast or lenient behavior.
pub struct CorpusIter {
    reader: Box<dyn BufRead>,
    path: std::path::PathBuf,
    rank: Option<usize>,
    line_number: usize,
    buf: String,
    done: bool,
}

impl CorpusIter {
    /// Open a corpus file for streaming iteration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened.
    pub fn open(path: &Path, rank: Option<usize>) -> Result<Self> {
        let reader = open_reader(path)?;
        Ok(Self {
            reader,
            path: path.to_path_buf(),
            rank,
            line_number: 0,
            buf: String::new(),
            done: false,
        })
    }
}

impl Iterator for CorpusIter {
    type Item = Result<DecodedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::Io {
                        path: self.path.clone(),
                        source: e,
                    }));
                }
            }
            self.line_number += 1;
            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let line_number = self.line_number;
            return Some(
                decode_line(trimmed, self.rank)
                    .map(|matrix| DecodedLine {
                        line_number,
                        representation: trimmed.to_string(),
                        matrix,
                    })
                    .map_err(|e| with_line(line_number, e)),
            );
        }
    }
}

/// Parse a whole corpus file, failing on the first malformed line.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Corpus`]
/// (with line context) on the first bad line.
pub fn parse_corpus(path: &Path, rank: Option<usize>) -> Result<Vec<DecodedLine>> {
    CorpusIter::open(path, rank)?.collect()
}

/// Parse a corpus file, skipping malformed lines.
///
/// Decode failures become [`SkippedLine`] entries instead of aborting the
/// batch; only file-level I/O errors abort.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub fn parse_corpus_lenient(path: &Path, rank: Option<usize>) -> Result<LenientCorpus> {
    let mut reader = open_reader(path)?;
    let mut buf = String::new();
    let mut line_number = 0;
    let mut decoded = Vec::new();
    let mut skipped = Vec::new();

    loop {
        buf.clear();
        let n = reader.read_line(&mut buf).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        line_number += 1;
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            continue;
        }
        match decode_line(trimmed, rank) {
            Ok(matrix) => decoded.push(DecodedLine {
                line_number,
                representation: trimmed.to_string(),
                matrix,
            }),
            Err(e) => skipped.push(SkippedLine {
                line_number,
                reason: e.to_string(),
            }),
        }
    }
    Ok(LenientCorpus { decoded, skipped })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::matroid::matrix::encode_bits_msb_first;
    use std::io::Write;

    fn write_corpus(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn documented_rank2_example() {
        // "2 1 2" at rank 2: column 0 = [0,1], column 1 = [1,0]
        let m = decode_line("2 1 2", Some(2)).unwrap();
        assert_eq!(m.rank(), 2);
        assert_eq!(m.n_elements(), 2);
        assert_eq!(m.column_bits(0), vec![0, 1]);
        assert_eq!(m.column_bits(1), vec![1, 0]);
    }

    #[test]
    fn documented_rank3_example() {
        let m = decode_line("4 1 2 4 7", Some(3)).unwrap();
        assert_eq!(
            (0..4).map(|j| m.column_bits(j)).collect::<Vec<_>>(),
            vec![vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0], vec![1, 1, 1]]
        );
    }

    #[test]
    fn round_trip_all_columns() {
        let line = "6 1 2 3 4 5 7";
        let m = decode_line(line, Some(3)).unwrap();
        let original: Vec<u64> = line
            .split_whitespace()
            .skip(1)
            .map(|t| t.parse().unwrap())
            .collect();
        for (j, &v) in original.iter().enumerate() {
            assert_eq!(encode_bits_msb_first(&m.column_bits(j)), v);
        }
    }

    #[test]
    fn rank_inferred_from_last_token() {
        let m = decode_line("4 1 2 4 7", None).unwrap();
        assert_eq!(m.rank(), 3);
        assert!(m.rank_inferred());
        let explicit = decode_line("4 1 2 4 7", Some(3)).unwrap();
        assert!(!explicit.rank_inferred());
    }

    #[test]
    fn inference_fails_when_last_is_narrow() {
        // 4 needs 3 bits but the last token is 1 → inferred rank 1 → overflow
        let err = decode_line("3 4 2 1", None).unwrap_err();
        assert!(err.to_string().contains("needs 3 bits"));
    }

    #[test]
    fn leading_trailing_whitespace_tolerated() {
        let m = decode_line("  4 1 2 4 7  ", Some(3)).unwrap();
        assert_eq!(m.n_elements(), 4);
    }

    #[test]
    fn non_numeric_token_rejected() {
        let err = decode_line("2 a 3", Some(2)).unwrap_err();
        assert!(matches!(err, Error::Corpus(_)));
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn overflow_rejected_not_truncated() {
        let err = decode_line("2 1 4", Some(2)).unwrap_err();
        assert!(err.to_string().contains("needs 3 bits"));
    }

    #[test]
    fn count_mismatch_rejected() {
        let err = decode_line("3 1 2", Some(2)).unwrap_err();
        assert!(err.to_string().contains("declared 3"));
    }

    #[test]
    fn empty_line_rejected() {
        assert!(decode_line("   ", Some(2)).is_err());
    }

    #[test]
    fn empty_count_only_line_needs_explicit_rank() {
        // "0" is a valid rank-R matroid on zero elements when rank is given
        let m = decode_line("0", Some(2)).unwrap();
        assert_eq!(m.n_elements(), 0);
        // but rank inference has nothing to look at
        assert!(decode_line("0", None).is_err());
    }

    #[test]
    fn iter_skips_blank_lines_and_numbers_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(&dir, "c.txt", "2 1 2\n\n4 1 2 4 7\n");
        let lines: Vec<DecodedLine> = CorpusIter::open(&path, Some(3))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[1].line_number, 3);
        assert_eq!(lines[1].representation, "4 1 2 4 7");
    }

    #[test]
    fn parse_corpus_fail_fast_has_line_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(&dir, "bad.txt", "2 1 2\n2 x 2\n");
        let err = parse_corpus(&path, Some(2)).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn lenient_parse_skips_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_corpus(&dir, "mixed.txt", "2 1 2\n2 x 2\n2 1 4\n2 2 3\n");
        let out = parse_corpus_lenient(&path, Some(2)).unwrap();
        assert_eq!(out.decoded.len(), 2);
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[0].line_number, 2);
        assert_eq!(out.skipped[1].line_number, 3);
        assert!(out.skipped[1].reason.contains("needs 3 bits"));
    }

    #[test]
    fn gzip_corpus_round_trip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.txt.gz");
        let file = File::create(&path).unwrap();
        let mut gz = GzEncoder::new(file, Compression::default());
        gz.write_all(b"4 1 2 4 7\n").unwrap();
        gz.finish().unwrap();

        let lines = parse_corpus(&path, Some(3)).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].matrix.column_value(3), 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_corpus(Path::new("/nonexistent/corpus"), Some(3)).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
