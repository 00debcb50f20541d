//! Substring search over the decoded digit stream.

use crate::error::{Error, Result};
use crate::source::ChunkSource;
use crate::stream::DigitStream;
use std::io::Read;

/// Digits examined per window while scanning.
pub const SEARCH_WINDOW: usize = 64;

/// Find the first occurrence of `pattern` in the digit stream of `source`.
///
/// Returns the digit index where the match starts, or `None` when the
/// stream ends without one. The scan runs a prefix-function automaton
/// whose state survives window boundaries, so a match straddling two
/// windows is found and no digit is ever re-read.
///
/// `pattern` must be non-empty ASCII digits; anything else fails
/// validation before any I/O happens.
pub fn search<S: ChunkSource>(source: S, pattern: &str) -> Result<Option<i64>> {
    if pattern.is_empty() || !pattern.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPattern(pattern.to_string()));
    }

    let pattern = pattern.as_bytes();
    let prefix = prefix_function(pattern);

    let mut stream = DigitStream::new(source);
    let mut window = [0u8; SEARCH_WINDOW];
    let mut matched = 0usize;
    let mut position: i64 = 0;

    tracing::debug!(pattern_len = pattern.len(), "scanning digit stream");

    loop {
        let n = stream.read(&mut window)?;
        if n == 0 {
            tracing::debug!(digits_scanned = position, "pattern not found");
            return Ok(None);
        }

        for &ch in &window[..n] {
            while matched > 0 && pattern[matched] != ch {
                matched = prefix[matched - 1];
            }
            if pattern[matched] == ch {
                matched += 1;
            }
            if matched == pattern.len() {
                // `position` is the index of the last matched digit.
                let start = position - pattern.len() as i64 + 1;
                tracing::debug!(start, "pattern found");
                return Ok(Some(start));
            }
            position += 1;
        }
    }
}

/// Longest-proper-prefix-that-is-a-suffix table for `pattern`.
fn prefix_function(pattern: &[u8]) -> Vec<usize> {
    let mut prefix = vec![0usize; pattern.len()];
    let mut k = 0;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = prefix[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        prefix[i] = k;
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{Chunk, Representation};
    use crate::source::UncachedChunkSource;
    use std::fs::File;
    use tempfile::TempDir;

    fn packed_source(digits: &[u8], max_size: usize) -> (TempDir, UncachedChunkSource) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digits.bin");
        let chunk = Chunk::Unpacked {
            first_index: 0,
            digits: digits.to_vec(),
        };
        let mut file = File::create(&path).unwrap();
        chunk.write_to(Representation::Packed, &mut file).unwrap();

        let source = UncachedChunkSource::new(path, Representation::Packed, max_size);
        (dir, source)
    }

    const PI_DIGITS: &[u8] = &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 9];

    #[test]
    fn test_finds_pattern_at_reported_index() {
        let (_dir, source) = packed_source(PI_DIGITS, 512);
        assert_eq!(search(&source, "265").unwrap(), Some(6));
    }

    #[test]
    fn test_finds_pattern_at_start() {
        let (_dir, source) = packed_source(PI_DIGITS, 512);
        assert_eq!(search(&source, "3").unwrap(), Some(0));
        assert_eq!(search(&source, "314159").unwrap(), Some(0));
    }

    #[test]
    fn test_absent_pattern_is_not_an_error() {
        let (_dir, source) = packed_source(PI_DIGITS, 512);
        assert_eq!(search(&source, "999").unwrap(), None);
    }

    #[test]
    fn test_reexamines_after_partial_match() {
        // "12" sits inside "112"; a scanner that resets its counter on
        // mismatch instead of falling back skips it.
        let (_dir, source) = packed_source(&[1, 1, 2, 6], 512);
        assert_eq!(search(&source, "12").unwrap(), Some(1));
    }

    #[test]
    fn test_overlapping_prefix_fallback() {
        // Mismatch at the final digit of "1213" must fall back to the
        // matched "1" prefix, not to zero.
        let (_dir, source) = packed_source(&[1, 2, 1, 2, 1, 3], 512);
        assert_eq!(search(&source, "1213").unwrap(), Some(2));
    }

    #[test]
    fn test_match_straddling_window_boundary() {
        // The pattern occupies indexes 62..=65, crossing the 64-digit
        // window edge.
        let mut digits = vec![0u8; 128];
        digits[62] = 1;
        digits[63] = 2;
        digits[64] = 3;
        digits[65] = 4;

        let (_dir, source) = packed_source(&digits, 512);
        assert_eq!(search(&source, "1234").unwrap(), Some(62));
    }

    #[test]
    fn test_match_straddling_chunk_fetches() {
        // A small source cap forces many fetches under one window.
        let (_dir, source) = packed_source(PI_DIGITS, 4);
        assert_eq!(search(&source, "926535").unwrap(), Some(5));
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        let (_dir, source) = packed_source(PI_DIGITS, 512);

        assert!(matches!(search(&source, ""), Err(Error::InvalidPattern(_))));
        assert!(matches!(search(&source, "12a4"), Err(Error::InvalidPattern(_))));
        assert!(matches!(search(&source, "-12"), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_validation_happens_before_io() {
        // Invalid pattern wins over a missing file.
        let source =
            UncachedChunkSource::new("/nonexistent/digits.bin", Representation::Packed, 512);
        assert!(matches!(search(&source, "abc"), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_prefix_function_values() {
        assert_eq!(prefix_function(b"1213"), vec![0, 0, 1, 0]);
        assert_eq!(prefix_function(b"1212"), vec![0, 0, 1, 2]);
        assert_eq!(prefix_function(b"1111"), vec![0, 1, 2, 3]);
    }
}
