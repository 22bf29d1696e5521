//! Mixed-radix candidate generation.
//!
//! A candidate of length `L` is the base-26 representation of its index,
//! most significant symbol first, so index order is lexicographic order.

use super::space::{space_size, ALPHABET, RADIX};

/// An index outside `0..26^length` was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("index {index} out of range for candidates of length {length}")]
pub struct IndexOutOfRange {
    /// The rejected index
    pub index: u64,
    /// The candidate length it was requested for
    pub length: usize,
}

/// Returns the candidate at `index` among all strings of `length` symbols.
pub fn generate(index: u64, length: usize) -> Result<String, IndexOutOfRange> {
    let mut buf = vec![0u8; length];
    write_index(index, &mut buf)?;
    Ok(buf.iter().map(|&b| char::from(b)).collect())
}

/// Maps a candidate back to its index, or `None` if it contains a symbol
/// outside the alphabet or does not fit in a `u64`.
pub fn decode(candidate: &str) -> Option<u64> {
    candidate.bytes().try_fold(0u64, |acc, byte| {
        let digit = ALPHABET.iter().position(|&symbol| symbol == byte)? as u64;
        acc.checked_mul(RADIX)?.checked_add(digit)
    })
}

/// Writes the digits of `index` into `out`, one symbol per slot.
fn write_index(mut index: u64, out: &mut [u8]) -> Result<(), IndexOutOfRange> {
    let length = out.len();
    // A space too large for a `u64` contains every `u64` index.
    if space_size(length).is_some_and(|size| index >= size) {
        return Err(IndexOutOfRange { index, length });
    }

    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(index % RADIX) as usize];
        index /= RADIX;
    }

    Ok(())
}

/// Advances a candidate to its successor in place, wrapping `zz..z` to `aa..a`.
#[inline]
fn increment(candidate: &mut [u8]) {
    for symbol in candidate.iter_mut().rev() {
        if *symbol == b'z' {
            *symbol = b'a';
        } else {
            *symbol += 1;
            return;
        }
    }
}

/// Walks the candidates of one length over the index range `start..end`.
///
/// The cursor owns a single buffer and rewrites it on every step instead of
/// allocating a string per candidate.
#[derive(Debug, Clone)]
pub struct CandidateCursor {
    buf: Vec<u8>,
    next: u64,
    end: u64,
    started: bool,
}

impl CandidateCursor {
    /// Creates a cursor over `start..end` for candidates of `length` symbols.
    pub fn new(length: usize, start: u64, end: u64) -> Result<Self, IndexOutOfRange> {
        if space_size(length).is_some_and(|size| end > size) {
            return Err(IndexOutOfRange { index: end, length });
        }
        if start > end {
            return Err(IndexOutOfRange {
                index: start,
                length,
            });
        }

        let mut buf = vec![b'a'; length];
        if start < end {
            write_index(start, &mut buf)?;
        }

        Ok(Self {
            buf,
            next: start,
            end,
            started: false,
        })
    }

    /// Moves to the next candidate and returns it, or `None` once the range
    /// is exhausted.
    #[inline]
    pub fn advance(&mut self) -> Option<&[u8]> {
        if self.next >= self.end {
            return None;
        }

        if self.started {
            increment(&mut self.buf);
        } else {
            self.started = true;
        }
        self.next += 1;

        Some(&self.buf)
    }

    /// Returns the number of candidates not yet visited.
    pub fn remaining(&self) -> u64 {
        self.end - self.next
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::candidate::bounded_space_size;

    #[test]
    fn test_first_and_last() {
        assert_eq!(generate(0, 3).unwrap(), "aaa");
        assert_eq!(generate(bounded_space_size(3) - 1, 3).unwrap(), "zzz");
    }

    #[test]
    fn test_most_significant_first() {
        assert_eq!(generate(1, 2).unwrap(), "ab");
        assert_eq!(generate(26, 2).unwrap(), "ba");
        assert_eq!(generate(2 * 676 + 19, 3).unwrap(), "cat");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            generate(676, 2),
            Err(IndexOutOfRange {
                index: 676,
                length: 2
            })
        );
    }

    #[test]
    fn test_bijection_exhaustive() {
        for length in 1..=3 {
            let mut seen = HashSet::new();
            for index in 0..bounded_space_size(length) {
                let candidate = generate(index, length).unwrap();
                assert_eq!(candidate.len(), length);
                assert_eq!(decode(&candidate), Some(index));
                assert!(seen.insert(candidate));
            }
        }
    }

    #[test]
    fn test_lexicographic_order() {
        let mut previous = generate(0, 3).unwrap();
        for index in 1..bounded_space_size(3) {
            let current = generate(index, 3).unwrap();
            assert!(previous < current);
            previous = current;
        }
    }

    #[test]
    fn test_decode_rejects_foreign_symbols() {
        assert_eq!(decode("aB"), None);
        assert_eq!(decode("a1"), None);
        assert_eq!(decode(""), Some(0));
    }

    #[test]
    fn test_cursor_matches_generate() {
        let mut cursor = CandidateCursor::new(3, 600, 1_400).unwrap();
        let mut index = 600;
        while let Some(candidate) = cursor.advance() {
            assert_eq!(candidate, generate(index, 3).unwrap().as_bytes());
            index += 1;
        }
        assert_eq!(index, 1_400);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_cursor_full_length() {
        let mut cursor = CandidateCursor::new(1, 0, 26).unwrap();
        let mut visited = Vec::new();
        while let Some(candidate) = cursor.advance() {
            visited.push(candidate[0]);
        }
        assert_eq!(visited.as_slice(), ALPHABET.as_slice());
    }

    #[test]
    fn test_cursor_empty_range() {
        let mut cursor = CandidateCursor::new(2, 5, 5).unwrap();
        assert!(cursor.advance().is_none());
    }

    #[test]
    fn test_cursor_rejects_bad_range() {
        assert!(CandidateCursor::new(2, 0, 677).is_err());
        assert!(CandidateCursor::new(2, 10, 3).is_err());
    }
}
