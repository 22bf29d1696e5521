//! Target set construction and lookup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::digest::{Digest, DigestAlgorithm};

/// Errors from loading target hashes.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid hash on line {line}: {reason}")]
    InvalidHash { line: usize, reason: String },

    #[error("No target hashes found")]
    Empty,
}

/// Distinct target digests, in first-seen order, with constant-time lookup.
///
/// Membership is fixed at construction. Whether a target has been found is
/// tracked per search run, by position, so one set can back several runs.
#[derive(Debug, Clone)]
pub struct TargetSet {
    algorithm: DigestAlgorithm,
    hashes: Vec<Digest>,
    positions: FxHashMap<Digest, usize>,
}

impl TargetSet {
    /// Builds a set from digests, dropping duplicates.
    pub fn new(algorithm: DigestAlgorithm, digests: impl IntoIterator<Item = Digest>) -> Self {
        let mut hashes = Vec::new();
        let mut positions = FxHashMap::default();

        for digest in digests {
            positions.entry(digest).or_insert_with(|| {
                hashes.push(digest);
                hashes.len() - 1
            });
        }

        Self {
            algorithm,
            hashes,
            positions,
        }
    }

    /// Builds a set from hex lines, one hash per line.
    ///
    /// Blank lines are skipped. Every other line must hold exactly one digest
    /// of `algorithm`'s size.
    pub fn from_lines<I, S>(lines: I, algorithm: DigestAlgorithm) -> Result<Self, TargetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut digests = Vec::new();

        for (number, line) in lines.into_iter().enumerate() {
            let text = line.as_ref().trim();
            if text.is_empty() {
                continue;
            }

            let invalid = |reason: String| TargetError::InvalidHash {
                line: number + 1,
                reason,
            };

            let digest = Digest::from_hex(text).map_err(|e| invalid(e.to_string()))?;
            if digest.len() != algorithm.output_len() {
                return Err(invalid(format!(
                    "expected {} bytes for {}, got {}",
                    algorithm.output_len(),
                    algorithm,
                    digest.len()
                )));
            }

            digests.push(digest);
        }

        if digests.is_empty() {
            return Err(TargetError::Empty);
        }

        Ok(Self::new(algorithm, digests))
    }

    /// Reads a file of hex hashes, one per line.
    pub fn from_file(path: impl AsRef<Path>, algorithm: DigestAlgorithm) -> Result<Self, TargetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TargetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_lines(content.lines(), algorithm)
    }

    /// Returns the algorithm the targets were produced with.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Returns the distinct targets in first-seen order.
    pub fn hashes(&self) -> &[Digest] {
        &self.hashes
    }

    /// Returns the number of distinct targets.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns true if there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Returns the position of `digest` in [`hashes`](Self::hashes), if it is a target.
    #[inline]
    pub fn position(&self, digest: &Digest) -> Option<usize> {
        self.positions.get(digest).copied()
    }

    /// Returns true if `digest` is a target.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.positions.contains_key(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA1_TEST: &str = "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";

    fn sha1(text: &str) -> Digest {
        DigestAlgorithm::Sha1.digest(text.as_bytes())
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = TargetSet::new(
            DigestAlgorithm::Sha1,
            [sha1("ab"), sha1("xy"), sha1("ab")],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.position(&sha1("ab")), Some(0));
        assert_eq!(set.position(&sha1("xy")), Some(1));
        assert!(!set.contains(&sha1("cat")));
    }

    #[test]
    fn test_from_lines_skips_blank() {
        let upper = SHA1_TEST.to_uppercase();
        let lines = ["", SHA1_TEST, "   ", upper.as_str(), ""];
        let set = TargetSet::from_lines(lines, DigestAlgorithm::Sha1).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&sha1("test")));
    }

    #[test]
    fn test_from_lines_reports_line_number() {
        let lines = [SHA1_TEST, "", "nothex"];
        match TargetSet::from_lines(lines, DigestAlgorithm::Sha1) {
            Err(TargetError::InvalidHash { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_lines_rejects_wrong_length() {
        let result = TargetSet::from_lines([SHA1_TEST], DigestAlgorithm::Sha256);
        assert!(matches!(
            result,
            Err(TargetError::InvalidHash { line: 1, .. })
        ));
    }

    #[test]
    fn test_from_lines_empty() {
        let result = TargetSet::from_lines(["", "\n"], DigestAlgorithm::Sha1);
        assert!(matches!(result, Err(TargetError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let result = TargetSet::from_file("/nonexistent/hashes.txt", DigestAlgorithm::Sha1);
        assert!(matches!(result, Err(TargetError::Io { .. })));
    }
}
