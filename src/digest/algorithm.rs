//! Digest algorithm selection.

use std::str::FromStr;

use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};
use tiny_keccak::{Hasher, Keccak};

use super::Digest;

/// The hash function target digests were produced with.
///
/// Every variant is a pure function of its input, so one value can be shared
/// by any number of workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    /// SHA-1 (160-bit)
    #[default]
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
    /// Keccak-256 (pre-standard SHA-3 padding)
    Keccak256,
}

impl DigestAlgorithm {
    /// Returns the digest size in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 | DigestAlgorithm::Keccak256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Hashes a candidate.
    #[inline]
    pub fn digest(self, candidate: &[u8]) -> Digest {
        match self {
            DigestAlgorithm::Sha1 => Digest::from_output(&Sha1::digest(candidate)),
            DigestAlgorithm::Sha256 => Digest::from_output(&Sha256::digest(candidate)),
            DigestAlgorithm::Sha512 => Digest::from_output(&Sha512::digest(candidate)),
            DigestAlgorithm::Keccak256 => {
                let mut hasher = Keccak::v256();
                hasher.update(candidate);
                let mut hash = [0u8; 32];
                hasher.finalize(&mut hash);
                Digest::from_output(&hash)
            }
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(DigestAlgorithm::Sha512),
            "keccak256" | "keccak" => Ok(DigestAlgorithm::Keccak256),
            _ => Err(format!("Unknown digest algorithm: {}", s)),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgorithm::Sha1 => write!(f, "sha1"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
            DigestAlgorithm::Sha512 => write!(f, "sha512"),
            DigestAlgorithm::Keccak256 => write!(f, "keccak256"),
        }
    }
}
