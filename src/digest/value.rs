//! Digest value representation and utilities.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Largest supported digest (SHA-512), in bytes.
pub const MAX_DIGEST_LEN: usize = 64;

/// A digest of up to [`MAX_DIGEST_LEN`] bytes, stored inline so it is `Copy`
/// and hashes without touching the heap.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Digest {
    bytes: [u8; MAX_DIGEST_LEN],
    len: u8,
}

impl Digest {
    /// Creates a digest from raw bytes, or `None` if the slice is longer than
    /// [`MAX_DIGEST_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_DIGEST_LEN {
            return None;
        }

        let mut buf = [0u8; MAX_DIGEST_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            bytes: buf,
            len: bytes.len() as u8,
        })
    }

    /// Creates a digest from hash function output that is known to fit.
    #[inline]
    pub(crate) fn from_output(output: &[u8]) -> Self {
        let len = output.len().min(MAX_DIGEST_LEN);
        let mut bytes = [0u8; MAX_DIGEST_LEN];
        bytes[..len].copy_from_slice(&output[..len]);

        Self {
            bytes,
            len: len as u8,
        }
    }

    /// Parses a hex digest, with or without a `0x` prefix.
    pub fn from_hex(text: &str) -> Result<Self, DigestParseError> {
        let text = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        if text.is_empty() {
            return Err(DigestParseError::Empty);
        }

        let bytes = hex::decode(text)?;
        Self::from_slice(&bytes).ok_or(DigestParseError::TooLong(bytes.len()))
    }

    /// Returns the digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Returns the digest size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true for a zero-length digest.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

// Bytes past `len` are always zero, so hashing only the used prefix agrees
// with the derived equality.
impl Hash for Digest {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Errors from parsing a hex digest.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DigestParseError {
    #[error("empty hash")]
    Empty,

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("hash is {0} bytes, longer than any supported digest")]
    TooLong(usize),
}

#[cfg(test)]
mod tests {
    use std::hash::BuildHasher;

    use rustc_hash::FxBuildHasher;

    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let digest = Digest::from_hex("a94a8fe5ccb19ba61c4c0873d391e987982fbbd3").unwrap();
        assert_eq!(digest.len(), 20);
        assert_eq!(digest.to_hex(), "a94a8fe5ccb19ba61c4c0873d391e987982fbbd3");
    }

    #[test]
    fn test_uppercase_and_prefix() {
        let lower = Digest::from_hex("deadbeef").unwrap();
        assert_eq!(Digest::from_hex("0xDEADBEEF").unwrap(), lower);
        assert_eq!(lower.to_string(), "deadbeef");
    }

    #[test]
    fn test_length_distinguishes() {
        // Same leading bytes, different sizes: not the same digest.
        assert_ne!(
            Digest::from_hex("00").unwrap(),
            Digest::from_hex("0000").unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Digest::from_hex(""), Err(DigestParseError::Empty));
        assert_eq!(Digest::from_hex("0x"), Err(DigestParseError::Empty));
        assert!(matches!(
            Digest::from_hex("xyz"),
            Err(DigestParseError::InvalidHex(_))
        ));
        assert_eq!(
            Digest::from_hex(&"ab".repeat(65)),
            Err(DigestParseError::TooLong(65))
        );
    }

    #[test]
    fn test_hash_covers_used_bytes_only() {
        let digest = Digest::from_hex("a94a8fe5ccb19ba61c4c0873d391e987982fbbd3").unwrap();
        assert_eq!(
            FxBuildHasher.hash_one(digest),
            FxBuildHasher.hash_one(digest.as_bytes())
        );

        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        let output = Digest::from_output(digest.as_bytes());
        assert_eq!(FxBuildHasher.hash_one(parsed), FxBuildHasher.hash_one(output));
    }

    #[test]
    fn test_parse_error_carries_hex_cause() {
        let err = Digest::from_hex("abc").unwrap_err();
        assert_eq!(
            err,
            DigestParseError::InvalidHex(hex::FromHexError::OddLength)
        );
        assert!(err.to_string().starts_with("invalid hex"));
    }
}
