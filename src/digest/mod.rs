//! One-way hash functions applied to candidates.
//!
//! This module provides:
//! - The selectable digest algorithm (the oracle workers query)
//! - A fixed-capacity digest value usable as a hash map key

mod algorithm;
mod value;

pub use algorithm::DigestAlgorithm;
pub use value::{Digest, DigestParseError, MAX_DIGEST_LEN};
