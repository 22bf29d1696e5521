//! Alphabet and length bounds of a search.

use std::ops::RangeInclusive;

use crate::config::ConfigError;

/// Working alphabet. Position in this table is the digit value of a symbol.
pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Base of the positional number system over [`ALPHABET`].
pub const RADIX: u64 = ALPHABET.len() as u64;

/// Longest supported candidate.
///
/// `26^13` and the sum of all spaces up to length 13 both fit in a `u64`.
pub const MAX_LENGTH: usize = 13;

/// Number of candidates of exactly `length` symbols, or `None` when that
/// does not fit in a `u64`.
pub fn space_size(length: usize) -> Option<u64> {
    u32::try_from(length)
        .ok()
        .and_then(|exp| RADIX.checked_pow(exp))
}

/// [`space_size`] for a length already checked against [`MAX_LENGTH`].
#[inline]
pub(crate) fn bounded_space_size(length: usize) -> u64 {
    debug_assert!(length <= MAX_LENGTH);
    RADIX.pow(length as u32)
}

/// Inclusive range of candidate lengths to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSpace {
    min_length: usize,
    max_length: usize,
}

impl SearchSpace {
    /// Creates a search space, rejecting inconsistent bounds.
    pub fn new(min_length: usize, max_length: usize) -> Result<Self, ConfigError> {
        if min_length == 0 {
            return Err(ConfigError::InvalidLength(
                "Minimum password length must be a positive number".into(),
            ));
        }

        if max_length < min_length {
            return Err(ConfigError::InvalidLength(
                "Maximum password length must be at least equal to the minimum password length"
                    .into(),
            ));
        }

        if max_length > MAX_LENGTH {
            return Err(ConfigError::InvalidLength(format!(
                "Maximum password length cannot exceed {}",
                MAX_LENGTH
            )));
        }

        Ok(Self {
            min_length,
            max_length,
        })
    }

    /// Returns the shortest candidate length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns the longest candidate length.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Returns every candidate length in enumeration order.
    pub fn lengths(&self) -> RangeInclusive<usize> {
        self.min_length..=self.max_length
    }

    /// Returns the total number of candidates across all lengths.
    pub fn size(&self) -> u64 {
        self.lengths().map(bounded_space_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bounds() {
        let space = SearchSpace::new(1, 3).unwrap();
        assert_eq!(space.min_length(), 1);
        assert_eq!(space.max_length(), 3);
        assert_eq!(space.size(), 26 + 676 + 17_576);
    }

    #[test]
    fn test_single_length() {
        let space = SearchSpace::new(2, 2).unwrap();
        assert_eq!(space.lengths().count(), 1);
        assert_eq!(space.size(), 676);
    }

    #[test]
    fn test_zero_minimum_rejected() {
        assert!(matches!(
            SearchSpace::new(0, 3),
            Err(ConfigError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(SearchSpace::new(4, 3).is_err());
    }

    #[test]
    fn test_maximum_length_fits() {
        let space = SearchSpace::new(1, MAX_LENGTH).unwrap();
        // Would have panicked on overflow in debug builds.
        assert!(space.size() > bounded_space_size(MAX_LENGTH));
        assert!(SearchSpace::new(1, MAX_LENGTH + 1).is_err());
    }

    #[test]
    fn test_space_size_past_cap_is_none() {
        assert_eq!(space_size(0), Some(1));
        assert_eq!(space_size(3), Some(17_576));
        assert_eq!(space_size(MAX_LENGTH), Some(bounded_space_size(MAX_LENGTH)));
        assert_eq!(space_size(MAX_LENGTH + 1), None);
        assert_eq!(space_size(usize::MAX), None);
    }
}
