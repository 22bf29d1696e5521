//! Candidate enumeration over the lowercase alphabet.
//!
//! This module provides:
//! - The working alphabet and the bounded search space
//! - Mixed-radix mapping between an index and a fixed-length candidate
//! - An in-place cursor for the worker hot loop

mod generator;
mod space;

pub use generator::{decode, generate, CandidateCursor, IndexOutOfRange};
pub use space::{space_size, SearchSpace, ALPHABET, MAX_LENGTH, RADIX};
pub(crate) use space::bounded_space_size;
