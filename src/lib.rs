//! # hash_crack
//!
//! Parallel exhaustive search for the preimages of unsalted password hashes
//! over bounded-length lowercase candidates.
//!
//! ## Architecture
//!
//! - `candidate`: Alphabet, search space and mixed-radix candidate generation
//! - `digest`: Hash algorithms and digest values
//! - `target`: The set of hashes to recover
//! - `worker`: Partitioning, worker threads and search coordination
//! - `config`: Runtime configuration

pub mod candidate;
pub mod config;
pub mod digest;
pub mod target;
pub mod worker;

pub use candidate::{SearchSpace, MAX_LENGTH};
pub use config::{Config, ConfigError};
pub use digest::{Digest, DigestAlgorithm};
pub use target::{TargetError, TargetSet};
pub use worker::{
    crack, CrackOptions, CrackPool, CrackReport, CrackResult, PartitionStrategy, PoolEvent,
    SearchOutcome,
};
