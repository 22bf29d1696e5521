//! The set of hashes a search is looking for.

mod set;

pub use set::{TargetError, TargetSet};
