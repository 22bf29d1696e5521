//! Parallel search execution.
//!
//! This module provides:
//! - Partitioning of the search space into per-worker units
//! - Multi-threaded CPU workers
//! - Per-run shared state with exactly-once target accounting
//! - The pool that coordinates a run and reports its outcome

mod cpu;
mod partition;
mod pool;
mod state;

pub use cpu::{Worker, WorkerExit};
pub use partition::{partition, IndexRange, PartitionStrategy, WorkUnit};
pub use pool::{crack, CrackOptions, CrackPool, CrackReport, CrackResult, PoolEvent, SearchOutcome};
pub use state::{Claim, CrackState};
