//! CPU worker for exhaustive candidate search.

use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::candidate::{CandidateCursor, IndexOutOfRange};
use crate::target::TargetSet;

use super::partition::WorkUnit;
use super::state::{Claim, CrackState};
use super::CrackResult;

/// Why a worker returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// This worker found the last outstanding target
    Completed,
    /// The stop flag was raised
    Cancelled,
    /// Every candidate in the unit was evaluated
    Exhausted,
}

/// A CPU worker that enumerates its unit and tests each candidate.
pub struct Worker {
    /// The ranges to enumerate
    unit: WorkUnit,
    /// Targets and their digest algorithm
    targets: Arc<TargetSet>,
    /// State shared with the other workers of this run
    state: Arc<CrackState>,
    /// Channel to send results
    result_tx: Sender<CrackResult>,
}

impl Worker {
    /// Number of candidates between updates of the shared counter.
    const STATS_BATCH: u64 = 1024;

    /// Creates a new worker.
    pub fn new(
        unit: WorkUnit,
        targets: Arc<TargetSet>,
        state: Arc<CrackState>,
        result_tx: Sender<CrackResult>,
    ) -> Self {
        Self {
            unit,
            targets,
            state,
            result_tx,
        }
    }

    /// Runs the worker loop.
    ///
    /// Candidates are generated, hashed and looked up in order until:
    /// - This worker finds the last outstanding target
    /// - The stop flag is set (checked before every candidate)
    /// - The unit is exhausted
    pub fn run(&self) -> Result<WorkerExit, IndexOutOfRange> {
        tracing::debug!(
            worker = self.id(),
            candidates = self.unit.candidate_count(),
            "worker started"
        );

        let mut pending = 0u64;
        let exit = self.search(&mut pending);
        self.state.record_candidates(pending);

        match &exit {
            Ok(reason) => tracing::debug!(worker = self.id(), ?reason, "worker terminated"),
            Err(e) => tracing::error!(worker = self.id(), error = %e, "worker aborted"),
        }
        exit
    }

    fn search(&self, pending: &mut u64) -> Result<WorkerExit, IndexOutOfRange> {
        let algorithm = self.targets.algorithm();

        for range in &self.unit.ranges {
            let mut cursor = CandidateCursor::new(range.length, range.start, range.end)?;

            while let Some(candidate) = cursor.advance() {
                if self.state.is_stopped() {
                    return Ok(WorkerExit::Cancelled);
                }

                *pending += 1;
                if *pending == Self::STATS_BATCH {
                    self.state.record_candidates(Self::STATS_BATCH);
                    *pending = 0;
                }

                let digest = algorithm.digest(candidate);
                let Some(position) = self.targets.position(&digest) else {
                    continue;
                };

                let claim = self.state.claim(position);
                if claim == Claim::AlreadyClaimed {
                    continue;
                }

                let result = CrackResult {
                    password: String::from_utf8_lossy(candidate).into_owned(),
                    digest,
                    worker_id: self.id(),
                };
                // Channel capacity covers every target, so this never blocks.
                let _ = self.result_tx.send(result);

                if claim == Claim::Completed {
                    return Ok(WorkerExit::Completed);
                }
            }
        }

        Ok(WorkerExit::Exhausted)
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.unit.worker_id
    }
}
