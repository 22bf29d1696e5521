//! Progress shared by the workers of one search run.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Outcome of a worker claiming a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Another worker already reported this target
    AlreadyClaimed,
    /// First report of this target; others remain
    Claimed,
    /// First report of this target, and it was the last one outstanding
    Completed,
}

/// Per-run search state.
///
/// Each target has a claim flag so it is reported exactly once, and the
/// worker whose claim brings `found_count` up to the number of targets is
/// the only one that observes [`Claim::Completed`].
#[derive(Debug)]
pub struct CrackState {
    claimed: Vec<AtomicBool>,
    found_count: AtomicUsize,
    candidates_tried: AtomicU64,
    stop_flag: Arc<AtomicBool>,
}

impl CrackState {
    /// Creates state for `total_targets` targets, raising `stop_flag` once
    /// all of them are found.
    pub fn new(total_targets: usize, stop_flag: Arc<AtomicBool>) -> Self {
        Self {
            claimed: (0..total_targets).map(|_| AtomicBool::new(false)).collect(),
            found_count: AtomicUsize::new(0),
            candidates_tried: AtomicU64::new(0),
            stop_flag,
        }
    }

    /// Claims the target at `position`.
    pub fn claim(&self, position: usize) -> Claim {
        let Some(flag) = self.claimed.get(position) else {
            return Claim::AlreadyClaimed;
        };
        if flag.swap(true, Ordering::AcqRel) {
            return Claim::AlreadyClaimed;
        }

        let found = self.found_count.fetch_add(1, Ordering::AcqRel) + 1;
        if found == self.claimed.len() {
            self.stop();
            Claim::Completed
        } else {
            Claim::Claimed
        }
    }

    /// Returns true if the target at `position` has been found.
    pub fn is_claimed(&self, position: usize) -> bool {
        self.claimed
            .get(position)
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Returns the number of distinct targets found.
    pub fn found_count(&self) -> usize {
        self.found_count.load(Ordering::Acquire)
    }

    /// Returns the number of targets.
    pub fn total_targets(&self) -> usize {
        self.claimed.len()
    }

    /// Adds to the evaluated-candidate counter.
    #[inline]
    pub fn record_candidates(&self, count: u64) {
        self.candidates_tried.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns the number of candidates evaluated so far.
    pub fn candidates_tried(&self) -> u64 {
        self.candidates_tried.load(Ordering::Relaxed)
    }

    /// Signals every worker to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once a stop has been requested.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}
