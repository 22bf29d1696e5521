//! Search coordination across a pool of workers.

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::candidate::{IndexOutOfRange, SearchSpace};
use crate::digest::Digest;
use crate::target::TargetSet;

use super::cpu::{Worker, WorkerExit};
use super::partition::{partition, PartitionStrategy, WorkUnit};
use super::state::CrackState;

/// How often [`crack`] polls for results and the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A recovered password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackResult {
    /// The candidate that hashed to a target
    pub password: String,
    /// The matched target digest
    pub digest: Digest,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// Search parameters other than the targets and the space.
#[derive(Debug, Clone)]
pub struct CrackOptions {
    /// Number of workers to partition the space across
    pub workers: usize,
    /// How the space is partitioned
    pub strategy: PartitionStrategy,
    /// Wall-clock limit after which the search is stopped
    pub deadline: Option<Duration>,
}

impl Default for CrackOptions {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            strategy: PartitionStrategy::default(),
            deadline: None,
        }
    }
}

/// What [`CrackPool::wait_event`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// A target was cracked
    Found(CrackResult),
    /// The timeout elapsed with nothing to report
    Idle,
    /// Every worker has exited and every result has been delivered
    Finished,
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every target was cracked
    AllFound,
    /// The whole space was searched with targets remaining
    Exhausted,
    /// The search was stopped before finishing
    Stopped,
    /// The deadline expired before finishing
    DeadlineExceeded,
    /// A worker failed, so part of the space was never searched
    Aborted,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchOutcome::AllFound => write!(f, "all hashes cracked"),
            SearchOutcome::Exhausted => write!(f, "search space exhausted"),
            SearchOutcome::Stopped => write!(f, "stopped"),
            SearchOutcome::DeadlineExceeded => write!(f, "deadline exceeded"),
            SearchOutcome::Aborted => write!(f, "aborted after a worker failure"),
        }
    }
}

/// Final result of a search run. Partial results are normal, not errors.
#[derive(Debug, Clone)]
pub struct CrackReport {
    /// Recovered passwords, in the order they were reported
    pub found: Vec<CrackResult>,
    /// Targets with no recovered password, in input order
    pub uncracked: Vec<Digest>,
    /// Number of distinct targets found
    pub found_count: usize,
    /// Number of distinct targets searched for
    pub total_targets: usize,
    /// Candidates evaluated across all workers
    pub candidates_tried: u64,
    /// Wall-clock duration of the search
    pub elapsed: Duration,
    /// How the search ended
    pub outcome: SearchOutcome,
}

impl CrackReport {
    /// Returns true if every target was cracked.
    pub fn is_complete(&self) -> bool {
        self.uncracked.is_empty()
    }

    /// Returns the password recovered for `digest`, if any.
    pub fn password_for(&self, digest: &Digest) -> Option<&str> {
        self.found
            .iter()
            .find(|result| &result.digest == digest)
            .map(|result| result.password.as_str())
    }
}

type WorkerHandle = JoinHandle<Result<WorkerExit, IndexOutOfRange>>;

/// Owns one search run: its shared state, its workers and their results.
///
/// Workers start when the pool is created. Matches are delivered through
/// [`wait_event`](Self::wait_event); [`finish`](Self::finish) stops the run
/// and produces the report.
pub struct CrackPool {
    /// Targets being searched for
    targets: Arc<TargetSet>,
    /// The space being searched
    space: SearchSpace,
    /// Number of workers started
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<WorkerHandle>>,
    /// Channel receiver for results
    result_rx: Receiver<CrackResult>,
    /// Results delivered so far
    found: Vec<CrackResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared search progress
    state: Arc<CrackState>,
    /// Instant the deadline expires, if any
    deadline: Option<Instant>,
    /// Whether the deadline stopped the search
    deadline_hit: bool,
    /// Start time
    start_time: Instant,
}

impl CrackPool {
    /// Partitions `space` and starts one worker per work unit.
    ///
    /// An empty target set starts no workers.
    pub fn new(targets: TargetSet, space: SearchSpace, options: CrackOptions) -> io::Result<Self> {
        let targets = Arc::new(targets);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let state = Arc::new(CrackState::new(targets.len(), stop_flag.clone()));

        // Each target is reported at most once, so sends never block.
        let (result_tx, result_rx) = bounded(targets.len().max(1));

        let units = if targets.is_empty() {
            Vec::new()
        } else {
            partition(&space, options.workers, options.strategy)
        };
        tracing::debug!(
            targets = targets.len(),
            candidates = space.size(),
            workers = units.len(),
            strategy = %options.strategy,
            "starting search"
        );
        for unit in &units {
            tracing::trace!(worker = unit.worker_id, ranges = ?unit.ranges, "work unit");
        }

        let num_workers = units.len();
        let start_time = Instant::now();
        let handles = Self::spawn_workers(units, &targets, &state, result_tx)?;

        Ok(Self {
            targets,
            space,
            num_workers,
            handles: Some(handles),
            result_rx,
            found: Vec::new(),
            stop_flag,
            state,
            deadline: options
                .deadline
                .and_then(|limit| start_time.checked_add(limit)),
            deadline_hit: false,
            start_time,
        })
    }

    /// Spawns worker threads.
    fn spawn_workers(
        units: Vec<WorkUnit>,
        targets: &Arc<TargetSet>,
        state: &Arc<CrackState>,
        result_tx: Sender<CrackResult>,
    ) -> io::Result<Vec<WorkerHandle>> {
        let mut handles = Vec::with_capacity(units.len());

        for unit in units {
            let id = unit.worker_id;
            let worker = Worker::new(unit, targets.clone(), state.clone(), result_tx.clone());

            let spawned = thread::Builder::new()
                .name(format!("crack-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    state.stop();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e);
                }
            }
        }

        Ok(handles)
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// The deadline, if any, is enforced here: once it passes the workers are
    /// stopped and the remaining events drain to [`PoolEvent::Finished`].
    pub fn wait_event(&mut self, timeout: Duration) -> PoolEvent {
        self.enforce_deadline();

        let timeout = match self.deadline {
            Some(deadline) if !self.is_stopped() => {
                timeout.min(deadline.saturating_duration_since(Instant::now()))
            }
            _ => timeout,
        };

        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => {
                self.found.push(result.clone());
                PoolEvent::Found(result)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.enforce_deadline();
                PoolEvent::Idle
            }
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Finished,
        }
    }

    fn enforce_deadline(&mut self) {
        let Some(deadline) = self.deadline else {
            return;
        };
        // Only a deadline that raises the stop itself counts as hit.
        if !self.is_stopped() && Instant::now() >= deadline {
            tracing::info!(
                elapsed_ms = self.elapsed().as_millis() as u64,
                "deadline reached, stopping workers"
            );
            self.deadline_hit = true;
            self.stop();
        }
    }

    /// Stops the search and waits for every worker.
    pub fn finish(mut self) -> CrackReport {
        self.stop();

        // Collect results sent before the workers observed the stop flag.
        while let Ok(result) = self.result_rx.recv() {
            self.found.push(result);
        }

        let (exits, failed) = self.join_workers();
        let outcome = resolve_outcome(
            self.state.found_count() == self.state.total_targets(),
            &exits,
            failed,
            self.deadline_hit,
        );

        let uncracked = self
            .targets
            .hashes()
            .iter()
            .enumerate()
            .filter(|(position, _)| !self.state.is_claimed(*position))
            .map(|(_, digest)| *digest)
            .collect();

        CrackReport {
            found: std::mem::take(&mut self.found),
            uncracked,
            found_count: self.state.found_count(),
            total_targets: self.state.total_targets(),
            candidates_tried: self.state.candidates_tried(),
            elapsed: self.elapsed(),
            outcome,
        }
    }

    /// Joins every worker, returning the clean exits and the number of
    /// workers that aborted or panicked.
    fn join_workers(&mut self) -> (Vec<WorkerExit>, usize) {
        let Some(handles) = self.handles.take() else {
            return (Vec::new(), 0);
        };

        let mut exits = Vec::with_capacity(handles.len());
        let mut failed = 0;
        for handle in handles {
            match handle.join() {
                Ok(Ok(exit)) => exits.push(exit),
                // The worker has already logged the error.
                Ok(Err(_)) => failed += 1,
                Err(_) => {
                    tracing::error!("worker thread panicked");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            tracing::error!(failed, "workers failed, part of the space was not searched");
        }
        (exits, failed)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns the number of workers started.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the targets being searched for.
    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    /// Returns the space being searched.
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// Returns the number of candidates evaluated so far.
    pub fn candidates_tried(&self) -> u64 {
        self.state.candidates_tried()
    }

    /// Returns the number of distinct targets found so far.
    pub fn found_count(&self) -> usize {
        self.state.found_count()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current evaluation rate (candidates per second).
    pub fn candidates_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.candidates_tried() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for CrackPool {
    fn drop(&mut self) {
        self.stop();
        // Wait for workers to finish if they haven't been joined
        self.join_workers();
    }
}

/// Decides how a run ended from the final found state and the worker exits.
///
/// Failed workers leave part of the space unsearched, so the run is never
/// reported as exhausted once one has failed.
fn resolve_outcome(
    all_found: bool,
    exits: &[WorkerExit],
    failed: usize,
    deadline_hit: bool,
) -> SearchOutcome {
    if all_found {
        SearchOutcome::AllFound
    } else if failed > 0 {
        SearchOutcome::Aborted
    } else if exits.contains(&WorkerExit::Cancelled) {
        if deadline_hit {
            SearchOutcome::DeadlineExceeded
        } else {
            SearchOutcome::Stopped
        }
    } else {
        SearchOutcome::Exhausted
    }
}

/// Runs a search to completion and returns its report.
pub fn crack(targets: TargetSet, space: SearchSpace, options: CrackOptions) -> io::Result<CrackReport> {
    let mut pool = CrackPool::new(targets, space, options)?;
    loop {
        if pool.wait_event(POLL_INTERVAL) == PoolEvent::Finished {
            break;
        }
    }
    Ok(pool.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;

    fn sha1_targets(words: &[&str]) -> TargetSet {
        TargetSet::new(
            DigestAlgorithm::Sha1,
            words
                .iter()
                .map(|w| DigestAlgorithm::Sha1.digest(w.as_bytes())),
        )
    }

    fn options(workers: usize) -> CrackOptions {
        CrackOptions {
            workers,
            ..CrackOptions::default()
        }
    }

    #[test]
    fn test_empty_targets_finish_immediately() {
        let space = SearchSpace::new(1, 5).unwrap();
        let mut pool = CrackPool::new(sha1_targets(&[]), space, options(4)).unwrap();
        assert_eq!(pool.num_workers(), 0);
        assert_eq!(pool.wait_event(Duration::from_secs(1)), PoolEvent::Finished);

        let report = pool.finish();
        assert_eq!(report.outcome, SearchOutcome::AllFound);
        assert_eq!(report.candidates_tried, 0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_events_then_finished() {
        let space = SearchSpace::new(1, 2).unwrap();
        let mut pool = CrackPool::new(sha1_targets(&["q", "zz"]), space, options(2)).unwrap();

        let mut found = Vec::new();
        loop {
            match pool.wait_event(Duration::from_secs(5)) {
                PoolEvent::Found(result) => found.push(result.password),
                PoolEvent::Idle => {}
                PoolEvent::Finished => break,
            }
        }
        found.sort();
        assert_eq!(found, vec!["q".to_string(), "zz".to_string()]);

        let report = pool.finish();
        assert_eq!(report.outcome, SearchOutcome::AllFound);
        assert_eq!(report.found.len(), 2);
        assert_eq!(report.found_count, 2);
    }

    #[test]
    fn test_single_worker_stops_at_match() {
        let space = SearchSpace::new(1, 4).unwrap();
        let report = crack(sha1_targets(&["a"]), space, options(1)).unwrap();

        assert_eq!(report.outcome, SearchOutcome::AllFound);
        assert_eq!(report.candidates_tried, 1);
        assert_eq!(report.found[0].worker_id, 0);
    }

    #[test]
    fn test_exhausted_reports_uncracked() {
        let space = SearchSpace::new(1, 2).unwrap();
        let report = crack(sha1_targets(&["abc", "ok"]), space, options(3)).unwrap();

        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert_eq!(report.candidates_tried, space.size());
        assert_eq!(report.found_count, 1);
        assert_eq!(
            report.uncracked,
            vec![DigestAlgorithm::Sha1.digest(b"abc")]
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn test_finish_early_is_stopped() {
        let space = SearchSpace::new(1, 7).unwrap();
        let pool = CrackPool::new(sha1_targets(&["abcdefgh"]), space, options(2)).unwrap();

        let report = pool.finish();
        assert_eq!(report.outcome, SearchOutcome::Stopped);
        assert_eq!(report.found_count, 0);
        assert_eq!(report.uncracked.len(), 1);
    }

    #[test]
    fn test_pool_keeps_space() {
        let space = SearchSpace::new(2, 4).unwrap();
        let pool = CrackPool::new(sha1_targets(&["zzzz"]), space, options(2)).unwrap();
        assert_eq!(*pool.space(), space);
        assert_eq!(pool.space().size(), 676 + 17_576 + 456_976);
    }

    #[test]
    fn test_failed_worker_is_never_exhausted() {
        use WorkerExit::{Cancelled, Exhausted};

        assert_eq!(
            resolve_outcome(false, &[Exhausted], 1, false),
            SearchOutcome::Aborted
        );
        assert_eq!(
            resolve_outcome(false, &[], 2, false),
            SearchOutcome::Aborted
        );
        assert_eq!(
            resolve_outcome(false, &[Cancelled], 1, true),
            SearchOutcome::Aborted
        );
        // Every target was found anyway; the failure does not matter.
        assert_eq!(
            resolve_outcome(true, &[Exhausted], 1, false),
            SearchOutcome::AllFound
        );
        assert_eq!(
            resolve_outcome(false, &[Exhausted, Exhausted], 0, false),
            SearchOutcome::Exhausted
        );
    }

    #[test]
    fn test_cancelled_outcome_follows_deadline() {
        let exits = [WorkerExit::Exhausted, WorkerExit::Cancelled];
        assert_eq!(
            resolve_outcome(false, &exits, 0, false),
            SearchOutcome::Stopped
        );
        assert_eq!(
            resolve_outcome(false, &exits, 0, true),
            SearchOutcome::DeadlineExceeded
        );
    }

    #[test]
    fn test_password_for() {
        let space = SearchSpace::new(2, 2).unwrap();
        let report = crack(sha1_targets(&["hi"]), space, options(2)).unwrap();
        let digest = DigestAlgorithm::Sha1.digest(b"hi");
        assert_eq!(report.password_for(&digest), Some("hi"));
    }
}
