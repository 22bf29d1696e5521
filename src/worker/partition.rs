//! Splitting a search space into per-worker units.

use std::str::FromStr;

use crate::candidate::{bounded_space_size, SearchSpace, MAX_LENGTH};

/// How the search space is divided between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionStrategy {
    /// Equal-sized contiguous slices of the whole space, one per worker
    #[default]
    Balanced,
    /// One unit for every length below the maximum, one for the maximum
    ByLength,
}

impl FromStr for PartitionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balanced" | "even" => Ok(PartitionStrategy::Balanced),
            "by-length" | "bylength" | "length" => Ok(PartitionStrategy::ByLength),
            _ => Err(format!("Unknown partition strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionStrategy::Balanced => write!(f, "balanced"),
            PartitionStrategy::ByLength => write!(f, "by-length"),
        }
    }
}

/// A half-open index range `start..end` within one candidate length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub length: usize,
    pub start: u64,
    pub end: u64,
}

impl IndexRange {
    /// The whole index space of `length`, or `None` past [`MAX_LENGTH`].
    pub fn full(length: usize) -> Option<Self> {
        if length > MAX_LENGTH {
            return None;
        }
        Some(Self {
            length,
            start: 0,
            end: bounded_space_size(length),
        })
    }

    /// Returns the number of candidates in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Returns true if the range holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The ranges one worker enumerates, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    pub worker_id: usize,
    pub ranges: Vec<IndexRange>,
}

impl WorkUnit {
    /// Returns the number of candidates assigned to this unit.
    pub fn candidate_count(&self) -> u64 {
        self.ranges.iter().map(IndexRange::len).sum()
    }
}

/// Divides `space` into at most `workers` units.
///
/// Every (length, index) pair of the space lands in exactly one range, and
/// no unit or range is empty.
pub fn partition(space: &SearchSpace, workers: usize, strategy: PartitionStrategy) -> Vec<WorkUnit> {
    match strategy {
        PartitionStrategy::Balanced => balanced(space, workers.max(1)),
        PartitionStrategy::ByLength => by_length(space),
    }
}

/// Cuts the concatenation of all lengths into slices whose sizes differ by
/// at most one candidate.
fn balanced(space: &SearchSpace, workers: usize) -> Vec<WorkUnit> {
    let total = space.size();
    let slots = workers as u64;
    let base = total / slots;
    let extra = total % slots;

    let mut units = Vec::new();
    let mut length = space.min_length();
    let mut offset = 0u64;

    for slot in 0..slots {
        let mut quota = base + u64::from(slot < extra);
        if quota == 0 {
            break;
        }

        let mut ranges = Vec::new();
        while quota > 0 {
            let size = bounded_space_size(length);
            let take = quota.min(size - offset);
            ranges.push(IndexRange {
                length,
                start: offset,
                end: offset + take,
            });

            offset += take;
            quota -= take;
            if offset == size {
                length += 1;
                offset = 0;
            }
        }

        units.push(WorkUnit {
            worker_id: units.len(),
            ranges,
        });
    }

    units
}

/// Shorter lengths in one unit, the longest length alone in another.
fn by_length(space: &SearchSpace) -> Vec<WorkUnit> {
    let mut units = Vec::with_capacity(2);

    let shorter: Vec<IndexRange> = (space.min_length()..space.max_length())
        .filter_map(IndexRange::full)
        .collect();
    if !shorter.is_empty() {
        units.push(WorkUnit {
            worker_id: 0,
            ranges: shorter,
        });
    }

    units.push(WorkUnit {
        worker_id: units.len(),
        ranges: IndexRange::full(space.max_length()).into_iter().collect(),
    });

    units
}
