use tracing::trace;

use crate::core::{Clock, ProgressRecord, compute_progress};

/// Holder of the most recently computed progress record.
///
/// There is exactly one writer (`recompute_now`) and the stored record is
/// overwritten in place; no history is kept.
#[derive(Debug)]
pub struct ProgressState<C: Clock> {
    clock: C,
    last: Option<ProgressRecord>,
    generation: u64,
}

impl<C: Clock> ProgressState<C> {
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: None,
            generation: 0,
        }
    }

    /// Computes a record for the clock's current instant, stores and returns it.
    pub fn recompute_now(&mut self) -> &ProgressRecord {
        let record = compute_progress(&self.clock.now());
        self.generation += 1;
        trace!(
            generation = self.generation,
            percentage = record.percentage,
            "recomputed progress"
        );
        self.last.insert(record)
    }

    /// Returns the stored record without recomputing.
    ///
    /// `None` only before the first `recompute_now`.
    #[must_use]
    pub fn read_last(&self) -> Option<&ProgressRecord> {
        self.last.as_ref()
    }

    /// Number of recomputations performed so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
