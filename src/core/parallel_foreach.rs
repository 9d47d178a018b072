//! Fixed pool of slots sharing one closed work queue.

use std::thread;

use tracing::{debug, error};

use super::error::SchedulerError;
use super::slot::Slot;
use super::work_item::{SharedWorkItem, WorkItemState};
use crate::infra::WorkQueue;

/// Runs rounds of concurrent slot execution over one batch.
///
/// Each round spawns named OS threads inside a thread scope; the end of the
/// scope is the barrier. No round starts before the previous one has
/// returned, and the queue is never refilled.
///
/// Only slots that can make progress get a thread: every stalled slot, plus
/// at most one idle slot per queued item. The remaining idle slots rest
/// inline, so a round never runs more threads than there are items.
#[derive(Debug)]
pub struct ParallelForeach {
    slots: Vec<Slot>,
    queue: WorkQueue,
    state: WorkItemState,
    rounds: u64,
}

impl ParallelForeach {
    /// Allocate `max_parallelism` slots and enqueue every item once.
    pub fn new<I>(max_parallelism: usize, items: I) -> Self
    where
        I: IntoIterator<Item = SharedWorkItem>,
    {
        let queue = WorkQueue::from_items(items);
        let slots = (1..=max_parallelism).map(Slot::new).collect();
        debug!(
            slots = max_parallelism,
            items = queue.capacity(),
            "ParallelForeach created"
        );
        Self {
            slots,
            queue,
            state: WorkItemState::Unexecuted,
            rounds: 0,
        }
    }

    /// Aggregate state after the last round.
    #[must_use]
    pub const fn state(&self) -> WorkItemState {
        self.state
    }

    /// Rounds run so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }

    /// The slot pool.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Items still waiting in the queue.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Run one round: every slot executes concurrently, then the aggregate
    /// state is recomputed. `Executing` if any slot is still executing
    /// (stalled slots included), otherwise `Completed`.
    ///
    /// # Errors
    ///
    /// `Internal` if a slot thread cannot be spawned or panics.
    pub fn execute(&mut self) -> Result<WorkItemState, SchedulerError> {
        self.rounds += 1;
        let round = self.rounds;
        debug!(round, slots = self.slots.len(), "Executing ParallelForeach");

        let queue = &self.queue;
        let slots = &mut self.slots;
        let mut idle_budget = queue.len();
        thread::scope(|scope| -> Result<(), SchedulerError> {
            let mut handles = Vec::new();
            for slot in slots.iter_mut() {
                if !slot.is_stalled() {
                    if idle_budget == 0 {
                        slot.rest();
                        continue;
                    }
                    idle_budget -= 1;
                }
                let index = slot.index();
                let handle = thread::Builder::new()
                    .name(format!("octo-slot-{index}"))
                    .spawn_scoped(scope, move || slot.execute(queue))
                    .map_err(|e| {
                        error!(slot = index, error = %e, "Failed to spawn slot thread");
                        SchedulerError::Internal(format!("failed to spawn slot {index}: {e}"))
                    })?;
                handles.push((index, handle));
            }
            debug!(round, threads = handles.len(), "Slot threads spawned");
            for (index, handle) in handles {
                handle.join().map_err(|_| {
                    error!(slot = index, "Slot thread panicked");
                    SchedulerError::Internal(format!("slot {index} panicked"))
                })?;
            }
            Ok(())
        })?;

        self.state = if self
            .slots
            .iter()
            .any(|s| s.state() == WorkItemState::Executing)
        {
            WorkItemState::Executing
        } else {
            WorkItemState::Completed
        };
        debug!(round, state = %self.state, remaining = self.queue.len(), "ParallelForeach round finished");
        Ok(self.state)
    }
}
