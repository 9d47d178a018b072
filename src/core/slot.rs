//! A single sequential worker of the parallel pool.

use tracing::debug;

use super::message::WorkItemId;
use super::work_item::{SharedWorkItem, WorkItemState};
use crate::infra::WorkQueue;

/// One worker that drains the shared queue item by item.
///
/// A slot holds on to the item it was last executing until that item settles.
/// While it holds an unsettled item it is *stalled*: it returns from its round
/// without touching the queue, and checks the item again next round.
#[derive(Debug)]
pub struct Slot {
    index: usize,
    current: Option<SharedWorkItem>,
    state: WorkItemState,
    executed: Vec<WorkItemId>,
    failed: Vec<WorkItemId>,
}

impl Slot {
    /// Create an idle slot. `index` is only used for diagnostics.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            current: None,
            state: WorkItemState::Unexecuted,
            executed: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Diagnostic index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// `Executing` while stalled or mid-round, `Completed` once drained.
    #[must_use]
    pub const fn state(&self) -> WorkItemState {
        self.state
    }

    /// Whether the slot is holding an item across rounds.
    #[must_use]
    pub const fn is_stalled(&self) -> bool {
        self.current.is_some()
    }

    /// Ids of items this slot has completed, in completion order.
    #[must_use]
    pub fn executed(&self) -> &[WorkItemId] {
        &self.executed
    }

    /// Ids of items this slot released after their action failed.
    #[must_use]
    pub fn failed(&self) -> &[WorkItemId] {
        &self.failed
    }

    /// Archive a settled item. Returns `false` if the item is still pending.
    fn release(&mut self, item: &SharedWorkItem) -> bool {
        let guard = item.lock();
        match (guard.state(), guard.is_failed()) {
            (WorkItemState::Completed, _) => {
                self.executed.push(guard.id());
                true
            }
            (_, true) => {
                self.failed.push(guard.id());
                true
            }
            _ => false,
        }
    }

    /// Finish a round with nothing to do, without touching the queue.
    pub(crate) fn rest(&mut self) {
        debug_assert!(self.current.is_none());
        self.state = WorkItemState::Completed;
    }

    /// Run one round against the shared queue.
    pub fn execute(&mut self, queue: &WorkQueue) {
        debug!(slot = self.index, "Executing slot (start)");
        self.state = WorkItemState::Executing;

        if let Some(item) = self.current.take() {
            if !self.release(&item) {
                self.current = Some(item);
                debug!(slot = self.index, "Executing slot (finish - incomplete)");
                return;
            }
        }

        while let Some(item) = queue.dequeue() {
            let completed = {
                let mut guard = item.lock();
                if let Err(err) = guard.execute() {
                    debug!(slot = self.index, item_id = %guard.id(), error = %err, "Work item did not complete");
                }
                guard.state() == WorkItemState::Completed
            };

            if completed {
                self.release(&item);
            } else {
                // A failed item is held for this round like any other
                // incomplete item and released at the start of the next.
                self.current = Some(item);
                debug!(slot = self.index, "Executing slot (finish - incomplete)");
                return;
            }
        }

        debug!(slot = self.index, executed = self.executed.len(), "Executing slot (finish - complete)");
        self.state = WorkItemState::Completed;
    }
}
