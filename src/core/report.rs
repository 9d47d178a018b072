//! Final per-item outcome of a batch.

use serde::{Deserialize, Serialize};

use super::message::WorkItemId;
use super::work_item::{WorkItem, WorkItemState};

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// The pool reported `Completed`: every slot drained the queue.
    Drained,
    /// The optional round limit was hit first.
    RoundLimitReached,
}

/// Final state of one work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReport {
    /// Item id.
    pub id: WorkItemId,
    /// Item label.
    pub label: String,
    /// State at loop termination.
    pub state: WorkItemState,
    /// Action failure, if any.
    pub failure: Option<String>,
}

impl From<&WorkItem> for ItemReport {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id(),
            label: item.label().to_string(),
            state: item.state(),
            failure: item.failure().map(str::to_string),
        }
    }
}

/// Everything the caller learns about a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Rounds executed.
    pub rounds: u64,
    /// Why the loop stopped.
    pub outcome: BatchOutcome,
    /// One entry per item, in batch order.
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    /// Items that reached `Completed`.
    pub fn completed(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|i| i.state == WorkItemState::Completed)
    }

    /// Items that did not reach `Completed`, failed ones included.
    pub fn unresolved(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|i| i.state != WorkItemState::Completed)
    }

    /// Items whose action failed.
    pub fn failed(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| i.failure.is_some())
    }

    /// Whether every item completed.
    #[must_use]
    pub fn is_fully_completed(&self) -> bool {
        self.unresolved().next().is_none()
    }
}
