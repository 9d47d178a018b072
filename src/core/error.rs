//! Error types for scheduler operations.

use thiserror::Error;

use super::message::{Message, MessageKind, WorkItemId};
use super::work_item::WorkItemState;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The integrator was handed an event where a side effect was expected.
    ///
    /// This is a structural violation and aborts the batch.
    #[error("unknown message kind: expected a side effect, got {0}")]
    UnknownMessageKind(MessageKind),
    /// A caller-supplied action returned an error or panicked.
    #[error("action failed for work item {id}: {reason}")]
    ActionFailed {
        /// Item whose action failed.
        id: WorkItemId,
        /// Rendered failure.
        reason: String,
    },
    /// The integrator answered a side effect with an event that does not
    /// confirm it (wrong item or wrong step).
    #[error("integrator answered {side_effect} with {actual}, expected {expected}")]
    UnexpectedConfirmation {
        /// Side effect that was handed to the integrator.
        side_effect: Message,
        /// The confirming event.
        expected: Message,
        /// What the integrator returned.
        actual: Message,
    },
    /// An operation was invoked in a state that does not allow it.
    #[error("work item {id} cannot {operation} while {state}")]
    InvalidTransition {
        /// Item the operation was invoked on.
        id: WorkItemId,
        /// Operation name.
        operation: &'static str,
        /// State the item was in.
        state: WorkItemState,
    },
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Runtime failure (thread spawn, join, blocking pool).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Application-facing result using anyhow for caller-supplied actions.
pub type AppResult<T> = Result<T, anyhow::Error>;
