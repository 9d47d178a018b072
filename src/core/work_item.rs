//! Work items and their state machine.
//!
//! Two variants share one capability set:
//!
//! - [`ProceduralWorkItem`] runs its action to completion inside `execute`.
//! - [`EventDrivenWorkItem`] only *requests* a start in `execute`, then walks
//!   a two-phase start/finish protocol driven by inbound events. It never
//!   blocks a thread while waiting; waiting is represented purely as state.
//!
//! State only moves forward: `Unexecuted -> Executing -> Completed`. The
//! action runs at most once, on the transition into `Completed`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::{AppResult, SchedulerError};
use super::message::{Message, WorkItemId};
use crate::infra::SideEffectMailbox;

/// Externally visible lifecycle state of a work item (and of slots and pools).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemState {
    /// Not started.
    #[default]
    Unexecuted,
    /// Started, not yet completed.
    Executing,
    /// Done; the action has run.
    Completed,
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unexecuted => "unexecuted",
            Self::Executing => "executing",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Deferred unit of work supplied by the caller.
pub type Action = Box<dyn FnOnce() -> AppResult<()> + Send + 'static>;

/// Work item shared between the queue, a slot, and the event loop.
pub type SharedWorkItem = Arc<Mutex<WorkItem>>;

/// Run an action, turning both `Err` and panics into a rendered reason.
fn invoke(action: Action) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".into());
            Err(format!("action panicked: {reason}"))
        }
    }
}

/// Fields and transitions common to both variants.
struct Core {
    id: WorkItemId,
    label: String,
    action: Option<Action>,
    state: WorkItemState,
    failure: Option<String>,
}

impl Core {
    fn new(id: WorkItemId, label: String, action: Action) -> Self {
        Self {
            id,
            label,
            action: Some(action),
            state: WorkItemState::Unexecuted,
            failure: None,
        }
    }

    fn ensure(&self, operation: &'static str, expected: WorkItemState) -> Result<(), SchedulerError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SchedulerError::InvalidTransition {
                id: self.id,
                operation,
                state: self.state,
            })
        }
    }

    /// Run the action and move to `Completed`; on failure stay `Executing`.
    fn complete(&mut self) -> Result<(), SchedulerError> {
        let Some(action) = self.action.take() else {
            return Err(SchedulerError::InvalidTransition {
                id: self.id,
                operation: "complete",
                state: self.state,
            });
        };
        match invoke(action) {
            Ok(()) => {
                self.state = WorkItemState::Completed;
                debug!(item_id = %self.id, label = %self.label, "Work item completed");
                Ok(())
            }
            Err(reason) => {
                warn!(item_id = %self.id, label = %self.label, %reason, "Work item action failed");
                self.failure = Some(reason.clone());
                Err(SchedulerError::ActionFailed { id: self.id, reason })
            }
        }
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

/// Work item that runs its action synchronously inside `execute`.
#[derive(Debug)]
pub struct ProceduralWorkItem {
    core: Core,
}

impl ProceduralWorkItem {
    /// Create an item with an explicit id.
    pub fn new<F>(id: WorkItemId, label: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> AppResult<()> + Send + 'static,
    {
        Self {
            core: Core::new(id, label.into(), Box::new(action)),
        }
    }

    /// Create an item with a fresh random id.
    pub fn create<F>(label: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> AppResult<()> + Send + 'static,
    {
        Self::new(Uuid::new_v4(), label, action)
    }

    /// Run the action to completion.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the item is `Unexecuted`.
    /// - `ActionFailed` if the action fails; the item is left `Executing`.
    pub fn execute(&mut self) -> Result<(), SchedulerError> {
        self.core.ensure("execute", WorkItemState::Unexecuted)?;
        debug!(item_id = %self.core.id, label = %self.core.label, "Executing work item");
        self.core.state = WorkItemState::Executing;
        self.core.complete()
    }
}

/// Internal progress of an event-driven item while it reports `Executing`.
///
/// Leaving `Idle` is what emits the start request, so it is emitted once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingStart,
    AwaitingFinish,
}

/// Work item driven by a start/finish request-confirm protocol.
#[derive(Debug)]
pub struct EventDrivenWorkItem {
    core: Core,
    phase: Phase,
    mailbox: SideEffectMailbox,
}

impl EventDrivenWorkItem {
    /// Create an item with an explicit id.
    pub fn new<F>(id: WorkItemId, label: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> AppResult<()> + Send + 'static,
    {
        Self {
            core: Core::new(id, label.into(), Box::new(action)),
            phase: Phase::Idle,
            mailbox: SideEffectMailbox::new(),
        }
    }

    /// Create an item with a fresh random id.
    pub fn create<F>(label: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> AppResult<()> + Send + 'static,
    {
        Self::new(Uuid::new_v4(), label, action)
    }

    /// Request a start. Does not run the action.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the item is `Unexecuted`.
    pub fn execute(&mut self) -> Result<(), SchedulerError> {
        self.core.ensure("execute", WorkItemState::Unexecuted)?;
        debug!(item_id = %self.core.id, label = %self.core.label, "Executing work item");
        self.mailbox.push(Message::StartSideEffect(self.core.id));
        self.core.state = WorkItemState::Executing;
        self.phase = Phase::AwaitingStart;
        Ok(())
    }

    /// Take every pending side effect.
    pub fn consume_side_effects(&mut self) -> Vec<Message> {
        self.mailbox.drain()
    }

    /// Pending side effects, without draining them.
    #[must_use]
    pub fn pending_side_effects(&self) -> &[Message] {
        self.mailbox.peek()
    }

    /// Feed an inbound event. Events for other items are ignored.
    ///
    /// # Errors
    ///
    /// `ActionFailed` if a matching `FinishedEvent` runs an action that fails.
    pub fn handle(&mut self, event: &Message) -> Result<(), SchedulerError> {
        if event.id() != self.core.id {
            return Ok(());
        }
        match event {
            Message::StartedEvent(_) => {
                self.handle_started();
                Ok(())
            }
            Message::FinishedEvent(_) => self.handle_finished(),
            Message::StartSideEffect(_) | Message::FinishSideEffect(_) => Ok(()),
        }
    }

    fn handle_started(&mut self) {
        if self.phase != Phase::AwaitingStart {
            debug!(item_id = %self.core.id, phase = ?self.phase, "Ignoring started event");
            return;
        }
        debug!(item_id = %self.core.id, label = %self.core.label, "Handling started event");
        self.mailbox.push(Message::FinishSideEffect(self.core.id));
        self.phase = Phase::AwaitingFinish;
    }

    fn handle_finished(&mut self) -> Result<(), SchedulerError> {
        if self.core.state != WorkItemState::Executing || self.core.action.is_none() {
            debug!(item_id = %self.core.id, state = %self.core.state, "Ignoring finished event");
            return Ok(());
        }
        debug!(item_id = %self.core.id, label = %self.core.label, "Handling finished event");
        self.core.complete()
    }
}

/// Closed set of work-item variants.
#[derive(Debug)]
pub enum WorkItem {
    /// Runs to completion in one call.
    Procedural(ProceduralWorkItem),
    /// Suspends between start and finish confirmations.
    EventDriven(EventDrivenWorkItem),
}

impl WorkItem {
    const fn core(&self) -> &Core {
        match self {
            Self::Procedural(item) => &item.core,
            Self::EventDriven(item) => &item.core,
        }
    }

    /// Stable id.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        self.core().id
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.core().label
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> WorkItemState {
        self.core().state
    }

    /// Rendered reason of a failed action, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.core().failure.as_deref()
    }

    /// Whether the item failed and can no longer progress.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.core().failure.is_some()
    }

    /// Whether the item will not change state again (completed or failed).
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.state(), WorkItemState::Completed) || self.is_failed()
    }

    /// Execute the item; see the variant methods.
    ///
    /// # Errors
    ///
    /// Propagates `InvalidTransition` and `ActionFailed` from the variant.
    pub fn execute(&mut self) -> Result<(), SchedulerError> {
        match self {
            Self::Procedural(item) => item.execute(),
            Self::EventDriven(item) => item.execute(),
        }
    }

    /// Feed an inbound event; procedural items ignore events.
    ///
    /// # Errors
    ///
    /// `ActionFailed` if the event completes an item whose action fails.
    pub fn handle(&mut self, event: &Message) -> Result<(), SchedulerError> {
        match self {
            Self::Procedural(_) => Ok(()),
            Self::EventDriven(item) => item.handle(event),
        }
    }

    /// Take pending side effects; procedural items never have any.
    pub fn consume_side_effects(&mut self) -> Vec<Message> {
        match self {
            Self::Procedural(_) => Vec::new(),
            Self::EventDriven(item) => item.consume_side_effects(),
        }
    }

    /// Wrap for sharing between the queue, slots, and the event loop.
    #[must_use]
    pub fn into_shared(self) -> SharedWorkItem {
        Arc::new(Mutex::new(self))
    }
}

impl From<ProceduralWorkItem> for WorkItem {
    fn from(item: ProceduralWorkItem) -> Self {
        Self::Procedural(item)
    }
}

impl From<EventDrivenWorkItem> for WorkItem {
    fn from(item: EventDrivenWorkItem) -> Self {
        Self::EventDriven(item)
    }
}
