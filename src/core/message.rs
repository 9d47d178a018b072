//! Side-effect and event messages exchanged between work items and the integrator.
//!
//! Side effects flow outward (a work item asks an external system to do
//! something); events flow inward (the external system confirms it). Every
//! message carries the id of the work item it concerns.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SchedulerError;

/// Stable identity of a work item.
pub type WorkItemId = Uuid;

/// Discriminant of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Request to start a work item.
    StartSideEffect,
    /// Confirmation that a work item was started.
    StartedEvent,
    /// Request to finish a work item.
    FinishSideEffect,
    /// Confirmation that a work item was finished.
    FinishedEvent,
}

impl MessageKind {
    /// Event kinds in protocol order; dispatch broadcasts them in this order.
    pub const EVENTS: [Self; 2] = [Self::StartedEvent, Self::FinishedEvent];

    /// Whether this kind travels from a work item toward the integrator.
    #[must_use]
    pub const fn is_side_effect(self) -> bool {
        matches!(self, Self::StartSideEffect | Self::FinishSideEffect)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StartSideEffect => "start side effect",
            Self::StartedEvent => "started event",
            Self::FinishSideEffect => "finish side effect",
            Self::FinishedEvent => "finished event",
        };
        f.write_str(name)
    }
}

/// A tagged message addressed to a single work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Message {
    /// Work item asks to be started.
    StartSideEffect(WorkItemId),
    /// Start was confirmed.
    StartedEvent(WorkItemId),
    /// Work item asks to be finished.
    FinishSideEffect(WorkItemId),
    /// Finish was confirmed.
    FinishedEvent(WorkItemId),
}

impl Message {
    /// Id of the work item this message concerns.
    #[must_use]
    pub const fn id(&self) -> WorkItemId {
        match *self {
            Self::StartSideEffect(id)
            | Self::StartedEvent(id)
            | Self::FinishSideEffect(id)
            | Self::FinishedEvent(id) => id,
        }
    }

    /// Discriminant of this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::StartSideEffect(_) => MessageKind::StartSideEffect,
            Self::StartedEvent(_) => MessageKind::StartedEvent,
            Self::FinishSideEffect(_) => MessageKind::FinishSideEffect,
            Self::FinishedEvent(_) => MessageKind::FinishedEvent,
        }
    }

    /// Whether this is an outbound side effect.
    #[must_use]
    pub const fn is_side_effect(&self) -> bool {
        self.kind().is_side_effect()
    }

    /// Whether this is an inbound event.
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_side_effect()
    }

    /// Map a side effect to the event that confirms it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::UnknownMessageKind`] when called on an event.
    pub fn confirm(self) -> Result<Self, SchedulerError> {
        match self {
            Self::StartSideEffect(id) => Ok(Self::StartedEvent(id)),
            Self::FinishSideEffect(id) => Ok(Self::FinishedEvent(id)),
            Self::StartedEvent(_) | Self::FinishedEvent(_) => {
                Err(SchedulerError::UnknownMessageKind(self.kind()))
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.id())
    }
}
