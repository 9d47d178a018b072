//! Outbound side-effect mailbox owned by a work item.

use crate::core::Message;

/// Append-only buffer of pending side effects, emptied by [`drain`](Self::drain).
///
/// The work item fills it while executing or handling events; the event loop
/// drains it between rounds. A drained message is never handed out again.
#[derive(Debug, Default)]
pub struct SideEffectMailbox {
    pending: Vec<Message>,
}

impl SideEffectMailbox {
    /// Create an empty mailbox.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Append a side effect.
    pub fn push(&mut self, message: Message) {
        self.pending.push(message);
    }

    /// Take every pending message, leaving the mailbox empty.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.pending)
    }

    /// Number of pending messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Look at pending messages without draining them.
    #[must_use]
    pub fn peek(&self) -> &[Message] {
        &self.pending
    }
}
