//! Closed, shared work queue for one batch.

use crossbeam_channel::{unbounded, Receiver, TryRecvError};

use crate::core::SharedWorkItem;

/// FIFO queue of not-yet-started work items, filled exactly once.
///
/// The sending half is dropped right after the batch is enqueued, so the
/// queue can only shrink. `dequeue` is safe to call from every slot thread at
/// once; each item is handed to exactly one caller.
#[derive(Debug)]
pub struct WorkQueue {
    rx: Receiver<SharedWorkItem>,
    capacity: usize,
}

impl WorkQueue {
    /// Build a queue holding `items` in iteration order.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = SharedWorkItem>,
    {
        let (tx, rx) = unbounded();
        let mut capacity = 0;
        for item in items {
            // rx is alive for the whole loop, so send cannot fail.
            let _ = tx.send(item);
            capacity += 1;
        }
        drop(tx);
        Self { rx, capacity }
    }

    /// Take the next item, or `None` once the batch is exhausted.
    pub fn dequeue(&self) -> Option<SharedWorkItem> {
        match self.rx.try_recv() {
            Ok(item) => Some(item),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Items not yet handed out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether every item has been handed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Number of items the queue was built with.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
