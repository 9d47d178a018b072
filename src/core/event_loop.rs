//! Round-based integration loop.
//!
//! Each iteration runs one [`ParallelForeach`] round, harvests every side
//! effect the items emitted, hands each one to the [`Integrator`], and
//! broadcasts the resulting events back to every item. The loop ends when the
//! pool reports `Completed`.
//!
//! Delivery is broadcast-and-filter: every item sees every event and ignores
//! the ones not addressed to it. That is O(items x events) per round, which is
//! the simplest correct fan-out for the batch sizes this targets.
//!
//! An item that is never confirmed keeps its slot stalled and the loop running
//! forever. [`EventLoop::with_max_rounds`] is an opt-in escape hatch; when it
//! trips, unconfirmed items are reported as unresolved.

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::audit::{build_audit_event, AuditSink};
use super::error::SchedulerError;
use super::integrator::Integrator;
use super::message::{Message, MessageKind, WorkItemId};
use super::parallel_foreach::ParallelForeach;
use super::report::{BatchOutcome, BatchReport, ItemReport};
use super::work_item::{SharedWorkItem, WorkItem, WorkItemState};

/// Parallelism used when none is configured.
pub const DEFAULT_MAX_PARALLELISM: usize = 3;

/// Drives a batch of work items to completion through an integrator.
pub struct EventLoop<I> {
    integrator: I,
    max_parallelism: usize,
    max_rounds: Option<u64>,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
}

impl<I> std::fmt::Debug for EventLoop<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("max_parallelism", &self.max_parallelism)
            .field("max_rounds", &self.max_rounds)
            .field("audit", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}

impl<I: Integrator> EventLoop<I> {
    /// Create a loop with [`DEFAULT_MAX_PARALLELISM`] slots and no round limit.
    pub const fn new(integrator: I) -> Self {
        Self {
            integrator,
            max_parallelism: DEFAULT_MAX_PARALLELISM,
            max_rounds: None,
            audit: None,
        }
    }

    /// Set the number of slots. Zero slots execute nothing.
    #[must_use]
    pub fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = max_parallelism;
        self
    }

    /// Stop after `max_rounds` rounds even if items are still pending.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u64) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    /// Configured slot count.
    #[must_use]
    pub const fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    /// Configured round limit.
    #[must_use]
    pub const fn max_rounds(&self) -> Option<u64> {
        self.max_rounds
    }

    /// The integrator side effects are sent to.
    #[must_use]
    pub const fn integrator(&self) -> &I {
        &self.integrator
    }

    /// Run a batch to completion.
    ///
    /// Must be called from within a tokio runtime; slot rounds run on the
    /// blocking pool.
    ///
    /// # Errors
    ///
    /// - `UnknownMessageKind` if the integrator is handed or returns the wrong
    ///   kind of message. The batch is abandoned.
    /// - `Internal` if a round cannot be run.
    ///
    /// Action failures are not errors here; they show up in the report.
    pub async fn start<T, W>(&self, items: T) -> Result<BatchReport, SchedulerError>
    where
        T: IntoIterator<Item = W>,
        W: Into<WorkItem>,
    {
        let items: Vec<SharedWorkItem> = items
            .into_iter()
            .map(|w| w.into().into_shared())
            .collect();
        info!(
            items = items.len(),
            max_parallelism = self.max_parallelism,
            "Starting event loop"
        );

        let mut foreach = ParallelForeach::new(self.max_parallelism, items.iter().cloned());

        let outcome = loop {
            if foreach.state() == WorkItemState::Completed {
                break BatchOutcome::Drained;
            }
            if let Some(max_rounds) = self.max_rounds {
                if foreach.rounds() >= max_rounds {
                    warn!(rounds = foreach.rounds(), "Round limit reached with items pending");
                    break BatchOutcome::RoundLimitReached;
                }
            }

            let (returned, result) = tokio::task::spawn_blocking(move || {
                let result = foreach.execute();
                (foreach, result)
            })
            .await
            .map_err(|e| SchedulerError::Internal(format!("round join failed: {e}")))?;
            foreach = returned;
            let state = result?;
            let round = foreach.rounds();
            self.record(round, None, "round", Some(state.to_string()));

            let side_effects = Self::harvest(&items);
            debug!(round, count = side_effects.len(), "Consuming side effects");
            let events = self.integrate(round, side_effects).await?;
            self.dispatch(round, &items, events).await?;
        };

        let report = BatchReport {
            rounds: foreach.rounds(),
            outcome,
            items: items.iter().map(|i| ItemReport::from(&*i.lock())).collect(),
        };
        info!(
            rounds = report.rounds,
            completed = report.completed().count(),
            unresolved = report.unresolved().count(),
            outcome = ?report.outcome,
            "Event loop finished"
        );
        Ok(report)
    }

    /// Run a batch on a private current-thread runtime.
    ///
    /// Must not be called from inside an async context.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start), plus `Internal` if the runtime cannot
    /// be built.
    pub fn start_blocking<T, W>(&self, items: T) -> Result<BatchReport, SchedulerError>
    where
        T: IntoIterator<Item = W>,
        W: Into<WorkItem>,
    {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SchedulerError::Internal(format!("failed to build runtime: {e}")))?;
        rt.block_on(self.start(items))
    }

    /// Drain every item's mailbox, in batch order.
    fn harvest(items: &[SharedWorkItem]) -> Vec<Message> {
        items
            .iter()
            .flat_map(|item| item.lock().consume_side_effects())
            .collect()
    }

    async fn integrate(
        &self,
        round: u64,
        side_effects: Vec<Message>,
    ) -> Result<Vec<Message>, SchedulerError> {
        let mut events = Vec::with_capacity(side_effects.len());
        for side_effect in side_effects {
            self.record(round, Some(side_effect.id()), "side_effect", Some(side_effect.to_string()));
            let expected = side_effect.confirm()?;
            let event = self.integrator.handle_side_effect(side_effect).await?;
            if !event.is_event() {
                warn!(round, event = %event, "Integrator returned a side effect");
                return Err(SchedulerError::UnknownMessageKind(event.kind()));
            }
            if event != expected {
                warn!(round, side_effect = %side_effect, event = %event, "Integrator returned a mismatched event");
                return Err(SchedulerError::UnexpectedConfirmation {
                    side_effect,
                    expected,
                    actual: event,
                });
            }
            events.push(event);
        }
        Ok(events)
    }

    /// Broadcast events kind by kind, in protocol order.
    ///
    /// Handling a finished event runs the item's action, so delivery happens
    /// on the blocking pool like a round does.
    async fn dispatch(
        &self,
        round: u64,
        items: &[SharedWorkItem],
        events: Vec<Message>,
    ) -> Result<(), SchedulerError> {
        for event in ordered(&events) {
            self.record(round, Some(event.id()), "event", Some(event.to_string()));
        }
        let items = items.to_vec();
        let failures = tokio::task::spawn_blocking(move || deliver(round, &items, &events))
            .await
            .map_err(|e| SchedulerError::Internal(format!("dispatch join failed: {e}")))?;
        for (id, err) in failures {
            self.record(round, Some(id), "failure", Some(err.to_string()));
        }
        Ok(())
    }

    fn record(&self, round: u64, item_id: Option<WorkItemId>, action: &str, payload: Option<String>) {
        if let Some(audit) = self.audit.as_ref() {
            audit
                .lock()
                .record(build_audit_event(round, item_id, action, payload));
        }
    }
}

/// Events in protocol order: every started event before any finished event.
fn ordered(events: &[Message]) -> impl Iterator<Item = &Message> {
    MessageKind::EVENTS
        .into_iter()
        .flat_map(move |kind| events.iter().filter(move |e| e.kind() == kind))
}

/// Hand every event to every item. Returns the actions that failed.
fn deliver(
    round: u64,
    items: &[SharedWorkItem],
    events: &[Message],
) -> Vec<(WorkItemId, SchedulerError)> {
    let mut failures = Vec::new();
    for event in ordered(events) {
        for item in items {
            let mut guard = item.lock();
            if let Err(err) = guard.handle(event) {
                warn!(round, item_id = %guard.id(), error = %err, "Event handling failed");
                failures.push((guard.id(), err));
            }
        }
    }
    failures
}
