//! # Octoparallel
//!
//! A bounded-parallelism batch scheduler coordinated through a request/confirm
//! side-effect protocol instead of blocking calls.
//!
//! A fixed batch of work items is drained by a fixed pool of *slots*. Work
//! items that need an external system do not block a thread while they wait:
//! they emit a side effect, report `Executing`, and their slot *stalls* until
//! the confirming event arrives in a later round.
//!
//! ## Architecture
//!
//! ```text
//! EventLoop ──► ParallelForeach::execute()   (one round, N slot threads)
//!     │              └─► Slot::execute(queue) ──► WorkItem::execute()
//!     │
//!     ├─► harvest side effects from every item
//!     ├─► Integrator::handle_side_effect()    (start ↦ started, finish ↦ finished)
//!     └─► broadcast events to every item      (items filter by id)
//!                      ... repeat until the pool reports Completed
//! ```
//!
//! ## Key Invariants
//!
//! - Item state only moves forward: `Unexecuted -> Executing -> Completed`.
//! - An item's action runs at most once, on the transition into `Completed`.
//! - The queue is filled once; each item is dequeued by exactly one slot.
//! - Side effects are harvested only after the round that produced them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use octoparallel::core::{EchoIntegrator, EventDrivenWorkItem, EventLoop};
//!
//! let items = vec![
//!     EventDrivenWorkItem::create("first", || Ok(())),
//!     EventDrivenWorkItem::create("second", || Ok(())),
//! ];
//!
//! let report = EventLoop::new(EchoIntegrator)
//!     .with_max_parallelism(2)
//!     .start(items)
//!     .await?;
//! assert!(report.is_fully_completed());
//! ```
//!
//! For complete examples, see:
//! - `tests/event_loop_test.rs` - End-to-end batch scenarios
//! - `tests/parallel_foreach_test.rs` - Round and slot behaviour

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Work items, slots, the parallel pool, and the event loop.
pub mod core;
/// Configuration models for the scheduler.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// Shared work queue and side-effect mailbox.
pub mod infra;
/// Shared utilities.
pub mod util;
