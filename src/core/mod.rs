//! Core scheduling abstractions: work items, slots, the parallel pool, and
//! the event loop that integrates side effects between rounds.

pub mod audit;
pub mod error;
pub mod event_loop;
pub mod integrator;
pub mod message;
pub mod parallel_foreach;
pub mod report;
pub mod slot;
pub mod work_item;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, SchedulerError};
pub use event_loop::{EventLoop, DEFAULT_MAX_PARALLELISM};
pub use integrator::{EchoIntegrator, Integrator};
pub use message::{Message, MessageKind, WorkItemId};
pub use parallel_foreach::ParallelForeach;
pub use report::{BatchOutcome, BatchReport, ItemReport};
pub use slot::Slot;
pub use work_item::{
    Action, EventDrivenWorkItem, ProceduralWorkItem, SharedWorkItem, WorkItem, WorkItemState,
};
