//! Infrastructure adapters: the shared work queue and the side-effect mailbox.

pub mod mailbox;
pub mod queue;

pub use mailbox::SideEffectMailbox;
pub use queue::WorkQueue;
