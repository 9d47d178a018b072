//! Boundary to the external system that confirms side effects.

use async_trait::async_trait;

use super::error::SchedulerError;
use super::message::Message;

/// Turns one side effect into the one event that confirms it.
///
/// This is the seam for external integration: an implementation may call out
/// to a remote service and only return once the call resolves. The event loop
/// awaits each call between rounds, so latency here never blocks a slot.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use octoparallel::core::{Integrator, Message, SchedulerError};
///
/// struct RemoteIntegrator { client: MyClient }
///
/// #[async_trait]
/// impl Integrator for RemoteIntegrator {
///     async fn handle_side_effect(&self, side_effect: Message) -> Result<Message, SchedulerError> {
///         self.client.submit(side_effect).await?;
///         side_effect.confirm()
///     }
/// }
/// ```
#[async_trait]
pub trait Integrator: Send + Sync {
    /// Confirm a side effect.
    ///
    /// # Errors
    ///
    /// Must return [`SchedulerError::UnknownMessageKind`] when handed an event.
    async fn handle_side_effect(&self, side_effect: Message) -> Result<Message, SchedulerError>;
}

/// Integrator that confirms every side effect immediately, 1:1.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoIntegrator;

#[async_trait]
impl Integrator for EchoIntegrator {
    async fn handle_side_effect(&self, side_effect: Message) -> Result<Message, SchedulerError> {
        side_effect.confirm()
    }
}
