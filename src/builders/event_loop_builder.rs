//! Builders to construct event loops from configuration.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SchedulerConfig;
use crate::core::{EventLoop, InMemoryAuditSink, Integrator, SchedulerError};

/// Build an event loop from validated configuration.
///
/// When `audit_capacity` is set, an [`InMemoryAuditSink`] is attached and a
/// handle to it is returned alongside the loop.
pub fn build_event_loop<I>(
    cfg: &SchedulerConfig,
    integrator: I,
) -> Result<(EventLoop<I>, Option<Arc<Mutex<InMemoryAuditSink>>>), SchedulerError>
where
    I: Integrator,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    let mut event_loop = EventLoop::new(integrator).with_max_parallelism(cfg.max_parallelism);
    if let Some(max_rounds) = cfg.max_rounds {
        event_loop = event_loop.with_max_rounds(max_rounds);
    }

    let mut audit = None;
    if let Some(capacity) = cfg.audit_capacity {
        let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(capacity)));
        event_loop = event_loop.with_audit(Box::new(Arc::clone(&sink)));
        audit = Some(sink);
    }
    Ok((event_loop, audit))
}
