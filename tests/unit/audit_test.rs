//! Tests for audit sink

use std::sync::Arc;

use octoparallel::core::{build_audit_event, AuditSink, InMemoryAuditSink};
use parking_lot::Mutex;
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let item = Uuid::new_v4();

    sink.record(build_audit_event(1, Some(item), "side_effect", Some("payload".to_string())));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].round, 1);
    assert_eq!(events[0].item_id, Some(item));
    assert_eq!(events[0].action, "side_effect");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(1, None, "round", None));
    sink.record(build_audit_event(2, None, "round", None));
    sink.record(build_audit_event(3, None, "round", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].round, 2); // First one popped
    assert_eq!(events[1].round, 3);
}

#[test]
fn test_shared_sink_records_through_handle() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(8)));
    let mut boxed: Box<dyn AuditSink> = Box::new(Arc::clone(&shared));

    boxed.record(build_audit_event(1, None, "round", None));
    boxed.record(build_audit_event(1, None, "event", None));

    let sink = shared.lock();
    assert_eq!(sink.events().len(), 2);
    assert_eq!(sink.events_with_action("event").len(), 1);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(4, None, "failure", Some("reason".to_string()));

    assert_eq!(event.round, 4);
    assert_eq!(event.action, "failure");
    assert_eq!(event.payload, Some("reason".to_string()));
    assert!(Uuid::parse_str(&event.event_id).is_ok());
    assert!(event.created_at_ms > 0);
}
