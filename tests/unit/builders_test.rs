//! Tests for builders

use octoparallel::builders::build_event_loop;
use octoparallel::config::SchedulerConfig;
use octoparallel::core::{EchoIntegrator, EventDrivenWorkItem, SchedulerError};

#[test]
fn test_build_event_loop_applies_config() {
    let cfg = SchedulerConfig::new()
        .with_max_parallelism(2)
        .with_max_rounds(10);
    let (event_loop, audit) = build_event_loop(&cfg, EchoIntegrator).unwrap();

    assert_eq!(event_loop.max_parallelism(), 2);
    assert_eq!(event_loop.max_rounds(), Some(10));
    assert!(audit.is_none());
}

#[test]
fn test_build_event_loop_rejects_invalid_config() {
    let cfg = SchedulerConfig::new().with_max_parallelism(0);
    let err = build_event_loop(&cfg, EchoIntegrator).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_build_event_loop_with_audit() {
    let cfg = SchedulerConfig::new().with_audit_capacity(64);
    let (event_loop, audit) = build_event_loop(&cfg, EchoIntegrator).unwrap();
    let audit = audit.expect("audit sink attached");

    let report = event_loop
        .start_blocking(vec![EventDrivenWorkItem::create("audited", || Ok(()))])
        .unwrap();
    assert!(report.is_fully_completed());

    let sink = audit.lock();
    assert_eq!(sink.events_with_action("round").len(), 3);
    assert_eq!(sink.events_with_action("side_effect").len(), 2);
    assert_eq!(sink.events_with_action("event").len(), 2);
    assert!(sink.events_with_action("failure").is_empty());
}
