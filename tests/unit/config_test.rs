//! Tests for configuration validation

use std::collections::HashMap;

use octoparallel::config::scheduler::{ENV_AUDIT_CAPACITY, ENV_MAX_PARALLELISM, ENV_MAX_ROUNDS};
use octoparallel::config::SchedulerConfig;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let cfg = SchedulerConfig::default();
    assert_eq!(cfg.max_parallelism, 3);
    assert_eq!(cfg.max_rounds, None);
    assert_eq!(cfg.audit_capacity, None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_invalid_max_parallelism() {
    let cfg = SchedulerConfig::new().with_max_parallelism(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_invalid_max_rounds() {
    let cfg = SchedulerConfig::new().with_max_rounds(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_invalid_audit_capacity() {
    let cfg = SchedulerConfig::new().with_audit_capacity(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_available_parallelism() {
    let cfg = SchedulerConfig::new().with_available_parallelism();
    assert!(cfg.max_parallelism >= 1);
}

#[test]
fn test_from_json() {
    let json = r#"{
        "max_parallelism": 8,
        "max_rounds": 100
    }"#;

    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.max_parallelism, 8);
    assert_eq!(cfg.max_rounds, Some(100));
    assert_eq!(cfg.audit_capacity, None);
}

#[test]
fn test_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{"max_parallelism": 0}"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[
        (ENV_MAX_PARALLELISM, "5"),
        (ENV_MAX_ROUNDS, " 40 "),
        (ENV_AUDIT_CAPACITY, "256"),
    ]))
    .unwrap();
    assert_eq!(cfg.max_parallelism, 5);
    assert_eq!(cfg.max_rounds, Some(40));
    assert_eq!(cfg.audit_capacity, Some(256));
}

#[test]
fn test_from_lookup_auto_parallelism() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[(ENV_MAX_PARALLELISM, "auto")])).unwrap();
    assert_eq!(cfg.max_parallelism, num_cpus::get());
}

#[test]
fn test_from_lookup_defaults_when_unset() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, SchedulerConfig::default());
}

#[test]
fn test_from_lookup_parse_error_names_variable() {
    let err = SchedulerConfig::from_lookup(lookup(&[(ENV_MAX_ROUNDS, "many")])).unwrap_err();
    assert!(err.contains(ENV_MAX_ROUNDS));
}
