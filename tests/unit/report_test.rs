//! Tests for batch reports

use octoparallel::core::{BatchOutcome, BatchReport, ItemReport, WorkItemState};
use uuid::Uuid;

fn item(label: &str, state: WorkItemState, failure: Option<&str>) -> ItemReport {
    ItemReport {
        id: Uuid::new_v4(),
        label: label.to_string(),
        state,
        failure: failure.map(str::to_string),
    }
}

#[test]
fn test_report_partitions() {
    let report = BatchReport {
        rounds: 2,
        outcome: BatchOutcome::Drained,
        items: vec![
            item("done", WorkItemState::Completed, None),
            item("broken", WorkItemState::Executing, Some("boom")),
            item("never", WorkItemState::Unexecuted, None),
        ],
    };

    assert_eq!(report.completed().count(), 1);
    assert_eq!(report.unresolved().count(), 2);
    assert_eq!(report.failed().map(|i| i.label.as_str()).collect::<Vec<_>>(), vec!["broken"]);
    assert!(!report.is_fully_completed());
}

#[test]
fn test_report_serializes() {
    let report = BatchReport {
        rounds: 1,
        outcome: BatchOutcome::RoundLimitReached,
        items: vec![item("x", WorkItemState::Executing, None)],
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "round_limit_reached");
    assert_eq!(json["items"][0]["state"], "executing");

    let back: BatchReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
