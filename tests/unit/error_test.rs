//! Tests for error types

use octoparallel::core::{Message, MessageKind, SchedulerError, WorkItemState};
use uuid::Uuid;

#[test]
fn test_unknown_message_kind_error() {
    let err = SchedulerError::UnknownMessageKind(MessageKind::StartedEvent);
    assert_eq!(
        format!("{}", err),
        "unknown message kind: expected a side effect, got started event"
    );
}

#[test]
fn test_action_failed_error() {
    let id = Uuid::nil();
    let err = SchedulerError::ActionFailed {
        id,
        reason: "boom".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "action failed for work item 00000000-0000-0000-0000-000000000000: boom"
    );
}

#[test]
fn test_invalid_transition_error() {
    let err = SchedulerError::InvalidTransition {
        id: Uuid::nil(),
        operation: "execute",
        state: WorkItemState::Completed,
    };
    assert_eq!(
        format!("{}", err),
        "work item 00000000-0000-0000-0000-000000000000 cannot execute while completed"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("max_parallelism must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_parallelism must be greater than 0"
    );
}

#[test]
fn test_unexpected_confirmation_error() {
    let id = Uuid::nil();
    let err = SchedulerError::UnexpectedConfirmation {
        side_effect: Message::StartSideEffect(id),
        expected: Message::StartedEvent(id),
        actual: Message::FinishedEvent(id),
    };
    let nil = "00000000-0000-0000-0000-000000000000";
    assert_eq!(
        err.to_string(),
        format!(
            "integrator answered start side effect({nil}) with finished event({nil}), expected started event({nil})"
        )
    );
}
