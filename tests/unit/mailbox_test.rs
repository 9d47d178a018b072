//! Tests for the side-effect mailbox

use octoparallel::core::Message;
use octoparallel::infra::SideEffectMailbox;
use uuid::Uuid;

#[test]
fn test_mailbox_drain_is_at_most_once() {
    let mut mailbox = SideEffectMailbox::new();
    let id = Uuid::new_v4();
    mailbox.push(Message::StartSideEffect(id));

    assert_eq!(mailbox.peek(), &[Message::StartSideEffect(id)]);
    assert_eq!(mailbox.drain(), vec![Message::StartSideEffect(id)]);
    assert!(mailbox.drain().is_empty());
}

#[test]
fn test_mailbox_refills_after_drain() {
    let mut mailbox = SideEffectMailbox::default();
    let id = Uuid::new_v4();
    mailbox.push(Message::StartSideEffect(id));
    mailbox.drain();
    mailbox.push(Message::FinishSideEffect(id));

    assert_eq!(mailbox.len(), 1);
    assert_eq!(mailbox.drain(), vec![Message::FinishSideEffect(id)]);
}
