//! End-to-end presence tests over the in-process hub
//!
//! Each test wires real coordinators to real hub channels and observes
//! only the derived typing views, the way a rendering layer would.

use integration_tests::{wait_for_typing, TestParticipant};
use parley_channel::PresenceHub;
use parley_common::PresenceSettings;
use parley_core::ConversationId;
use parley_presence::TypingConfig;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn typing_propagates_to_peers_but_not_self() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();

    let alice = TestParticipant::join(&hub, conversation).await;
    let bob = TestParticipant::join(&hub, conversation).await;

    let mut bob_view = bob.typing_view();
    let mut alice_view = alice.typing_view();

    alice.coordinator.input_activity().await;

    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    // The local participant never appears in their own view
    wait_for_typing(&mut alice_view, |typing| !typing.contains(&alice.id))
        .await
        .unwrap();
}

#[tokio::test]
async fn send_clears_typing_for_peers() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();

    let alice = TestParticipant::join(&hub, conversation).await;
    let bob = TestParticipant::join(&hub, conversation).await;

    let mut bob_view = bob.typing_view();

    alice.coordinator.input_activity().await;
    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    alice.coordinator.message_sent().await;
    wait_for_typing(&mut bob_view, |typing| typing.is_empty())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_clears_typing_for_peers() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();

    let alice = TestParticipant::join(&hub, conversation).await;
    let bob = TestParticipant::join(&hub, conversation).await;

    let mut bob_view = bob.typing_view();

    alice.coordinator.input_activity().await;
    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    sleep(Duration::from_millis(2001)).await;
    wait_for_typing(&mut bob_view, |typing| typing.is_empty())
        .await
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_follows_configured_settings() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();

    let settings = PresenceSettings {
        idle_timeout_ms: 500,
        ..PresenceSettings::default()
    };

    let alice =
        TestParticipant::join_with_config(&hub, conversation, TypingConfig::from(&settings)).await;
    let bob = TestParticipant::join(&hub, conversation).await;

    let mut bob_view = bob.typing_view();

    alice.coordinator.input_activity().await;
    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    sleep(Duration::from_millis(501)).await;
    wait_for_typing(&mut bob_view, |typing| typing.is_empty())
        .await
        .unwrap();
}

#[tokio::test]
async fn shutdown_removes_participant_from_peer_views() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();

    let alice = TestParticipant::join(&hub, conversation).await;
    let bob = TestParticipant::join(&hub, conversation).await;

    let mut bob_view = bob.typing_view();

    alice.coordinator.input_activity().await;
    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    alice.coordinator.shutdown().await;
    wait_for_typing(&mut bob_view, |typing| typing.is_empty())
        .await
        .unwrap();
}

#[tokio::test]
async fn conversations_are_isolated() {
    let hub = PresenceHub::new();
    let first = ConversationId::random();
    let second = ConversationId::random();

    let alice = TestParticipant::join(&hub, first).await;
    let bob = TestParticipant::join(&hub, first).await;
    let carol = TestParticipant::join(&hub, second).await;

    let mut bob_view = bob.typing_view();
    let mut carol_view = carol.typing_view();

    alice.coordinator.input_activity().await;

    wait_for_typing(&mut bob_view, |typing| typing.contains(&alice.id))
        .await
        .unwrap();

    // Carol shares the hub but not the conversation
    wait_for_typing(&mut carol_view, |typing| typing.is_empty())
        .await
        .unwrap();
}
