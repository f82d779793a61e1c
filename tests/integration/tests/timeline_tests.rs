//! End-to-end message timeline tests
//!
//! Drives `MESSAGE_CREATE` events through the hub's messages channel and
//! checks that a consuming timeline stays ordered and de-duplicated.

use integration_tests::message_in;
use parley_channel::{ChannelEvent, ChannelName, PresenceHub};
use parley_core::{ConversationId, Message, MessageTimeline, ParticipantId};

#[tokio::test]
async fn realtime_inserts_append_in_order() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();
    let sender = ParticipantId::random();
    let channel = ChannelName::messages(conversation);

    let mut rx = hub.subscribe(&channel);

    let mut timeline = MessageTimeline::new();
    timeline.hydrate(vec![
        message_in(conversation, sender, 10),
        message_in(conversation, sender, 20),
    ]);

    // A prompt insert and a stale one arriving late
    let fresh = message_in(conversation, sender, 30);
    let late = message_in(conversation, sender, 15);
    for message in [&fresh, &late] {
        let event = ChannelEvent::message_create(message).unwrap();
        hub.publish(&channel, &event).unwrap();
    }

    for _ in 0..2 {
        let received = rx.recv().await.unwrap();
        let event = received.event.expect("valid envelope");
        assert_eq!(event.event_type, parley_channel::MESSAGE_CREATE);

        let message: Message = serde_json::from_value(event.data).unwrap();
        assert!(timeline.push(message));
    }

    let times: Vec<i64> = timeline
        .messages()
        .iter()
        .map(|m| m.created_at.timestamp())
        .collect();
    assert_eq!(times, vec![10, 15, 20, 30]);
    assert_eq!(timeline.latest().unwrap().id, fresh.id);
}

#[tokio::test]
async fn redelivered_insert_is_dropped() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();
    let sender = ParticipantId::random();
    let channel = ChannelName::messages(conversation);

    let mut rx = hub.subscribe(&channel);

    let message = message_in(conversation, sender, 10);
    let event = ChannelEvent::message_create(&message).unwrap();
    hub.publish(&channel, &event).unwrap();
    hub.publish(&channel, &event).unwrap();

    let mut timeline = MessageTimeline::new();
    for _ in 0..2 {
        let received = rx.recv().await.unwrap();
        let message: Message =
            serde_json::from_value(received.event.expect("valid envelope").data).unwrap();
        timeline.push(message);
    }

    assert_eq!(timeline.len(), 1);
}

#[tokio::test]
async fn malformed_payload_does_not_kill_subscription() {
    let hub = PresenceHub::new();
    let conversation = ConversationId::random();
    let sender = ParticipantId::random();
    let channel = ChannelName::messages(conversation);

    let mut rx = hub.subscribe(&channel);

    // The envelope parse is best-effort; garbage is delivered raw
    let bogus = ChannelEvent::new("MESSAGE_CREATE", serde_json::json!("not a message"));
    hub.publish(&channel, &bogus).unwrap();

    let message = message_in(conversation, sender, 10);
    hub.publish(&channel, &ChannelEvent::message_create(&message).unwrap())
        .unwrap();

    let mut timeline = MessageTimeline::new();
    for _ in 0..2 {
        let received = rx.recv().await.unwrap();
        if let Some(event) = received.event {
            if let Ok(message) = serde_json::from_value::<Message>(event.data) {
                timeline.push(message);
            }
        }
    }

    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.latest().unwrap().id, message.id);
}
