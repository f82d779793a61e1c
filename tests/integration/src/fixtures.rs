//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use parley_core::{ConversationId, Message, MessageId, ParticipantId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Fixed timestamp helper (seconds since the epoch)
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A message with unique content at a fixed timestamp
pub fn message_in(conversation: ConversationId, sender: ParticipantId, secs: i64) -> Message {
    let suffix = unique_suffix();
    Message::new(
        MessageId::random(),
        conversation,
        sender,
        format!("message {suffix}"),
    )
    .expect("fixture content is non-empty")
    .with_created_at(timestamp(secs))
}
