//! Event envelope for channel broadcasts
//!
//! Non-presence traffic (message inserts) travels as JSON-encoded
//! [`ChannelEvent`]s; receivers get the raw payload alongside a
//! best-effort parse so a bad payload never kills a subscription.

use crate::name::ChannelName;
use serde::{Deserialize, Serialize};

/// Event type for a newly inserted message
pub const MESSAGE_CREATE: &str = "MESSAGE_CREATE";

/// Event wrapper for channel broadcasts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Event type name (e.g., `MESSAGE_CREATE`)
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl ChannelEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Create a `MESSAGE_CREATE` event from any serializable message
    pub fn message_create<T: Serialize>(message: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(MESSAGE_CREATE, serde_json::to_value(message)?))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Event as delivered to a subscriber
#[derive(Debug, Clone)]
pub struct ReceivedEvent {
    /// Channel the event was received on
    pub channel: ChannelName,
    /// Parsed event (if the payload was a valid envelope)
    pub event: Option<ChannelEvent>,
    /// Raw payload
    pub payload: String,
}

impl ReceivedEvent {
    /// Create from a raw broadcast payload
    #[must_use]
    pub fn from_raw(channel: ChannelName, payload: String) -> Self {
        let event = serde_json::from_str(&payload).ok();
        Self {
            channel,
            event,
            payload,
        }
    }
}
