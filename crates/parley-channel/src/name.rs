//! Channel naming
//!
//! Defines the naming conventions for realtime channels. A conversation
//! owns two channels: one for presence tracking and one for message
//! events.

use parley_core::ConversationId;

/// Channel prefix for per-conversation presence tracking
pub const PRESENCE_PREFIX: &str = "presence:";
/// Channel prefix for per-conversation message events
pub const MESSAGES_PREFIX: &str = "messages:";

/// Realtime channel names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelName {
    /// Presence tracking for a conversation
    Presence(ConversationId),
    /// Message events for a conversation
    Messages(ConversationId),
    /// Custom channel name
    Custom(String),
}

impl ChannelName {
    /// Create a presence channel name
    #[must_use]
    pub fn presence(conversation_id: ConversationId) -> Self {
        Self::Presence(conversation_id)
    }

    /// Create a messages channel name
    #[must_use]
    pub fn messages(conversation_id: ConversationId) -> Self {
        Self::Messages(conversation_id)
    }

    /// Create a custom channel name
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the wire channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Presence(id) => format!("{PRESENCE_PREFIX}{id}"),
            Self::Messages(id) => format!("{MESSAGES_PREFIX}{id}"),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a wire name back to a `ChannelName`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if let Some(id_str) = name.strip_prefix(PRESENCE_PREFIX) {
            if let Ok(id) = id_str.parse::<ConversationId>() {
                return Self::Presence(id);
            }
        }

        if let Some(id_str) = name.strip_prefix(MESSAGES_PREFIX) {
            if let Ok(id) = id_str.parse::<ConversationId>() {
                return Self::Messages(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
