//! Message timeline
//!
//! Client-side ordering for a conversation thread: hydrated once from the
//! initial load, then appended to as realtime inserts arrive. Inserts may
//! be delivered out of order or more than once; the timeline keeps
//! `created_at` order and drops duplicate ids.

use crate::error::{DomainError, DomainResult};
use crate::ids::{ConversationId, MessageId, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id
    pub id: MessageId,
    /// Conversation this message belongs to
    pub conversation_id: ConversationId,
    /// Author
    pub sender_id: ParticipantId,
    /// Trimmed, non-empty body
    pub content: String,
    /// Server-side creation time, the timeline sort key
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message, trimming the content
    ///
    /// # Errors
    /// Returns [`DomainError::EmptyMessage`] if the content is empty or
    /// whitespace only.
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        sender_id: ParticipantId,
        content: impl Into<String>,
    ) -> DomainResult<Self> {
        let content = content.into().trim().to_string();
        if content.is_empty() {
            return Err(DomainError::EmptyMessage);
        }

        Ok(Self {
            id,
            conversation_id,
            sender_id,
            content,
            created_at: Utc::now(),
        })
    }

    /// Override the creation timestamp
    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

/// Ordered, de-duplicated message list for one conversation
#[derive(Debug, Clone, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
    seen: HashSet<MessageId>,
}

impl MessageTimeline {
    /// Create an empty timeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timeline contents from an initial load
    ///
    /// Messages are sorted by `created_at` (stable, so equal timestamps
    /// keep load order) and duplicate ids keep their first occurrence.
    pub fn hydrate(&mut self, mut messages: Vec<Message>) {
        messages.sort_by_key(|m| m.created_at);

        self.seen.clear();
        self.messages.clear();
        for message in messages {
            if self.seen.insert(message.id) {
                self.messages.push(message);
            }
        }
    }

    /// Append a realtime insert
    ///
    /// Returns `false` (and leaves the timeline untouched) when the id has
    /// been seen before. Inserts usually arrive in order; a late arrival
    /// is placed after the last message that does not postdate it.
    pub fn push(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }

        let at = self
            .messages
            .iter()
            .rposition(|m| m.created_at <= message.created_at)
            .map_or(0, |i| i + 1);
        self.messages.insert(at, message);
        true
    }

    /// All messages, oldest first
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message
    #[must_use]
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check whether the timeline is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
