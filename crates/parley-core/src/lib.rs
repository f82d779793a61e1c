//! # parley-core
//!
//! Domain layer containing identifiers, presence records, channel views,
//! and the message timeline. This crate has zero dependencies on
//! infrastructure (runtime, transport, etc.).

pub mod error;
pub mod ids;
pub mod presence;
pub mod timeline;

// Re-export commonly used types at crate root
pub use error::{DomainError, DomainResult};
pub use ids::{ConversationId, IdParseError, MessageId, ParticipantId};
pub use presence::{ChannelView, PresenceEntry, SnapshotGroup, SyncSnapshot};
pub use timeline::{Message, MessageTimeline};
