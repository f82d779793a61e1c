//! # parley-channel
//!
//! Channel layer: typed channel naming, the presence transport seam, the
//! event envelope, and an in-process hub with the vendor channel's
//! full-state broadcast semantics.
//!
//! ## Example
//!
//! ```
//! use parley_channel::{ChannelName, PresenceHub, PresenceTransport};
//! use parley_core::{ConversationId, ParticipantId, PresenceEntry};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hub = PresenceHub::new();
//! let conversation = ConversationId::random();
//! let me = ParticipantId::random();
//!
//! let channel = hub.join(ChannelName::presence(conversation), me);
//! let mut sync_rx = channel.sync_events();
//!
//! channel.track(PresenceEntry::new(me, false)).await.unwrap();
//! let snapshot = sync_rx.recv().await.unwrap();
//! assert_eq!(snapshot.len(), 1);
//! # }
//! ```

pub mod event;
pub mod hub;
pub mod name;
pub mod transport;

// Re-export event types
pub use event::{ChannelEvent, ReceivedEvent, MESSAGE_CREATE};

// Re-export hub types
pub use hub::{HubChannel, HubConfig, PresenceHub};

// Re-export naming types
pub use name::{ChannelName, MESSAGES_PREFIX, PRESENCE_PREFIX};

// Re-export transport seam
pub use transport::{ChannelError, ChannelResult, PresenceTransport};
