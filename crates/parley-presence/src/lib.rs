//! # parley-presence
//!
//! The presence & typing coordinator: tracks the local participant's
//! typing flag with a debounced idle timer, publishes it through a
//! [`parley_channel::PresenceTransport`], and derives the remote
//! "typing now" set from full-state sync snapshots.
//!
//! ## Example
//!
//! ```
//! use parley_channel::{ChannelName, PresenceHub};
//! use parley_core::{ConversationId, ParticipantId};
//! use parley_presence::TypingCoordinator;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hub = PresenceHub::new();
//! let conversation = ConversationId::random();
//! let me = ParticipantId::random();
//!
//! let coordinator = TypingCoordinator::new(me);
//! let channel = hub.join(ChannelName::presence(conversation), me);
//! coordinator.bind(Arc::new(channel)).await;
//!
//! // On every keystroke:
//! coordinator.input_activity().await;
//!
//! // Before transmitting a message:
//! coordinator.message_sent().await;
//!
//! // For the rendering layer:
//! let typing = coordinator.typing_participants();
//! assert!(typing.borrow().is_empty());
//! # coordinator.shutdown().await;
//! # }
//! ```

pub mod coordinator;

pub use coordinator::{TypingConfig, TypingCoordinator};
