//! Presence transport seam
//!
//! The coordinator talks to the vendor realtime channel through this
//! trait, so it can be driven by the in-process hub in tests and by a
//! real backend adapter in production.

use crate::name::ChannelName;
use async_trait::async_trait;
use parley_core::{PresenceEntry, SyncSnapshot};
use tokio::sync::broadcast;

/// Error type for channel operations
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("not joined to channel")]
    NotJoined,

    #[error("channel closed")]
    Closed,

    #[error("failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Capability interface over a realtime presence channel
///
/// One transport is exclusively owned by one coordinator per
/// conversation. `track` publishes the caller's own state (replacing the
/// previous one), `sync_events` delivers the full channel state after
/// every change, and `leave` releases the subscription.
#[async_trait]
pub trait PresenceTransport: Send + Sync {
    /// Channel this transport is joined to
    fn channel(&self) -> &ChannelName;

    /// Publish the local participant's presence state
    async fn track(&self, entry: PresenceEntry) -> ChannelResult<()>;

    /// Subscribe to full-state sync events
    fn sync_events(&self) -> broadcast::Receiver<SyncSnapshot>;

    /// Leave the channel, removing any tracked state
    async fn leave(&self) -> ChannelResult<()>;
}
