//! In-process presence hub
//!
//! A local broker with the vendor channel's semantics: every tracked
//! state change re-broadcasts the full channel state to all subscribers
//! (full-state replace, not incremental diffs), and plain events fan out
//! to every receiver on the channel. One hub stands in for the hosted
//! realtime service in tests and demos.

use crate::event::{ChannelEvent, ReceivedEvent};
use crate::name::ChannelName;
use crate::transport::{ChannelError, ChannelResult, PresenceTransport};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use parley_core::{ParticipantId, PresenceEntry, SyncSnapshot};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Hub configuration
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Buffer size for sync-event broadcast channels
    pub sync_buffer: usize,
    /// Buffer size for plain-event broadcast channels
    pub event_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            sync_buffer: 64,
            event_buffer: 1024,
        }
    }
}

/// One participant's tracked state on a channel
struct RosterEntry {
    /// Joining session, used to replace or remove this entry
    session: u64,
    /// Presence key (participant id in string form)
    key: String,
    /// Last tracked state, raw
    state: serde_json::Value,
}

/// Shared per-channel state
struct ChannelShared {
    name: ChannelName,
    /// Tracked states in join order
    roster: Mutex<Vec<RosterEntry>>,
    sync_tx: broadcast::Sender<SyncSnapshot>,
    event_tx: broadcast::Sender<ReceivedEvent>,
}

impl ChannelShared {
    /// Build the full-state snapshot, grouping by key in join order
    fn snapshot(&self) -> SyncSnapshot {
        let roster = self.roster.lock();
        let mut snapshot = SyncSnapshot::new();
        for entry in roster.iter() {
            snapshot.push(entry.key.clone(), entry.state.clone());
        }
        snapshot
    }

    /// Broadcast the current full state to all subscribers
    fn broadcast_sync(&self) {
        let snapshot = self.snapshot();
        // No receivers is not an error
        let receivers = self.sync_tx.send(snapshot).unwrap_or(0);

        tracing::trace!(
            channel = %self.name,
            receivers = receivers,
            "Broadcast presence sync"
        );
    }

    /// Drop a session's roster entry and re-broadcast
    fn remove_session(&self, session: u64) {
        let removed = {
            let mut roster = self.roster.lock();
            let before = roster.len();
            roster.retain(|e| e.session != session);
            before != roster.len()
        };

        if removed {
            self.broadcast_sync();
        }
    }
}

/// In-process realtime broker
pub struct PresenceHub {
    channels: DashMap<String, Arc<ChannelShared>>,
    next_session: AtomicU64,
    config: HubConfig,
}

impl PresenceHub {
    /// Create a hub with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with custom buffer sizes
    #[must_use]
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            channels: DashMap::new(),
            next_session: AtomicU64::new(1),
            config,
        }
    }

    /// Get or create the shared state for a channel
    fn shared(&self, name: &ChannelName) -> Arc<ChannelShared> {
        self.channels
            .entry(name.name())
            .or_insert_with(|| {
                let (sync_tx, _) = broadcast::channel(self.config.sync_buffer);
                let (event_tx, _) = broadcast::channel(self.config.event_buffer);
                Arc::new(ChannelShared {
                    name: name.clone(),
                    roster: Mutex::new(Vec::new()),
                    sync_tx,
                    event_tx,
                })
            })
            .clone()
    }

    /// Join a presence channel under the given key
    ///
    /// Joining alone tracks nothing; the participant appears in peers'
    /// snapshots after its first `track`.
    #[must_use]
    pub fn join(&self, name: ChannelName, key: ParticipantId) -> HubChannel {
        let shared = self.shared(&name);
        let session = self.next_session.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(channel = %name, key = %key, session = session, "Joined channel");

        HubChannel {
            name,
            shared,
            session,
            key: key.to_string(),
            left: AtomicBool::new(false),
        }
    }

    /// Subscribe to plain events on a channel
    #[must_use]
    pub fn subscribe(&self, name: &ChannelName) -> broadcast::Receiver<ReceivedEvent> {
        self.shared(name).event_tx.subscribe()
    }

    /// Publish an event to a channel, returning the receiver count
    pub fn publish(&self, name: &ChannelName, event: &ChannelEvent) -> ChannelResult<usize> {
        let payload = event.to_json()?;
        let shared = self.shared(name);
        let received = ReceivedEvent::from_raw(name.clone(), payload);

        let receivers = shared.event_tx.send(received).unwrap_or(0);

        tracing::debug!(
            channel = %name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

impl Default for PresenceHub {
    fn default() -> Self {
        Self::new()
    }
}

/// A joined presence channel handle
///
/// Dropping the handle removes its tracked state, as does an explicit
/// [`PresenceTransport::leave`].
pub struct HubChannel {
    name: ChannelName,
    shared: Arc<ChannelShared>,
    session: u64,
    key: String,
    left: AtomicBool,
}

#[async_trait]
impl PresenceTransport for HubChannel {
    fn channel(&self) -> &ChannelName {
        &self.name
    }

    async fn track(&self, entry: PresenceEntry) -> ChannelResult<()> {
        if self.left.load(Ordering::Acquire) {
            return Err(ChannelError::NotJoined);
        }

        let state = serde_json::to_value(&entry)?;

        {
            let mut roster = self.shared.roster.lock();
            if let Some(existing) = roster.iter_mut().find(|e| e.session == self.session) {
                existing.state = state;
            } else {
                roster.push(RosterEntry {
                    session: self.session,
                    key: self.key.clone(),
                    state,
                });
            }
        }

        tracing::trace!(
            channel = %self.name,
            key = %self.key,
            typing = entry.typing,
            "Tracked presence"
        );

        self.shared.broadcast_sync();
        Ok(())
    }

    fn sync_events(&self) -> broadcast::Receiver<SyncSnapshot> {
        self.shared.sync_tx.subscribe()
    }

    async fn leave(&self) -> ChannelResult<()> {
        if self.left.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        self.shared.remove_session(self.session);
        tracing::debug!(channel = %self.name, key = %self.key, "Left channel");
        Ok(())
    }
}

impl Drop for HubChannel {
    fn drop(&mut self) {
        if !self.left.swap(true, Ordering::AcqRel) {
            self.shared.remove_session(self.session);
        }
    }
}
