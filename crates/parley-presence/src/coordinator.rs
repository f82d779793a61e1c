//! Presence & typing coordinator
//!
//! Maintains the local participant's typing flag, debounces its
//! publication to the presence channel, and derives the remote
//! "typing now" set from full-state sync snapshots.
//!
//! State machine per local participant: `Idle -> Typing` on input
//! activity (publish `true`), `Typing -> Typing` on further activity
//! (idle timer reset, no publish), `Typing -> Idle` on timer expiry or
//! explicit send (publish `false`). The local flag is authoritative
//! regardless of publish latency; publish failures are logged and never
//! retried since a stale flag self-heals on the next cycle.

use parking_lot::{Mutex, RwLock};
use parley_channel::PresenceTransport;
use parley_common::PresenceSettings;
use parley_core::{ChannelView, ParticipantId, PresenceEntry, SyncSnapshot};
use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Coordinator tuning
#[derive(Debug, Clone)]
pub struct TypingConfig {
    /// Idle window after the last input event before typing clears
    pub idle_timeout: Duration,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(2000),
        }
    }
}

impl From<&PresenceSettings> for TypingConfig {
    fn from(settings: &PresenceSettings) -> Self {
        Self {
            idle_timeout: settings.idle_timeout(),
        }
    }
}

/// Local typing state and the single-slot idle timer
struct LocalState {
    typing: bool,
    /// At most one pending idle timer; replaced (never stacked) on reset
    idle_timer: Option<JoinHandle<()>>,
    /// Timer generation; an expiry whose epoch is stale is ignored
    epoch: u64,
}

struct Inner {
    local: ParticipantId,
    idle_timeout: Duration,
    /// Set once the channel is subscribed; operations before that are no-ops
    transport: RwLock<Option<Arc<dyn PresenceTransport>>>,
    state: Mutex<LocalState>,
    typing_tx: watch::Sender<BTreeSet<ParticipantId>>,
    sync_task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn transport(&self) -> Option<Arc<dyn PresenceTransport>> {
        self.transport.read().clone()
    }

    /// Publish the local flag; failures are logged, not surfaced
    async fn publish(&self, typing: bool) {
        let Some(transport) = self.transport() else {
            return;
        };

        let entry = PresenceEntry::new(self.local, typing);
        if let Err(e) = transport.track(entry).await {
            warn!(participant = %self.local, error = %e, "Failed to publish typing state");
        }
    }

    /// Idle timer expiry for the given generation
    async fn expire(&self, epoch: u64) {
        let should_clear = {
            let mut state = self.state.lock();
            if state.epoch != epoch || !state.typing {
                false
            } else {
                state.typing = false;
                state.idle_timer = None;
                true
            }
        };

        if should_clear {
            trace!(participant = %self.local, "Typing cleared after idle timeout");
            self.publish(false).await;
        }
    }

    /// Rebuild the remote typing set from a full-state snapshot
    fn apply_sync(&self, snapshot: &SyncSnapshot) {
        let view = ChannelView::from_snapshot(snapshot);
        let typing = view.typing_except(&self.local);
        self.typing_tx.send_replace(typing);
    }
}

/// Presence & typing coordinator for one open conversation
///
/// Created on conversation open, shut down (or dropped) on close. Owns
/// exactly one channel transport once bound.
pub struct TypingCoordinator {
    inner: Arc<Inner>,
}

impl TypingCoordinator {
    /// Create a coordinator with the default 2000 ms idle window
    #[must_use]
    pub fn new(local: ParticipantId) -> Self {
        Self::with_config(local, TypingConfig::default())
    }

    /// Create a coordinator with custom tuning
    #[must_use]
    pub fn with_config(local: ParticipantId, config: TypingConfig) -> Self {
        let (typing_tx, _) = watch::channel(BTreeSet::new());

        Self {
            inner: Arc::new(Inner {
                local,
                idle_timeout: config.idle_timeout,
                transport: RwLock::new(None),
                state: Mutex::new(LocalState {
                    typing: false,
                    idle_timer: None,
                    epoch: 0,
                }),
                typing_tx,
                sync_task: Mutex::new(None),
            }),
        }
    }

    /// The local participant this coordinator publishes for
    #[must_use]
    pub fn participant(&self) -> ParticipantId {
        self.inner.local
    }

    /// Attach a subscribed channel
    ///
    /// Publishes an initial non-typing entry so peers see the participant
    /// before the first keystroke, and starts forwarding the channel's
    /// sync events into [`apply_sync`](Self::apply_sync).
    pub async fn bind(&self, transport: Arc<dyn PresenceTransport>) {
        let mut sync_rx = transport.sync_events();
        debug!(participant = %self.inner.local, channel = %transport.channel(), "Bound to channel");
        *self.inner.transport.write() = Some(transport);

        self.inner.publish(false).await;

        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            forward_sync(&weak, &mut sync_rx).await;
        });

        if let Some(old) = self.inner.sync_task.lock().replace(task) {
            old.abort();
        }
    }

    /// Record the local typing flag
    ///
    /// Edge-triggered: publishes only when the flag actually changes, so
    /// a burst of same-direction calls produces at most one publish. A
    /// no-op until a channel is bound.
    pub async fn set_typing(&self, typing: bool) {
        if self.inner.transport().is_none() {
            return;
        }

        let changed = {
            let mut state = self.inner.state.lock();
            if state.typing == typing {
                false
            } else {
                state.typing = typing;
                true
            }
        };

        if changed {
            self.inner.publish(typing).await;
        }
    }

    /// Keystroke hook
    ///
    /// A rising edge publishes `typing=true` immediately; every call
    /// aborts and re-arms the single idle timer, whose expiry publishes
    /// `typing=false`. A no-op until a channel is bound.
    pub async fn input_activity(&self) {
        if self.inner.transport().is_none() {
            return;
        }

        let (rising, epoch) = {
            let mut state = self.inner.state.lock();
            if let Some(timer) = state.idle_timer.take() {
                timer.abort();
            }
            state.epoch += 1;
            let rising = !state.typing;
            state.typing = true;
            (rising, state.epoch)
        };

        if rising {
            self.inner.publish(true).await;
        }

        let weak = Arc::downgrade(&self.inner);
        let idle_timeout = self.inner.idle_timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(idle_timeout).await;
            // A torn-down coordinator must never publish
            if let Some(inner) = weak.upgrade() {
                inner.expire(epoch).await;
            }
        });
        self.inner.state.lock().idle_timer = Some(timer);
    }

    /// Message-send hook
    ///
    /// Cancels the pending idle timer and awaits the `typing=false`
    /// publish before returning, so the caller transmits the message only
    /// after peers stop seeing a stale flag.
    pub async fn message_sent(&self) {
        let clearing = {
            let mut state = self.inner.state.lock();
            if let Some(timer) = state.idle_timer.take() {
                timer.abort();
            }
            state.epoch += 1;
            if state.typing {
                state.typing = false;
                true
            } else {
                false
            }
        };

        if clearing {
            self.inner.publish(false).await;
        }
    }

    /// Consume a full-state snapshot, replacing the remote typing set
    ///
    /// The local participant is excluded; per key the first valid state
    /// wins and malformed states are skipped.
    pub fn apply_sync(&self, snapshot: &SyncSnapshot) {
        self.inner.apply_sync(snapshot);
    }

    /// Reactive "who is typing now" value for the rendering layer
    #[must_use]
    pub fn typing_participants(&self) -> watch::Receiver<BTreeSet<ParticipantId>> {
        self.inner.typing_tx.subscribe()
    }

    /// Whether the local participant is currently marked typing
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.inner.state.lock().typing
    }

    /// Tear down: cancel the idle timer, stop sync forwarding, leave the
    /// channel, and clear the derived typing set
    pub async fn shutdown(&self) {
        {
            let mut state = self.inner.state.lock();
            if let Some(timer) = state.idle_timer.take() {
                timer.abort();
            }
            state.epoch += 1;
            state.typing = false;
        }

        if let Some(task) = self.inner.sync_task.lock().take() {
            task.abort();
        }

        let transport = self.inner.transport.write().take();
        if let Some(transport) = transport {
            if let Err(e) = transport.leave().await {
                warn!(participant = %self.inner.local, error = %e, "Failed to leave channel");
            }
        }

        self.inner.typing_tx.send_replace(BTreeSet::new());
        debug!(participant = %self.inner.local, "Coordinator shut down");
    }
}

impl Drop for TypingCoordinator {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.state.lock().idle_timer.take() {
            timer.abort();
        }
        if let Some(task) = self.inner.sync_task.lock().take() {
            task.abort();
        }
    }
}

/// Forward sync events into the coordinator until it goes away
async fn forward_sync(
    inner: &Weak<Inner>,
    sync_rx: &mut broadcast::Receiver<SyncSnapshot>,
) {
    loop {
        match sync_rx.recv().await {
            Ok(snapshot) => {
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                inner.apply_sync(&snapshot);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Full-state replace semantics: a missed snapshot is
                // superseded by the next one
                trace!(skipped, "Sync receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
