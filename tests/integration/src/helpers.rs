//! Test helpers for integration tests
//!
//! Wires coordinators to the in-process hub and provides utilities for
//! awaiting derived-state changes with a timeout.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use parley_channel::{ChannelName, PresenceHub};
use parley_core::{ConversationId, ParticipantId};
use parley_presence::{TypingConfig, TypingCoordinator};
use tokio::sync::watch;

/// A participant wired into a conversation's presence channel
pub struct TestParticipant {
    pub id: ParticipantId,
    pub coordinator: TypingCoordinator,
}

impl TestParticipant {
    /// Join the conversation's presence channel and bind a coordinator
    pub async fn join(hub: &PresenceHub, conversation: ConversationId) -> Self {
        Self::join_with_config(hub, conversation, TypingConfig::default()).await
    }

    /// Join with custom coordinator tuning
    pub async fn join_with_config(
        hub: &PresenceHub,
        conversation: ConversationId,
        config: TypingConfig,
    ) -> Self {
        let id = ParticipantId::random();
        let coordinator = TypingCoordinator::with_config(id, config);

        let channel = hub.join(ChannelName::presence(conversation), id);
        coordinator.bind(Arc::new(channel)).await;

        Self { id, coordinator }
    }

    /// Receiver for this participant's derived "typing now" set
    pub fn typing_view(&self) -> watch::Receiver<BTreeSet<ParticipantId>> {
        self.coordinator.typing_participants()
    }
}

/// Wait until a typing view satisfies `predicate`, with a 1s timeout
pub async fn wait_for_typing<F>(
    rx: &mut watch::Receiver<BTreeSet<ParticipantId>>,
    mut predicate: F,
) -> Result<()>
where
    F: FnMut(&BTreeSet<ParticipantId>) -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if predicate(&rx.borrow_and_update()) {
                return Ok(());
            }
            rx.changed()
                .await
                .map_err(|_| anyhow!("typing watch sender dropped"))?;
        }
    })
    .await
    .map_err(|_| anyhow!("typing condition not reached within timeout"))?
}
