//! Presence records and channel views
//!
//! A participant broadcasts one [`PresenceEntry`] at a time; the broker
//! re-delivers the full channel state as a [`SyncSnapshot`] on every
//! change, and [`ChannelView`] is rebuilt wholesale from each snapshot
//! (never patched in place).

use crate::ids::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-participant ephemeral presence record
///
/// Mutated only by its owning participant; read by all subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// Participant broadcasting this state
    pub participant_id: ParticipantId,
    /// Whether the participant is currently typing
    pub typing: bool,
    /// When the participant last published state
    pub last_seen_at: DateTime<Utc>,
}

impl PresenceEntry {
    /// Create an entry stamped with the current time
    #[must_use]
    pub fn new(participant_id: ParticipantId, typing: bool) -> Self {
        Self {
            participant_id,
            typing,
            last_seen_at: Utc::now(),
        }
    }

    /// Override the last-seen timestamp
    #[must_use]
    pub fn with_last_seen(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen_at = at;
        self
    }
}

/// One key's slice of a full-state snapshot
///
/// The broker may hold several states under a single key (one per
/// tracking session); `states` is in join order and carries raw JSON so
/// that a malformed peer payload can be skipped without failing the sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotGroup {
    /// Presence key (participant id in string form)
    pub key: String,
    /// States tracked under this key, oldest first
    pub states: Vec<serde_json::Value>,
}

/// Full-state presence snapshot delivered on every sync event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSnapshot {
    /// Snapshot groups, one per key, in broker order
    pub groups: Vec<SnapshotGroup>,
}

impl SyncSnapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state under `key`, merging into an existing group
    pub fn push(&mut self, key: impl Into<String>, state: serde_json::Value) {
        let key = key.into();
        if let Some(group) = self.groups.iter_mut().find(|g| g.key == key) {
            group.states.push(state);
        } else {
            self.groups.push(SnapshotGroup {
                key,
                states: vec![state],
            });
        }
    }

    /// Number of keys in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether the snapshot carries no state at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Participant-to-presence mapping for one conversation
///
/// Holds at most one entry per participant. Created on conversation open,
/// discarded on close; there is no persistence.
#[derive(Debug, Clone, Default)]
pub struct ChannelView {
    entries: BTreeMap<ParticipantId, PresenceEntry>,
}

impl ChannelView {
    /// Rebuild the view from a full-state snapshot
    ///
    /// Resolution rules: the first valid state per key is authoritative
    /// (list order is the only ordering the broker defines); states that
    /// fail to deserialize and keys that are not participant ids are
    /// skipped.
    #[must_use]
    pub fn from_snapshot(snapshot: &SyncSnapshot) -> Self {
        let mut entries = BTreeMap::new();

        for group in &snapshot.groups {
            let Ok(id) = group.key.parse::<ParticipantId>() else {
                continue;
            };

            let first_valid = group
                .states
                .iter()
                .find_map(|state| serde_json::from_value::<PresenceEntry>(state.clone()).ok());

            if let Some(entry) = first_valid {
                entries.entry(id).or_insert(entry);
            }
        }

        Self { entries }
    }

    /// Look up a participant's entry
    #[must_use]
    pub fn get(&self, id: &ParticipantId) -> Option<&PresenceEntry> {
        self.entries.get(id)
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &PresenceEntry)> {
        self.entries.iter()
    }

    /// Participants currently marked typing, excluding `local`
    #[must_use]
    pub fn typing_except(&self, local: &ParticipantId) -> BTreeSet<ParticipantId> {
        self.entries
            .iter()
            .filter(|(id, entry)| *id != local && entry.typing)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of participants in the view
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the view is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
