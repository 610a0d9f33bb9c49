use indexmap::IndexMap;

use crate::error::CardError;
use crate::types::{DepartureStatus, EntityId};

// --- Host state -------------------------------------------------------------

/// A single entry in the host's state namespace.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        EntityState { state: state.into(), attributes: serde_json::Map::new() }
    }
}

/// Immutable view of every entity state the host exposes, keyed by entity id.
///
/// Iteration follows the host's enumeration order, which is the order entries
/// were inserted (or appeared in the JSON object the snapshot was decoded from).
/// Suffix resolution depends on this order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    states: IndexMap<EntityId, EntityState>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the host's `states` object.
    pub fn from_json(payload: &str) -> Result<Self, CardError> {
        serde_json::from_str(payload).map_err(|e| CardError::InvalidSnapshot(e.to_string()))
    }

    /// Adds or replaces an entry. Replacing keeps the entry's original position.
    pub fn insert(&mut self, entity_id: impl Into<EntityId>, state: impl Into<String>) {
        self.states.insert(entity_id.into(), EntityState::new(state));
    }

    /// Builder form of [`StateSnapshot::insert`].
    pub fn with(mut self, entity_id: impl Into<EntityId>, state: impl Into<String>) -> Self {
        self.insert(entity_id, state);
        self
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    /// The raw state string of `entity_id`, if the entity exists.
    pub fn value(&self, entity_id: &str) -> Option<&str> {
        self.states.get(entity_id).map(|entry| entry.state.as_str())
    }

    /// Entity ids in enumeration order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.states.keys()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<K: Into<EntityId>, V: Into<String>> FromIterator<(K, V)> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = StateSnapshot::new();
        for (entity_id, state) in iter {
            snapshot.insert(entity_id, state);
        }
        snapshot
    }
}

// --- Departures -------------------------------------------------------------

/// Placeholder shown for a missing or empty time.
pub const MISSING_TIME: &str = "-";

/// One upcoming service, rebuilt from the snapshot on every recomputation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRow {
    pub scheduled: String,
    pub destination: String,
    pub estimated: String,
    pub status: DepartureStatus,
    pub service_type: String,
    pub is_replacement: bool,
}

impl DepartureRow {
    /// A normal rail service with the given times; used mostly by tests and hosts
    /// that synthesise rows.
    pub fn new(scheduled: &str, destination: &str, estimated: &str) -> Self {
        DepartureRow {
            scheduled: scheduled.to_string(),
            destination: destination.to_string(),
            estimated: estimated.to_string(),
            status: DepartureStatus::Normal,
            service_type: String::new(),
            is_replacement: false,
        }
    }
}

/// Ordered, gap-free list of departures starting at service index 1.
pub type RowSequence = Vec<DepartureRow>;
