//!
//! Registry abstraction for the host's entity and device registries.
//!
//! Both registries are remote, read-only lists owned by the host. The card
//! only needs two queries: which entities belong to which device (to build a
//! [`DeviceScope`]) and what a device is called (for the editor's label).
//! Failures are absorbed by callers; nothing here retries.

use std::collections::HashSet;

use crate::error::RegistryError;
use crate::types::{DeviceId, EntityId};

/// One row of the entity registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityRegistryEntry {
    pub entity_id: EntityId,
    #[serde(default)]
    pub device_id: Option<DeviceId>,
}

impl EntityRegistryEntry {
    pub fn new(entity_id: &str, device_id: Option<&str>) -> Self {
        EntityRegistryEntry {
            entity_id: entity_id.to_string(),
            device_id: device_id.map(str::to_string),
        }
    }
}

/// One row of the device registry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceRegistryEntry {
    pub id: DeviceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_by_user: Option<String>,
}

impl DeviceRegistryEntry {
    /// The user's name for the device if set, otherwise the integration's name.
    pub fn display_name(&self) -> Option<&str> {
        self.name_by_user
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.name.as_deref())
    }
}

/// Read-only access to the host's registries.
///
/// Implementations may be backed by a websocket call, a cache, or static data.
/// The card decides when a call is needed and hands back the result through
/// its completion methods, so implementations are free to run asynchronously.
pub trait RegistryService {
    /// `config/entity_registry/list`
    fn list_entities(&self) -> Result<Vec<EntityRegistryEntry>, RegistryError>;

    /// `config/device_registry/list`
    fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, RegistryError>;
}

/// Decodes a raw entity-registry response.
pub fn parse_entity_list(payload: &str) -> Result<Vec<EntityRegistryEntry>, RegistryError> {
    serde_json::from_str(payload).map_err(|e| RegistryError::Malformed(e.to_string()))
}

/// Decodes a raw device-registry response.
pub fn parse_device_list(payload: &str) -> Result<Vec<DeviceRegistryEntry>, RegistryError> {
    serde_json::from_str(payload).map_err(|e| RegistryError::Malformed(e.to_string()))
}

/// The set of entity ids that belong to one device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceScope {
    entity_ids: HashSet<EntityId>,
}

impl DeviceScope {
    /// An empty scope; every lookup against it misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collects the entities whose registry entry points at `device_id`.
    pub fn for_device(entries: &[EntityRegistryEntry], device_id: &str) -> Self {
        let entity_ids = entries
            .iter()
            .filter(|entry| entry.device_id.as_deref() == Some(device_id))
            .map(|entry| entry.entity_id.clone())
            .collect();
        DeviceScope { entity_ids }
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.entity_ids.contains(entity_id)
    }

    pub fn len(&self) -> usize {
        self.entity_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_ids.is_empty()
    }
}

impl<S: Into<EntityId>> FromIterator<S> for DeviceScope {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        DeviceScope { entity_ids: iter.into_iter().map(Into::into).collect() }
    }
}

/// Registry backed by in-memory lists.
#[derive(Debug, Default, Clone)]
pub struct StaticRegistry {
    pub entities: Vec<EntityRegistryEntry>,
    pub devices: Vec<DeviceRegistryEntry>,
}

impl StaticRegistry {
    pub fn new(entities: Vec<EntityRegistryEntry>, devices: Vec<DeviceRegistryEntry>) -> Self {
        StaticRegistry { entities, devices }
    }
}

impl RegistryService for StaticRegistry {
    fn list_entities(&self) -> Result<Vec<EntityRegistryEntry>, RegistryError> {
        tracing::trace!(count = self.entities.len(), "StaticRegistry listing entities");
        Ok(self.entities.clone())
    }

    fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, RegistryError> {
        tracing::trace!(count = self.devices.len(), "StaticRegistry listing devices");
        Ok(self.devices.clone())
    }
}
