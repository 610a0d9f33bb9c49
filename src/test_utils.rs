//! Fixtures shared by unit, integration and property tests.

use crate::error::RegistryError;
use crate::primitives::StateSnapshot;
use crate::registry::{DeviceRegistryEntry, EntityRegistryEntry, RegistryService, StaticRegistry};

/// One service for [`departure_snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ServiceFixture<'a> {
    pub destination: &'a str,
    pub scheduled: Option<&'a str>,
    pub estimated: Option<&'a str>,
    pub cancelled: Option<&'a str>,
    pub delayed: Option<&'a str>,
    pub service_type: Option<&'a str>,
}

impl<'a> ServiceFixture<'a> {
    pub fn new(destination: &'a str) -> Self {
        ServiceFixture { destination, ..Self::default() }
    }

    pub fn at(mut self, scheduled: &'a str, estimated: &'a str) -> Self {
        self.scheduled = Some(scheduled);
        self.estimated = Some(estimated);
        self
    }
}

/// Builds `sensor.{prefix}_…` entities for a board advertising `services.len()`
/// services. Optional fields left as `None` are not published at all.
pub fn departure_snapshot(prefix: &str, services: &[ServiceFixture<'_>]) -> StateSnapshot {
    let mut snapshot = StateSnapshot::new();
    snapshot.insert(format!("sensor.{}_max_services", prefix), services.len().to_string());
    for (i, service) in services.iter().enumerate() {
        let n = i + 1;
        snapshot.insert(format!("sensor.{}_{}_destination", prefix, n), service.destination);
        let optional = [
            ("scheduled_time", service.scheduled),
            ("estimated_time", service.estimated),
            ("cancelled", service.cancelled),
            ("delayed", service.delayed),
            ("type", service.service_type),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                snapshot.insert(format!("sensor.{}_{}_{}", prefix, n, key), value);
            }
        }
    }
    snapshot
}

/// A registry that assigns every entity of `snapshot` to `device_id`.
pub fn registry_for(device_id: &str, snapshot: &StateSnapshot) -> StaticRegistry {
    let entities = snapshot
        .entity_ids()
        .map(|entity_id| EntityRegistryEntry::new(entity_id, Some(device_id)))
        .collect();
    let devices = vec![DeviceRegistryEntry {
        id: device_id.to_string(),
        name: Some("Departure Board".to_string()),
        name_by_user: None,
    }];
    StaticRegistry::new(entities, devices)
}

/// A registry whose every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingRegistry;

impl RegistryService for FailingRegistry {
    fn list_entities(&self) -> Result<Vec<EntityRegistryEntry>, RegistryError> {
        Err(RegistryError::Call("entity registry unavailable".into()))
    }

    fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, RegistryError> {
        Err(RegistryError::Call("device registry unavailable".into()))
    }
}
