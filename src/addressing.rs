//!
//! Naming convention for departure-board sensors.
//!
//! Every sensor the board reads is located by the tail of its entity id. Board
//! level values end in `_{key}` and per-service values end in `_{n}_{key}` for
//! service index `n` starting at 1. The [`Field`] table below is the single
//! source of those keys.

use crate::types::DeviceId;

/// A logical value published by a departure-board device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    MaxServices,
    LastUpdated,
    Destination,
    ScheduledTime,
    EstimatedTime,
    Cancelled,
    Delayed,
    ServiceType,
}

impl Field {
    /// The id tail this field is published under.
    pub const fn key(self) -> &'static str {
        match self {
            Field::MaxServices => "max_services",
            Field::LastUpdated => "last_updated",
            Field::Destination => "destination",
            Field::ScheduledTime => "scheduled_time",
            Field::EstimatedTime => "estimated_time",
            Field::Cancelled => "cancelled",
            Field::Delayed => "delayed",
            Field::ServiceType => "type",
        }
    }

    /// Whether the field is published once per service index.
    pub const fn is_indexed(self) -> bool {
        !matches!(self, Field::MaxServices | Field::LastUpdated)
    }

    /// The bare suffix for this field, e.g. `max_services` or `3_destination`.
    ///
    /// `index` is ignored for board-level fields.
    pub fn suffix(self, index: u32) -> String {
        if self.is_indexed() {
            format!("{}_{}", index, self.key())
        } else {
            self.key().to_string()
        }
    }
}

/// How the card finds its sensors in the state namespace.
///
/// Exactly one mode is active per configuration; the modes never combine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// Sensors are named `{prefix}_{suffix}`; a bare `{suffix}` match is the fallback.
    LegacyPrefix(String),
    /// Sensors belong to a registry device; only bare suffixes are matched,
    /// and only among that device's entities.
    RegistryScoped(DeviceId),
}

impl AddressingMode {
    /// The registry device this mode is scoped to, if any.
    pub fn device_id(&self) -> Option<&DeviceId> {
        match self {
            AddressingMode::LegacyPrefix(_) => None,
            AddressingMode::RegistryScoped(device_id) => Some(device_id),
        }
    }
}

/// Suffixes to probe for `field`: `{prefix}_{suffix}` then `{suffix}` when a
/// legacy prefix is given, the bare suffix alone otherwise.
pub fn candidate_suffixes(prefix: Option<&str>, field: Field, index: u32) -> Vec<String> {
    let bare = field.suffix(index);
    match prefix {
        Some(prefix) => vec![format!("{}_{}", prefix, bare), bare],
        None => vec![bare],
    }
}

/// Splits an entity id into its object part, dropping the `domain.` prefix.
///
/// Ids without a domain yield an empty object id.
pub fn object_id(entity_id: &str) -> &str {
    entity_id.split('.').nth(1).unwrap_or("")
}

/// Strips `_{n}_{key}` from a per-service object id, returning the device
/// prefix. Only the destination and time keys are recognised.
fn service_prefix(object_id: &str) -> Option<&str> {
    const PREFIX_KEYS: [Field; 3] = [Field::ScheduledTime, Field::Destination, Field::EstimatedTime];

    PREFIX_KEYS.iter().find_map(|field| {
        let head = object_id.strip_suffix(field.key())?.strip_suffix('_')?;
        let digits_start = head.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits_start == head.len() {
            return None;
        }
        head[..digits_start].strip_suffix('_')
    })
}

/// Whether an object id is a per-service destination or time sensor.
pub fn is_service_sensor(object_id: &str) -> bool {
    service_prefix(object_id).is_some()
}

/// Recovers the legacy device prefix from one of the device's entity ids.
///
/// `sensor.leeds_max_services` and `sensor.leeds_2_destination` both yield
/// `leeds`; any other id yields its whole object id.
pub fn derive_device_prefix(entity_id: &str) -> String {
    let object_id = object_id(entity_id);
    let max_services_tail = format!("_{}", Field::MaxServices.key());

    if let Some(prefix) = object_id.strip_suffix(&max_services_tail) {
        return prefix.to_string();
    }

    service_prefix(object_id).unwrap_or(object_id).to_string()
}
