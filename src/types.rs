//! Shared types used across the resolver, assembler and presentation layers.

use std::fmt;

/// Identifier of an entry in the host's state namespace, e.g. `sensor.leeds_1_destination`.
pub type EntityId = String;

/// Identifier of a device in the host's device registry.
pub type DeviceId = String;

/// Running status of a single departure.
///
/// `Cancelled` outranks `Delayed` when both flags are set for the same service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureStatus {
    #[default]
    Normal,
    Delayed,
    Cancelled,
}

impl DepartureStatus {
    /// Derives the status from the two boolean flags published per service.
    pub fn from_flags(cancelled: bool, delayed: bool) -> Self {
        if cancelled {
            DepartureStatus::Cancelled
        } else if delayed {
            DepartureStatus::Delayed
        } else {
            DepartureStatus::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepartureStatus::Normal => "normal",
            DepartureStatus::Delayed => "delayed",
            DepartureStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DepartureStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "normal" => Ok(DepartureStatus::Normal),
            "delayed" => Ok(DepartureStatus::Delayed),
            "cancelled" => Ok(DepartureStatus::Cancelled),
            _ => Err(format!("Invalid departure status: {}", value)),
        }
    }
}
