//!
//! Card configuration as stored by the dashboard.
//!
//! A configuration is validated once into an [`AddressingMode`]; everything
//! downstream works from that mode and never re-inspects which fields happen
//! to be present.

use crate::addressing::AddressingMode;
use crate::error::CardError;

/// Custom element type the dashboard uses to instantiate the card.
pub const CARD_TYPE: &str = "custom:uk-rail-card";

/// Number of dashboard rows the card asks for.
pub const CARD_SIZE: u32 = 3;

/// Entry the card registers in the dashboard's card picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CardInfo {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CARD_INFO: CardInfo = CardInfo {
    card_type: "uk-rail-card",
    name: "UK Rail Card",
    description: "Displays upcoming rail services with scheduled and estimated times.",
};

fn default_card_type() -> String {
    CARD_TYPE.to_string()
}

/// User-editable card configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CardConfig {
    #[serde(rename = "type", default = "default_card_type")]
    pub card_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Legacy sensor prefix. May be empty when a registry device is selected.
    #[serde(default)]
    pub device: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        CardConfig { card_type: default_card_type(), title: None, device: String::new(), device_id: None }
    }
}

impl CardConfig {
    /// Configuration offered when the card is first added to a dashboard.
    pub fn stub() -> Self {
        CardConfig {
            card_type: default_card_type(),
            title: Some("Rail Services".to_string()),
            device: "rail_station".to_string(),
            device_id: None,
        }
    }

    pub fn legacy(device: &str) -> Self {
        CardConfig { device: device.to_string(), ..Self::default() }
    }

    pub fn scoped(device_id: &str) -> Self {
        CardConfig { device_id: Some(device_id.to_string()), ..Self::default() }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn from_json(payload: &str) -> Result<Self, CardError> {
        serde_json::from_str(payload).map_err(|e| CardError::InvalidConfig(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CardError> {
        serde_json::to_string(self).map_err(|e| CardError::InvalidConfig(e.to_string()))
    }

    /// The title to display, trimmed; `None` when unset or blank.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|title| !title.is_empty())
    }

    /// Validates the configuration into its addressing mode.
    ///
    /// A registry device id takes precedence; the legacy prefix is used only
    /// when no device id is set. With neither, the configuration is rejected.
    pub fn addressing(&self) -> Result<AddressingMode, CardError> {
        if let Some(device_id) = self.device_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(AddressingMode::RegistryScoped(device_id.to_string()));
        }

        let device = self.device.trim();
        if device.is_empty() {
            return Err(CardError::MissingDevice);
        }
        Ok(AddressingMode::LegacyPrefix(device.to_string()))
    }
}
