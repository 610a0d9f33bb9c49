//!
//! Configuration editor for the card.
//!
//! The editor presents two fields, an optional title and a registry device
//! picker, and turns user edits into [`ConfigChanged`] events carrying the
//! full updated configuration. Selecting a device also derives the legacy
//! sensor prefix from that device's entities so older card versions keep
//! working with the saved configuration.

use crate::addressing::{derive_device_prefix, is_service_sensor, object_id, Field};
use crate::config::CardConfig;
use crate::error::RegistryError;
use crate::gate::{FetchTicket, GatePoll, LoadGate};
use crate::registry::{DeviceRegistryEntry, EntityRegistryEntry, RegistryService};

/// Request to fetch one of the (global) registry lists.
pub type RegistryTicket = FetchTicket<()>;

/// Emitted whenever the user changes the configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfigChanged {
    pub config: CardConfig,
}

/// Values shown in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub device_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    DeviceId,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::DeviceId => "device_id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(FormField::Title),
            "device_id" => Some(FormField::DeviceId),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title (optional)",
            FormField::DeviceId => "Device",
        }
    }

    pub fn helper(self) -> &'static str {
        match self {
            FormField::Title => "",
            FormField::DeviceId => "Select a rail2mqtt Departure Board device.",
        }
    }
}

/// Integration that publishes departure boards.
pub const DEVICE_MANUFACTURER: &str = "rail2mqtt";
pub const DEVICE_MODEL: &str = "Departure Board";

/// Form schema in the dashboard's selector format.
pub fn form_schema() -> serde_json::Value {
    serde_json::json!([
        { "name": FormField::Title.name(), "selector": { "text": {} } },
        {
            "name": FormField::DeviceId.name(),
            "selector": { "device": { "manufacturer": DEVICE_MANUFACTURER, "model": DEVICE_MODEL } }
        }
    ])
}

/// Outcome of a device selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorUpdate {
    Changed(ConfigChanged),
    /// The entity registry is needed first. Carries a ticket when this call
    /// started the fetch; the change is emitted by [`CardEditor::complete_entities`].
    Deferred(Option<RegistryTicket>),
    /// No configuration to edit yet.
    Unchanged,
}

/// Picks the entity that best identifies a device's sensor prefix: its
/// `max_services` sensor, else any per-service sensor, else its first entity.
pub fn pick_entity_for_device<'a>(entries: &'a [EntityRegistryEntry], device_id: &str) -> Option<&'a str> {
    let max_services_tail = format!("_{}", Field::MaxServices.key());
    let candidates: Vec<&str> = entries
        .iter()
        .filter(|entry| entry.device_id.as_deref() == Some(device_id))
        .map(|entry| entry.entity_id.as_str())
        .collect();

    candidates
        .iter()
        .find(|entity_id| object_id(entity_id).ends_with(&max_services_tail))
        .or_else(|| candidates.iter().find(|entity_id| is_service_sensor(object_id(entity_id))))
        .or_else(|| candidates.first())
        .copied()
}

#[derive(Debug, Default)]
pub struct CardEditor {
    config: Option<CardConfig>,
    entities: LoadGate<(), Vec<EntityRegistryEntry>>,
    devices: LoadGate<(), Vec<DeviceRegistryEntry>>,
    deferred_device: Option<String>,
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: CardConfig) {
        self.config = Some(config);
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn form_data(&self) -> FormData {
        let config = self.config.as_ref();
        FormData {
            title: config.and_then(|c| c.title.clone()).unwrap_or_default(),
            device_id: config.and_then(|c| c.device_id.clone()).unwrap_or_default(),
        }
    }

    /// Starts the entity-registry fetch if it has not been requested yet.
    pub fn request_entities(&mut self) -> Option<RegistryTicket> {
        match self.entities.poll(&()) {
            GatePoll::Pending(ticket) => ticket,
            _ => None,
        }
    }

    /// Starts the device-registry fetch if it has not been requested yet.
    pub fn request_devices(&mut self) -> Option<RegistryTicket> {
        match self.devices.poll(&()) {
            GatePoll::Pending(ticket) => ticket,
            _ => None,
        }
    }

    /// Applies the entity registry. Emits the change for a device selection
    /// that was waiting on it.
    pub fn complete_entities(
        &mut self,
        ticket: RegistryTicket,
        result: Result<Vec<EntityRegistryEntry>, RegistryError>,
    ) -> Option<ConfigChanged> {
        if !self.entities.complete(ticket, result) {
            return None;
        }
        let device_id = self.deferred_device.take()?;
        match self.select_device(&device_id) {
            EditorUpdate::Changed(changed) => Some(changed),
            _ => None,
        }
    }

    pub fn complete_devices(
        &mut self,
        ticket: RegistryTicket,
        result: Result<Vec<DeviceRegistryEntry>, RegistryError>,
    ) -> bool {
        self.devices.complete(ticket, result)
    }

    /// Fetches whichever registry lists are still missing from `registry`.
    pub fn load_registry<R: RegistryService + ?Sized>(&mut self, registry: &R) -> Option<ConfigChanged> {
        if let Some(ticket) = self.request_devices() {
            self.complete_devices(ticket, registry.list_devices());
        }
        let ticket = self.request_entities()?;
        self.complete_entities(ticket, registry.list_entities())
    }

    /// Display name of a device for the picker; `None` if unknown or the
    /// device registry is unavailable.
    pub fn device_label(&self, device_id: &str) -> Option<&str> {
        self.devices
            .value()?
            .iter()
            .find(|device| device.id == device_id)
            .and_then(DeviceRegistryEntry::display_name)
    }

    pub fn update_title(&mut self, value: &str) -> Option<ConfigChanged> {
        let config = self.config.as_mut()?;
        let trimmed = value.trim();
        config.title = (!trimmed.is_empty()).then(|| trimmed.to_string());
        Some(ConfigChanged { config: config.clone() })
    }

    /// Selects a registry device, or clears the selection with an empty id.
    pub fn select_device(&mut self, device_id: &str) -> EditorUpdate {
        if self.config.is_none() {
            return EditorUpdate::Unchanged;
        }
        let trimmed = device_id.trim();

        if !trimmed.is_empty() && !self.entities.is_settled() {
            tracing::debug!(device_id = trimmed, "Deferring device selection until entity registry loads");
            self.deferred_device = Some(trimmed.to_string());
            return EditorUpdate::Deferred(self.request_entities());
        }

        let device = if trimmed.is_empty() {
            String::new()
        } else {
            let entries = self.entities.value().map(Vec::as_slice).unwrap_or_default();
            pick_entity_for_device(entries, trimmed)
                .map(derive_device_prefix)
                .unwrap_or_default()
        };

        let Some(config) = self.config.as_mut() else {
            return EditorUpdate::Unchanged;
        };
        config.device_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
        config.device = device;
        EditorUpdate::Changed(ConfigChanged { config: config.clone() })
    }

    /// Applies a form submission, emitting one update per field that changed.
    pub fn apply_form(&mut self, data: &FormData) -> Vec<EditorUpdate> {
        let current = self.form_data();
        let mut updates = Vec::new();

        if data.title != current.title {
            if let Some(changed) = self.update_title(&data.title) {
                updates.push(EditorUpdate::Changed(changed));
            }
        }
        if data.device_id != current.device_id {
            updates.push(self.select_device(&data.device_id));
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<EntityRegistryEntry> {
        vec![
            EntityRegistryEntry::new("sensor.leeds_1_cancelled", Some("dev1")),
            EntityRegistryEntry::new("sensor.leeds_1_destination", Some("dev1")),
            EntityRegistryEntry::new("sensor.leeds_max_services", Some("dev1")),
            EntityRegistryEntry::new("sensor.york_1_type", Some("dev2")),
            EntityRegistryEntry::new("sensor.york_2_scheduled_time", Some("dev2")),
            EntityRegistryEntry::new("binary_sensor.hull_status", Some("dev3")),
        ]
    }

    #[test]
    fn test_pick_entity_for_device() {
        let entries = entries();
        assert_eq!(pick_entity_for_device(&entries, "dev1"), Some("sensor.leeds_max_services"));
        assert_eq!(pick_entity_for_device(&entries, "dev2"), Some("sensor.york_2_scheduled_time"));
        assert_eq!(pick_entity_for_device(&entries, "dev3"), Some("binary_sensor.hull_status"));
        assert_eq!(pick_entity_for_device(&entries, "dev4"), None);
    }

    #[test]
    fn test_update_title_trims_and_clears() {
        let mut editor = CardEditor::new();
        assert_eq!(editor.update_title("x"), None);

        editor.set_config(CardConfig::legacy("leeds"));
        let changed = editor.update_title("  Leeds  ").unwrap();
        assert_eq!(changed.config.title.as_deref(), Some("Leeds"));
        let cleared = editor.update_title("   ").unwrap();
        assert_eq!(cleared.config.title, None);
    }

    #[test]
    fn test_select_device_defers_until_entities_load() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig::legacy("old"));

        let EditorUpdate::Deferred(Some(ticket)) = editor.select_device(" dev1 ") else {
            panic!("selection should wait for the entity registry");
        };
        assert_eq!(editor.select_device("dev1"), EditorUpdate::Deferred(None));

        let changed = editor.complete_entities(ticket, Ok(entries())).unwrap();
        assert_eq!(changed.config.device_id.as_deref(), Some("dev1"));
        assert_eq!(changed.config.device, "leeds");
    }

    #[test]
    fn test_failed_registry_clears_prefix() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig::legacy("old"));
        let EditorUpdate::Deferred(Some(ticket)) = editor.select_device("dev1") else {
            panic!("expected deferral");
        };
        let changed = editor
            .complete_entities(ticket, Err(RegistryError::Unavailable))
            .unwrap();
        assert_eq!(changed.config.device_id.as_deref(), Some("dev1"));
        assert_eq!(changed.config.device, "");
    }

    #[test]
    fn test_clearing_device() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig { device: "leeds".into(), device_id: Some("dev1".into()), ..CardConfig::default() });
        let EditorUpdate::Changed(changed) = editor.select_device("") else {
            panic!("clearing never needs the registry");
        };
        assert_eq!(changed.config.device_id, None);
        assert_eq!(changed.config.device, "");
    }

    #[test]
    fn test_apply_form_title_only() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig::legacy("old"));

        let mut data = editor.form_data();
        data.title = "Platform 1".into();
        let updates = editor.apply_form(&data);

        assert_eq!(updates.len(), 1);
        let EditorUpdate::Changed(changed) = &updates[0] else {
            panic!("title edits apply immediately");
        };
        assert_eq!(changed.config.title.as_deref(), Some("Platform 1"));
        assert_eq!(changed.config.device, "old");
    }

    #[test]
    fn test_apply_form_defers_device_until_entities_load() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig::legacy("old"));

        let data = FormData { title: "T".into(), device_id: "dev1".into() };
        let mut updates = editor.apply_form(&data);
        assert_eq!(updates.len(), 2);

        let Some(EditorUpdate::Deferred(Some(ticket))) = updates.pop() else {
            panic!("device change waits for the entity registry");
        };
        let Some(EditorUpdate::Changed(titled)) = updates.pop() else {
            panic!("title change is emitted first");
        };
        assert_eq!(titled.config.title.as_deref(), Some("T"));
        assert_eq!(titled.config.device, "old");
        assert_eq!(titled.config.device_id, None);

        let changed = editor.complete_entities(ticket, Ok(entries())).unwrap();
        assert_eq!(changed.config.title.as_deref(), Some("T"));
        assert_eq!(changed.config.device_id.as_deref(), Some("dev1"));
        assert_eq!(changed.config.device, "leeds");
        assert_eq!(editor.form_data(), data);
    }

    #[test]
    fn test_apply_form_unchanged_emits_nothing() {
        let mut editor = CardEditor::new();
        editor.set_config(CardConfig::scoped("dev1").with_title("Leeds"));
        let before = editor.config().cloned();

        let data = editor.form_data();
        assert!(editor.apply_form(&data).is_empty());
        assert_eq!(editor.config().cloned(), before);
    }

    #[test]
    fn test_form_labels_and_schema() {
        assert_eq!(FormField::from_name("title").map(FormField::label), Some("Title (optional)"));
        assert_eq!(FormField::DeviceId.helper(), "Select a rail2mqtt Departure Board device.");
        assert_eq!(FormField::Title.helper(), "");
        assert_eq!(FormField::from_name("device"), None);

        let schema = form_schema();
        assert_eq!(schema[1]["selector"]["device"]["model"], "Departure Board");
    }
}
