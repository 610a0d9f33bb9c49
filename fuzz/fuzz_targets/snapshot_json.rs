#![no_main]

// Harness: decoding host payloads never panics, and a decoded snapshot
// re-encodes with the same ids, order and states.

use libfuzzer_sys::fuzz_target;
use rail_card_core::config::CardConfig;
use rail_card_core::primitives::StateSnapshot;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = CardConfig::from_json(text).map(|config| config.addressing());
    if let Ok(snapshot) = StateSnapshot::from_json(text) {
        let encoded = serde_json::to_string(&snapshot).expect("snapshot encodes");
        let decoded = StateSnapshot::from_json(&encoded).expect("snapshot decodes");
        assert!(decoded.entity_ids().eq(snapshot.entity_ids()));
        for entity_id in snapshot.entity_ids() {
            assert_eq!(decoded.value(entity_id), snapshot.value(entity_id));
        }
    }
});
