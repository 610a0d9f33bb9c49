#![no_main]

// Harness: row assembly over arbitrary sensor values is panic-free, gap-free
// and bounded by the advertised service count.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rail_card_core::assembler::{assemble_rows, parse_service_count};
use rail_card_core::primitives::StateSnapshot;
use rail_card_core::resolver::Resolver;

#[derive(Arbitrary, Debug)]
struct BoardInput {
    prefix: String,
    max_services: String,
    values: Vec<(u8, u8, String)>,
}

const KEYS: [&str; 6] = ["destination", "scheduled_time", "estimated_time", "cancelled", "delayed", "type"];

fuzz_target!(|input: BoardInput| {
    let mut snapshot = StateSnapshot::new();
    snapshot.insert(format!("sensor.{}_max_services", input.prefix), input.max_services.as_str());
    for (index, key, value) in input.values {
        let key = KEYS[key as usize % KEYS.len()];
        snapshot.insert(format!("sensor.{}_{}_{}", input.prefix, index % 16, key), value);
    }

    let rows = assemble_rows(&Resolver::legacy(&snapshot, &input.prefix));
    let advertised = parse_service_count(&input.max_services).max(0);
    assert!(rows.len() as i64 <= advertised);
    assert!(rows.iter().all(|row| !row.destination.is_empty()));
    assert!(rows.iter().all(|row| !row.scheduled.is_empty() && !row.estimated.is_empty()));
});
