use proptest::prelude::*;
use rail_card_core::assembler::assemble_rows;
use rail_card_core::primitives::{StateSnapshot, MISSING_TIME};
use rail_card_core::resolver::Resolver;
use rail_card_core::types::DepartureStatus;

/// Per-index optional destination (None = not published) plus optional flags.
fn arb_board() -> impl Strategy<Value = (i64, Vec<(Option<String>, Option<String>, bool, bool, Option<String>)>)> {
    (
        -2i64..8,
        prop::collection::vec(
            (
                prop::option::of("( |  |[A-Z][a-z]{0,6})"),
                prop::option::of("([0-2][0-9]:[0-5][0-9])?"),
                any::<bool>(),
                any::<bool>(),
                prop::option::of("(train|bus|taxi| )"),
            ),
            0..8,
        ),
    )
}

fn build_snapshot(max: i64, services: &[(Option<String>, Option<String>, bool, bool, Option<String>)]) -> StateSnapshot {
    let mut snapshot = StateSnapshot::new().with("sensor.x_max_services", max.to_string());
    for (i, (destination, scheduled, cancelled, delayed, service_type)) in services.iter().enumerate() {
        let n = i + 1;
        if let Some(destination) = destination {
            snapshot.insert(format!("sensor.x_{}_destination", n), destination.as_str());
        }
        if let Some(scheduled) = scheduled {
            snapshot.insert(format!("sensor.x_{}_scheduled_time", n), scheduled.as_str());
        }
        snapshot.insert(format!("sensor.x_{}_cancelled", n), if *cancelled { "on" } else { "off" });
        snapshot.insert(format!("sensor.x_{}_delayed", n), if *delayed { "True" } else { "false" });
        if let Some(service_type) = service_type {
            snapshot.insert(format!("sensor.x_{}_type", n), service_type.as_str());
        }
    }
    snapshot
}

proptest! {
    /// Recomputing from the same inputs yields the same rows.
    #[test]
    fn prop_assemble_is_idempotent((max, services) in arb_board()) {
        let snapshot = build_snapshot(max, &services);
        let resolver = Resolver::legacy(&snapshot, "x");
        prop_assert_eq!(assemble_rows(&resolver), assemble_rows(&resolver));
    }

    /// Rows are exactly the prefix of indices before the first blank destination,
    /// capped by max_services.
    #[test]
    fn prop_rows_stop_at_first_gap((max, services) in arb_board()) {
        let snapshot = build_snapshot(max, &services);
        let rows = assemble_rows(&Resolver::legacy(&snapshot, "x"));

        let contiguous = services
            .iter()
            .take_while(|(destination, ..)| destination.as_deref().map_or(false, |d| !d.trim().is_empty()))
            .count();
        let expected = contiguous.min(max.max(0) as usize);
        prop_assert_eq!(rows.len(), expected);

        for (row, (destination, scheduled, cancelled, delayed, service_type)) in rows.iter().zip(&services) {
            prop_assert_eq!(row.destination.as_str(), destination.as_deref().unwrap_or("").trim());
            let expected_scheduled = scheduled.as_deref().filter(|s| !s.is_empty()).unwrap_or(MISSING_TIME);
            prop_assert_eq!(row.scheduled.as_str(), expected_scheduled);
            prop_assert_eq!(row.estimated.as_str(), MISSING_TIME);

            let expected_status = if *cancelled {
                DepartureStatus::Cancelled
            } else if *delayed {
                DepartureStatus::Delayed
            } else {
                DepartureStatus::Normal
            };
            prop_assert_eq!(row.status, expected_status);

            let kind = service_type.as_deref().map(str::trim).unwrap_or("");
            prop_assert_eq!(row.is_replacement, !kind.is_empty() && kind != "train");
        }
    }
}
