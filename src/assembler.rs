//!
//! Builds the departure rows shown on the board.
//!
//! Rows are read for service indices `1..=max_services` and stop at the first
//! index without a destination, so the sequence is always gap-free even when
//! the device advertises more services than it currently publishes.

use crate::addressing::Field;
use crate::primitives::{DepartureRow, RowSequence, MISSING_TIME};
use crate::resolver::Resolver;
use crate::types::DepartureStatus;

/// Service type that is not a replacement.
pub const RAIL_SERVICE_TYPE: &str = "train";

/// Parses the advertised service count. Anything that is not a number is 0;
/// fractional counts are floored.
pub fn parse_service_count(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<i64>() {
        return count;
    }
    match raw.parse::<f64>() {
        Ok(count) if count.is_finite() => count.floor() as i64,
        _ => 0,
    }
}

/// Interprets a binary sensor state: `on` or `true` in any case.
pub fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("true"))
}

/// Whether a service type denotes a replacement (anything other than rail).
pub fn is_replacement(service_type: &str) -> bool {
    !service_type.is_empty() && service_type != RAIL_SERVICE_TYPE
}

fn time_or_placeholder(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => MISSING_TIME.to_string(),
    }
}

/// Reads the service count published by the board, or 0.
pub fn max_services(resolver: &Resolver<'_>) -> i64 {
    resolver
        .value(Field::MaxServices, 0)
        .map_or(0, parse_service_count)
}

/// Reads one departure, or `None` when `index` has no destination.
pub fn read_row(resolver: &Resolver<'_>, index: u32) -> Option<DepartureRow> {
    let destination = resolver.value(Field::Destination, index).unwrap_or("").trim();
    if destination.is_empty() {
        return None;
    }

    let cancelled = parse_flag(resolver.value(Field::Cancelled, index));
    let delayed = parse_flag(resolver.value(Field::Delayed, index));
    let service_type = resolver.value(Field::ServiceType, index).unwrap_or("").trim();

    Some(DepartureRow {
        scheduled: time_or_placeholder(resolver.value(Field::ScheduledTime, index)),
        destination: destination.to_string(),
        estimated: time_or_placeholder(resolver.value(Field::EstimatedTime, index)),
        status: DepartureStatus::from_flags(cancelled, delayed),
        service_type: service_type.to_string(),
        is_replacement: is_replacement(service_type),
    })
}

/// Assembles the contiguous row sequence for the current snapshot.
pub fn assemble_rows(resolver: &Resolver<'_>) -> RowSequence {
    let max = max_services(resolver);
    let mut rows = RowSequence::new();

    // Indices past u32::MAX cannot be addressed; the gap rule ends the loop long before.
    let limit = u32::try_from(max.max(0)).unwrap_or(u32::MAX);
    for index in 1..=limit {
        match read_row(resolver, index) {
            Some(row) => rows.push(row),
            None => break,
        }
    }

    tracing::debug!(max_services = max, rows = rows.len(), "Assembled departure rows");
    rows
}

/// The board's `last_updated` value, if published and non-empty.
pub fn last_updated(resolver: &Resolver<'_>) -> Option<String> {
    resolver
        .value(Field::LastUpdated, 0)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
