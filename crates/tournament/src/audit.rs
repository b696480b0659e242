//! Append-only audit trail of lifecycle operations

use chrono::Utc;
use serde_json::{json, Value};
use swiss_core::{Event, EventKind, Match};
use uuid::Uuid;

/// Append an event and return it.
pub fn append(
    events: &mut Vec<Event>,
    kind: EventKind,
    round: u32,
    table: Option<u32>,
    details: Value,
) -> &Event {
    events.push(Event {
        id: Uuid::new_v4(),
        kind,
        timestamp: Utc::now(),
        round,
        table,
        details,
    });
    &events[events.len() - 1]
}

/// Log a recorded result, replacing any earlier result event for the same
/// (round, table) slot so each slot has at most one live record.
pub fn record_result<'a>(events: &'a mut Vec<Event>, snapshot: &Match) -> &'a Event {
    events.retain(|e| !is_result_for(e, snapshot.round, snapshot.table));
    append(
        events,
        EventKind::MatchResultRecorded,
        snapshot.round,
        Some(snapshot.table),
        json!({ "match": snapshot }),
    )
}

/// The live result event for a slot, if any.
pub fn result_event(events: &[Event], round: u32, table: u32) -> Option<&Event> {
    events.iter().find(|e| is_result_for(e, round, table))
}

/// Remove the result events of `round` (one `table`, or all of them) once
/// those results no longer exist. Returns how many were removed.
pub fn retract_results(events: &mut Vec<Event>, round: u32, table: Option<u32>) -> usize {
    let before = events.len();
    events.retain(|e| {
        !(e.kind == EventKind::MatchResultRecorded
            && e.round == round
            && table.map_or(true, |t| e.table == Some(t)))
    });
    before - events.len()
}

fn is_result_for(event: &Event, round: u32, table: u32) -> bool {
    event.kind == EventKind::MatchResultRecorded
        && event.round == round
        && event.table == Some(table)
}
