//! Integration tests for the dispatch engine: event handlers, matching
//! policy, and fail-soft decoding.

use patrol_common::{Assignment, DispatchError, IncidentId, Location, OfficerId};
use patrol_engine::{
    DispatchChange, DispatchEvent, Engine, EventSource, IngestError, MemoryEventSource,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn send(engine: &mut Engine, event: Value) -> Vec<DispatchChange> {
    engine.process(event.to_string().as_bytes())
}

fn incident_occurred(id: i64, x: i64, y: i64) -> Value {
    json!({
        "type": "IncidentOccurred",
        "incidentId": id,
        "codeName": format!("code-{id}"),
        "loc": { "x": x, "y": y }
    })
}

fn officer_online(id: i64) -> Value {
    json!({ "type": "OfficerGoesOnline", "officerId": id, "badgeName": format!("B{id}") })
}

fn officer_moved(id: i64, x: i64, y: i64) -> Value {
    json!({ "type": "OfficerLocationUpdated", "officerId": id, "loc": { "x": x, "y": y } })
}

fn officer_offline(id: i64) -> Value {
    json!({ "type": "OfficerGoesOffline", "officerId": id })
}

fn incident_resolved(id: i64) -> Value {
    json!({ "type": "IncidentResolved", "incidentId": id })
}

fn officer_at(engine: &mut Engine, id: i64, x: i64, y: i64) {
    send(engine, officer_online(id));
    send(engine, officer_moved(id, x, y));
}

fn assigned_officer(engine: &Engine, incident: i64) -> Option<OfficerId> {
    engine
        .store()
        .find_incident(IncidentId(incident))
        .and_then(|i| i.assigned_officer)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn incident_without_officers_stays_unassigned() {
    let mut engine = Engine::new();
    let changes = send(
        &mut engine,
        json!({
            "type": "IncidentOccurred",
            "incidentId": 10,
            "codeName": "code",
            "loc": { "x": 12, "y": 123124 }
        }),
    );

    assert_eq!(
        changes,
        vec![DispatchChange::IncidentOpened {
            incident_id: IncidentId(10),
            location: Location::new(12, 123124),
        }]
    );
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.incidents.len(), 1);
    assert_eq!(snapshot.incidents[0].assigned_officer, None);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json["Incidents"][0].get("officerID").is_none());
}

#[test]
fn officer_coming_online_picks_up_waiting_incident() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(10, 12, 123124));

    let changes = send(
        &mut engine,
        json!({ "type": "OfficerGoesOnline", "officerId": 5, "badgeName": "B5" }),
    );

    assert_eq!(
        changes,
        vec![
            DispatchChange::OfficerOnline {
                officer_id: OfficerId(5)
            },
            DispatchChange::Assigned(Assignment {
                incident_id: IncidentId(10),
                officer_id: OfficerId(5),
            }),
        ]
    );
    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["Incidents"][0]["officerID"], 5);
    assert_eq!(json["Officers"][0]["badgeName"], "B5");
}

#[test]
fn resolving_incident_frees_its_officer() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(10, 12, 123124));
    send(&mut engine, officer_online(5));

    let changes = send(&mut engine, incident_resolved(10));

    assert_eq!(
        changes,
        vec![
            DispatchChange::Unassigned(Assignment {
                incident_id: IncidentId(10),
                officer_id: OfficerId(5),
            }),
            DispatchChange::IncidentClosed {
                incident_id: IncidentId(10)
            },
        ]
    );
    assert!(engine.store().find_incident(IncidentId(10)).is_none());
    let officer = engine.store().find_officer(OfficerId(5)).unwrap();
    assert!(officer.is_available());
}

#[test]
fn officer_going_offline_frees_its_incident() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(10, 1, 1));
    send(&mut engine, officer_online(5));
    assert_eq!(assigned_officer(&engine, 10), Some(OfficerId(5)));

    send(&mut engine, officer_offline(5));

    assert!(engine.store().find_officer(OfficerId(5)).is_none());
    assert_eq!(assigned_officer(&engine, 10), None);
    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert!(json["Incidents"][0].get("officerID").is_none());
    engine.store().verify_links().unwrap();
}

// ---------------------------------------------------------------------------
// Matching policy
// ---------------------------------------------------------------------------

#[test]
fn new_incident_goes_to_nearest_officer() {
    let mut engine = Engine::new();
    officer_at(&mut engine, 1, 0, 0);
    officer_at(&mut engine, 2, 10, 0);

    send(&mut engine, incident_occurred(100, 1, 0));
    assert_eq!(assigned_officer(&engine, 100), Some(OfficerId(1)));
}

#[test]
fn equidistant_officers_resolve_to_first_online() {
    let mut engine = Engine::new();
    officer_at(&mut engine, 1, 3, 4);
    officer_at(&mut engine, 2, -4, 3);

    send(&mut engine, incident_occurred(100, 0, 0));
    assert_eq!(assigned_officer(&engine, 100), Some(OfficerId(1)));
}

#[test]
fn new_officer_takes_oldest_incident_not_nearest() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(1, 500, 500));
    send(&mut engine, incident_occurred(2, 0, 0));

    send(&mut engine, officer_online(7));
    assert_eq!(assigned_officer(&engine, 1), Some(OfficerId(7)));
    assert_eq!(assigned_officer(&engine, 2), None);
}

#[test]
fn busy_officer_coming_online_again_keeps_assignment() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(1, 0, 0));
    send(&mut engine, officer_online(7));
    send(&mut engine, incident_occurred(2, 0, 0));

    let changes = send(
        &mut engine,
        json!({ "type": "OfficerGoesOnline", "officerId": 7, "badgeName": "renamed" }),
    );

    assert!(changes.is_empty());
    assert_eq!(assigned_officer(&engine, 1), Some(OfficerId(7)));
    assert_eq!(assigned_officer(&engine, 2), None);
    let officer = engine.store().find_officer(OfficerId(7)).unwrap();
    assert_eq!(officer.badge_name, "B7");
}

#[test]
fn freed_officer_is_not_rematched_until_next_event() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(1, 0, 0));
    send(&mut engine, officer_online(7));
    send(&mut engine, incident_occurred(2, 0, 0));

    send(&mut engine, incident_resolved(1));
    assert_eq!(assigned_officer(&engine, 2), None);

    // Re-announcing the officer runs the first-available rule.
    send(&mut engine, officer_online(7));
    assert_eq!(assigned_officer(&engine, 2), Some(OfficerId(7)));
}

#[test]
fn location_update_does_not_reassign() {
    let mut engine = Engine::new();
    officer_at(&mut engine, 1, 0, 0);
    send(&mut engine, incident_occurred(1, 0, 0));

    send(&mut engine, officer_moved(1, 900, 900));
    assert_eq!(assigned_officer(&engine, 1), Some(OfficerId(1)));
    let officer = engine.store().find_officer(OfficerId(1)).unwrap();
    assert_eq!(officer.location, Location::new(900, 900));
}

// ---------------------------------------------------------------------------
// Errors and unknown references
// ---------------------------------------------------------------------------

#[test]
fn location_update_for_unknown_officer_is_reported() {
    let mut engine = Engine::new();
    let payload = officer_moved(42, 1, 1).to_string();

    let err = engine.ingest(payload.as_bytes()).unwrap_err();
    match err {
        IngestError::Rejected { event_type, source } => {
            assert_eq!(event_type, "OfficerLocationUpdated");
            assert_eq!(source, DispatchError::UnknownOfficer(OfficerId(42)));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    // The fail-soft path drops it.
    assert!(engine.process(payload.as_bytes()).is_empty());
}

#[test]
fn removals_of_unknown_ids_are_no_ops() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(1, 0, 0));

    assert!(send(&mut engine, incident_resolved(99)).is_empty());
    assert!(send(&mut engine, officer_offline(99)).is_empty());
    assert_eq!(engine.snapshot().incidents.len(), 1);
}

#[test]
fn duplicate_incident_is_rejected_and_original_kept() {
    let mut engine = Engine::new();
    send(&mut engine, incident_occurred(1, 0, 0));

    let event = DispatchEvent::IncidentOccurred {
        incident_id: IncidentId(1),
        code_name: "again".into(),
        loc: Location::new(5, 5),
    };
    assert_eq!(
        engine.apply(&event),
        Err(DispatchError::DuplicateIncident(IncidentId(1)))
    );
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.incidents.len(), 1);
    assert_eq!(snapshot.incidents[0].code_name, "code-1");
}

#[test]
fn malformed_events_do_not_stall_the_stream() {
    let mut engine = Engine::new();

    assert!(engine.process(b"not json at all").is_empty());
    assert!(send(&mut engine, json!({ "incidentId": 1 })).is_empty());
    assert!(send(&mut engine, json!({ "type": "OfficerGoesOnline", "officerId": "x" })).is_empty());
    assert!(send(&mut engine, json!({ "type": "SomethingElse", "officerId": 1 })).is_empty());

    send(&mut engine, incident_occurred(10, 0, 0));
    send(&mut engine, officer_online(5));
    assert_eq!(assigned_officer(&engine, 10), Some(OfficerId(5)));
}

// ---------------------------------------------------------------------------
// Replaying from a source
// ---------------------------------------------------------------------------

#[tokio::test]
async fn memory_source_replays_in_order() {
    let mut source: MemoryEventSource = vec![
        incident_occurred(10, 12, 123124),
        officer_online(5),
        incident_resolved(10),
        officer_offline(5),
    ]
    .into_iter()
    .collect();
    source.push_raw("{broken");

    let mut engine = Engine::new();
    let mut applied = 0;
    while let Some(payload) = source.next_event().await {
        applied += engine.process(&payload).len();
    }

    // opened, online, assigned, unassigned, closed, offline
    assert_eq!(applied, 6);
    let snapshot = engine.snapshot();
    assert!(snapshot.incidents.is_empty());
    assert!(snapshot.officers.is_empty());
}
