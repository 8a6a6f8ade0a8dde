//! Greedy officer ↔ incident matching.
//!
//! Matching is immediate: a pair is chosen when an event arrives and never
//! revisited. A newly available officer takes the first open incident in
//! store order; a new incident takes the nearest available officer.

use patrol_common::{distance, Assignment, DispatchError, IncidentId, Location, OfficerId};

use crate::store::EntityStore;

/// First incident in store order with no officer. Ignores distance.
pub fn first_available_incident(store: &EntityStore) -> Option<IncidentId> {
    store
        .incidents()
        .iter()
        .find(|incident| incident.is_available())
        .map(|incident| incident.id)
}

/// Available officer closest to `location`.
///
/// Ties go to the officer seen first in store order.
pub fn nearest_available_officer(store: &EntityStore, location: Location) -> Option<OfficerId> {
    let mut best: Option<(OfficerId, f64)> = None;
    for officer in store.officers().iter().filter(|o| o.is_available()) {
        let d = distance(location, officer.location);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((officer.id, d));
        }
    }
    best.map(|(id, _)| id)
}

/// Link an available incident with an available officer.
///
/// Fails without touching the store if either id is unknown or either side
/// is already assigned.
pub fn assign(
    store: &mut EntityStore,
    incident_id: IncidentId,
    officer_id: OfficerId,
) -> Result<Assignment, DispatchError> {
    store.link(incident_id, officer_id)
}

/// Clear the incident's assignment on both sides. Idempotent.
pub fn unassign_incident(store: &mut EntityStore, incident_id: IncidentId) -> Option<Assignment> {
    store.unlink_incident(incident_id)
}

/// Clear the officer's assignment on both sides. Idempotent.
pub fn unassign_officer(store: &mut EntityStore, officer_id: OfficerId) -> Option<Assignment> {
    store.unlink_officer(officer_id)
}
