//! The event handlers.

use patrol_common::{
    Assignment, DispatchError, IncidentId, Location, OfficerId, StateSnapshot,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::events::{DecodeError, DispatchEvent};
use crate::matching;
use crate::store::EntityStore;
use crate::traits::EventLike;

/// One observable state transition caused by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum DispatchChange {
    OfficerOnline { officer_id: OfficerId },
    OfficerOffline { officer_id: OfficerId },
    OfficerMoved { officer_id: OfficerId, location: Location },
    IncidentOpened { incident_id: IncidentId, location: Location },
    IncidentClosed { incident_id: IncidentId },
    Assigned(Assignment),
    Unassigned(Assignment),
}

/// Why a raw payload was not applied.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{event_type} rejected: {source}")]
    Rejected {
        event_type: &'static str,
        #[source]
        source: DispatchError,
    },
}

/// Owns the dispatch state and applies events to it one at a time.
#[derive(Debug, Default)]
pub struct Engine {
    store: EntityStore,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Point-in-time copy of all incidents and officers.
    pub fn snapshot(&self) -> StateSnapshot {
        self.store.snapshot()
    }

    /// Decode and apply a raw payload, logging and dropping anything that
    /// fails. Never panics on bad input; returns the changes applied.
    pub fn process(&mut self, payload: &[u8]) -> Vec<DispatchChange> {
        match self.ingest(payload) {
            Ok(changes) => changes,
            Err(IngestError::Decode(e)) if e.is_unknown_type() => {
                debug!(error = %e, "Ignoring event");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Dropping event");
                Vec::new()
            }
        }
    }

    /// Decode and apply a raw payload, surfacing any failure.
    pub fn ingest(&mut self, payload: &[u8]) -> Result<Vec<DispatchChange>, IngestError> {
        let event = DispatchEvent::decode(payload)?;
        self.apply(&event)
            .map_err(|source| IngestError::Rejected {
                event_type: event.event_type_str(),
                source,
            })
    }

    /// Apply a decoded event. On error the store is left as it was.
    pub fn apply(&mut self, event: &DispatchEvent) -> Result<Vec<DispatchChange>, DispatchError> {
        let changes = match event {
            DispatchEvent::IncidentOccurred {
                incident_id,
                code_name,
                loc,
            } => self.incident_occurred(*incident_id, code_name, *loc)?,
            DispatchEvent::IncidentResolved { incident_id } => {
                self.incident_resolved(*incident_id)
            }
            DispatchEvent::OfficerGoesOnline {
                officer_id,
                badge_name,
            } => self.officer_goes_online(*officer_id, badge_name)?,
            DispatchEvent::OfficerLocationUpdated { officer_id, loc } => {
                self.officer_location_updated(*officer_id, *loc)?
            }
            DispatchEvent::OfficerGoesOffline { officer_id } => {
                self.officer_goes_offline(*officer_id)
            }
        };

        debug_assert!(
            self.store.verify_links().is_ok(),
            "store invariants broken after {}",
            event.event_type_str()
        );
        Ok(changes)
    }

    // --- Handlers ---

    fn incident_occurred(
        &mut self,
        incident_id: IncidentId,
        code_name: &str,
        location: Location,
    ) -> Result<Vec<DispatchChange>, DispatchError> {
        self.store.insert_incident(incident_id, code_name, location)?;
        let mut changes = vec![DispatchChange::IncidentOpened {
            incident_id,
            location,
        }];

        match matching::nearest_available_officer(&self.store, location) {
            Some(officer_id) => {
                let assignment = matching::assign(&mut self.store, incident_id, officer_id)?;
                info!(%incident_id, %officer_id, "Assigned nearest officer to new incident");
                changes.push(DispatchChange::Assigned(assignment));
            }
            None => {
                info!(%incident_id, "No officer available, incident queued");
            }
        }
        Ok(changes)
    }

    fn incident_resolved(&mut self, incident_id: IncidentId) -> Vec<DispatchChange> {
        let mut changes = Vec::new();
        if let Some(assignment) = matching::unassign_incident(&mut self.store, incident_id) {
            changes.push(DispatchChange::Unassigned(assignment));
        }
        match self.store.remove_incident(incident_id) {
            Some(_) => {
                info!(%incident_id, "Incident resolved");
                changes.push(DispatchChange::IncidentClosed { incident_id });
            }
            None => debug!(%incident_id, "Resolve for unknown incident, ignoring"),
        }
        changes
    }

    fn officer_goes_online(
        &mut self,
        officer_id: OfficerId,
        badge_name: &str,
    ) -> Result<Vec<DispatchChange>, DispatchError> {
        let mut changes = Vec::new();
        let known = self.store.find_officer(officer_id).is_some();
        let available = self.store.upsert_officer(officer_id, badge_name).is_available();
        if !known {
            info!(%officer_id, badge_name, "Officer online");
            changes.push(DispatchChange::OfficerOnline { officer_id });
        }

        // An officer already on an incident keeps it.
        if !available {
            return Ok(changes);
        }
        if let Some(incident_id) = matching::first_available_incident(&self.store) {
            let assignment = matching::assign(&mut self.store, incident_id, officer_id)?;
            info!(%incident_id, %officer_id, "Assigned waiting incident to officer");
            changes.push(DispatchChange::Assigned(assignment));
        }
        Ok(changes)
    }

    fn officer_location_updated(
        &mut self,
        officer_id: OfficerId,
        location: Location,
    ) -> Result<Vec<DispatchChange>, DispatchError> {
        self.store.update_officer_location(officer_id, location)?;
        debug!(%officer_id, %location, "Officer moved");
        Ok(vec![DispatchChange::OfficerMoved {
            officer_id,
            location,
        }])
    }

    fn officer_goes_offline(&mut self, officer_id: OfficerId) -> Vec<DispatchChange> {
        let mut changes = Vec::new();
        if let Some(assignment) = matching::unassign_officer(&mut self.store, officer_id) {
            changes.push(DispatchChange::Unassigned(assignment));
        }
        match self.store.remove_officer(officer_id) {
            Some(_) => {
                info!(%officer_id, "Officer offline");
                changes.push(DispatchChange::OfficerOffline { officer_id });
            }
            None => debug!(%officer_id, "Offline for unknown officer, ignoring"),
        }
        changes
    }
}
