//! In-memory officer and incident collections.
//!
//! The store owns every entity and the officer ↔ incident relation. Links
//! are id-based: each side holds the other's id and resolves it through the
//! store. Lookups are linear scans; collections keep insertion order, which
//! only matters for tie-breaking in the matcher.

use std::collections::HashSet;

use patrol_common::{
    Assignment, DispatchError, Incident, IncidentId, Location, Officer, OfficerId,
};
use thiserror::Error;

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    officers: Vec<Officer>,
    incidents: Vec<Incident>,
}

/// A broken store invariant. Only produced by `verify_links`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("officer id {0} appears more than once")]
    DuplicateOfficer(OfficerId),

    #[error("incident id {0} appears more than once")]
    DuplicateIncident(IncidentId),

    #[error("officer {officer_id} points at incident {incident_id}, which does not point back")]
    AsymmetricOfficerLink {
        officer_id: OfficerId,
        incident_id: IncidentId,
    },

    #[error("incident {incident_id} points at officer {officer_id}, which does not point back")]
    AsymmetricIncidentLink {
        incident_id: IncidentId,
        officer_id: OfficerId,
    },
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn officers(&self) -> &[Officer] {
        &self.officers
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn find_officer(&self, id: OfficerId) -> Option<&Officer> {
        self.officers.iter().find(|o| o.id == id)
    }

    pub fn find_incident(&self, id: IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    /// Return the officer with `id`, registering a new one if unknown.
    ///
    /// An existing officer is returned as-is: badge name and location are
    /// not overwritten.
    pub fn upsert_officer(&mut self, id: OfficerId, badge_name: &str) -> &Officer {
        let pos = match self.officer_index(id) {
            Some(pos) => pos,
            None => {
                self.officers.push(Officer::new(id, badge_name));
                self.officers.len() - 1
            }
        };
        &self.officers[pos]
    }

    /// Register a new, unassigned incident.
    pub fn insert_incident(
        &mut self,
        id: IncidentId,
        code_name: &str,
        location: Location,
    ) -> Result<&Incident, DispatchError> {
        if self.incident_index(id).is_some() {
            return Err(DispatchError::DuplicateIncident(id));
        }
        self.incidents.push(Incident::new(id, code_name, location));
        Ok(&self.incidents[self.incidents.len() - 1])
    }

    /// Unlink the officer from its incident (if any), then drop it.
    /// Unknown ids are a no-op.
    pub fn remove_officer(&mut self, id: OfficerId) -> Option<Officer> {
        self.unlink_officer(id);
        let pos = self.officer_index(id)?;
        Some(self.officers.remove(pos))
    }

    /// Unlink the incident from its officer (if any), then drop it.
    /// Unknown ids are a no-op.
    pub fn remove_incident(&mut self, id: IncidentId) -> Option<Incident> {
        self.unlink_incident(id);
        let pos = self.incident_index(id)?;
        Some(self.incidents.remove(pos))
    }

    pub fn update_officer_location(
        &mut self,
        id: OfficerId,
        location: Location,
    ) -> Result<(), DispatchError> {
        let pos = self
            .officer_index(id)
            .ok_or(DispatchError::UnknownOfficer(id))?;
        self.officers[pos].location = location;
        Ok(())
    }

    // --- Relation ---

    /// Link an incident and an officer in one step.
    ///
    /// Both must exist and both must be available; otherwise nothing is
    /// changed.
    pub(crate) fn link(
        &mut self,
        incident_id: IncidentId,
        officer_id: OfficerId,
    ) -> Result<Assignment, DispatchError> {
        let officer_pos = self
            .officer_index(officer_id)
            .ok_or(DispatchError::UnknownOfficer(officer_id))?;
        let incident_pos = self
            .incident_index(incident_id)
            .ok_or(DispatchError::UnknownIncident(incident_id))?;

        if let Some(current) = self.officers[officer_pos].assigned_incident {
            return Err(DispatchError::OfficerAlreadyAssigned {
                officer_id,
                incident_id: current,
            });
        }
        if let Some(current) = self.incidents[incident_pos].assigned_officer {
            return Err(DispatchError::IncidentAlreadyAssigned {
                incident_id,
                officer_id: current,
            });
        }

        self.incidents[incident_pos].assigned_officer = Some(officer_id);
        self.officers[officer_pos].assigned_incident = Some(incident_id);
        Ok(Assignment {
            incident_id,
            officer_id,
        })
    }

    /// Clear the officer's link and its incident's back-link.
    pub(crate) fn unlink_officer(&mut self, officer_id: OfficerId) -> Option<Assignment> {
        let officer_pos = self.officer_index(officer_id)?;
        let incident_id = self.officers[officer_pos].assigned_incident.take()?;
        if let Some(pos) = self.incident_index(incident_id) {
            let incident = &mut self.incidents[pos];
            if incident.assigned_officer == Some(officer_id) {
                incident.assigned_officer = None;
            }
        }
        Some(Assignment {
            incident_id,
            officer_id,
        })
    }

    /// Clear the incident's link and its officer's back-link.
    pub(crate) fn unlink_incident(&mut self, incident_id: IncidentId) -> Option<Assignment> {
        let incident_pos = self.incident_index(incident_id)?;
        let officer_id = self.incidents[incident_pos].assigned_officer.take()?;
        if let Some(pos) = self.officer_index(officer_id) {
            let officer = &mut self.officers[pos];
            if officer.assigned_incident == Some(incident_id) {
                officer.assigned_incident = None;
            }
        }
        Some(Assignment {
            incident_id,
            officer_id,
        })
    }

    /// Check id uniqueness and link symmetry across the whole store.
    ///
    /// A link to a missing entity counts as asymmetric.
    pub fn verify_links(&self) -> Result<(), InvariantViolation> {
        let mut seen_officers = HashSet::new();
        for officer in &self.officers {
            if !seen_officers.insert(officer.id) {
                return Err(InvariantViolation::DuplicateOfficer(officer.id));
            }
        }
        let mut seen_incidents = HashSet::new();
        for incident in &self.incidents {
            if !seen_incidents.insert(incident.id) {
                return Err(InvariantViolation::DuplicateIncident(incident.id));
            }
        }

        for officer in &self.officers {
            if let Some(incident_id) = officer.assigned_incident {
                let points_back = self
                    .find_incident(incident_id)
                    .is_some_and(|i| i.assigned_officer == Some(officer.id));
                if !points_back {
                    return Err(InvariantViolation::AsymmetricOfficerLink {
                        officer_id: officer.id,
                        incident_id,
                    });
                }
            }
        }
        for incident in &self.incidents {
            if let Some(officer_id) = incident.assigned_officer {
                let points_back = self
                    .find_officer(officer_id)
                    .is_some_and(|o| o.assigned_incident == Some(incident.id));
                if !points_back {
                    return Err(InvariantViolation::AsymmetricIncidentLink {
                        incident_id: incident.id,
                        officer_id,
                    });
                }
            }
        }
        Ok(())
    }

    fn officer_index(&self, id: OfficerId) -> Option<usize> {
        self.officers.iter().position(|o| o.id == id)
    }

    fn incident_index(&self, id: IncidentId) -> Option<usize> {
        self.incidents.iter().position(|i| i.id == id)
    }
}
