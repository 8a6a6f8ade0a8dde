use thiserror::Error;

use crate::types::{IncidentId, OfficerId};

/// Failures raised by the entity store and the matcher.
///
/// None of these are fatal: the dispatcher logs them and moves on to the
/// next event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown officer {0}")]
    UnknownOfficer(OfficerId),

    #[error("unknown incident {0}")]
    UnknownIncident(IncidentId),

    #[error("incident {0} already exists")]
    DuplicateIncident(IncidentId),

    #[error("incident {incident_id} is already assigned to officer {officer_id}")]
    IncidentAlreadyAssigned {
        incident_id: IncidentId,
        officer_id: OfficerId,
    },

    #[error("officer {officer_id} is already assigned to incident {incident_id}")]
    OfficerAlreadyAssigned {
        officer_id: OfficerId,
        incident_id: IncidentId,
    },
}
