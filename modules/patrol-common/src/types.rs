use serde::{Deserialize, Serialize};

use crate::geometry::Location;

// --- Identifiers ---

/// Caller-assigned officer identity, stable for the officer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfficerId(pub i64);

/// Caller-assigned incident identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncidentId(pub i64);

impl std::fmt::Display for OfficerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for IncidentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Entities ---

/// A field officer.
///
/// `assigned_incident` is a relation only; the officer does not own the
/// incident. It is never published, so the serialized view is
/// `{id, badgeName, loc}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub id: OfficerId,
    pub badge_name: String,
    #[serde(rename = "loc")]
    pub location: Location,
    #[serde(skip)]
    pub assigned_incident: Option<IncidentId>,
}

impl Officer {
    pub fn new(id: OfficerId, badge_name: impl Into<String>) -> Self {
        Self {
            id,
            badge_name: badge_name.into(),
            location: Location::default(),
            assigned_incident: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.assigned_incident.is_none()
    }
}

/// An open incident. Its location is fixed at creation.
///
/// The assigned officer is published as the scalar `officerID`, omitted
/// while the incident is unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: IncidentId,
    pub code_name: String,
    #[serde(rename = "loc")]
    pub location: Location,
    #[serde(rename = "officerID", default, skip_serializing_if = "Option::is_none")]
    pub assigned_officer: Option<OfficerId>,
}

impl Incident {
    pub fn new(id: IncidentId, code_name: impl Into<String>, location: Location) -> Self {
        Self {
            id,
            code_name: code_name.into(),
            location,
            assigned_officer: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.assigned_officer.is_none()
    }
}

/// One officer ↔ incident link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub incident_id: IncidentId,
    pub officer_id: OfficerId,
}

// --- Published state ---

/// Point-in-time copy of every live incident and officer, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    #[serde(rename = "Incidents")]
    pub incidents: Vec<Incident>,
    #[serde(rename = "Officers")]
    pub officers: Vec<Officer>,
}

/// Envelope served by the read endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ErrorResponse {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
