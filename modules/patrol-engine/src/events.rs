//! Inbound dispatch events and envelope decoding.
//!
//! Each message is a JSON object whose `type` field names the event; the
//! remaining fields are specific to that type. Decoding happens in two
//! steps so an unrecognized `type` can be told apart from a malformed
//! payload.

use patrol_common::{IncidentId, Location, OfficerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::EventLike;

/// A fact delivered by the transport.
///
/// The `type` tag is the wire discriminator; field names are camelCase on
/// the wire (`incidentId`, `codeName`, `loc`, ...). Unknown extra fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DispatchEvent {
    IncidentOccurred {
        incident_id: IncidentId,
        code_name: String,
        loc: Location,
    },

    IncidentResolved {
        incident_id: IncidentId,
    },

    OfficerGoesOnline {
        officer_id: OfficerId,
        badge_name: String,
    },

    OfficerLocationUpdated {
        officer_id: OfficerId,
        loc: Location,
    },

    OfficerGoesOffline {
        officer_id: OfficerId,
    },
}

/// Every `type` value the dispatcher understands.
pub const EVENT_TYPES: &[&str] = &[
    "IncidentOccurred",
    "IncidentResolved",
    "OfficerGoesOnline",
    "OfficerLocationUpdated",
    "OfficerGoesOffline",
];

impl EventLike for DispatchEvent {
    fn event_type_str(&self) -> &'static str {
        match self {
            DispatchEvent::IncidentOccurred { .. } => "IncidentOccurred",
            DispatchEvent::IncidentResolved { .. } => "IncidentResolved",
            DispatchEvent::OfficerGoesOnline { .. } => "OfficerGoesOnline",
            DispatchEvent::OfficerLocationUpdated { .. } => "OfficerLocationUpdated",
            DispatchEvent::OfficerGoesOffline { .. } => "OfficerGoesOffline",
        }
    }
}

/// Why a payload could not be turned into a `DispatchEvent`.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("payload has no `type` field")]
    MissingType,

    #[error("`type` field is not a string")]
    InvalidType,

    #[error("unrecognized event type {0:?}")]
    UnknownType(String),

    #[error("invalid fields for {event_type}: {source}")]
    InvalidFields {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Unknown event types are expected from newer producers and are
    /// dropped quietly; everything else is a malformed message.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, DecodeError::UnknownType(_))
    }
}

impl DispatchEvent {
    /// Decode a raw envelope.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_slice(payload).map_err(DecodeError::Json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let event_type = match object.get("type") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(_) => return Err(DecodeError::InvalidType),
            None => return Err(DecodeError::MissingType),
        };
        if !EVENT_TYPES.contains(&event_type.as_str()) {
            return Err(DecodeError::UnknownType(event_type));
        }
        serde_json::from_value(value)
            .map_err(|source| DecodeError::InvalidFields { event_type, source })
    }
}
