use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::Event;

/// Version of the [`ForwardPayload`] field list.
pub const SCHEMA_VERSION: &str = "1";

/// Constant `event_type` of every forwarded payload.
pub const EVENT_TYPE: &str = "Event";

/// JSON document POSTed to the webhook for each event.
///
/// The field list is fixed; adding or removing a field bumps
/// [`SCHEMA_VERSION`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForwardPayload {
    pub schema_version: String,

    pub session: String,

    pub timestamp: i64,

    /// Same value as `timestamp`; kept for receivers written against the older field name.
    pub event_timestamp: i64,

    /// Wire field that carried the data: `"start"`, `"end"` or `null`.
    pub data_type: Option<String>,

    pub event_type: String,

    /// `"Start"`, `"End"` or `null`.
    pub event_subtype: Option<String>,

    /// Relay clock at forward time.
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
}

impl ForwardPayload {
    /// Build the payload for `event`, stamped with `received_at`.
    pub fn new(event: &Event, received_at: OffsetDateTime) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            session: event.session.clone(),
            timestamp: event.timestamp,
            event_timestamp: event.timestamp,
            data_type: event.variant.data_type().map(str::to_string),
            event_type: EVENT_TYPE.to_string(),
            event_subtype: event.variant.subtype().map(str::to_string),
            received_at,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
