use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SeatId;

/// Unique identifier for an outbox event.
///
/// UUIDv7, so ids generated by one process sort in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new time-ordered event ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates an event ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain event staged in the outbox.
///
/// The envelope is what gets committed alongside the seat row and what is
/// handed to the event bus once the commit is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The type of the event (e.g., "SeatCreated").
    pub event_type: String,

    /// The seat this event is about.
    pub aggregate_id: SeatId,

    /// The type of aggregate (e.g., "Seat").
    pub aggregate_type: String,

    /// When the event was created.
    pub timestamp: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,

    /// Additional metadata about the event.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,

    /// When the event was handed to the bus. `None` while pending.
    #[serde(default)]
    pub dispatched_at: Option<DateTime<Utc>>,
}

impl EventEnvelope {
    /// Wraps a serializable event for the given seat.
    pub fn new<T: Serialize>(
        aggregate_id: SeatId,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            timestamp: Utc::now(),
            payload: serde_json::to_value(payload)?,
            metadata: HashMap::new(),
            dispatched_at: None,
        })
    }

    /// Sets when the event occurred, replacing the construction time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Adds a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns true until the envelope has been dispatched.
    pub fn is_pending(&self) -> bool {
        self.dispatched_at.is_none()
    }

    /// Deserializes the payload into a concrete event type.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
