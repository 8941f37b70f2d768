use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a seat.
///
/// Fresh ids are UUIDv7, so they sort by creation time. Callers may also
/// supply their own id to make a create request idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(Uuid);

impl SeatId {
    /// Creates a new time-ordered seat ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a seat ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true for the nil UUID, which never identifies a seat.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for SeatId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SeatId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SeatId> for Uuid {
    fn from(id: SeatId) -> Self {
        id.0
    }
}

/// Identifier of the flight a seat belongs to.
///
/// The nil UUID is representable but never a valid parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(Uuid);

impl FlightId {
    /// Creates a flight ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true for the nil UUID, i.e. no flight reference at all.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for FlightId {
    /// The nil flight reference, which validation rejects.
    fn default() -> Self {
        Self(Uuid::nil())
    }
}

impl std::fmt::Display for FlightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FlightId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_id_new_creates_unique_ids() {
        let id1 = SeatId::new();
        let id2 = SeatId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn seat_id_is_time_ordered() {
        let earlier = SeatId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let later = SeatId::new();
        assert!(earlier < later);
    }

    #[test]
    fn seat_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = SeatId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn seat_id_serializes_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&SeatId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn seat_id_nil_detection() {
        assert!(SeatId::from_uuid(Uuid::nil()).is_nil());
        assert!(!SeatId::new().is_nil());
    }

    #[test]
    fn flight_id_nil_detection() {
        assert!(FlightId::from_uuid(Uuid::nil()).is_nil());
        assert!(!FlightId::from_uuid(Uuid::new_v4()).is_nil());
    }
}
