use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FlightId, SeatId};

/// Physical position of a seat within its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatType {
    Window,
    Middle,
    Aisle,
}

impl SeatType {
    /// Returns the canonical name used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Window => "Window",
            SeatType::Middle => "Middle",
            SeatType::Aisle => "Aisle",
        }
    }
}

impl std::fmt::Display for SeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatType {
    type Err = ParseSeatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Window" => Ok(SeatType::Window),
            "Middle" => Ok(SeatType::Middle),
            "Aisle" => Ok(SeatType::Aisle),
            other => Err(ParseSeatTypeError {
                value: other.to_string(),
            }),
        }
    }
}

/// Returned when a string does not name a seat position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid seat type; expected one of Window, Middle, Aisle")]
pub struct ParseSeatTypeError {
    pub value: String,
}

/// Cabin class of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    First,
    Business,
    Economy,
}

impl SeatClass {
    /// All accepted cabin classes, in the order they are reported to callers.
    pub const ALL: [SeatClass; 3] = [SeatClass::First, SeatClass::Business, SeatClass::Economy];

    /// Returns the canonical name used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatClass::First => "First",
            SeatClass::Business => "Business",
            SeatClass::Economy => "Economy",
        }
    }
}

impl std::fmt::Display for SeatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatClass {
    type Err = ParseSeatClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeatClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| ParseSeatClassError {
                value: s.to_string(),
            })
    }
}

/// Returned when a string does not name one of the accepted cabin classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid seat class; expected one of First, Business, Economy")]
pub struct ParseSeatClassError {
    pub value: String,
}

/// A persisted seat on a flight.
///
/// Seats are soft-deleted only; `is_deleted` starts out false and the record
/// is never physically removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Unique seat identifier, equal to the id of the command that created it.
    pub id: SeatId,

    /// Human-readable seat label, e.g. "12A".
    pub label: String,

    /// Position of the seat in its row.
    pub seat_type: SeatType,

    /// Cabin class.
    pub seat_class: SeatClass,

    /// The flight this seat belongs to.
    pub flight_id: FlightId,

    /// Soft-delete flag.
    pub is_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_class_parses_every_accepted_value() {
        for class in SeatClass::ALL {
            assert_eq!(class.as_str().parse::<SeatClass>(), Ok(class));
        }
    }

    #[test]
    fn seat_class_rejects_unknown_value_and_names_allowed_set() {
        let err = "Premium".parse::<SeatClass>().unwrap_err();
        assert_eq!(err.value, "Premium");
        let message = err.to_string();
        assert!(message.contains("First"));
        assert!(message.contains("Business"));
        assert!(message.contains("Economy"));
    }

    #[test]
    fn seat_class_matching_is_case_sensitive() {
        assert!("economy".parse::<SeatClass>().is_err());
    }

    #[test]
    fn seat_type_roundtrips_through_str() {
        for seat_type in [SeatType::Window, SeatType::Middle, SeatType::Aisle] {
            assert_eq!(seat_type.as_str().parse::<SeatType>(), Ok(seat_type));
        }
        assert!("Galley".parse::<SeatType>().is_err());
    }

    #[test]
    fn unknown_seat_type_error_names_value_and_allowed_set() {
        let err = "Galley".parse::<SeatType>().unwrap_err();
        assert_eq!(err.value, "Galley");
        assert_eq!(
            err.to_string(),
            "'Galley' is not a valid seat type; expected one of Window, Middle, Aisle"
        );
    }

    #[test]
    fn seat_type_serializes_as_variant_name() {
        let json = serde_json::to_string(&SeatType::Window).unwrap();
        assert_eq!(json, "\"Window\"");
    }
}
