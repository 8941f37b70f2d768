//! Construction of new seats.

use common::{FlightId, Seat, SeatClass, SeatId, SeatType};

/// Builds a seat in its initial state.
///
/// Pure: the id is used exactly as given and the seat starts out not deleted.
pub fn create_seat(
    id: SeatId,
    label: impl Into<String>,
    seat_type: SeatType,
    seat_class: SeatClass,
    flight_id: FlightId,
) -> Seat {
    Seat {
        id,
        label: label.into(),
        seat_type,
        seat_class,
        flight_id,
        is_deleted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_seat_copies_inputs_and_is_not_deleted() {
        let id = SeatId::new();
        let flight_id = FlightId::from_uuid(uuid::Uuid::new_v4());

        let seat = create_seat(id, "12A", SeatType::Window, SeatClass::Economy, flight_id);

        assert_eq!(seat.id, id);
        assert_eq!(seat.label, "12A");
        assert_eq!(seat.seat_type, SeatType::Window);
        assert_eq!(seat.seat_class, SeatClass::Economy);
        assert_eq!(seat.flight_id, flight_id);
        assert!(!seat.is_deleted);
    }
}
