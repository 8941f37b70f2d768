//! Field rules for the create-seat command.

use common::SeatClass;
use serde::Serialize;

use crate::command::CreateSeat;

/// A single rule violation on one command field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Wire name of the offending field.
    pub field: &'static str,

    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Non-empty, ordered list of violations for a rejected command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    /// Returns the violations in rule order.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Returns true if any violation is reported against `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

/// Validates a command and returns its parsed cabin class.
///
/// Every rule runs; the error carries all violations in rule order.
pub fn validate(cmd: &CreateSeat) -> Result<SeatClass, ValidationErrors> {
    let mut violations = Vec::new();

    if cmd.seat_id.is_some_and(|id| id.is_nil()) {
        violations.push(Violation::new(
            "seat_id",
            "seat_id must not be the nil UUID; omit it to have one generated",
        ));
    }

    if cmd.label.trim().is_empty() {
        violations.push(Violation::new("label", "label must not be empty"));
    }

    if cmd.flight_id.is_nil() {
        violations.push(Violation::new(
            "flight_id",
            "flight_id must reference a flight",
        ));
    }

    let seat_class = match cmd.seat_class.parse::<SeatClass>() {
        Ok(class) => Some(class),
        Err(_) => {
            let allowed: Vec<_> = SeatClass::ALL.iter().map(SeatClass::as_str).collect();
            violations.push(Violation::new(
                "class",
                format!(
                    "class must be one of {} (got '{}')",
                    allowed.join(", "),
                    cmd.seat_class
                ),
            ));
            None
        }
    };

    match seat_class {
        Some(class) if violations.is_empty() => Ok(class),
        _ => Err(ValidationErrors(violations)),
    }
}
