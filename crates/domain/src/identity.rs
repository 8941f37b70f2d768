//! Seat identity assignment.

use std::collections::VecDeque;
use std::sync::Mutex;

use common::SeatId;

/// Source of fresh seat ids for commands that do not carry one.
///
/// Implementations must never hand out the same id twice, including across
/// concurrent callers.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh, unused seat id.
    fn next_id(&self) -> SeatId;
}

/// Generates time-ordered UUIDv7 seat ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> SeatId {
        SeatId::new()
    }
}

/// Hands out a preset list of ids first, then falls back to UUIDv7.
///
/// Used where a test or a replay needs to know the generated id up front.
#[derive(Debug, Default)]
pub struct PresetIdGenerator {
    queue: Mutex<VecDeque<SeatId>>,
}

impl PresetIdGenerator {
    /// Creates a generator that yields `ids` in order.
    pub fn new(ids: impl IntoIterator<Item = SeatId>) -> Self {
        Self {
            queue: Mutex::new(ids.into_iter().collect()),
        }
    }
}

impl IdGenerator for PresetIdGenerator {
    fn next_id(&self) -> SeatId {
        let preset = match self.queue.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        preset.unwrap_or_default()
    }
}
