//! Capacity and occupancy calculation
//!
//! Pure functions shared by the reservation write path and read-side
//! listings. The write path surfaces a full event as an error; listings
//! clamp negative availability (possible after an over-capacity race) to
//! zero for display.

use serde::{Deserialize, Serialize};

/// Occupancy snapshot of an event, for read-side listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub max_capacity: i32,
    pub active_count: i64,
    pub available: i64,
}

impl Occupancy {
    pub fn new(max_capacity: i32, active_count: i64) -> Self {
        Self {
            max_capacity,
            active_count,
            available: available_for_display(max_capacity, active_count),
        }
    }

    /// True when the event has no capacity bound
    pub fn is_unlimited(&self) -> bool {
        self.max_capacity == 0
    }
}

/// Remaining slots; may be negative when over capacity
pub fn available_slots(max_capacity: i32, active_count: i64) -> i64 {
    i64::from(max_capacity) - active_count
}

/// Remaining slots clamped to zero, for display purposes
pub fn available_for_display(max_capacity: i32, active_count: i64) -> i64 {
    available_slots(max_capacity, active_count).max(0)
}

/// Whether a new reservation fits. A max capacity of zero means unlimited.
pub fn has_capacity(max_capacity: i32, active_count: i64) -> bool {
    max_capacity == 0 || active_count < i64::from(max_capacity)
}
