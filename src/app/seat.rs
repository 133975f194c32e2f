//! Bounded seat position tracker.
//!
//! The tracker mirrors the position the app last wrote to the seat.  A move
//! is split into [`propose`](SeatTracker::propose) and
//! [`commit`](SeatTracker::commit) so the dispatcher can hold the new value
//! until the broker acknowledges the write.  Only the dispatcher owns a
//! tracker, and it runs inside the single service task, so no other command
//! can observe the tracker between those two calls.

use crate::app::commands::SeatDirection;
use crate::config::SeatConfig;

/// Why a seat move was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatBound {
    /// Already at or above the ceiling.
    Ceiling(i32),
    /// Already at or below the floor.
    Floor(i32),
}

#[derive(Debug, Clone)]
pub struct SeatTracker {
    position: i32,
    floor: i32,
    ceiling: i32,
    step: i32,
}

impl SeatTracker {
    pub fn new(config: &SeatConfig) -> Self {
        Self {
            position: config.base,
            floor: config.floor,
            ceiling: config.ceiling,
            step: config.step,
        }
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Compute the position one step in `direction`, without moving.
    ///
    /// The step is clamped to the bound, so a tracker one unit below the
    /// ceiling proposes the ceiling rather than overshooting it.
    pub fn propose(&self, direction: SeatDirection) -> Result<i32, SeatBound> {
        match direction {
            SeatDirection::Forward => {
                if self.position >= self.ceiling {
                    Err(SeatBound::Ceiling(self.ceiling))
                } else {
                    Ok(self.position.saturating_add(self.step).min(self.ceiling))
                }
            }
            SeatDirection::Backward => {
                if self.position <= self.floor {
                    Err(SeatBound::Floor(self.floor))
                } else {
                    Ok(self.position.saturating_sub(self.step).max(self.floor))
                }
            }
        }
    }

    /// Record an acknowledged position.
    pub fn commit(&mut self, position: i32) {
        debug_assert!(position >= self.floor && position <= self.ceiling);
        self.position = position.clamp(self.floor, self.ceiling);
    }
}
