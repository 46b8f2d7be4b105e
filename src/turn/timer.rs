//! Optional per-turn timer.
//!
//! The timer is only a deadline: it is armed when the game starts, re-armed
//! on every turn pass and disarmed when the game ends. Nothing fires when it
//! runs out; the hosting application reads `remaining` and decides.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::Timestamp;

/// Per-turn countdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnTimer {
    per_turn_secs: u32,
    deadline: Option<Timestamp>,
}

impl TurnTimer {
    /// Create a disarmed timer.
    #[must_use]
    pub fn new(per_turn_secs: u32) -> Self {
        Self {
            per_turn_secs,
            deadline: None,
        }
    }

    #[must_use]
    pub fn per_turn_secs(&self) -> u32 {
        self.per_turn_secs
    }

    /// Deadline of the current turn, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Restart the countdown for a new turn starting at `now`.
    #[must_use]
    pub fn reset(self, now: Timestamp) -> Self {
        Self {
            deadline: Some(now + Duration::seconds(i64::from(self.per_turn_secs))),
            ..self
        }
    }

    /// Stop the countdown.
    #[must_use]
    pub fn disarm(self) -> Self {
        Self {
            deadline: None,
            ..self
        }
    }

    /// Time left in the current turn, floored at zero. `None` when disarmed.
    #[must_use]
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// Whether an armed timer has run out.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}
