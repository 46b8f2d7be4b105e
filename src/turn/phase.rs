//! Game phase state machine.
//!
//! ```text
//! NotStarted --Start--> Active --End--> Ended
//!                       |    ^
//!                       +Pass+
//! ```
//!
//! `Ended` is terminal. Every other transition is rejected and the caller
//! treats the rejected operation as a no-op.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Phase of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnPhase {
    #[default]
    NotStarted,
    Active,
    Ended,
}

/// Event driving the phase machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnEvent {
    Start,
    Pass,
    End,
}

impl TurnPhase {
    /// Phase after `event`, or `InvalidTransition`.
    pub fn next(self, event: TurnEvent) -> SyncResult<TurnPhase> {
        match (self, event) {
            (TurnPhase::NotStarted, TurnEvent::Start) => Ok(TurnPhase::Active),
            (TurnPhase::Active, TurnEvent::Pass) => Ok(TurnPhase::Active),
            (TurnPhase::Active, TurnEvent::End) => Ok(TurnPhase::Ended),
            (phase, event) => Err(SyncError::InvalidTransition { phase, event }),
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == TurnPhase::Ended
    }
}
