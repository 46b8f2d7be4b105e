//! Error taxonomy for the synchronization core.
//!
//! Every variant is recoverable. The session treats any `SyncError` as
//! "state did not change" and logs it; none reach the end user.

use crate::core::{GameId, PlayerId};
use crate::turn::{TurnEvent, TurnPhase};

/// Errors produced by mutations, the reducer and the wire codec.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("roster is empty")]
    EmptyRoster,
    #[error("envelope for foreign session {received} (local session {expected})")]
    ForeignSession { expected: GameId, received: GameId },
    #[error("unrecognized envelope type: {0}")]
    UnrecognizedEnvelopeType(String),
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("cannot apply {event:?} while game is {phase:?}")]
    InvalidTransition { phase: TurnPhase, event: TurnEvent },
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether the error comes from input a peer may legitimately send
    /// (another session, a newer protocol version) rather than bad data.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SyncError::ForeignSession { .. }
                | SyncError::UnrecognizedEnvelopeType(_)
                | SyncError::InvalidTransition { .. }
                | SyncError::EmptyRoster
        )
    }
}

/// Result alias used throughout the crate.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Log an error that is being recovered as a no-op.
pub(crate) fn trace_dropped(err: &SyncError, what: &str) {
    if err.is_expected() {
        tracing::debug!(error = %err, "{what} ignored");
    } else {
        tracing::warn!(error = %err, "{what} dropped");
    }
}
