//! Remote update reducer.
//!
//! Applies an envelope received from a peer by *setting* each field to the
//! transmitted absolute value. Applying the same envelope any number of times
//! yields the same state.
//!
//! Envelopes for another game, for unseated players or with negative values
//! are rejected; [`reduce`] logs the rejection and keeps the current snapshot.

use std::sync::Arc;

use tracing::trace;

use super::lifecycle::{adopt_end, adopt_start};
use crate::core::{CounterKey, GameState, Timestamp};
use crate::error::{trace_dropped, SyncError, SyncResult};
use crate::protocol::{Envelope, Update, UpdateKind};
use crate::turn::{TurnEvent, TurnPhase};

fn non_negative(kind: UpdateKind, value: i64) -> SyncResult<i64> {
    if value < 0 {
        return Err(SyncError::MalformedEnvelope(format!("{kind} carries negative total {value}")));
    }
    Ok(value)
}

/// Apply one remote envelope to `state`, returning the next snapshot.
///
/// `now` is only consulted for a `game-end` that carries no end time.
pub fn apply_envelope(
    state: &GameState,
    envelope: &Envelope,
    now: Timestamp,
) -> SyncResult<GameState> {
    if envelope.game_id != *state.game_id() {
        return Err(SyncError::ForeignSession {
            expected: state.game_id().clone(),
            received: envelope.game_id.clone(),
        });
    }

    let kind = envelope.kind();
    match &envelope.update {
        Update::LifeChange(change) => {
            let total = non_negative(kind, change.new_total)?;
            state.with_player(&change.player_id, |p| p.set_life_total(total))
        }
        Update::CommanderDamage(change) => {
            let total = non_negative(kind, change.new_total)?;
            state.with_player(&change.victim_id, |p| {
                p.set_commander_damage(change.commander_id.clone(), total)
            })
        }
        Update::CounterChange(change) => {
            let total = non_negative(kind, change.new_total)?;
            let key = CounterKey::from_name(&change.counter_type);
            state.with_player(&change.player_id, |p| p.set_counter(&key, total))
        }
        Update::TurnPass(pass) => {
            if !state.has_player(&pass.next_player) {
                return Err(SyncError::UnknownPlayer(pass.next_player.clone()));
            }
            if pass.turn_number == 0 {
                return Err(SyncError::MalformedEnvelope("turn number 0".into()));
            }
            state.phase().next(TurnEvent::Pass)?;

            let mut next = state.clone();
            next.set_current_turn(pass.next_player.clone());
            next.turn_number = pass.turn_number;
            next.turn_timer = next.turn_timer.map(|timer| timer.reset(envelope.timestamp));
            Ok(next)
        }
        Update::GameStart(start) => {
            if state.phase() != TurnPhase::NotStarted {
                trace!(game_id = %state.game_id(), "game-start for a running game, informational");
                return Ok(state.clone());
            }
            adopt_start(state, start)
        }
        Update::GameEnd(end) => adopt_end(state, end, now),
    }
}

/// Reduce a snapshot by one envelope.
///
/// Returns the same `Arc` when the envelope is rejected or changes nothing,
/// so observers can rely on pointer equality for change detection.
pub fn reduce(state: &Arc<GameState>, envelope: &Envelope, now: Timestamp) -> Arc<GameState> {
    match apply_envelope(state, envelope, now) {
        Ok(next) if next == **state => Arc::clone(state),
        Ok(next) => Arc::new(next),
        Err(err) => {
            trace_dropped(&err, envelope.kind().as_str());
            Arc::clone(state)
        }
    }
}
