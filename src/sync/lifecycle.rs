//! Session lifecycle: seating the roster at start, finalizing at end.
//!
//! Starting a game builds one `PlayerState` per participant at the resolved
//! starting life, fixes the seat order and hands the first turn to the first
//! seat. Ending a game freezes the phase and timestamps but keeps every
//! player's state inspectable.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use super::mutation::Mutation;
use crate::core::{GameState, Participant, PlayerId, PlayerState, Seating, SeatingRng, Timestamp};
use crate::error::{SyncError, SyncResult};
use crate::protocol::{GameEnd, GameStart, SeatAnnouncement, Update};
use crate::turn::{TurnEvent, TurnPhase, TurnTimer};

/// Collapse duplicate ids, keeping each id's first occurrence.
fn dedupe(participants: impl IntoIterator<Item = Participant>) -> Vec<Participant> {
    let mut seen = FxHashSet::default();
    participants
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.player_id.clone());
            if !fresh {
                debug!(player = %p.player_id, "duplicate participant collapsed");
            }
            fresh
        })
        .collect()
}

/// Seat `roster` on a copy of `state` and activate the game.
fn seat(
    state: &GameState,
    roster: &[Participant],
    starting_life: i64,
    started_at: Timestamp,
) -> GameState {
    let mut next = state.clone();
    next.seat_players(
        roster
            .iter()
            .map(|p| PlayerState::new(p, starting_life))
            .collect(),
    );
    next.starting_life_total = starting_life;
    next.phase = TurnPhase::Active;
    next.turn_number = 1;
    next.winner = None;
    next.game_start_time = Some(started_at);
    next.game_end_time = None;
    next.turn_timer = next.turn_timer.map(|timer| timer.reset(started_at));
    if let Some(first) = roster.first() {
        next.set_current_turn(first.player_id.clone());
    }
    next
}

/// Start the game with `participants`.
///
/// Duplicate ids are collapsed. With [`Seating::Shuffled`] the roster is
/// permuted deterministically before seating.
pub fn start_game(
    state: &GameState,
    participants: &[Participant],
    now: Timestamp,
) -> SyncResult<Mutation> {
    state.phase.next(TurnEvent::Start)?;

    let mut roster = dedupe(participants.iter().cloned());
    if roster.is_empty() {
        return Err(SyncError::EmptyRoster);
    }
    if let Seating::Shuffled { seed } = state.seating {
        SeatingRng::new(seed).shuffle(&mut roster);
    }

    let next = seat(state, &roster, state.starting_life_total, now);
    let update = Update::GameStart(GameStart {
        players: roster
            .iter()
            .map(|p| SeatAnnouncement {
                player_id: p.player_id.clone(),
                player_name: p.player_name.clone(),
            })
            .collect(),
        starting_life_total: next.starting_life_total,
        first_player: roster[0].player_id.clone(),
        started_at: now,
        game_type: Some(next.game_type.clone()),
        format: Some(next.format.clone()),
        turn_timer_secs: next.turn_timer.map(|timer| timer.per_turn_secs()),
        seating: Some(next.seating),
    });

    debug!(
        game_id = %state.game_id,
        players = roster.len(),
        starting_life = next.starting_life_total,
        "game started"
    );
    Ok(Mutation { state: next, update })
}

/// End the game. An unknown winner is logged and not recorded.
pub fn end_game(
    state: &GameState,
    winner: Option<&PlayerId>,
    now: Timestamp,
) -> SyncResult<Mutation> {
    let phase = state.phase.next(TurnEvent::End)?;

    let winner = match winner {
        Some(w) if state.has_player(w) => Some(w.clone()),
        Some(w) => {
            warn!(winner = %w, "winner is not seated, ending without one");
            None
        }
        None => None,
    };

    let mut next = state.clone();
    next.phase = phase;
    next.game_end_time = Some(now);
    next.winner = winner.clone();
    next.turn_timer = next.turn_timer.map(|timer| timer.disarm());

    debug!(game_id = %state.game_id, winner = ?winner, "game ended");
    Ok(Mutation {
        state: next,
        update: Update::GameEnd(GameEnd {
            winner_id: winner,
            ended_at: Some(now),
        }),
    })
}

/// Adopt a start announced by another peer.
///
/// Only a session that has not started yet adopts. The announced roster,
/// starting life, start time, game type, format, seating and turn timer
/// replace local values so late joiners hold the same state as the starter.
pub(crate) fn adopt_start(state: &GameState, start: &GameStart) -> SyncResult<GameState> {
    state.phase.next(TurnEvent::Start)?;

    if start.starting_life_total < 0 {
        return Err(SyncError::MalformedEnvelope(format!(
            "negative starting life {}",
            start.starting_life_total
        )));
    }
    let roster = dedupe(
        start
            .players
            .iter()
            .map(|s| Participant::new(s.player_id.clone(), s.player_name.clone())),
    );
    match roster.first() {
        None => return Err(SyncError::EmptyRoster),
        Some(first) if first.player_id != start.first_player => {
            return Err(SyncError::MalformedEnvelope(format!(
                "first player {} is not the first seat",
                start.first_player
            )));
        }
        Some(_) => {}
    }

    let mut base = state.clone();
    if let Some(game_type) = &start.game_type {
        base.game_type = game_type.clone();
    }
    if let Some(format) = &start.format {
        base.format = format.clone();
    }
    if let Some(seating) = start.seating {
        base.seating = seating;
    }
    base.turn_timer = start.turn_timer_secs.filter(|secs| *secs > 0).map(TurnTimer::new);

    Ok(seat(&base, &roster, start.starting_life_total, start.started_at))
}

/// Apply an end announced by another peer.
///
/// The end time and winner are each recorded once; later announcements do
/// not overwrite them.
pub(crate) fn adopt_end(state: &GameState, end: &GameEnd, now: Timestamp) -> SyncResult<GameState> {
    if state.phase == TurnPhase::NotStarted {
        return Err(SyncError::InvalidTransition {
            phase: state.phase,
            event: TurnEvent::End,
        });
    }

    let mut next = state.clone();
    next.phase = TurnPhase::Ended;
    if next.game_end_time.is_none() {
        next.game_end_time = Some(end.ended_at.unwrap_or(now));
    }
    if next.winner.is_none() {
        next.winner = end.winner_id.clone().filter(|w| state.has_player(w));
    }
    next.turn_timer = next.turn_timer.map(|timer| timer.disarm());
    Ok(next)
}
