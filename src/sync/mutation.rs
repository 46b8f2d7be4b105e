//! Mutation API.
//!
//! Each operation reads the current snapshot, computes the new absolute value
//! of one field and returns a new snapshot together with the [`Update`] that
//! announces that value. The input snapshot is never modified.
//!
//! ## Failure semantics
//!
//! Operations never panic. An unknown player, an empty roster or a phase that
//! does not allow the operation comes back as a [`SyncError`]; the session
//! treats it as "state did not change".
//!
//! ```
//! use table_sync::core::{
//!     Clock, GameId, GameState, ManualClock, Participant, PlayerId, RoomId, SessionConfig,
//! };
//! use table_sync::sync::mutation;
//!
//! let now = ManualClock::from_millis(0).now();
//! let config = SessionConfig::new("mtg", "commander");
//! let state = GameState::new(GameId::new("g1"), RoomId::new("r1"), &config);
//! let roster: Vec<Participant> = ["p1", "p2"].into_iter().map(Participant::from).collect();
//!
//! let started = mutation::start_game(&state, &roster, now).unwrap().state;
//! let hit = mutation::update_life(&started, &PlayerId::new("p2"), -15).unwrap();
//!
//! assert_eq!(hit.state.player(&PlayerId::new("p2")).unwrap().life_total(), 25);
//! assert_eq!(started.player(&PlayerId::new("p2")).unwrap().life_total(), 40);
//! ```

use crate::core::player::apply_delta;
use crate::core::{Action, CommanderId, CounterKey, GameState, Participant, PlayerId, Timestamp};
use crate::error::{SyncError, SyncResult};
use crate::protocol::{CommanderDamageChange, CounterChange, Envelope, LifeChange, TurnPass, Update};
use crate::turn::{next_seat, TurnEvent};

pub use super::lifecycle::{end_game, start_game};

/// Result of a successful mutation: the next snapshot and its announcement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub state: GameState,
    pub update: Update,
}

impl Mutation {
    /// Envelope announcing this mutation.
    #[must_use]
    pub fn envelope(&self, timestamp: Timestamp) -> Envelope {
        Envelope::new(self.state.game_id().clone(), self.update.clone(), timestamp)
    }
}

/// Change a player's life total: `max(0, life + delta)`.
pub fn update_life(state: &GameState, player: &PlayerId, delta: i64) -> SyncResult<Mutation> {
    let current = state
        .player(player)
        .ok_or_else(|| SyncError::UnknownPlayer(player.clone()))?;
    let new_total = apply_delta(current.life_total(), delta);

    Ok(Mutation {
        state: state.with_player(player, |p| p.set_life_total(new_total))?,
        update: Update::LifeChange(LifeChange {
            player_id: player.clone(),
            new_total,
        }),
    })
}

/// Change damage dealt to `victim` by `commander`: `max(0, damage + delta)`.
pub fn update_commander_damage(
    state: &GameState,
    victim: &PlayerId,
    commander: &CommanderId,
    delta: i64,
) -> SyncResult<Mutation> {
    let current = state
        .player(victim)
        .ok_or_else(|| SyncError::UnknownPlayer(victim.clone()))?;
    let new_total = apply_delta(current.commander_damage_from(commander), delta);

    Ok(Mutation {
        state: state.with_player(victim, |p| p.set_commander_damage(commander.clone(), new_total))?,
        update: Update::CommanderDamage(CommanderDamageChange {
            victim_id: victim.clone(),
            commander_id: commander.clone(),
            new_total,
        }),
    })
}

/// Change a built-in or custom counter: `max(0, value + delta)`.
pub fn update_counter(
    state: &GameState,
    player: &PlayerId,
    counter: &CounterKey,
    delta: i64,
) -> SyncResult<Mutation> {
    let current = state
        .player(player)
        .ok_or_else(|| SyncError::UnknownPlayer(player.clone()))?;
    let new_total = apply_delta(current.counter(counter), delta);

    Ok(Mutation {
        state: state.with_player(player, |p| p.set_counter(counter, new_total))?,
        update: Update::CounterChange(CounterChange {
            player_id: player.clone(),
            counter_type: counter.name().to_string(),
            new_total,
        }),
    })
}

/// Hand the turn to the next seat and bump the turn number.
///
/// The turn timer, if configured, restarts at `now`.
pub fn pass_turn(state: &GameState, now: Timestamp) -> SyncResult<Mutation> {
    if state.player_count() == 0 {
        return Err(SyncError::EmptyRoster);
    }
    state.phase().next(TurnEvent::Pass)?;

    let next_player = next_seat(state.turn_order(), state.current_turn())
        .cloned()
        .ok_or(SyncError::EmptyRoster)?;
    let turn_number = state.turn_number().saturating_add(1);

    let mut next = state.clone();
    next.set_current_turn(next_player.clone());
    next.turn_number = turn_number;
    next.turn_timer = next.turn_timer.map(|timer| timer.reset(now));

    Ok(Mutation {
        state: next,
        update: Update::TurnPass(TurnPass {
            next_player,
            turn_number,
        }),
    })
}

/// Apply a local [`Action`].
pub fn apply(state: &GameState, action: &Action, now: Timestamp) -> SyncResult<Mutation> {
    match action {
        Action::StartGame { participants } => start_game(state, participants, now),
        Action::EndGame { winner } => end_game(state, winner.as_ref(), now),
        Action::AdjustLife { player, delta } => update_life(state, player, *delta),
        Action::AdjustCommanderDamage { victim, commander, delta } => {
            update_commander_damage(state, victim, commander, *delta)
        }
        Action::AdjustCounter { player, counter, delta } => {
            update_counter(state, player, counter, *delta)
        }
        Action::PassTurn => pass_turn(state, now),
    }
}

/// Start helper for callers holding plain ids.
pub fn start_with_ids<'a>(
    state: &GameState,
    ids: impl IntoIterator<Item = &'a PlayerId>,
    now: Timestamp,
) -> SyncResult<Mutation> {
    let participants: Vec<Participant> = ids.into_iter().cloned().map(Participant::from).collect();
    start_game(state, &participants, now)
}
