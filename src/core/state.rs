//! Canonical state of one game session.
//!
//! ## GameState
//!
//! - Session identity (game id, room id, game type, format)
//! - Roster: players keyed by id, plus the fixed seat order
//! - Turn cursor, turn number, phase and optional turn timer
//! - Start/end times and the recorded winner
//!
//! Uses `im` persistent data structures, so producing the next snapshot is a
//! cheap structural-sharing clone. Snapshots are never changed after they are
//! handed out; the mutation API and the remote reducer build new ones.

use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};

use super::clock::Timestamp;
use super::config::{Seating, SessionConfig};
use super::ids::{GameId, RoomId};
use super::player::{PlayerId, PlayerState};
use crate::error::{SyncError, SyncResult};
use crate::turn::{TurnPhase, TurnTimer};

/// Shared state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub(crate) game_id: GameId,
    pub(crate) room_id: RoomId,
    pub(crate) game_type: String,
    pub(crate) format: String,

    /// Per-player state, keyed by id.
    pub(crate) players: HashMap<PlayerId, PlayerState>,

    /// Seat order. Fixed at start; defines turn rotation.
    pub(crate) turn_order: Vector<PlayerId>,

    pub(crate) current_turn: Option<PlayerId>,

    /// Turn number (starts at 1).
    pub(crate) turn_number: u32,

    pub(crate) starting_life_total: i64,
    pub(crate) phase: TurnPhase,
    pub(crate) turn_timer: Option<TurnTimer>,
    pub(crate) seating: Seating,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) game_start_time: Option<Timestamp>,
    pub(crate) game_end_time: Option<Timestamp>,
}

impl GameState {
    /// Create a not-yet-started game.
    ///
    /// Starting life is resolved here, once, from the configuration.
    #[must_use]
    pub fn new(game_id: GameId, room_id: RoomId, config: &SessionConfig) -> Self {
        Self {
            game_id,
            room_id,
            game_type: config.game_type.clone(),
            format: config.format.clone(),
            players: HashMap::new(),
            turn_order: Vector::new(),
            current_turn: None,
            turn_number: 1,
            starting_life_total: config.starting_life_total(),
            phase: TurnPhase::NotStarted,
            turn_timer: config.turn_timer_secs.map(TurnTimer::new),
            seating: config.seating,
            winner: None,
            game_start_time: None,
            game_end_time: None,
        }
    }

    // === Identity ===

    #[must_use]
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    #[must_use]
    pub fn game_type(&self) -> &str {
        &self.game_type
    }

    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    // === Roster ===

    /// Get a player's state.
    #[must_use]
    pub fn player(&self, player: &PlayerId) -> Option<&PlayerState> {
        self.players.get(player)
    }

    /// Check whether a player is seated.
    #[must_use]
    pub fn has_player(&self, player: &PlayerId) -> bool {
        self.players.contains_key(player)
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.turn_order.len()
    }

    /// Iterate over player ids in seat order.
    pub fn turn_order(&self) -> impl Iterator<Item = &PlayerId> {
        self.turn_order.iter()
    }

    /// Iterate over player states in seat order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerState> {
        self.turn_order.iter().filter_map(|id| self.players.get(id))
    }

    // === Turn ===

    /// Player whose turn it is. `None` before the game starts.
    #[must_use]
    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_active(&self) -> bool {
        self.phase == TurnPhase::Active
    }

    #[must_use]
    pub fn turn_timer(&self) -> Option<&TurnTimer> {
        self.turn_timer.as_ref()
    }

    #[must_use]
    pub fn seating(&self) -> Seating {
        self.seating
    }

    // === Lifecycle ===

    #[must_use]
    pub fn starting_life_total(&self) -> i64 {
        self.starting_life_total
    }

    #[must_use]
    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    #[must_use]
    pub fn game_start_time(&self) -> Option<Timestamp> {
        self.game_start_time
    }

    #[must_use]
    pub fn game_end_time(&self) -> Option<Timestamp> {
        self.game_end_time
    }

    /// Every player value is non-negative and, while active, the turn cursor
    /// points at a seated player.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let cursor_ok = !self.is_game_active()
            || self.current_turn.as_ref().is_some_and(|p| self.players.contains_key(p));
        cursor_ok && self.turn_number >= 1 && self.players.values().all(PlayerState::is_consistent)
    }

    // === Crate-private writers ===

    /// Mutable access to one player. Only valid on a fresh (unshared) snapshot.
    pub(crate) fn player_mut(&mut self, player: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(player)
    }

    /// New snapshot with one player's state edited by `edit`.
    pub(crate) fn with_player(
        &self,
        player: &PlayerId,
        edit: impl FnOnce(&mut PlayerState),
    ) -> SyncResult<GameState> {
        if !self.has_player(player) {
            return Err(SyncError::UnknownPlayer(player.clone()));
        }
        let mut next = self.clone();
        if let Some(state) = next.player_mut(player) {
            edit(state);
        }
        Ok(next)
    }

    /// Move the turn cursor, keeping the presentational `is_active` flags in step.
    pub(crate) fn set_current_turn(&mut self, next: PlayerId) {
        if let Some(previous) = self.current_turn.take() {
            if let Some(state) = self.players.get_mut(&previous) {
                state.set_active(false);
            }
        }
        if let Some(state) = self.players.get_mut(&next) {
            state.set_active(true);
        }
        self.current_turn = Some(next);
    }

    /// Replace the roster. Seat order follows `seats`.
    pub(crate) fn seat_players(&mut self, seats: Vec<PlayerState>) {
        self.turn_order = seats.iter().map(|s| s.player_id().clone()).collect();
        self.players = seats
            .into_iter()
            .map(|s| (s.player_id().clone(), s))
            .collect();
    }
}
