//! Update envelopes.
//!
//! An envelope carries the *result* of one mutation: the absolute value a
//! field now holds, never the delta that produced it. Receivers set the field
//! to that value, which makes duplicate or replayed delivery harmless.

use serde::{Deserialize, Serialize};

use crate::core::{CommanderId, GameId, PlayerId, Seating, Timestamp};
use crate::error::SyncError;

/// The six envelope kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateKind {
    LifeChange,
    CommanderDamage,
    CounterChange,
    TurnPass,
    GameStart,
    GameEnd,
}

impl UpdateKind {
    pub const ALL: [UpdateKind; 6] = [
        UpdateKind::LifeChange,
        UpdateKind::CommanderDamage,
        UpdateKind::CounterChange,
        UpdateKind::TurnPass,
        UpdateKind::GameStart,
        UpdateKind::GameEnd,
    ];

    /// Wire value of the `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UpdateKind::LifeChange => "life-change",
            UpdateKind::CommanderDamage => "commander-damage",
            UpdateKind::CounterChange => "counter-change",
            UpdateKind::TurnPass => "turn-pass",
            UpdateKind::GameStart => "game-start",
            UpdateKind::GameEnd => "game-end",
        }
    }
}

impl std::str::FromStr for UpdateKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SyncError::UnrecognizedEnvelopeType(s.to_string()))
    }
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `life-change` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeChange {
    pub player_id: PlayerId,
    pub new_total: i64,
}

/// `commander-damage` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommanderDamageChange {
    pub victim_id: PlayerId,
    pub commander_id: CommanderId,
    pub new_total: i64,
}

/// `counter-change` payload. `counter_type` is a built-in counter name or a
/// custom counter name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterChange {
    pub player_id: PlayerId,
    pub counter_type: String,
    pub new_total: i64,
}

/// `turn-pass` payload. The sender's turn number is authoritative.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnPass {
    pub next_player: PlayerId,
    pub turn_number: u32,
}

/// One seat announced by `game-start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAnnouncement {
    pub player_id: PlayerId,
    pub player_name: String,
}

/// `game-start` payload: the seated roster in turn order plus the table
/// settings the starter ran with.
///
/// `game_type`, `format` and `seating` are optional on the wire; a receiver
/// keeps its own value for any that are missing. `turn_timer_secs` is always
/// sent and `null` means the table plays without a timer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    pub players: Vec<SeatAnnouncement>,
    pub starting_life_total: i64,
    pub first_player: PlayerId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub turn_timer_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seating: Option<Seating>,
}

/// `game-end` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnd {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<PlayerId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub ended_at: Option<Timestamp>,
}

/// The result of one mutation, as absolute values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    LifeChange(LifeChange),
    CommanderDamage(CommanderDamageChange),
    CounterChange(CounterChange),
    TurnPass(TurnPass),
    GameStart(GameStart),
    GameEnd(GameEnd),
}

impl Update {
    #[must_use]
    pub fn kind(&self) -> UpdateKind {
        match self {
            Update::LifeChange(_) => UpdateKind::LifeChange,
            Update::CommanderDamage(_) => UpdateKind::CommanderDamage,
            Update::CounterChange(_) => UpdateKind::CounterChange,
            Update::TurnPass(_) => UpdateKind::TurnPass,
            Update::GameStart(_) => UpdateKind::GameStart,
            Update::GameEnd(_) => UpdateKind::GameEnd,
        }
    }

    /// The player the update is about, used for the envelope's `playerId`.
    #[must_use]
    pub fn subject(&self) -> Option<&PlayerId> {
        match self {
            Update::LifeChange(change) => Some(&change.player_id),
            Update::CommanderDamage(change) => Some(&change.victim_id),
            Update::CounterChange(change) => Some(&change.player_id),
            Update::TurnPass(pass) => Some(&pass.next_player),
            Update::GameStart(start) => Some(&start.first_player),
            Update::GameEnd(end) => end.winner_id.as_ref(),
        }
    }
}

/// Routed update: one mutation result plus session metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub game_id: GameId,
    pub player_id: Option<PlayerId>,
    pub update: Update,
    pub timestamp: Timestamp,
}

impl Envelope {
    /// Wrap an update. `player_id` is taken from the update's subject.
    #[must_use]
    pub fn new(game_id: GameId, update: Update, timestamp: Timestamp) -> Self {
        Self {
            game_id,
            player_id: update.subject().cloned(),
            update,
            timestamp,
        }
    }

    #[must_use]
    pub fn kind(&self) -> UpdateKind {
        self.update.kind()
    }
}
