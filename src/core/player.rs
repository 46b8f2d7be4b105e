//! Player identification and per-player table state.
//!
//! ## PlayerId
//!
//! Opaque player identifier chosen by the hosting application.
//!
//! ## PlayerState
//!
//! Life, commander damage and counters for one seat. Every value is clamped
//! at zero. Setters are crate-private: only the mutation API and the remote
//! reducer write player state.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::ids::{opaque_id, CommanderId};

opaque_id!(
    /// Player identifier. Unique within one game.
    PlayerId
);

/// Apply a signed delta to a non-negative value, clamping at zero.
///
/// ```
/// use table_sync::core::player::apply_delta;
///
/// assert_eq!(apply_delta(40, -15), 25);
/// assert_eq!(apply_delta(3, -10), 0);
/// assert_eq!(apply_delta(i64::MAX, 1), i64::MAX);
/// ```
#[must_use]
pub fn apply_delta(current: i64, delta: i64) -> i64 {
    current.saturating_add(delta).max(0)
}

/// Built-in status counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Poison,
    Energy,
    Storm,
}

impl CounterKind {
    /// All built-in counters.
    pub const ALL: [CounterKind; 3] =
        [CounterKind::Poison, CounterKind::Energy, CounterKind::Storm];

    /// Wire name of the counter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CounterKind::Poison => "poison",
            CounterKind::Energy => "energy",
            CounterKind::Storm => "storm",
        }
    }

    /// Look up a built-in counter by name (case-insensitive).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any counter a player can carry: a built-in field or a named custom counter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CounterKey {
    Builtin(CounterKind),
    Custom(String),
}

impl CounterKey {
    /// Resolve a wire name. Built-in names win over custom counters.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match CounterKind::parse(name) {
            Some(kind) => CounterKey::Builtin(kind),
            None => CounterKey::Custom(name.to_string()),
        }
    }

    /// Wire name of the counter.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CounterKey::Builtin(kind) => kind.as_str(),
            CounterKey::Custom(name) => name,
        }
    }
}

impl From<CounterKind> for CounterKey {
    fn from(kind: CounterKind) -> Self {
        CounterKey::Builtin(kind)
    }
}

/// A participant handed to `start_game`: id plus display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub player_id: PlayerId,
    pub player_name: String,
}

impl Participant {
    /// Create a participant with an explicit display name.
    pub fn new(player_id: impl Into<PlayerId>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
        }
    }
}

impl From<PlayerId> for Participant {
    fn from(player_id: PlayerId) -> Self {
        let player_name = player_id.as_str().to_string();
        Self { player_id, player_name }
    }
}

impl From<&str> for Participant {
    fn from(id: &str) -> Self {
        Participant::from(PlayerId::new(id))
    }
}

/// Table state of one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    player_id: PlayerId,
    player_name: String,
    life_total: i64,
    commander_damage: OrdMap<CommanderId, i64>,
    poison_counters: i64,
    energy_counters: i64,
    storm_count: i64,
    custom_counters: OrdMap<String, i64>,
    is_active: bool,
}

impl PlayerState {
    /// Fresh player state: given life, every counter at zero.
    #[must_use]
    pub fn new(participant: &Participant, life_total: i64) -> Self {
        Self {
            player_id: participant.player_id.clone(),
            player_name: participant.player_name.clone(),
            life_total: life_total.max(0),
            commander_damage: OrdMap::new(),
            poison_counters: 0,
            energy_counters: 0,
            storm_count: 0,
            custom_counters: OrdMap::new(),
            is_active: false,
        }
    }

    #[must_use]
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn life_total(&self) -> i64 {
        self.life_total
    }

    /// Damage dealt by `commander`, zero if none was recorded.
    #[must_use]
    pub fn commander_damage_from(&self, commander: &CommanderId) -> i64 {
        self.commander_damage.get(commander).copied().unwrap_or(0)
    }

    /// All recorded commander damage.
    pub fn commander_damage(&self) -> impl Iterator<Item = (&CommanderId, i64)> {
        self.commander_damage.iter().map(|(id, dmg)| (id, *dmg))
    }

    #[must_use]
    pub fn poison_counters(&self) -> i64 {
        self.poison_counters
    }

    #[must_use]
    pub fn energy_counters(&self) -> i64 {
        self.energy_counters
    }

    #[must_use]
    pub fn storm_count(&self) -> i64 {
        self.storm_count
    }

    /// Current value of any counter. Unset custom counters read as zero.
    #[must_use]
    pub fn counter(&self, key: &CounterKey) -> i64 {
        match key {
            CounterKey::Builtin(CounterKind::Poison) => self.poison_counters,
            CounterKey::Builtin(CounterKind::Energy) => self.energy_counters,
            CounterKey::Builtin(CounterKind::Storm) => self.storm_count,
            CounterKey::Custom(name) => self.custom_counters.get(name).copied().unwrap_or(0),
        }
    }

    /// All custom counters.
    pub fn custom_counters(&self) -> impl Iterator<Item = (&str, i64)> {
        self.custom_counters.iter().map(|(name, v)| (name.as_str(), *v))
    }

    /// Presentational flag mirroring `GameState::current_turn`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Every tracked value is non-negative.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.life_total >= 0
            && self.poison_counters >= 0
            && self.energy_counters >= 0
            && self.storm_count >= 0
            && self.commander_damage.values().all(|v| *v >= 0)
            && self.custom_counters.values().all(|v| *v >= 0)
    }

    // === Crate-private writers ===

    pub(crate) fn set_life_total(&mut self, value: i64) {
        self.life_total = value.max(0);
    }

    pub(crate) fn set_commander_damage(&mut self, commander: CommanderId, value: i64) {
        self.commander_damage.insert(commander, value.max(0));
    }

    pub(crate) fn set_counter(&mut self, key: &CounterKey, value: i64) {
        let value = value.max(0);
        match key {
            CounterKey::Builtin(CounterKind::Poison) => self.poison_counters = value,
            CounterKey::Builtin(CounterKind::Energy) => self.energy_counters = value,
            CounterKey::Builtin(CounterKind::Storm) => self.storm_count = value,
            CounterKey::Custom(name) => {
                self.custom_counters.insert(name.clone(), value);
            }
        }
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}
