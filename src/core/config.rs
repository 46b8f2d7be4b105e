//! Session configuration and starting-life resolution.
//!
//! The hosting application configures a session once, before any network
//! round-trip:
//! - `game_type` / `format`: select default rules
//! - `starting_life`: explicit override of the resolved starting life
//! - `turn_timer_secs`: optional per-turn timer
//! - `seating`: keep the listed order or shuffle it from a shared seed
//!
//! Starting-life resolution is pure, so every peer derives the same value
//! from the same configuration without communicating.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Fallback starting life for unrecognized game types.
pub const DEFAULT_STARTING_LIFE: i64 = 20;

/// Starting life whenever the format is Commander.
pub const COMMANDER_STARTING_LIFE: i64 = 40;

/// Per-game-type starting life.
const LIFE_DEFAULTS: &[(&str, i64)] = &[
    ("mtg", 20),
    ("commander", 40),
    ("pokemon", 60),
    ("yugioh", 8000),
    ("lorcana", 20),
];

/// Table default for a game type, if the game type is known.
#[must_use]
pub fn default_life_for_game_type(game_type: &str) -> Option<i64> {
    LIFE_DEFAULTS
        .iter()
        .find(|(name, _)| *name == game_type)
        .map(|(_, life)| *life)
}

/// Resolve the starting life total.
///
/// Precedence: explicit override, then Commander format, then the game-type
/// table, then [`DEFAULT_STARTING_LIFE`].
///
/// ```
/// use table_sync::core::config::resolve_starting_life;
///
/// assert_eq!(resolve_starting_life("mtg", "Commander", None), 40);
/// assert_eq!(resolve_starting_life("yugioh", "casual", None), 8000);
/// assert_eq!(resolve_starting_life("mtg", "commander", Some(30)), 30);
/// assert_eq!(resolve_starting_life("netrunner", "casual", None), 20);
/// ```
#[must_use]
pub fn resolve_starting_life(game_type: &str, format: &str, explicit_override: Option<i64>) -> i64 {
    if let Some(life) = explicit_override {
        return life.max(0);
    }
    if format.eq_ignore_ascii_case("commander") {
        return COMMANDER_STARTING_LIFE;
    }
    default_life_for_game_type(game_type).unwrap_or(DEFAULT_STARTING_LIFE)
}

/// How the roster handed to `start_game` becomes the turn order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Seating {
    /// Turn order is the order participants were listed in.
    #[default]
    AsListed,
    /// Deterministic shuffle from a seed shared by all peers.
    Shuffled { seed: u64 },
}

/// Configuration of one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Game type selecting the life table entry ("mtg", "pokemon", ...).
    pub game_type: String,

    /// Named rule-set ("commander", "casual", ...).
    pub format: String,

    /// Explicit starting life. Wins over every default.
    pub starting_life: Option<i64>,

    /// Per-turn timer duration in seconds. `None` disables the timer.
    pub turn_timer_secs: Option<u32>,

    /// Seating policy.
    pub seating: Seating,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game_type: "mtg".to_string(),
            format: "casual".to_string(),
            starting_life: None,
            turn_timer_secs: None,
            seating: Seating::AsListed,
        }
    }
}

impl SessionConfig {
    /// Create a configuration for a game type and format.
    pub fn new(game_type: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            game_type: game_type.into(),
            format: format.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no session can run with.
    pub fn validate(&self) -> SyncResult<()> {
        if let Some(life) = self.starting_life {
            if life < 0 {
                return Err(SyncError::Config(format!("starting life {life} is negative")));
            }
        }
        if self.turn_timer_secs == Some(0) {
            return Err(SyncError::Config("turn timer must be at least one second".into()));
        }
        Ok(())
    }

    /// Override the starting life.
    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = Some(life);
        self
    }

    /// Enable the per-turn timer.
    #[must_use]
    pub fn with_turn_timer(mut self, secs: u32) -> Self {
        self.turn_timer_secs = Some(secs);
        self
    }

    /// Shuffle the seating with a seed every peer knows.
    #[must_use]
    pub fn with_shuffled_seating(mut self, seed: u64) -> Self {
        self.seating = Seating::Shuffled { seed };
        self
    }

    /// Starting life resolved from this configuration.
    #[must_use]
    pub fn starting_life_total(&self) -> i64 {
        resolve_starting_life(&self.game_type, &self.format, self.starting_life)
    }
}
