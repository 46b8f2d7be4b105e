//! Local intents.
//!
//! An `Action` is what a player at this client asked for: "Alice takes 5",
//! "pass the turn". Actions carry deltas. They are turned into absolute
//! values by the mutation API and never travel on the wire themselves.
//!
//! ```
//! use table_sync::core::{Action, CounterKind, PlayerId};
//!
//! let hit = Action::AdjustLife { player: PlayerId::new("p2"), delta: -5 };
//! let poison = Action::adjust_counter("p1", CounterKind::Poison, 3);
//!
//! assert_eq!(hit.player(), Some(&PlayerId::new("p2")));
//! assert_eq!(Action::PassTurn.player(), None);
//! assert!(poison.is_adjustment());
//! ```

use serde::{Deserialize, Serialize};

use super::ids::CommanderId;
use super::player::{CounterKey, Participant, PlayerId};

/// A local state-change request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Seat the roster and begin the game.
    StartGame { participants: Vec<Participant> },
    /// Conclude the game, optionally naming a winner.
    EndGame { winner: Option<PlayerId> },
    /// Change a player's life total by `delta`.
    AdjustLife { player: PlayerId, delta: i64 },
    /// Change damage dealt to `victim` by `commander`.
    AdjustCommanderDamage {
        victim: PlayerId,
        commander: CommanderId,
        delta: i64,
    },
    /// Change one of a player's counters.
    AdjustCounter {
        player: PlayerId,
        counter: CounterKey,
        delta: i64,
    },
    /// Hand the turn to the next seat.
    PassTurn,
}

impl Action {
    /// Convenience constructor for counter adjustments.
    pub fn adjust_counter(
        player: impl Into<PlayerId>,
        counter: impl Into<CounterKey>,
        delta: i64,
    ) -> Self {
        Action::AdjustCounter {
            player: player.into(),
            counter: counter.into(),
            delta,
        }
    }

    /// The player this action targets, if it targets one.
    #[must_use]
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            Action::AdjustLife { player, .. } | Action::AdjustCounter { player, .. } => {
                Some(player)
            }
            Action::AdjustCommanderDamage { victim, .. } => Some(victim),
            Action::EndGame { winner } => winner.as_ref(),
            Action::StartGame { .. } | Action::PassTurn => None,
        }
    }

    /// Whether this action adjusts a per-player value.
    #[must_use]
    pub fn is_adjustment(&self) -> bool {
        matches!(
            self,
            Action::AdjustLife { .. }
                | Action::AdjustCommanderDamage { .. }
                | Action::AdjustCounter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CounterKind;

    #[test]
    fn test_action_player() {
        let action = Action::AdjustCommanderDamage {
            victim: PlayerId::new("p4"),
            commander: CommanderId::new("cmdA"),
            delta: 21,
        };
        assert_eq!(action.player(), Some(&PlayerId::new("p4")));

        let end = Action::EndGame { winner: None };
        assert_eq!(end.player(), None);
    }

    #[test]
    fn test_adjust_counter_constructor() {
        let action = Action::adjust_counter("p1", CounterKind::Storm, 2);
        assert_eq!(
            action,
            Action::AdjustCounter {
                player: PlayerId::new("p1"),
                counter: CounterKey::Builtin(CounterKind::Storm),
                delta: 2,
            }
        );
    }

    #[test]
    fn test_is_adjustment() {
        assert!(Action::adjust_counter("p1", CounterKey::Custom("rad".into()), 1).is_adjustment());
        assert!(!Action::PassTurn.is_adjustment());
        assert!(!Action::StartGame { participants: vec![] }.is_adjustment());
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::AdjustLife { player: PlayerId::new("p2"), delta: -15 };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(back, action);
    }
}
