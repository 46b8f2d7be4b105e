//! Core table types: identifiers, players, state, actions, configuration.
//!
//! This module holds the data model shared by every other part of the
//! engine. It has no knowledge of the wire format or the relay.

pub mod ids;
pub mod player;
pub mod rng;
pub mod clock;
pub mod config;
pub mod action;
pub mod state;

pub use ids::{CommanderId, GameId, RoomId};
pub use player::{CounterKey, CounterKind, Participant, PlayerId, PlayerState};
pub use rng::SeatingRng;
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{Seating, SessionConfig};
pub use action::Action;
pub use state::GameState;
