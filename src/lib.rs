//! # table-sync
//!
//! Shared game-state synchronization for multiplayer tabletop card games.
//!
//! Every client at a table keeps its own copy of the game: life totals,
//! commander damage, counters and whose turn it is. Clients change their
//! copy locally and broadcast the resulting absolute values through a
//! room-scoped relay; peers apply what they receive with set-to-value
//! semantics.
//!
//! ## Design Principles
//!
//! 1. **Absolute values on the wire**: An update says "p2 is now at 25",
//!    never "p2 lost 15". Applying the same update twice is harmless.
//!
//! 2. **Snapshots, not in-place edits**: State is held in `im-rs`
//!    persistent collections and handed out as `Arc<GameState>`. A change
//!    produces a new snapshot; a no-op returns the same `Arc`.
//!
//! 3. **Last writer wins**: There is no sequence number and no conflict
//!    resolution. Two concurrent edits to the same field converge to
//!    whichever update each peer applied last.
//!
//! ## Modules
//!
//! - `core`: Identifiers, player and game state, configuration, clock, RNG
//! - `turn`: Turn phase machine and turn timer
//! - `sync`: Local mutations and the remote-update reducer
//! - `protocol`: Update envelopes and their JSON wire format
//! - `relay`: Publish/subscribe adapter and an in-memory implementation
//! - `session`: One client's session tying the above together

pub mod core;
pub mod error;
pub mod protocol;
pub mod relay;
pub mod session;
pub mod sync;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    Action, Clock, CommanderId, CounterKey, CounterKind, GameId, GameState, ManualClock,
    Participant, PlayerId, PlayerState, RoomId, Seating, SessionConfig, SystemClock, Timestamp,
};

pub use crate::error::{SyncError, SyncResult};

pub use crate::protocol::{Envelope, Update, UpdateKind};

pub use crate::relay::{InMemoryRelay, Relay, Subscription, SubscriptionId};

pub use crate::session::{Session, StateSubscription};

pub use crate::sync::Mutation;

pub use crate::turn::{TurnPhase, TurnTimer};
