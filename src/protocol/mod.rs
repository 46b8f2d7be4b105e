//! Update envelope and wire protocol.
//!
//! - [`Envelope`]: routing metadata plus one [`Update`]
//! - [`Update`]: tagged union over the six envelope kinds, each carrying
//!   absolute values
//! - [`codec`]: JSON encoding with forward-compatible decoding

pub mod codec;
mod envelope;

pub use codec::{decode, encode, WireEnvelope};
pub use envelope::{
    CommanderDamageChange, CounterChange, Envelope, GameEnd, GameStart, LifeChange,
    SeatAnnouncement, TurnPass, Update, UpdateKind,
};
