//! State transitions.
//!
//! Two writers exist for a session's state, and both live here:
//!
//! - [`mutation`]: local intents → new snapshot + absolute-value update
//! - [`reducer`]: remote envelopes → new snapshot, by set-to-value
//!
//! [`lifecycle`] holds the start/end transitions used by both.
//!
//! Neither writer touches the snapshot it was given. Each returns a new one,
//! so anything holding the previous snapshot keeps a consistent view.

pub mod lifecycle;
pub mod mutation;
pub mod reducer;

pub use mutation::Mutation;
pub use reducer::{apply_envelope, reduce};
