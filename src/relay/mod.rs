//! Relay adapter: the room-scoped publish/subscribe channel between peers.
//!
//! The engine does not implement a transport. It publishes encoded envelope
//! frames to a [`Relay`] and registers a handler for frames arriving in its
//! room. Delivery is assumed at-least-once and ordered per sender; nothing
//! beyond that is relied upon.
//!
//! [`InMemoryRelay`] is a queued, single-process implementation used by tests
//! and the simulator.

mod memory;

pub use memory::InMemoryRelay;

use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::core::RoomId;

/// Identifier of one handler registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// Callback receiving raw frames.
pub type FrameHandler = Box<dyn FnMut(&str)>;

/// Room-scoped publish/subscribe channel.
pub trait Relay {
    /// Send a frame to every subscriber of `room`.
    fn publish(&self, room: &RoomId, frame: String);

    /// Register `handler` for frames in `room`.
    fn subscribe(&self, room: &RoomId, handler: FrameHandler) -> SubscriptionId;

    /// Remove a registration. Returns false if it was already gone.
    fn unsubscribe(&self, room: &RoomId, id: SubscriptionId) -> bool;
}

/// Dispose handle for a relay registration.
///
/// Calling [`Subscription::dispose`] or dropping the handle unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    relay: Weak<dyn Relay>,
    room: RoomId,
    id: SubscriptionId,
}

impl Subscription {
    /// Subscribe `handler` to `room` on `relay`.
    pub fn attach(relay: &Rc<dyn Relay>, room: RoomId, handler: FrameHandler) -> Self {
        let id = relay.subscribe(&room, handler);
        Self {
            relay: Rc::downgrade(relay),
            room,
            id,
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Unsubscribe now.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(relay) = self.relay.upgrade() {
            relay.unsubscribe(&self.room, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("room", &self.room)
            .field("id", &self.id)
            .finish()
    }
}
