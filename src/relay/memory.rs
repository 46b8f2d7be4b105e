//! In-process relay.
//!
//! Published frames are queued per room and handed to subscribers when
//! [`InMemoryRelay::deliver`] runs, the way a network would deliver them on a
//! later event-loop turn. Every subscriber of the room receives each frame,
//! the publisher included.
//!
//! Tests can take frames off the queue with [`InMemoryRelay::drain`] and
//! deliver them in any order with [`InMemoryRelay::deliver_frame`].

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{trace, warn};

use super::{FrameHandler, Relay, SubscriptionId};
use crate::core::RoomId;

type SharedHandler = Rc<RefCell<FrameHandler>>;

/// One room's subscribers and undelivered frames.
#[derive(Default)]
struct Room {
    /// A table rarely seats more than four peers.
    subscribers: SmallVec<[(SubscriptionId, SharedHandler); 4]>,
    pending: VecDeque<String>,
}

/// Queued single-threaded relay.
#[derive(Default)]
pub struct InMemoryRelay {
    rooms: RefCell<FxHashMap<RoomId, Room>>,
    next_id: Cell<u64>,
    /// Set while `deliver` drains the queues.
    delivering: Cell<bool>,
}

impl InMemoryRelay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers registered for `room`.
    #[must_use]
    pub fn subscriber_count(&self, room: &RoomId) -> usize {
        self.rooms
            .borrow()
            .get(room)
            .map_or(0, |r| r.subscribers.len())
    }

    /// Number of frames waiting for delivery in `room`.
    #[must_use]
    pub fn pending_count(&self, room: &RoomId) -> usize {
        self.rooms.borrow().get(room).map_or(0, |r| r.pending.len())
    }

    /// Take every queued frame of `room` without delivering it.
    pub fn drain(&self, room: &RoomId) -> Vec<String> {
        self.rooms
            .borrow_mut()
            .get_mut(room)
            .map(|r| r.pending.drain(..).collect())
            .unwrap_or_default()
    }

    /// Hand one frame to every current subscriber of `room`, bypassing the queue.
    pub fn deliver_frame(&self, room: &RoomId, frame: &str) {
        // Clone the handler list so handlers may subscribe, unsubscribe or
        // publish while being called.
        let handlers: Vec<SharedHandler> = self
            .rooms
            .borrow()
            .get(room)
            .map(|r| r.subscribers.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        trace!(room = %room, subscribers = handlers.len(), "delivering frame");
        for handler in handlers {
            // A handler that is already running cannot be entered again.
            match handler.try_borrow_mut() {
                Ok(mut handler) => (*handler)(frame),
                Err(_) => warn!(room = %room, "skipping re-entrant delivery to a busy handler"),
            }
        }
    }

    /// Deliver queued frames until every room's queue is empty.
    ///
    /// Frames published by handlers during delivery are delivered too.
    /// Called from inside a handler it returns 0 and leaves the queued frames
    /// to the delivery already in progress. Returns the number of frames
    /// delivered.
    pub fn deliver(&self) -> usize {
        if self.delivering.replace(true) {
            return 0;
        }
        let mut delivered = 0;
        while let Some((room, frame)) = self.next_pending() {
            self.deliver_frame(&room, &frame);
            delivered += 1;
        }
        self.delivering.set(false);
        delivered
    }

    fn next_pending(&self) -> Option<(RoomId, String)> {
        let mut rooms = self.rooms.borrow_mut();
        rooms.iter_mut().find_map(|(id, room)| {
            room.pending.pop_front().map(|frame| (id.clone(), frame))
        })
    }
}

impl Relay for InMemoryRelay {
    fn publish(&self, room: &RoomId, frame: String) {
        self.rooms
            .borrow_mut()
            .entry(room.clone())
            .or_default()
            .pending
            .push_back(frame);
    }

    fn subscribe(&self, room: &RoomId, handler: FrameHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.rooms
            .borrow_mut()
            .entry(room.clone())
            .or_default()
            .subscribers
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    fn unsubscribe(&self, room: &RoomId, id: SubscriptionId) -> bool {
        let mut rooms = self.rooms.borrow_mut();
        let Some(room) = rooms.get_mut(room) else {
            return false;
        };
        let before = room.subscribers.len();
        room.subscribers.retain(|(sid, _)| *sid != id);
        room.subscribers.len() != before
    }
}

impl std::fmt::Debug for InMemoryRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rooms = self.rooms.borrow();
        f.debug_struct("InMemoryRelay")
            .field("rooms", &rooms.len())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}
