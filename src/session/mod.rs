//! Session context: one client's view of one game.
//!
//! A [`Session`] owns the current [`GameState`] snapshot and is its only
//! writer. Local calls (`update_life`, `pass_turn`, ...) go through the
//! mutation API, replace the snapshot and publish the resulting envelope to
//! the room. Frames arriving from the room go through the remote reducer.
//!
//! ## Lifetime
//!
//! - [`Session::join`] subscribes to the room on a relay
//! - [`Session::leave`] (or dropping the session) unsubscribes
//! - [`Session::observe`] registers a callback until its handle is disposed
//!
//! Observers receive the new `Arc<GameState>` after every change. A call that
//! changes nothing keeps the same `Arc` and notifies nobody.
//!
//! ## Errors
//!
//! Nothing here returns an error. Unknown players, foreign sessions,
//! unrecognized envelope types and malformed frames are logged and leave the
//! state as it was.

mod observers;

pub use observers::StateSubscription;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, trace, warn};

use self::observers::Observers;
use crate::core::{
    Action, Clock, CommanderId, CounterKey, CounterKind, GameId, GameState, Participant, PlayerId,
    RoomId, SessionConfig, SystemClock,
};
use crate::error::trace_dropped;
use crate::protocol::{codec, Envelope};
use crate::relay::{Relay, Subscription};
use crate::sync::{mutation, reducer};

struct RelayLink {
    relay: Rc<dyn Relay>,
    // Held for its Drop.
    _subscription: Subscription,
}

struct SessionInner {
    config: SessionConfig,
    state: RefCell<Arc<GameState>>,
    observers: Rc<RefCell<Observers>>,
    clock: Box<dyn Clock>,
    link: RefCell<Option<RelayLink>>,
}

impl SessionInner {
    fn snapshot(&self) -> Arc<GameState> {
        Arc::clone(&self.state.borrow())
    }

    fn room_id(&self) -> RoomId {
        self.state.borrow().room_id().clone()
    }

    /// Install `next` and notify observers if it differs from the current snapshot.
    fn commit(&self, next: Arc<GameState>) -> Arc<GameState> {
        {
            let mut state = self.state.borrow_mut();
            if Arc::ptr_eq(&state, &next) || **state == *next {
                return Arc::clone(&state);
            }
            *state = Arc::clone(&next);
        }
        let callbacks = self.observers.borrow().callbacks();
        for callback in callbacks {
            callback(&next);
        }
        next
    }

    fn dispatch(&self, action: &Action) -> Arc<GameState> {
        let now = self.clock.now();
        let current = self.snapshot();

        match mutation::apply(&current, action, now) {
            Ok(mutation) => {
                let envelope = mutation.envelope(now);
                let next = if mutation.state == *current {
                    current
                } else {
                    Arc::new(mutation.state)
                };
                debug!(
                    game_id = %next.game_id(),
                    kind = %envelope.kind(),
                    player = ?envelope.player_id,
                    "local update"
                );
                // Publish before observers run: anything they dispatch must
                // reach the room after this envelope.
                self.publish(&envelope);
                self.commit(next)
            }
            Err(err) => {
                trace_dropped(&err, "local action");
                current
            }
        }
    }

    fn publish(&self, envelope: &Envelope) {
        let relay = self.link.borrow().as_ref().map(|link| Rc::clone(&link.relay));
        let Some(relay) = relay else {
            trace!(kind = %envelope.kind(), "not joined, update kept local");
            return;
        };
        match codec::encode(envelope) {
            Ok(frame) => relay.publish(&self.room_id(), frame),
            Err(err) => warn!(error = %err, kind = %envelope.kind(), "failed to encode envelope"),
        }
    }

    fn apply_envelope(&self, envelope: &Envelope) -> Arc<GameState> {
        let current = self.snapshot();
        let next = reducer::reduce(&current, envelope, self.clock.now());
        self.commit(next)
    }

    fn receive(&self, frame: &str) -> Arc<GameState> {
        match codec::decode(frame) {
            Ok(envelope) => self.apply_envelope(&envelope),
            Err(err) => {
                trace_dropped(&err, "frame");
                self.snapshot()
            }
        }
    }
}

/// One client's synchronized game session.
pub struct Session {
    inner: Rc<SessionInner>,
}

impl Session {
    /// Create a session on the system clock.
    pub fn new(
        game_id: impl Into<GameId>,
        room_id: impl Into<RoomId>,
        config: SessionConfig,
    ) -> Self {
        Self::with_clock(game_id, room_id, config, SystemClock)
    }

    /// Create a session on a custom clock.
    pub fn with_clock(
        game_id: impl Into<GameId>,
        room_id: impl Into<RoomId>,
        config: SessionConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        let state = GameState::new(game_id.into(), room_id.into(), &config);
        Self {
            inner: Rc::new(SessionInner {
                config,
                state: RefCell::new(Arc::new(state)),
                observers: Rc::new(RefCell::new(Observers::default())),
                clock: Box::new(clock),
                link: RefCell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<GameState> {
        self.inner.snapshot()
    }

    /// Call `observer` with every new snapshot until the handle is disposed.
    pub fn observe(&self, observer: impl Fn(&Arc<GameState>) + 'static) -> StateSubscription {
        Observers::register(&self.inner.observers, Rc::new(observer))
    }

    // === Room membership ===

    /// Subscribe to this session's room on `relay`. Leaves any previous relay first.
    pub fn join(&self, relay: Rc<dyn Relay>) {
        self.leave();

        let room = self.inner.room_id();
        let weak = Rc::downgrade(&self.inner);
        let subscription = Subscription::attach(
            &relay,
            room.clone(),
            Box::new(move |frame: &str| {
                if let Some(inner) = weak.upgrade() {
                    inner.receive(frame);
                }
            }),
        );

        info!(room = %room, game_id = %self.inner.snapshot().game_id(), "joined room");
        *self.inner.link.borrow_mut() = Some(RelayLink {
            relay,
            _subscription: subscription,
        });
    }

    /// Unsubscribe from the room. Returns false if the session was not joined.
    pub fn leave(&self) -> bool {
        let link = self.inner.link.borrow_mut().take();
        match link {
            Some(link) => {
                drop(link);
                info!(room = %self.inner.room_id(), "left room");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_joined(&self) -> bool {
        self.inner.link.borrow().is_some()
    }

    // === Local mutations ===

    /// Apply a local action and publish its result.
    pub fn dispatch(&self, action: Action) -> Arc<GameState> {
        self.inner.dispatch(&action)
    }

    /// Seat the participants and start the game.
    pub fn start_game<P: Into<Participant>>(
        &self,
        participants: impl IntoIterator<Item = P>,
    ) -> Arc<GameState> {
        self.dispatch(Action::StartGame {
            participants: participants.into_iter().map(Into::into).collect(),
        })
    }

    /// End the game, optionally naming a winner.
    pub fn end_game(&self, winner: Option<&PlayerId>) -> Arc<GameState> {
        self.dispatch(Action::EndGame {
            winner: winner.cloned(),
        })
    }

    pub fn update_life(&self, player: &PlayerId, delta: i64) -> Arc<GameState> {
        self.dispatch(Action::AdjustLife {
            player: player.clone(),
            delta,
        })
    }

    pub fn update_commander_damage(
        &self,
        victim: &PlayerId,
        commander: &CommanderId,
        delta: i64,
    ) -> Arc<GameState> {
        self.dispatch(Action::AdjustCommanderDamage {
            victim: victim.clone(),
            commander: commander.clone(),
            delta,
        })
    }

    pub fn update_counter(
        &self,
        player: &PlayerId,
        counter: CounterKind,
        delta: i64,
    ) -> Arc<GameState> {
        self.dispatch(Action::adjust_counter(player.clone(), counter, delta))
    }

    pub fn update_custom_counter(
        &self,
        player: &PlayerId,
        name: &str,
        delta: i64,
    ) -> Arc<GameState> {
        self.dispatch(Action::adjust_counter(player.clone(), CounterKey::from_name(name), delta))
    }

    pub fn pass_turn(&self) -> Arc<GameState> {
        self.dispatch(Action::PassTurn)
    }

    // === Remote updates ===

    /// Apply a raw frame from the relay.
    pub fn receive(&self, frame: &str) -> Arc<GameState> {
        self.inner.receive(frame)
    }

    /// Apply an already-decoded envelope.
    pub fn apply_envelope(&self, envelope: &Envelope) -> Arc<GameState> {
        self.inner.apply_envelope(envelope)
    }

    // === Turn timer ===

    /// Time left in the current turn, if a timer is configured and armed.
    #[must_use]
    pub fn turn_time_remaining(&self) -> Option<Duration> {
        let now = self.inner.clock.now();
        self.state().turn_timer().and_then(|timer| timer.remaining(now))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.snapshot();
        f.debug_struct("Session")
            .field("game_id", state.game_id())
            .field("room_id", state.room_id())
            .field("phase", &state.phase())
            .field("joined", &self.is_joined())
            .finish()
    }
}
