//! Wall-clock time source.
//!
//! Timestamps travel on the wire with millisecond precision, so every clock
//! hands out millisecond-aligned values. A peer that adopts a timestamp from
//! an envelope then holds exactly the value the sender holds.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Point in time used for start/end times, envelope stamps and timer deadlines.
pub type Timestamp = DateTime<Utc>;

/// Source of the current time.
pub trait Clock {
    /// Current time, millisecond aligned.
    fn now(&self) -> Timestamp;
}

/// System UTC clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().trunc_subsecs(3)
    }
}

/// Manually driven clock for tests and simulations.
///
/// Clones share the same underlying instant, so a test can keep a handle
/// while a session owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start.trunc_subsecs(3))),
        }
    }

    /// Create a clock frozen at the given Unix time in milliseconds.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(DateTime::from_timestamp_millis(millis).unwrap_or_default())
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: Timestamp) {
        self.now.set(now.trunc_subsecs(3));
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set((self.now.get() + by).trunc_subsecs(3));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
