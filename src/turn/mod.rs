//! Turn state machine.
//!
//! Governs whose turn it is and how turns are counted, separately from the
//! life and counter mutations.
//!
//! ## Key Components
//!
//! - [`TurnPhase`]: `NotStarted → Active → Ended`
//! - [`TurnTimer`]: optional per-turn deadline, reset on every pass
//! - [`next_seat`]: strict round-robin over the fixed seat order
//!
//! There is no support for removing, skipping or reordering seats mid-game.

mod phase;
mod timer;

pub use phase::{TurnEvent, TurnPhase};
pub use timer::TurnTimer;

use crate::core::PlayerId;

/// Seat after `current` in `order`, wrapping around.
///
/// A cursor that is missing or not seated restarts at the first seat.
/// Returns `None` only for an empty order.
///
/// ```
/// use table_sync::core::PlayerId;
/// use table_sync::turn::next_seat;
///
/// let order: Vec<PlayerId> = ["p1", "p2", "p3"].into_iter().map(PlayerId::new).collect();
///
/// assert_eq!(next_seat(&order, Some(&PlayerId::new("p1"))), Some(&PlayerId::new("p2")));
/// assert_eq!(next_seat(&order, Some(&PlayerId::new("p3"))), Some(&PlayerId::new("p1")));
/// assert_eq!(next_seat(&[], None), None);
/// ```
#[must_use]
pub fn next_seat<'a, I>(order: I, current: Option<&PlayerId>) -> Option<&'a PlayerId>
where
    I: IntoIterator<Item = &'a PlayerId>,
{
    let seats: Vec<&PlayerId> = order.into_iter().collect();
    if seats.is_empty() {
        return None;
    }
    let next_index = current
        .and_then(|cur| seats.iter().position(|seat| *seat == cur))
        .map_or(0, |index| (index + 1) % seats.len());
    Some(seats[next_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> Vec<PlayerId> {
        ids.iter().map(|id| PlayerId::new(*id)).collect()
    }

    #[test]
    fn test_round_robin() {
        let seats = order(&["a", "b", "c", "d"]);
        let mut cursor = PlayerId::new("a");

        let mut visited = Vec::new();
        for _ in 0..8 {
            cursor = next_seat(&seats, Some(&cursor)).unwrap().clone();
            visited.push(cursor.as_str().to_string());
        }

        assert_eq!(visited, vec!["b", "c", "d", "a", "b", "c", "d", "a"]);
    }

    #[test]
    fn test_single_seat_wraps_to_itself() {
        let seats = order(&["solo"]);
        assert_eq!(next_seat(&seats, Some(&PlayerId::new("solo"))), Some(&seats[0]));
    }

    #[test]
    fn test_unknown_cursor_restarts() {
        let seats = order(&["a", "b"]);
        assert_eq!(next_seat(&seats, Some(&PlayerId::new("zz"))), Some(&seats[0]));
        assert_eq!(next_seat(&seats, None), Some(&seats[0]));
    }

    #[test]
    fn test_works_with_im_vector() {
        let seats: im::Vector<PlayerId> = order(&["a", "b"]).into_iter().collect();
        assert_eq!(next_seat(&seats, Some(&PlayerId::new("b"))), Some(&PlayerId::new("a")));
    }
}
