//! Multi-peer convergence tests.
//!
//! Several sessions share one in-memory relay room, the way several phones
//! share one table. After every delivery round all peers must hold equal
//! snapshots.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use table_sync::core::{CommanderId, CounterKind, ManualClock, PlayerId, RoomId, SessionConfig};
use table_sync::relay::{InMemoryRelay, Relay};
use table_sync::session::Session;
use table_sync::turn::TurnPhase;

const ROOM: &str = "table-7";

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// `count` sessions joined to one room, all on the same clock.
fn table(count: usize, config: &SessionConfig) -> (Rc<InMemoryRelay>, ManualClock, Vec<Session>) {
    let relay = Rc::new(InMemoryRelay::new());
    let clock = ManualClock::from_millis(1_700_000_000_000);
    let sessions = (0..count)
        .map(|_| {
            let session = Session::with_clock("game-1", ROOM, config.clone(), clock.clone());
            session.join(Rc::clone(&relay) as Rc<dyn Relay>);
            session
        })
        .collect();
    (relay, clock, sessions)
}

fn assert_converged(sessions: &[Session]) {
    let reference = sessions[0].state();
    for (i, session) in sessions.iter().enumerate().skip(1) {
        assert_eq!(*session.state(), *reference, "peer {i} diverged");
    }
}

#[test]
fn test_commander_table_converges() {
    let (relay, _clock, peers) = table(4, &SessionConfig::new("mtg", "commander"));

    peers[0].start_game(["p1", "p2", "p3", "p4"]);
    relay.deliver();
    assert_converged(&peers);

    for peer in &peers {
        let state = peer.state();
        assert_eq!(state.phase(), TurnPhase::Active);
        assert_eq!(state.player_count(), 4);
        assert_eq!(state.current_turn(), Some(&pid("p1")));
        assert!(state.players().all(|p| p.life_total() == 40));
    }

    peers[1].update_life(&pid("p2"), -15);
    peers[2].update_commander_damage(&pid("p3"), &CommanderId::new("edgar"), 21);
    peers[3].update_counter(&pid("p4"), CounterKind::Poison, 3);
    peers[3].update_custom_counter(&pid("p4"), "experience", 2);
    relay.deliver();
    assert_converged(&peers);

    let state = peers[0].state();
    assert_eq!(state.player(&pid("p2")).unwrap().life_total(), 25);
    assert_eq!(
        state.player(&pid("p3")).unwrap().commander_damage_from(&CommanderId::new("edgar")),
        21
    );
    assert_eq!(state.player(&pid("p4")).unwrap().poison_counters(), 3);
    assert_eq!(
        state.player(&pid("p4")).unwrap().custom_counters().collect::<Vec<_>>(),
        vec![("experience", 2)]
    );
}

#[test]
fn test_turn_cycle_across_peers() {
    let (relay, _clock, peers) = table(3, &SessionConfig::default());
    peers[0].start_game(["a", "b", "c"]);
    relay.deliver();

    // Each seat passes its own turn.
    for (expected_turn, seat) in [(2, 0), (3, 1), (4, 2)] {
        peers[seat].pass_turn();
        relay.deliver();
        assert_converged(&peers);
        assert_eq!(peers[seat].state().turn_number(), expected_turn);
    }

    let state = peers[2].state();
    assert_eq!(state.current_turn(), Some(&pid("a")));
    assert!(state.player(&pid("a")).unwrap().is_active());
    assert_eq!(state.players().filter(|p| p.is_active()).count(), 1);
}

#[test]
fn test_concurrent_edits_keep_last_writer() {
    let (relay, _clock, peers) = table(2, &SessionConfig::new("mtg", "commander"));
    peers[0].start_game(["p1", "p2"]);
    relay.deliver();

    // Both peers edit p2 before seeing each other's update.
    peers[0].update_life(&pid("p2"), -5);
    peers[1].update_life(&pid("p2"), -3);
    relay.deliver();

    // One adjustment is lost: 37, not 32.
    assert_converged(&peers);
    assert_eq!(peers[0].state().player(&pid("p2")).unwrap().life_total(), 37);
}

#[test]
fn test_out_of_order_delivery() {
    let (relay, _clock, peers) = table(3, &SessionConfig::new("mtg", "commander"));
    peers[0].start_game(["p1", "p2"]);
    relay.deliver();

    peers[0].update_life(&pid("p1"), -10);
    peers[0].update_life(&pid("p1"), 4);
    let frames = relay.drain(&RoomId::new(ROOM));
    assert_eq!(frames.len(), 2);

    for frame in frames.iter().rev() {
        relay.deliver_frame(&RoomId::new(ROOM), frame);
    }

    // The older absolute value arrived last and wins on every peer.
    assert_converged(&peers);
    assert_eq!(peers[2].state().player(&pid("p1")).unwrap().life_total(), 30);
}

#[test]
fn test_stale_base_edits_reordered_for_third_peer() {
    let (relay, _clock, peers) = table(3, &SessionConfig::default());
    peers[0].start_game(["p1", "p2"]);
    relay.deliver();

    // Both writers start from p1 = 20 and neither has seen the other's edit.
    peers[0].update_life(&pid("p1"), -5);
    peers[1].update_life(&pid("p1"), -8);
    let frames = relay.drain(&RoomId::new(ROOM));
    assert_eq!(frames.len(), 2);

    // The third peer hears 12 first, then 15.
    peers[2].receive(&frames[1]);
    assert_eq!(peers[2].state().player(&pid("p1")).unwrap().life_total(), 12);
    peers[2].receive(&frames[0]);
    assert_eq!(peers[2].state().player(&pid("p1")).unwrap().life_total(), 15);

    // The room gets the same reversed order and settles on the last arrival.
    for frame in frames.iter().rev() {
        relay.deliver_frame(&RoomId::new(ROOM), frame);
    }
    assert_converged(&peers);
    assert_eq!(peers[1].state().player(&pid("p1")).unwrap().life_total(), 15);
}

#[test]
fn test_joiner_with_other_config_adopts_table_settings() {
    let relay = Rc::new(InMemoryRelay::new());
    let clock = ManualClock::from_millis(1_700_000_000_000);
    let starter_config = SessionConfig::new("mtg", "commander").with_turn_timer(60);
    let starter = Session::with_clock("game-1", ROOM, starter_config, clock.clone());
    let joiner = Session::with_clock("game-1", ROOM, SessionConfig::default(), clock.clone());
    starter.join(Rc::clone(&relay) as Rc<dyn Relay>);
    joiner.join(Rc::clone(&relay) as Rc<dyn Relay>);

    starter.start_game(["p1", "p2"]);
    relay.deliver();

    let state = joiner.state();
    assert_eq!(*state, *starter.state());
    assert_eq!(state.format(), "commander");
    assert_eq!(state.starting_life_total(), 40);
    assert_eq!(joiner.turn_time_remaining(), Some(chrono::Duration::seconds(60)));

    // Later turn passes keep both timers in step.
    clock.advance(chrono::Duration::seconds(20));
    starter.pass_turn();
    relay.deliver();
    assert_eq!(*joiner.state(), *starter.state());
}

#[test]
fn test_duplicate_delivery_is_noop() {
    let (relay, _clock, peers) = table(2, &SessionConfig::default());
    peers[0].start_game(["p1", "p2"]);
    relay.deliver();

    peers[0].update_counter(&pid("p2"), CounterKind::Energy, 5);
    let frames = relay.drain(&RoomId::new(ROOM));
    relay.deliver_frame(&RoomId::new(ROOM), &frames[0]);
    let once = peers[1].state();

    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    let _watch = peers[1].observe(move |_| counter.set(counter.get() + 1));

    relay.deliver_frame(&RoomId::new(ROOM), &frames[0]);

    assert!(Arc::ptr_eq(&once, &peers[1].state()));
    assert_eq!(notified.get(), 0);
    assert_eq!(once.player(&pid("p2")).unwrap().energy_counters(), 5);
}

#[test]
fn test_left_peer_stops_receiving() {
    let (relay, _clock, peers) = table(3, &SessionConfig::default());
    peers[0].start_game(["p1", "p2"]);
    relay.deliver();

    assert!(peers[2].leave());
    peers[0].update_life(&pid("p1"), -6);
    relay.deliver();

    assert_eq!(peers[1].state().player(&pid("p1")).unwrap().life_total(), 14);
    assert_eq!(peers[2].state().player(&pid("p1")).unwrap().life_total(), 20);
    assert_eq!(relay.subscriber_count(&RoomId::new(ROOM)), 2);
}

#[test]
fn test_joined_peer_adopts_start() {
    let config = SessionConfig::new("pokemon", "standard").with_shuffled_seating(99);
    let (relay, _clock, peers) = table(4, &config);

    peers[2].start_game(["ash", "misty", "brock", "gary"]);
    relay.deliver();

    assert_converged(&peers);
    let state = peers[0].state();
    assert_eq!(state.starting_life_total(), 60);
    assert_eq!(state.player_count(), 4);
    assert_eq!(state.current_turn(), state.turn_order().next());
}

#[test]
fn test_end_game_reaches_every_peer() {
    let config = SessionConfig::new("mtg", "commander").with_turn_timer(120);
    let (relay, clock, peers) = table(3, &config);
    peers[0].start_game(["p1", "p2", "p3"]);
    relay.deliver();

    clock.advance(chrono::Duration::seconds(30));
    peers[1].end_game(Some(&pid("p3")));
    relay.deliver();

    assert_converged(&peers);
    for peer in &peers {
        let state = peer.state();
        assert_eq!(state.phase(), TurnPhase::Ended);
        assert!(!state.is_game_active());
        assert_eq!(state.winner(), Some(&pid("p3")));
        assert!(state.game_end_time().is_some());
        assert_eq!(peer.turn_time_remaining(), None);
        // Player state stays readable after the end.
        assert_eq!(state.player(&pid("p1")).unwrap().life_total(), 40);
    }

    // Turn passing after the end changes nothing.
    let before = peers[0].state();
    assert!(Arc::ptr_eq(&before, &peers[0].pass_turn()));
}

#[test]
fn test_pass_turn_before_start_is_noop() {
    let (relay, _clock, peers) = table(2, &SessionConfig::default());

    let before = peers[0].state();
    let after = peers[0].pass_turn();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(relay.pending_count(&RoomId::new(ROOM)), 0);
}
