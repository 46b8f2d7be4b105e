//! N-player capability verification tests.
//!
//! These tests verify that the engine has no hidden 2-player assumptions
//! and works correctly for tables of 1-8 players.

use std::rc::Rc;

use table_sync::core::{
    Clock, GameId, GameState, ManualClock, Participant, PlayerId, RoomId, SessionConfig,
};
use table_sync::relay::{InMemoryRelay, Relay};
use table_sync::session::Session;
use table_sync::sync::mutation;
use table_sync::turn::TurnPhase;

fn roster(count: usize) -> Vec<Participant> {
    (0..count)
        .map(|i| Participant::new(PlayerId::new(format!("seat-{i}")), format!("Player {i}")))
        .collect()
}

/// Test that every roster size seats every player at the resolved life.
#[test]
fn test_game_state_player_counts() {
    let now = ManualClock::from_millis(0).now();
    for player_count in 1..=8 {
        let config = SessionConfig::new("lorcana", "core");
        let state = GameState::new(GameId::new("g"), RoomId::new("r"), &config);
        let started = mutation::start_game(&state, &roster(player_count), now)
            .unwrap()
            .state;

        assert_eq!(started.player_count(), player_count);
        assert_eq!(started.turn_order().count(), player_count);
        assert!(started.players().all(|p| p.life_total() == 20));
        assert!(started.is_consistent());
    }
}

/// Test that each player's state is independent in a 6-player game.
#[test]
fn test_player_state_n_players() {
    let player_count = 6;
    let session =
        Session::with_clock("g", "r", SessionConfig::default(), ManualClock::from_millis(0));
    session.start_game(roster(player_count));

    // Set a different life total for each player
    for i in 0..player_count {
        session.update_life(&PlayerId::new(format!("seat-{i}")), -(i as i64));
    }

    let state = session.state();
    for i in 0..player_count {
        let player = state.player(&PlayerId::new(format!("seat-{i}"))).unwrap();
        assert_eq!(player.life_total(), 20 - i as i64);
        assert_eq!(player.player_name(), format!("Player {i}"));
    }
}

/// Test that the turn visits every seat exactly once per rotation.
#[test]
fn test_turn_rotation_visits_every_seat() {
    for player_count in 1..=8 {
        let session =
            Session::with_clock("g", "r", SessionConfig::default(), ManualClock::from_millis(0));
        session.start_game(roster(player_count));

        let mut visited = Vec::new();
        for _ in 0..player_count {
            visited.push(session.state().current_turn().cloned().unwrap());
            session.pass_turn();
        }

        let expected: Vec<PlayerId> =
            roster(player_count).into_iter().map(|p| p.player_id).collect();
        assert_eq!(visited, expected);
        assert_eq!(session.state().current_turn(), Some(&expected[0]));
        assert_eq!(session.state().turn_number() as usize, player_count + 1);
    }
}

/// Test an 8-seat table of peers converging through one relay.
#[test]
fn test_eight_peer_table() {
    let relay = Rc::new(InMemoryRelay::new());
    let peers: Vec<Session> = (0..8)
        .map(|_| {
            let config = SessionConfig::new("yugioh", "tcg");
            let session = Session::with_clock("g", "r", config, ManualClock::from_millis(0));
            session.join(Rc::clone(&relay) as Rc<dyn Relay>);
            session
        })
        .collect();

    peers[0].start_game(roster(8));
    relay.deliver();

    for (i, peer) in peers.iter().enumerate() {
        peer.update_life(&PlayerId::new(format!("seat-{i}")), -1000);
    }
    relay.deliver();

    for peer in &peers {
        let state = peer.state();
        assert_eq!(*state, *peers[0].state());
        assert_eq!(state.phase(), TurnPhase::Active);
        assert!(state.players().all(|p| p.life_total() == 7000));
    }
}

/// Test that a single player can still cycle turns.
#[test]
fn test_solo_table() {
    let session =
        Session::with_clock("g", "r", SessionConfig::default(), ManualClock::from_millis(0));
    session.start_game(["solo"]);

    let state = session.pass_turn();

    assert_eq!(state.current_turn(), Some(&PlayerId::new("solo")));
    assert_eq!(state.turn_number(), 2);
}
