//! Simulate a four-seat table on an in-memory relay.
//!
//! Usage: `table-sim [config.json]`
//!
//! Set `RUST_LOG=table_sync=debug` to see every update as it is applied.

use std::error::Error;
use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use table_sync::{CommanderId, CounterKind, InMemoryRelay, PlayerId, Relay, Session, SessionConfig};

const SEATS: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SessionConfig::new("mtg", "commander").with_turn_timer(90),
    };
    info!(
        game_type = %config.game_type,
        format = %config.format,
        life = config.starting_life_total(),
        "starting table"
    );

    let relay = Rc::new(InMemoryRelay::new());
    let sessions: Vec<Session> = SEATS
        .iter()
        .map(|_| {
            let session = Session::new("sim-game", "sim-room", config.clone());
            session.join(Rc::clone(&relay) as Rc<dyn Relay>);
            session
        })
        .collect();

    let [alice, bob, carol, _dave] = SEATS.map(PlayerId::new);
    let host = &sessions[0];

    host.start_game(SEATS);
    relay.deliver();

    sessions[1].update_life(&carol, -7);
    sessions[2].update_commander_damage(&bob, &CommanderId::new("atraxa"), 6);
    sessions[3].update_counter(&alice, CounterKind::Poison, 3);
    relay.deliver();

    for _ in 0..SEATS.len() {
        let state = host.state();
        let Some(current) = state.current_turn() else {
            break;
        };
        let seat = SEATS.iter().position(|s| *s == current.as_str()).unwrap_or(0);
        sessions[seat].pass_turn();
        relay.deliver();
    }

    host.end_game(Some(&alice));
    relay.deliver();

    let converged = sessions.iter().all(|s| *s.state() == *host.state());
    info!(converged, turn = host.state().turn_number(), "simulation finished");

    println!("{}", serde_json::to_string_pretty(&*host.state())?);
    Ok(())
}
