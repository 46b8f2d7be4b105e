//! Wire-level tests: frames written by hand, as another client would send them.

use std::sync::Arc;

use serde_json::{json, Value};

use table_sync::core::{CommanderId, CounterKey, ManualClock, PlayerId, SessionConfig};
use table_sync::protocol::{codec, UpdateKind};
use table_sync::session::Session;
use table_sync::turn::TurnPhase;

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn frame(kind: &str, data: Value) -> String {
    json!({
        "gameId": "g1",
        "type": kind,
        "playerId": null,
        "data": data,
        "timestamp": 1_700_000_000_000_i64,
    })
    .to_string()
}

fn started_session() -> Session {
    let session = Session::with_clock(
        "g1",
        "room",
        SessionConfig::new("mtg", "commander"),
        ManualClock::from_millis(1_700_000_000_000),
    );
    session.start_game(["p1", "p2", "p3"]);
    session
}

#[test]
fn test_each_kind_sets_absolute_values() {
    let session = started_session();

    session.receive(&frame("life-change", json!({"playerId": "p2", "newTotal": 25})));
    session.receive(&frame(
        "commander-damage",
        json!({"victimId": "p1", "commanderId": "krenko", "newTotal": 9}),
    ));
    session.receive(&frame(
        "counter-change",
        json!({"playerId": "p3", "counterType": "poison", "newTotal": 4}),
    ));
    session.receive(&frame(
        "counter-change",
        json!({"playerId": "p3", "counterType": "rad", "newTotal": 7}),
    ));
    let state = session.receive(&frame("turn-pass", json!({"nextPlayer": "p3", "turnNumber": 6})));

    assert_eq!(state.player(&pid("p2")).unwrap().life_total(), 25);
    assert_eq!(
        state.player(&pid("p1")).unwrap().commander_damage_from(&CommanderId::new("krenko")),
        9
    );
    assert_eq!(state.player(&pid("p3")).unwrap().poison_counters(), 4);
    assert_eq!(state.player(&pid("p3")).unwrap().counter(&CounterKey::from_name("rad")), 7);
    assert_eq!(state.current_turn(), Some(&pid("p3")));
    assert_eq!(state.turn_number(), 6);

    let state = session.receive(&frame("game-end", json!({"winnerId": "p2"})));
    assert_eq!(state.phase(), TurnPhase::Ended);
    assert_eq!(state.winner(), Some(&pid("p2")));
}

#[test]
fn test_rejected_frames_leave_state_untouched() {
    let session = started_session();
    let before = session.state();

    let rejected = [
        "{ this is not json".to_string(),
        frame("dice-roll", json!({"sides": 20})),
        frame("life-change", json!({"player": "p2"})),
        frame("life-change", json!({"playerId": "p9", "newTotal": 10})),
        frame("life-change", json!({"playerId": "p2", "newTotal": -3})),
        frame("turn-pass", json!({"nextPlayer": "ghost", "turnNumber": 2})),
        json!({
            "gameId": "some-other-game",
            "type": "life-change",
            "data": {"playerId": "p2", "newTotal": 1},
            "timestamp": 0,
        })
        .to_string(),
    ];

    for raw in &rejected {
        let after = session.receive(raw);
        assert!(Arc::ptr_eq(&before, &after), "frame changed state: {raw}");
    }
}

#[test]
fn test_extra_fields_are_ignored() {
    let session = started_session();
    let raw = json!({
        "gameId": "g1",
        "type": "life-change",
        "playerId": "p1",
        "data": {"playerId": "p1", "newTotal": 12, "reason": "lifelink"},
        "timestamp": 1_700_000_000_000_i64,
        "senderVersion": "9.9",
    })
    .to_string();

    let state = session.receive(&raw);

    assert_eq!(state.player(&pid("p1")).unwrap().life_total(), 12);
}

#[test]
fn test_local_frames_have_wire_shape() {
    let session = started_session();
    let relay = std::rc::Rc::new(table_sync::relay::InMemoryRelay::new());
    session.join(relay.clone());

    session.update_life(&pid("p2"), -15);
    session.update_commander_damage(&pid("p1"), &CommanderId::new("krenko"), 3);
    session.pass_turn();

    let frames = relay.drain(&table_sync::core::RoomId::new("room"));
    let values: Vec<Value> = frames
        .iter()
        .map(|f| serde_json::from_str(f).unwrap())
        .collect();

    assert_eq!(values[0]["type"], "life-change");
    assert_eq!(values[0]["gameId"], "g1");
    assert_eq!(values[0]["playerId"], "p2");
    assert_eq!(values[0]["data"], json!({"playerId": "p2", "newTotal": 25}));
    assert_eq!(values[0]["timestamp"], 1_700_000_000_000_i64);

    assert_eq!(values[1]["type"], "commander-damage");
    assert_eq!(
        values[1]["data"],
        json!({"victimId": "p1", "commanderId": "krenko", "newTotal": 3})
    );

    assert_eq!(values[2]["type"], "turn-pass");
    assert_eq!(values[2]["data"], json!({"nextPlayer": "p2", "turnNumber": 2}));

    let decoded = codec::decode(&frames[2]).unwrap();
    assert_eq!(decoded.kind(), UpdateKind::TurnPass);
}
