//! End-to-end flows through the game engine: lobby, countdown, puzzles,
//! victory paths, reset, and persistence.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde_json::json;

use biodome_core::{
    ActionError, GameConfig, GameEngine, GameEvent, JoinError, MemoryStore, NullSink,
    PlayerId, RecordingSink,
};
use biodome_logic::rooms::RoomId;
use biodome_logic::victory::GameResult;

fn headless_engine() -> (GameEngine, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let engine = GameEngine::new(GameConfig::headless(), sink.clone());
    (engine, sink)
}

/// Two players seated and readied; game started.
fn started_pair(engine: &GameEngine) -> (PlayerId, PlayerId) {
    let ada = engine.join_player("ada").unwrap();
    let brin = engine.join_player("brin").unwrap();
    engine.claim_room(ada, "energy").unwrap();
    engine.claim_room(brin, "water").unwrap();
    engine.set_ready(ada).unwrap();
    engine.set_ready(brin).unwrap();
    (ada, brin)
}

#[test]
fn lobby_rules_cap_and_names() {
    let (engine, _sink) = headless_engine();
    engine.join_player("ada").unwrap();
    assert_eq!(
        engine.join_player("ada"),
        Err(JoinError::NameTaken("ada".to_string()))
    );
    engine.join_player("brin").unwrap();
    engine.join_player("cleo").unwrap();
    engine.join_player("dmitri").unwrap();
    assert_eq!(engine.join_player("edie"), Err(JoinError::GameFull(4)));
}

#[test]
fn ready_requires_a_room_and_start_fires_at_two() {
    let (engine, _sink) = headless_engine();
    let ada = engine.join_player("ada").unwrap();
    let brin = engine.join_player("brin").unwrap();
    assert_eq!(engine.set_ready(ada), Err(ActionError::NoRoomSelected));

    engine.claim_room(ada, "energy").unwrap();
    engine.claim_room(brin, "water").unwrap();
    engine.set_ready(ada).unwrap();
    assert!(!engine.poll_snapshot().has_started);
    engine.set_ready(brin).unwrap();
    let snap = engine.poll_snapshot();
    assert!(snap.has_started);
    assert!(snap.remaining_secs > 0 && snap.remaining_secs <= 600);
    // ada is ready in the unlocked first room; brin's room is still locked.
    assert!(snap.player("ada").unwrap().can_enter_room);
    assert!(!snap.player("brin").unwrap().can_enter_room);
}

#[test]
fn claiming_a_new_room_releases_the_old_one() {
    let (engine, _sink) = headless_engine();
    let ada = engine.join_player("ada").unwrap();
    let brin = engine.join_player("brin").unwrap();
    engine.claim_room(ada, "energy").unwrap();
    assert_eq!(
        engine.claim_room(brin, "energy"),
        Err(ActionError::RoomOccupied {
            occupant: "ada".to_string()
        })
    );
    engine.claim_room(ada, "water").unwrap();
    let snap = engine.poll_snapshot();
    assert_eq!(snap.room(RoomId::Energy).unwrap().occupant, None);
    assert_eq!(
        snap.room(RoomId::Water).unwrap().occupant,
        Some("ada".to_string())
    );
    // Energy is free again.
    engine.claim_room(brin, "energy").unwrap();
}

#[test]
fn concurrent_claims_on_one_room_admit_exactly_one() {
    let (engine, _sink) = headless_engine();
    let ids: Vec<PlayerId> = ["ada", "brin", "cleo", "dmitri"]
        .iter()
        .map(|&n| engine.join_player(n).unwrap())
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let engine = engine.clone();
            thread::spawn(move || engine.claim_room(id, "flora").is_ok())
        })
        .collect();
    let wins: usize = handles
        .into_iter()
        .map(|h| h.join().unwrap_or(false))
        .filter(|&won| won)
        .count();
    assert_eq!(wins, 1);
    assert!(engine.poll_snapshot().room(RoomId::Flora).unwrap().occupant.is_some());
}

#[test]
fn energy_completion_unlocks_water_and_announces() {
    let (engine, sink) = headless_engine();
    let (ada, _brin) = started_pair(&engine);
    sink.take();

    let response = engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();
    assert!(response.completed);

    let snap = engine.poll_snapshot();
    assert_eq!(snap.metrics["energy_level"], 60.0);
    assert_eq!(snap.metrics["air_co2"], 35.0);
    assert!(snap.room(RoomId::Energy).unwrap().is_completed);
    assert!(!snap.room(RoomId::Water).unwrap().is_locked);
    assert!(snap.room(RoomId::Air).unwrap().is_locked);

    let events = sink.take();
    assert!(matches!(events[0], GameEvent::Feedback { .. }));
    match &events[1] {
        GameEvent::PuzzleCompleted { room, hint, .. } => {
            assert_eq!(*room, RoomId::Energy);
            assert!(hint.is_some());
        }
        other => panic!("expected completion event, got {other:?}"),
    }
}

#[test]
fn completion_is_monotonic_under_further_actions() {
    let (engine, _sink) = headless_engine();
    let (ada, _brin) = started_pair(&engine);
    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();
    // Failed connections afterwards drain energy but never un-complete.
    for _ in 0..5 {
        engine
            .submit_action(ada, "energy", "connect_cables", &json!({"correct": false}))
            .unwrap();
    }
    let snap = engine.poll_snapshot();
    assert!(snap.room(RoomId::Energy).unwrap().is_completed);
    assert!(!snap.room(RoomId::Water).unwrap().is_locked);
}

#[test]
fn locked_room_rejects_actions_after_start() {
    let (engine, _sink) = headless_engine();
    let (_ada, brin) = started_pair(&engine);
    // brin occupies Water, which is still locked post-start.
    assert_eq!(
        engine.submit_action(brin, "water", "sort_waste", &json!({"correct": true})),
        Err(ActionError::RoomLocked)
    );
    let snap = engine.poll_snapshot();
    assert_eq!(snap.metrics["water_pollution"], 30.0);
}

#[test]
fn boundary_rejections() {
    let (engine, _sink) = headless_engine();
    let (ada, brin) = started_pair(&engine);

    assert_eq!(
        engine.submit_action(PlayerId(99), "energy", "connect_cables", &json!({"correct": true})),
        Err(ActionError::UnknownPlayer)
    );
    assert!(matches!(
        engine.submit_action(ada, "vault", "connect_cables", &json!({"correct": true})),
        Err(ActionError::UnknownRoom(_))
    ));
    assert!(matches!(
        engine.submit_action(ada, "energy", "connect_cables", &json!({})),
        Err(ActionError::MalformedPayload(_))
    ));
    // brin does not occupy energy.
    assert_eq!(
        engine.submit_action(brin, "energy", "connect_cables", &json!({"correct": true})),
        Err(ActionError::NotOccupant)
    );
    // Right payload, wrong room.
    assert!(matches!(
        engine.submit_action(ada, "energy", "sort_waste", &json!({"correct": true})),
        Err(ActionError::WrongRoomAction { .. })
    ));
}

/// Plays all four rooms to completion with two players.
fn play_through(engine: &GameEngine, ada: PlayerId, brin: PlayerId) {
    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();
    engine
        .submit_action(brin, "water", "validate_chemical", &json!({"ph": 7.0, "o2": 8.0}))
        .unwrap();
    let done = engine
        .submit_action(brin, "water", "complete_water", &json!({}))
        .unwrap();
    assert!(done.completed);

    engine.claim_room(brin, "air").unwrap();
    engine
        .submit_action(brin, "air", "identify_pollution_source", &json!({"correct": true}))
        .unwrap();

    engine.claim_room(ada, "flora").unwrap();
    loop {
        let response = engine
            .submit_action(ada, "flora", "select_plant", &json!({"plant": "oxygen_plant"}))
            .unwrap();
        if response.completed {
            break;
        }
    }
}

#[test]
fn air_completion_redirects_everyone_to_the_final_code() {
    let (engine, sink) = headless_engine();
    let (ada, brin) = started_pair(&engine);
    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();
    engine
        .submit_action(brin, "water", "validate_chemical", &json!({"ph": 7.0, "o2": 8.0}))
        .unwrap();
    engine
        .submit_action(brin, "water", "complete_water", &json!({}))
        .unwrap();
    engine.claim_room(brin, "air").unwrap();
    sink.take();

    engine
        .submit_action(brin, "air", "identify_pollution_source", &json!({"correct": true}))
        .unwrap();
    let events = sink.take();
    assert!(events.iter().any(|e| matches!(e, GameEvent::RedirectToFinal)));
}

#[test]
fn finishing_every_room_evaluates_immediately() {
    let (engine, _sink) = headless_engine();
    let (ada, brin) = started_pair(&engine);
    play_through(&engine, ada, brin);

    // Solving the puzzles drives pollution and CO2 below the victory
    // floor, so the room-path evaluation records a defeat; the secret
    // code is the intended way out.
    let snap = engine.poll_snapshot();
    assert!(snap.rooms.iter().all(|r| r.is_completed));
    assert_eq!(snap.result, Some(GameResult::Defeat));
}

#[test]
fn secret_code_overrides_even_a_recorded_defeat() {
    let (engine, sink) = headless_engine();
    let (ada, brin) = started_pair(&engine);
    play_through(&engine, ada, brin);
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Defeat));
    sink.take();

    let outcome = engine
        .validate_final_code(ada, "  epsi Workshops 2025 ")
        .unwrap();
    assert!(outcome.matched);
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Victory));
    let events = sink.take();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::VictoryAchieved { validator: Some(name) } if name == "ada"
    )));
}

#[test]
fn secret_code_wins_with_rooms_incomplete() {
    let (engine, _sink) = headless_engine();
    let ada = engine.join_player("ada").unwrap();
    let brin = engine.join_player("brin").unwrap();
    engine.claim_room(ada, "energy").unwrap();
    engine.claim_room(brin, "water").unwrap();
    engine.set_ready(ada).unwrap();
    engine.set_ready(brin).unwrap();
    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();

    // One of four rooms completed; the code still forces victory.
    let outcome = engine.validate_final_code(brin, "EPSI WORKSHOPS 2025").unwrap();
    assert!(outcome.matched);
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Victory));
}

#[test]
fn wrong_code_changes_nothing() {
    let (engine, sink) = headless_engine();
    let (ada, _brin) = started_pair(&engine);
    sink.take();
    let outcome = engine.validate_final_code(ada, "open sesame").unwrap();
    assert!(!outcome.matched);
    assert_eq!(engine.poll_snapshot().result, None);
    assert!(sink.take().is_empty());
}

#[test]
fn deadline_expiry_records_defeat_once() {
    let (engine, _sink) = headless_engine();
    started_pair(&engine);
    engine.handle_deadline(0);
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Defeat));
    // A second expiry (or a racing duplicate) cannot rewrite it.
    engine.handle_deadline(0);
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Defeat));
}

#[test]
fn stale_countdown_generation_is_ignored_after_reset() {
    let (engine, _sink) = headless_engine();
    started_pair(&engine);
    engine.reset_game();
    // The countdown spawned for generation 0 fires late; nothing happens.
    engine.handle_deadline(0);
    let snap = engine.poll_snapshot();
    assert!(!snap.has_started);
    assert_eq!(snap.result, None);
}

#[test]
fn countdown_thread_expires_a_short_round() {
    let sink = Arc::new(NullSink);
    let config = GameConfig {
        round_duration: Duration::from_millis(50),
        spawn_countdown: true,
        ..GameConfig::default()
    };
    let engine = GameEngine::new(config, sink);
    let ada = engine.join_player("ada").unwrap();
    let brin = engine.join_player("brin").unwrap();
    engine.claim_room(ada, "energy").unwrap();
    engine.claim_room(brin, "water").unwrap();

    // Three ready calls race; the game must start exactly once.
    let handles: Vec<_> = [ada, brin, ada]
        .into_iter()
        .map(|id| {
            let engine = engine.clone();
            thread::spawn(move || engine.set_ready(id))
        })
        .collect();
    for h in handles {
        let _ = h.join().unwrap();
    }
    assert!(engine.poll_snapshot().has_started);

    thread::sleep(Duration::from_millis(400));
    assert_eq!(engine.poll_snapshot().result, Some(GameResult::Defeat));
}

#[test]
fn reset_restores_the_initial_world() {
    let (engine, sink) = headless_engine();
    let (ada, brin) = started_pair(&engine);
    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .unwrap();
    engine
        .submit_action(brin, "water", "sort_waste", &json!({"correct": true}))
        .unwrap();
    sink.take();

    engine.reset_game();
    let snap = engine.poll_snapshot();
    assert!(snap.players.is_empty());
    assert_eq!(snap.metrics["energy_level"], 50.0);
    assert_eq!(snap.metrics["water_pollution"], 30.0);
    assert_eq!(snap.metrics["air_co2"], 40.0);
    assert_eq!(snap.metrics["air_o2"], 60.0);
    assert_eq!(snap.metrics["flora_health"], 60.0);
    assert!(!snap.room(RoomId::Energy).unwrap().is_locked);
    assert!(snap.room(RoomId::Water).unwrap().is_locked);
    assert!(!snap.has_started);
    assert_eq!(snap.result, None);
    assert_eq!(sink.take(), vec![GameEvent::GameReset]);
}

#[test]
fn leaving_releases_the_room_and_frees_the_name() {
    let (engine, _sink) = headless_engine();
    let ada = engine.join_player("ada").unwrap();
    engine.claim_room(ada, "energy").unwrap();
    assert!(engine.leave_player(ada));
    assert!(!engine.leave_player(ada));
    let snap = engine.poll_snapshot();
    assert!(snap.players.is_empty());
    assert_eq!(snap.room(RoomId::Energy).unwrap().occupant, None);
    engine.join_player("ada").unwrap();
}

#[test]
fn restore_rebuilds_an_equivalent_lobby() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(NullSink);
    let engine = GameEngine::with_store(GameConfig::headless(), sink.clone(), store.clone());
    let ada = engine.join_player("ada").unwrap();
    engine.join_player("brin").unwrap();
    engine.claim_room(ada, "energy").unwrap();

    let restored = GameEngine::restore(GameConfig::headless(), sink, store).unwrap();
    assert_eq!(restored.poll_snapshot(), engine.poll_snapshot());
    // Identity carries over: ada can keep acting in the restored engine.
    restored.set_ready(ada).unwrap();
}
