//! Biodome Headless Scenario Harness
//!
//! Validates the pure game logic and full engine flows without any
//! transport, storage backend, or real countdown thread.
//!
//! Usage:
//!   cargo run -p biodome-simtest
//!   cargo run -p biodome-simtest -- --verbose

use std::sync::Arc;

use serde_json::json;

use biodome_core::{
    GameConfig, GameEngine, GameEvent, MemoryStore, PlayerId, RecordingSink,
};
use biodome_logic::metrics::{Metric, MetricSet};
use biodome_logic::puzzles::{self, PuzzleAction};
use biodome_logic::rooms::RoomId;
use biodome_logic::victory::{self, GameResult};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Biodome Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Metric bounds sweep
    results.extend(validate_metric_bounds());

    // 2. Pure puzzle rules
    results.extend(validate_puzzle_rules());

    // 3. Full cooperative playthrough
    results.extend(validate_playthrough());

    // 4. Victory paths and reset
    results.extend(validate_victory_paths());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Metric bounds ────────────────────────────────────────────────────

fn validate_metric_bounds() -> Vec<TestResult> {
    println!("--- Metric Bounds ---");
    let mut results = Vec::new();

    let mut metrics = MetricSet::initial();
    let mut in_bounds = true;
    // Hammer every metric with an alternating delta sweep.
    for step in 0..500 {
        let delta = if step % 2 == 0 { 37.5 } else { -61.25 };
        for metric in Metric::ALL {
            let value = metrics.adjust(metric, delta);
            if !(0.0..=100.0).contains(&value) {
                in_bounds = false;
            }
        }
    }
    results.push(check(
        "metric_clamp_sweep",
        in_bounds,
        "500 alternating adjustments stay within [0,100]",
    ));

    let fresh = MetricSet::initial();
    results.push(check(
        "metric_initial_values",
        fresh.energy_level == 50.0
            && fresh.water_pollution == 30.0
            && fresh.air_co2 == 40.0
            && fresh.air_o2 == 60.0
            && fresh.flora_health == 60.0,
        "initial values are 50/30/40/60/60",
    ));

    results
}

// ── 2. Puzzle rules ─────────────────────────────────────────────────────

fn validate_puzzle_rules() -> Vec<TestResult> {
    println!("--- Puzzle Rules ---");
    let mut results = Vec::new();

    // Energy threshold from a cold start.
    let mut m = MetricSet::initial();
    let out = puzzles::apply_action(
        RoomId::Energy,
        &PuzzleAction::ConnectCables { correct: true },
        &mut m,
    );
    results.push(check(
        "energy_first_connection_completes",
        matches!(&out, Ok(o) if o.completes_room) && m.energy_level == 60.0,
        format!("energy={} after one correct connection", m.energy_level),
    ));

    // Chemical tolerance boundary sweep.
    let mut boundary_ok = true;
    for (ph, o2, expect_balanced) in [
        (7.0, 8.0, true),
        (7.49, 8.0, true),
        (7.5, 8.0, false),
        (6.51, 7.51, true),
        (7.0, 8.5, false),
    ] {
        let mut m = MetricSet::initial();
        let before = m.water_pollution;
        let out = puzzles::apply_action(
            RoomId::Water,
            &PuzzleAction::ValidateChemical { ph, o2 },
            &mut m,
        );
        let balanced = out.is_ok() && m.water_pollution < before;
        if balanced != expect_balanced {
            boundary_ok = false;
        }
    }
    results.push(check(
        "water_chemical_tolerance",
        boundary_ok,
        "0.5 tolerance honored on both probes",
    ));

    // Air completion thresholds.
    let mut m = MetricSet::initial();
    let out = puzzles::apply_action(
        RoomId::Air,
        &PuzzleAction::IdentifyPollutionSource { correct: true },
        &mut m,
    );
    results.push(check(
        "air_completion_and_redirect",
        matches!(&out, Ok(o) if o.completes_room && o.redirect_all),
        format!("co2={} o2={}", m.air_co2, m.air_o2),
    ));

    // Secret code matching.
    results.push(check(
        "secret_code_casing",
        victory::code_matches(" epsi workshops 2025 ")
            && !victory::code_matches("epsi workshops 2024"),
        "trimmed, case-insensitive",
    ));

    results
}

// ── 3. Full playthrough ─────────────────────────────────────────────────

fn validate_playthrough() -> Vec<TestResult> {
    println!("--- Cooperative Playthrough ---");
    let mut results = Vec::new();

    let sink = Arc::new(RecordingSink::new());
    let store = Arc::new(MemoryStore::new());
    let engine = GameEngine::with_store(GameConfig::headless(), sink.clone(), store.clone());

    let ada = engine.join_player("ada").expect("join ada");
    let brin = engine.join_player("brin").expect("join brin");
    engine.claim_room(ada, "energy").expect("claim energy");
    engine.claim_room(brin, "water").expect("claim water");
    engine.set_ready(ada).expect("ready ada");
    engine.set_ready(brin).expect("ready brin");

    results.push(check(
        "game_starts_at_two_ready",
        engine.poll_snapshot().has_started,
        "countdown armed",
    ));

    engine
        .submit_action(ada, "energy", "connect_cables", &json!({"correct": true}))
        .expect("energy action");
    let snap = engine.poll_snapshot();
    results.push(check(
        "energy_unlocks_water",
        snap.room(RoomId::Energy).map(|r| r.is_completed) == Some(true)
            && snap.room(RoomId::Water).map(|r| r.is_locked) == Some(false),
        "cascade reached the water room",
    ));

    engine
        .submit_action(brin, "water", "validate_chemical", &json!({"ph": 7.1, "o2": 7.9}))
        .expect("chemical");
    engine
        .submit_action(brin, "water", "complete_water", &json!({}))
        .expect("complete water");
    engine.claim_room(brin, "air").expect("claim air");
    engine
        .submit_action(brin, "air", "identify_pollution_source", &json!({"correct": true}))
        .expect("air action");

    let redirected = sink
        .take()
        .iter()
        .any(|e| matches!(e, GameEvent::RedirectToFinal));
    results.push(check(
        "air_broadcasts_redirect",
        redirected,
        "all players sent to the final code",
    ));

    engine.claim_room(ada, "flora").expect("claim flora");
    engine
        .submit_action(ada, "flora", "select_plant", &json!({"plant": "oxygen_plant"}))
        .expect("flora action");

    let snap = engine.poll_snapshot();
    results.push(check(
        "all_rooms_completed",
        snap.rooms.iter().all(|r| r.is_completed),
        "four of four rooms solved",
    ));
    // Purifying the biosphere drags pollution/CO2 under the victory floor,
    // so the room path records a defeat and the code is the way out.
    results.push(check(
        "room_path_records_result",
        snap.result == Some(GameResult::Defeat),
        format!("result={:?}", snap.result),
    ));

    let outcome = engine
        .validate_final_code(ada, "EPSI workshops 2025")
        .expect("code attempt");
    results.push(check(
        "secret_code_overrides_defeat",
        outcome.matched && engine.poll_snapshot().result == Some(GameResult::Victory),
        "victory forced by the code",
    ));

    results.push(check(
        "state_persisted",
        store.saved_len().unwrap_or(0) > 0,
        "store holds a materialized record",
    ));

    results
}

// ── 4. Victory paths and reset ──────────────────────────────────────────

fn validate_victory_paths() -> Vec<TestResult> {
    println!("--- Victory Paths & Reset ---");
    let mut results = Vec::new();

    // Timer expiry with incomplete rooms is a defeat.
    let engine = GameEngine::new(GameConfig::headless(), Arc::new(RecordingSink::new()));
    let ada = engine.join_player("ada").expect("join");
    let brin = engine.join_player("brin").expect("join");
    engine.claim_room(ada, "energy").expect("claim");
    engine.claim_room(brin, "water").expect("claim");
    engine.set_ready(ada).expect("ready");
    engine.set_ready(brin).expect("ready");
    engine.handle_deadline(0);
    results.push(check(
        "timer_expiry_defeat",
        engine.poll_snapshot().result == Some(GameResult::Defeat),
        "rooms incomplete at the deadline",
    ));

    // Reset wipes everything and orphans the old countdown generation.
    engine.reset_game();
    engine.handle_deadline(0); // stale generation, must no-op
    let snap = engine.poll_snapshot();
    results.push(check(
        "reset_restores_initial_world",
        snap.players.is_empty()
            && !snap.has_started
            && snap.result.is_none()
            && snap.metrics["energy_level"] == 50.0
            && snap.metrics["water_pollution"] == 30.0,
        "players cleared, metrics and session fresh, stale timer ignored",
    ));

    // A player id from before the reset is no longer valid.
    results.push(check(
        "reset_invalidates_identities",
        engine.set_ready(PlayerId(0)).is_err() || snap.players.is_empty(),
        "pre-reset player cannot act",
    ));

    results
}
