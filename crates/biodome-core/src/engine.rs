//! Game engine — the single serialization boundary around shared state.
//!
//! Every public operation takes the state lock once, applies the pure
//! transition from `biodome-logic`, and only after releasing the lock
//! persists the materialized record and delivers events. The countdown is
//! a background thread keyed by the session generation; a reset bumps the
//! generation and any stale countdown exits without writing a result.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use biodome_logic::metrics::MetricSet;
use biodome_logic::puzzles::{self, PuzzleAction};
use biodome_logic::rooms::RoomId;
use biodome_logic::victory::{self, GameResult};

use crate::board::RoomBoard;
use crate::config::GameConfig;
use crate::error::{ActionError, JoinError, StoreError};
use crate::events::{EventSink, GameEvent};
use crate::persistence::{PersistedGame, StateStore, SAVE_VERSION};
use crate::players::{PlayerId, Roster};
use crate::session::Session;
use crate::snapshot::Snapshot;

/// Response to a puzzle action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub feedback: String,
    pub completed: bool,
}

/// Response to a final-code attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeOutcome {
    pub matched: bool,
    pub message: String,
}

struct SharedState {
    roster: Roster,
    board: RoomBoard,
    metrics: MetricSet,
    session: Session,
}

impl SharedState {
    fn fresh() -> Self {
        Self {
            roster: Roster::new(),
            board: RoomBoard::new(),
            metrics: MetricSet::initial(),
            session: Session::new(),
        }
    }

    fn record(&self, now: Instant) -> PersistedGame {
        let remaining_secs = self
            .session
            .deadline
            .map(|_| self.session.remaining_secs(now));
        PersistedGame {
            version: SAVE_VERSION,
            roster: self.roster.clone(),
            board: self.board.clone(),
            metrics: self.metrics,
            started: self.session.started,
            remaining_secs,
            result: self.session.result,
            code_validator: self.session.code_validator,
        }
    }
}

/// Handle to the game. Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct GameEngine {
    state: Arc<Mutex<SharedState>>,
    sink: Arc<dyn EventSink>,
    store: Option<Arc<dyn StateStore>>,
    config: GameConfig,
}

impl GameEngine {
    pub fn new(config: GameConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::fresh())),
            sink,
            store: None,
            config,
        }
    }

    pub fn with_store(
        config: GameConfig,
        sink: Arc<dyn EventSink>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::fresh())),
            sink,
            store: Some(store),
            config,
        }
    }

    /// Rebuild an engine from the store's persisted record, if one exists.
    ///
    /// A persisted deadline is re-anchored as "now + remaining"; a game
    /// that was mid-countdown resumes it.
    pub fn restore(
        config: GameConfig,
        sink: Arc<dyn EventSink>,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, StoreError> {
        let engine = Self::with_store(config, sink, store.clone());
        let Some(record) = store.load()? else {
            return Ok(engine);
        };
        let now = Instant::now();
        let mut resume = None;
        {
            let mut st = engine.lock();
            let mut session = Session::new();
            session.started = record.started;
            session.result = record.result;
            session.code_validator = record.code_validator;
            if let Some(secs) = record.remaining_secs {
                session.deadline = Some(now + Duration::from_secs(secs));
            }
            if session.started && session.result.is_none() {
                if let Some(deadline) = session.deadline {
                    resume = Some((session.generation, deadline));
                }
            }
            st.roster = record.roster;
            st.board = record.board;
            st.metrics = record.metrics;
            st.session = session;
        }
        if let Some((generation, deadline)) = resume {
            log::info!("Restored a running game, countdown resumes");
            if engine.config.spawn_countdown {
                engine.spawn_countdown(generation, deadline);
            }
        }
        Ok(engine)
    }

    // ── Player lifecycle ────────────────────────────────────────────────

    /// Claim a seat under `name`.
    pub fn join_player(&self, name: &str) -> Result<PlayerId, JoinError> {
        let (id, record) = {
            let mut st = self.lock();
            let id = st.roster.join(name, self.config.max_players)?;
            (id, st.record(Instant::now()))
        };
        log::info!("Player joined: {} ({})", name.trim(), id);
        self.persist(record);
        Ok(id)
    }

    /// Remove a player, releasing any room they occupy. Idempotent.
    pub fn leave_player(&self, player: PlayerId) -> bool {
        let (removed, record) = {
            let mut st = self.lock();
            let removed = st.roster.remove(player);
            st.board.release_any(player);
            (removed, st.record(Instant::now()))
        };
        match removed {
            Some(p) => {
                log::info!("Player left: {} ({})", p.name, player);
                self.persist(record);
                true
            }
            None => false,
        }
    }

    // ── Rooms and readiness ─────────────────────────────────────────────

    /// Claim `room_name` for `player`. Claiming a new room releases the
    /// previous one and clears readiness.
    pub fn claim_room(&self, player: PlayerId, room_name: &str) -> Result<(), ActionError> {
        let room = RoomId::by_name(room_name)
            .ok_or_else(|| ActionError::UnknownRoom(room_name.to_string()))?;
        let record = {
            let mut st = self.lock();
            if st.roster.get(player).is_none() {
                return Err(ActionError::UnknownPlayer);
            }
            match st.board.claim(room, player) {
                Ok(_released) => {}
                Err(occupant_id) => {
                    let occupant = st
                        .roster
                        .name_of(occupant_id)
                        .unwrap_or("another player")
                        .to_string();
                    return Err(ActionError::RoomOccupied { occupant });
                }
            }
            if let Some(p) = st.roster.get_mut(player) {
                p.room = Some(room);
                p.ready = false;
            }
            st.record(Instant::now())
        };
        log::info!("{} claimed the {} room", player, room);
        self.persist(record);
        Ok(())
    }

    /// Mark `player` ready. The first time the ready count reaches the
    /// threshold, the game starts and exactly one countdown is spawned.
    pub fn set_ready(&self, player: PlayerId) -> Result<(), ActionError> {
        let now = Instant::now();
        let (started, record) = {
            let mut st = self.lock();
            let Some(p) = st.roster.get_mut(player) else {
                return Err(ActionError::UnknownPlayer);
            };
            if p.room.is_none() {
                return Err(ActionError::NoRoomSelected);
            }
            p.ready = true;
            let mut started = None;
            if st.roster.ready_count() >= self.config.ready_to_start {
                // Session::start is a no-op once started, so a later ready
                // cannot spawn a second countdown.
                if let Some(deadline) = st.session.start(now, self.config.round_duration) {
                    started = Some((st.session.generation, deadline));
                }
            }
            (started, st.record(now))
        };
        if let Some((generation, deadline)) = started {
            log::info!(
                "Game started, {}s on the clock",
                self.config.round_duration.as_secs()
            );
            if self.config.spawn_countdown {
                self.spawn_countdown(generation, deadline);
            }
        }
        self.persist(record);
        Ok(())
    }

    // ── Puzzle actions ──────────────────────────────────────────────────

    /// The single entry point for all puzzle interactions.
    pub fn submit_action(
        &self,
        player: PlayerId,
        room_name: &str,
        action_name: &str,
        payload: &Value,
    ) -> Result<ActionResponse, ActionError> {
        let room = RoomId::by_name(room_name)
            .ok_or_else(|| ActionError::UnknownRoom(room_name.to_string()))?;
        // Malformed payloads reject before any room-specific logic runs.
        let action = PuzzleAction::parse(action_name, payload)
            .map_err(|e| ActionError::MalformedPayload(e.to_string()))?;

        let mut events = Vec::new();
        let (response, record) = {
            let mut st = self.lock();
            if st.roster.get(player).is_none() {
                return Err(ActionError::UnknownPlayer);
            }
            let room_state = *st.board.room(room);
            if room_state.occupant != Some(player) {
                return Err(ActionError::NotOccupant);
            }
            if !st.board.is_actionable(room, player, st.session.started) {
                return Err(ActionError::RoomLocked);
            }

            let outcome = puzzles::apply_action(room, &action, &mut st.metrics)
                .map_err(|e| ActionError::WrongRoomAction {
                    room: e.room,
                    action: e.action,
                })?;

            events.push(GameEvent::Feedback {
                player,
                message: outcome.feedback.clone(),
            });

            let fresh_completion = outcome.completes_room && !room_state.completed;
            if fresh_completion {
                let unlocked = st.board.mark_completed(room);
                log::info!("Room {} completed", room);
                if let Some(next) = unlocked {
                    log::info!("Room {} unlocked", next);
                }
                events.push(GameEvent::PuzzleCompleted {
                    room,
                    announcement: puzzles::completion_announcement(room).to_string(),
                    hint: puzzles::completion_hint(room).map(String::from),
                });
                if outcome.redirect_all {
                    events.push(GameEvent::RedirectToFinal);
                }
                // A completion that leaves every room done is evaluated
                // immediately instead of waiting for the timer.
                if st.board.all_completed() {
                    self.evaluate_now(&mut st, &mut events);
                }
            }

            let response = ActionResponse {
                feedback: outcome.feedback,
                completed: outcome.completes_room,
            };
            (response, st.record(Instant::now()))
        };
        self.persist(record);
        self.deliver(events);
        Ok(response)
    }

    // ── Victory paths ───────────────────────────────────────────────────

    /// The secret-code shortcut. A match forces victory regardless of room
    /// or metric state; a mismatch changes nothing.
    pub fn validate_final_code(
        &self,
        player: PlayerId,
        code: &str,
    ) -> Result<CodeOutcome, ActionError> {
        if !victory::code_matches(code) {
            // Identity still has to be real before we report anything.
            if self.lock().roster.get(player).is_none() {
                return Err(ActionError::UnknownPlayer);
            }
            return Ok(CodeOutcome {
                matched: false,
                message: "Incorrect code.".to_string(),
            });
        }
        let mut events = Vec::new();
        let (name, record) = {
            let mut st = self.lock();
            let Some(name) = st.roster.name_of(player).map(String::from) else {
                return Err(ActionError::UnknownPlayer);
            };
            st.session.force_victory(player);
            events.push(GameEvent::VictoryAchieved {
                validator: Some(name.clone()),
            });
            (name, st.record(Instant::now()))
        };
        log::info!("{} validated the final code, victory", name);
        self.persist(record);
        self.deliver(events);
        Ok(CodeOutcome {
            matched: true,
            message: format!("{name} found the secret code!"),
        })
    }

    /// Called when the countdown for `generation` expires. Stale
    /// generations and already-decided sessions are ignored.
    pub fn handle_deadline(&self, generation: u64) {
        let mut events = Vec::new();
        let record = {
            let mut st = self.lock();
            if st.session.generation != generation {
                log::debug!("Stale countdown (generation {generation}) ignored");
                return;
            }
            if !st.session.started || st.session.result.is_some() {
                return;
            }
            self.evaluate_now(&mut st, &mut events);
            st.record(Instant::now())
        };
        self.persist(record);
        self.deliver(events);
    }

    /// Evaluate victory/defeat from current room and metric state and
    /// record it (write-once). Caller holds the lock.
    fn evaluate_now(&self, st: &mut SharedState, events: &mut Vec<GameEvent>) {
        let result = victory::evaluate(st.board.all_completed(), &st.metrics);
        if st.session.record_result(result) {
            log::info!("Game over: {result:?}");
            if result == GameResult::Victory {
                events.push(GameEvent::VictoryAchieved { validator: None });
            }
        }
    }

    // ── Reset and reads ─────────────────────────────────────────────────

    /// Full reset: players removed, rooms and metrics restored to the
    /// initial topology, session cleared under a new generation.
    pub fn reset_game(&self) {
        let record = {
            let mut st = self.lock();
            st.roster.clear();
            st.board = RoomBoard::new();
            st.metrics = MetricSet::initial();
            st.session.reset();
            st.record(Instant::now())
        };
        log::info!("Game reset");
        self.persist(record);
        self.deliver(vec![GameEvent::GameReset]);
    }

    /// One consistent read of the full game.
    pub fn poll_snapshot(&self) -> Snapshot {
        let now = Instant::now();
        let st = self.lock();
        Snapshot::build(
            &st.roster,
            &st.board,
            &st.metrics,
            st.session.started,
            st.session.remaining_secs(now),
            st.session.result,
        )
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn spawn_countdown(&self, generation: u64, deadline: Instant) {
        let engine = self.clone();
        thread::spawn(move || {
            loop {
                if engine.countdown_stale(generation) {
                    return;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep((deadline - now).min(Duration::from_secs(1)));
            }
            engine.handle_deadline(generation);
        });
    }

    fn countdown_stale(&self, generation: u64) -> bool {
        let st = self.lock();
        st.session.generation != generation || st.session.result.is_some()
    }

    fn persist(&self, record: PersistedGame) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&record) {
                log::error!("State store save failed: {e}");
            }
        }
    }

    fn deliver(&self, events: Vec<GameEvent>) {
        for event in &events {
            self.sink.deliver(event);
        }
    }
}
