//! Game session — start flag, deadline, terminal result, generation counter.
//!
//! `started` flips false→true exactly once per session. The result is
//! written once per session through [`Session::record_result`]; the
//! secret-code path uses [`Session::force_victory`], the documented
//! override that wins any race with the timer. A full reset bumps the
//! generation so a stale countdown observes it and no-ops.

use std::time::{Duration, Instant};

use biodome_logic::victory::GameResult;

use crate::players::PlayerId;

#[derive(Debug, Clone)]
pub struct Session {
    pub started: bool,
    pub deadline: Option<Instant>,
    pub result: Option<GameResult>,
    pub code_validator: Option<PlayerId>,
    /// Incremented on every reset; countdown tasks carry the generation
    /// they were spawned under and must re-check it before writing.
    pub generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            started: false,
            deadline: None,
            result: None,
            code_validator: None,
            generation: 0,
        }
    }

    /// Fire the start transition. Returns the deadline on the first call;
    /// later calls are ignored (the deadline is immutable until reset).
    pub fn start(&mut self, now: Instant, duration: Duration) -> Option<Instant> {
        if self.started {
            return None;
        }
        self.started = true;
        let deadline = now + duration;
        self.deadline = Some(deadline);
        Some(deadline)
    }

    /// Whole seconds left on the countdown; zero before start or past the
    /// deadline.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now).as_secs(),
            None => 0,
        }
    }

    /// Record the timer-path result. Write-once: returns false if a result
    /// already exists.
    pub fn record_result(&mut self, result: GameResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        true
    }

    /// The secret-code override: forces victory regardless of any prior
    /// result and remembers who validated the code.
    pub fn force_victory(&mut self, validator: PlayerId) {
        self.result = Some(GameResult::Victory);
        self.code_validator = Some(validator);
    }

    /// Return to a fresh not-started session under a new generation.
    pub fn reset(&mut self) {
        self.started = false;
        self.deadline = None;
        self.result = None;
        self.code_validator = None;
        self.generation += 1;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
