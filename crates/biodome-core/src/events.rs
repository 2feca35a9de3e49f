//! Outbound notifications.
//!
//! State transitions return these as plain values; the engine delivers
//! them to an [`EventSink`] only after the state lock is released, so the
//! state machine stays testable without a live transport.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use biodome_logic::rooms::RoomId;

use crate::players::PlayerId;

/// A notification for connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Feedback for the acting player.
    Feedback { player: PlayerId, message: String },
    /// A room's puzzle was solved; carries the announcement and, for the
    /// first three rooms, a secret-code hint.
    PuzzleCompleted {
        room: RoomId,
        announcement: String,
        hint: Option<String>,
    },
    /// Broadcast to every player: head to the final-code console.
    RedirectToFinal,
    /// Broadcast to every player. `validator` names the player who entered
    /// the secret code; `None` for a victory evaluated from room state.
    VictoryAchieved { validator: Option<String> },
    /// The game was fully reset; clients must re-authenticate.
    GameReset,
}

/// Transport seam: the engine calls this, it does not implement delivery.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &GameEvent);
}

/// Drops every event. For headless runs.
pub struct NullSink;

impl EventSink for NullSink {
    fn deliver(&self, _event: &GameEvent) {}
}

/// Records events for inspection in tests and the sim harness.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<GameEvent> {
        let mut guard = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *guard)
    }
}

impl EventSink for RecordingSink {
    fn deliver(&self, event: &GameEvent) {
        let mut guard = self
            .events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(event.clone());
    }
}
