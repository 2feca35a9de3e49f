//! End-of-game evaluation and the secret-code shortcut.

use serde::{Deserialize, Serialize};

use crate::constants::{FINAL_CODE, VICTORY_METRIC_FLOOR};
use crate::metrics::MetricSet;

/// Terminal outcome of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Victory,
    Defeat,
}

/// Evaluate the timer-path victory condition.
///
/// Victory requires every room completed and every metric at or above the
/// floor; anything else is a defeat. The secret-code path bypasses this
/// entirely.
pub fn evaluate(all_rooms_completed: bool, metrics: &MetricSet) -> GameResult {
    if all_rooms_completed && metrics.all_at_least(VICTORY_METRIC_FLOOR) {
        GameResult::Victory
    } else {
        GameResult::Defeat
    }
}

/// Whether `submitted` matches the final secret code.
///
/// Comparison trims surrounding whitespace and ignores ASCII case.
pub fn code_matches(submitted: &str) -> bool {
    submitted.trim().eq_ignore_ascii_case(FINAL_CODE)
}
