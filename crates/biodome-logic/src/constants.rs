//! Game constants — initial metric values, completion thresholds, session rules.
//!
//! These are plain constants with no runtime dependency. Both the stateful
//! engine and the headless harness read them.

/// Metric values established at game init and restored by a full reset.
pub mod initial {
    pub const ENERGY_LEVEL: f32 = 50.0;
    pub const WATER_POLLUTION: f32 = 30.0;
    pub const AIR_CO2: f32 = 40.0;
    pub const AIR_O2: f32 = 60.0;
    pub const FLORA_HEALTH: f32 = 60.0;
}

/// Every metric is clamped to this range after any adjustment.
pub const METRIC_MIN: f32 = 0.0;
pub const METRIC_MAX: f32 = 100.0;

/// Energy room completes once the energy level reaches this value.
pub const ENERGY_COMPLETE_MIN: f32 = 60.0;

/// Water room completes only while pollution is at or below this value.
pub const WATER_COMPLETE_MAX_POLLUTION: f32 = 10.0;

/// Air room completes once CO2 is at or below this value...
pub const AIR_COMPLETE_MAX_CO2: f32 = 30.0;
/// ...and O2 is at or above this one.
pub const AIR_COMPLETE_MIN_O2: f32 = 70.0;

/// Flora room completes once flora health reaches this value.
pub const FLORA_COMPLETE_MIN: f32 = 80.0;

/// Chemical balance targets for the water validation step.
pub const PH_TARGET: f32 = 7.0;
/// Dissolved oxygen target in mg/L.
pub const O2_TARGET: f32 = 8.0;
/// A probe reading counts as correct within this distance of its target.
pub const CHEMICAL_TOLERANCE: f32 = 0.5;

/// Victory on timer expiry requires every metric at or above this floor.
pub const VICTORY_METRIC_FLOOR: f32 = 50.0;

/// Session rules.
pub const MAX_PLAYERS: usize = 4;
/// Ready players (with a room) needed before the countdown starts.
pub const READY_PLAYERS_TO_START: usize = 2;
/// Countdown length in seconds once the game starts.
pub const ROUND_DURATION_SECS: u64 = 600;

/// The final secret code. Matched after trimming, ignoring ASCII case.
pub const FINAL_CODE: &str = "EPSI WORKSHOPS 2025";
