//! Per-room puzzle handlers — pure functions over the metric set.
//!
//! Each handler validates an already-parsed action against the metrics,
//! applies its clamped deltas, and reports feedback plus whether the room's
//! completion threshold is now met. Marking the room completed, cascading
//! unlocks, and broadcasting events are the caller's job.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    AIR_COMPLETE_MAX_CO2, AIR_COMPLETE_MIN_O2, CHEMICAL_TOLERANCE, ENERGY_COMPLETE_MIN,
    FLORA_COMPLETE_MIN, O2_TARGET, PH_TARGET, WATER_COMPLETE_MAX_POLLUTION,
};
use crate::metrics::{Metric, MetricSet};
use crate::rooms::RoomId;

/// A puzzle action with its payload, as decoded from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PuzzleAction {
    ConnectCables { correct: bool },
    SortWaste { correct: bool },
    AdjustPh { value: f32 },
    AdjustO2 { value: f32 },
    ValidateChemical { ph: f32, o2: f32 },
    CompleteWater,
    IdentifyPollutionSource { correct: bool },
    SelectPlant { plant: String },
}

impl PuzzleAction {
    /// Decode an action from its wire name and JSON payload.
    ///
    /// Missing or ill-typed fields (and unknown action names) reject here,
    /// before any room-specific logic runs. Extra payload fields are
    /// tolerated.
    pub fn parse(name: &str, payload: &Value) -> Result<Self, serde_json::Error> {
        let mut tagged = serde_json::Map::new();
        tagged.insert("action".to_string(), Value::String(name.to_string()));
        if let Value::Object(fields) = payload {
            for (key, value) in fields {
                tagged.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(Value::Object(tagged))
    }

    /// Wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            PuzzleAction::ConnectCables { .. } => "connect_cables",
            PuzzleAction::SortWaste { .. } => "sort_waste",
            PuzzleAction::AdjustPh { .. } => "adjust_ph",
            PuzzleAction::AdjustO2 { .. } => "adjust_o2",
            PuzzleAction::ValidateChemical { .. } => "validate_chemical",
            PuzzleAction::CompleteWater => "complete_water",
            PuzzleAction::IdentifyPollutionSource { .. } => "identify_pollution_source",
            PuzzleAction::SelectPlant { .. } => "select_plant",
        }
    }
}

/// Result of applying one puzzle action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Human-readable feedback for the acting player.
    pub feedback: String,
    /// The room's completion threshold is met after this action.
    pub completes_room: bool,
    /// Completion additionally redirects every player to the final code
    /// (Air room only).
    pub redirect_all: bool,
}

impl ActionOutcome {
    fn feedback_only(message: impl Into<String>) -> Self {
        Self {
            feedback: message.into(),
            completes_room: false,
            redirect_all: false,
        }
    }
}

/// The action exists but belongs to a different room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongRoom {
    pub room: RoomId,
    pub action: &'static str,
}

/// Apply `action` inside `room`, mutating `metrics` (always clamped).
///
/// Callers must have already checked occupancy and lock state; this function
/// only encodes the puzzle rules themselves.
pub fn apply_action(
    room: RoomId,
    action: &PuzzleAction,
    metrics: &mut MetricSet,
) -> Result<ActionOutcome, WrongRoom> {
    match (room, action) {
        (RoomId::Energy, PuzzleAction::ConnectCables { correct }) => {
            Ok(connect_cables(*correct, metrics))
        }
        (RoomId::Water, PuzzleAction::SortWaste { correct }) => Ok(sort_waste(*correct, metrics)),
        (RoomId::Water, PuzzleAction::AdjustPh { value }) => {
            Ok(ActionOutcome::feedback_only(format!("pH set to {value:.1}")))
        }
        (RoomId::Water, PuzzleAction::AdjustO2 { value }) => Ok(ActionOutcome::feedback_only(
            format!("O2 set to {value:.1} mg/L"),
        )),
        (RoomId::Water, PuzzleAction::ValidateChemical { ph, o2 }) => {
            Ok(validate_chemical(*ph, *o2, metrics))
        }
        (RoomId::Water, PuzzleAction::CompleteWater) => Ok(complete_water(metrics)),
        (RoomId::Air, PuzzleAction::IdentifyPollutionSource { correct }) => {
            Ok(identify_pollution_source(*correct, metrics))
        }
        (RoomId::Flora, PuzzleAction::SelectPlant { plant }) => Ok(select_plant(plant, metrics)),
        _ => Err(WrongRoom {
            room,
            action: action.name(),
        }),
    }
}

fn connect_cables(correct: bool, metrics: &mut MetricSet) -> ActionOutcome {
    if correct {
        let energy = metrics.adjust(Metric::EnergyLevel, 10.0);
        metrics.adjust(Metric::AirCo2, -5.0);
        ActionOutcome {
            feedback: "Power grid stable!".to_string(),
            completes_room: energy >= ENERGY_COMPLETE_MIN,
            redirect_all: false,
        }
    } else {
        metrics.adjust(Metric::EnergyLevel, -5.0);
        ActionOutcome::feedback_only("Incorrect connection.")
    }
}

fn sort_waste(correct: bool, metrics: &mut MetricSet) -> ActionOutcome {
    if correct {
        metrics.adjust(Metric::WaterPollution, -5.0);
        ActionOutcome::feedback_only("Good sorting! Purity increased.")
    } else {
        metrics.adjust(Metric::WaterPollution, 3.0);
        ActionOutcome::feedback_only("Wrong bin. Pollution increased.")
    }
}

fn validate_chemical(ph: f32, o2: f32, metrics: &mut MetricSet) -> ActionOutcome {
    let ph_ok = (ph - PH_TARGET).abs() < CHEMICAL_TOLERANCE;
    let o2_ok = (o2 - O2_TARGET).abs() < CHEMICAL_TOLERANCE;
    if ph_ok && o2_ok {
        metrics.adjust(Metric::WaterPollution, -20.0);
        metrics.adjust(Metric::FloraHealth, 10.0);
        metrics.adjust(Metric::AirO2, 5.0);
        ActionOutcome::feedback_only("Chemical balance achieved!")
    } else {
        metrics.adjust(Metric::WaterPollution, 5.0);
        let mut message = String::from("Imbalance:");
        if !ph_ok {
            message.push_str(" pH incorrect");
        }
        if !o2_ok {
            message.push_str(" O2 incorrect");
        }
        ActionOutcome::feedback_only(message)
    }
}

fn complete_water(metrics: &mut MetricSet) -> ActionOutcome {
    if metrics.get(Metric::WaterPollution) <= WATER_COMPLETE_MAX_POLLUTION {
        ActionOutcome {
            feedback: "The water is purified!".to_string(),
            completes_room: true,
            redirect_all: false,
        }
    } else {
        ActionOutcome::feedback_only("Pollution still too high.")
    }
}

fn identify_pollution_source(correct: bool, metrics: &mut MetricSet) -> ActionOutcome {
    if !correct {
        // No penalty for a wrong scan, but never a silent drop either.
        return ActionOutcome::feedback_only("Wrong source. Keep scanning.");
    }
    let co2 = metrics.adjust(Metric::AirCo2, -30.0);
    let o2 = metrics.adjust(Metric::AirO2, 20.0);
    metrics.adjust(Metric::FloraHealth, 15.0);
    let completes = co2 <= AIR_COMPLETE_MAX_CO2 && o2 >= AIR_COMPLETE_MIN_O2;
    ActionOutcome {
        feedback: "Source identified! Filters activated.".to_string(),
        completes_room: completes,
        redirect_all: completes,
    }
}

fn select_plant(plant: &str, metrics: &mut MetricSet) -> ActionOutcome {
    match plant {
        "oxygen_plant" | "purifying_plant" => {
            let flora = metrics.adjust(Metric::FloraHealth, 10.0);
            metrics.adjust(Metric::AirO2, 5.0);
            ActionOutcome {
                feedback: format!("Plant {plant} planted!"),
                completes_room: flora >= FLORA_COMPLETE_MIN,
                redirect_all: false,
            }
        }
        _ => ActionOutcome::feedback_only("That plant does not belong in the biosphere."),
    }
}

/// System announcement posted when a room's puzzle is solved.
pub fn completion_announcement(room: RoomId) -> &'static str {
    match room {
        RoomId::Energy => "The Energy room puzzle is solved! The power grid is stable again.",
        RoomId::Water => "The Water room puzzle is solved! The water is purified.",
        RoomId::Air => "The Air room puzzle is solved! Air quality is restored.",
        RoomId::Flora => "The Flora room puzzle is solved! The biosphere is blooming.",
    }
}

/// Secret-code hint revealed by solving the room, if it carries one.
pub fn completion_hint(room: RoomId) -> Option<&'static str> {
    match room {
        RoomId::Energy => Some(
            "Hint 1: at EPSI, a room is more than a classroom - it is where people \
             learn, build, and collaborate.",
        ),
        RoomId::Water => Some(
            "Hint 2: every year, these innovation workshops gather students around \
             hands-on projects.",
        ),
        RoomId::Air => Some("Hint 3: it all comes together in one symbolic year - 2025."),
        RoomId::Flora => None,
    }
}
