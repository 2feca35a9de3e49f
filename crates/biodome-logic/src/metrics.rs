//! Shared environmental metrics — a fixed five-value set with clamped mutation.
//!
//! The set is closed: no metric is created or destroyed during play, so an
//! "unknown metric" is unrepresentable. String names exist only at the
//! persistence and snapshot seams.

use serde::{Deserialize, Serialize};

use crate::constants::{initial, METRIC_MAX, METRIC_MIN};

/// Identity of one environmental metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    EnergyLevel,
    WaterPollution,
    AirCo2,
    AirO2,
    FloraHealth,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::EnergyLevel,
        Metric::WaterPollution,
        Metric::AirCo2,
        Metric::AirO2,
        Metric::FloraHealth,
    ];

    /// Stable wire/storage name for this metric.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::EnergyLevel => "energy_level",
            Metric::WaterPollution => "water_pollution",
            Metric::AirCo2 => "air_co2",
            Metric::AirO2 => "air_o2",
            Metric::FloraHealth => "flora_health",
        }
    }

    pub fn by_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

/// Current values of all five metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub energy_level: f32,
    pub water_pollution: f32,
    pub air_co2: f32,
    pub air_o2: f32,
    pub flora_health: f32,
}

impl MetricSet {
    /// The fixed starting values (also the post-reset values).
    pub fn initial() -> Self {
        Self {
            energy_level: initial::ENERGY_LEVEL,
            water_pollution: initial::WATER_POLLUTION,
            air_co2: initial::AIR_CO2,
            air_o2: initial::AIR_O2,
            flora_health: initial::FLORA_HEALTH,
        }
    }

    pub fn get(&self, metric: Metric) -> f32 {
        match metric {
            Metric::EnergyLevel => self.energy_level,
            Metric::WaterPollution => self.water_pollution,
            Metric::AirCo2 => self.air_co2,
            Metric::AirO2 => self.air_o2,
            Metric::FloraHealth => self.flora_health,
        }
    }

    /// Apply `delta` to `metric`, clamped to the valid range.
    ///
    /// Returns the new value.
    pub fn adjust(&mut self, metric: Metric, delta: f32) -> f32 {
        let slot = match metric {
            Metric::EnergyLevel => &mut self.energy_level,
            Metric::WaterPollution => &mut self.water_pollution,
            Metric::AirCo2 => &mut self.air_co2,
            Metric::AirO2 => &mut self.air_o2,
            Metric::FloraHealth => &mut self.flora_health,
        };
        *slot = (*slot + delta).clamp(METRIC_MIN, METRIC_MAX);
        *slot
    }

    /// All metrics with their current values, in declaration order.
    pub fn all(&self) -> [(Metric, f32); 5] {
        Metric::ALL.map(|m| (m, self.get(m)))
    }

    /// True if every metric is at or above `floor`.
    pub fn all_at_least(&self, floor: f32) -> bool {
        Metric::ALL.iter().all(|&m| self.get(m) >= floor)
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self::initial()
    }
}
