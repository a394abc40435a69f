use serde::{Deserialize, Serialize};

use crate::model::ItemKind;

/// Fixed per-tick constants of the simulation. Missing JSON fields fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Progress added to a belt item every tick.
    pub belt_speed: f64,
    pub machine_process_ticks: u32,
    /// Energy charged when an idle machine starts a cycle.
    pub machine_energy_cost: f64,
    pub machine_output: ItemKind,
    pub crane_cooldown_ticks: u32,
    pub generator_energy_per_tick: f64,
    pub belt_energy_per_tick: f64,
    pub passive_credits_per_tick: f64,
    pub starting_credits: f64,
    pub starting_energy: f64,
    pub starting_iron: u32,
    pub starting_crane_arms: u32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            belt_speed: 0.1,
            machine_process_ticks: 40,
            machine_energy_cost: 0.5,
            machine_output: ItemKind::Iron,
            crane_cooldown_ticks: 10,
            generator_energy_per_tick: 0.1,
            belt_energy_per_tick: 0.01,
            passive_credits_per_tick: 0.01,
            starting_credits: 0.0,
            starting_energy: 10.0,
            starting_iron: 50,
            starting_crane_arms: 5,
        }
    }
}
