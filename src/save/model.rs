use serde::{Deserialize, Serialize};

use crate::model::{Direction, EntityState, Inventory};

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveResources {
    pub credits: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntity {
    pub id: u64,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub direction: Direction,
    pub state: EntityState,
}

/// `version` is required; every other field falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    #[serde(default)]
    pub resources: SaveResources,
    #[serde(default)]
    pub crane_arms: u32,
    #[serde(default)]
    pub player_items: Inventory,
    #[serde(default)]
    pub tick_index: u64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub ambient_buffer: u32,
    #[serde(default)]
    pub build_direction: Direction,
    #[serde(default = "default_next_id")]
    pub next_id: u64,
    #[serde(default)]
    pub entities: Vec<SaveEntity>,
}

fn default_next_id() -> u64 {
    1
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            resources: SaveResources::default(),
            crane_arms: 0,
            player_items: Inventory::default(),
            tick_index: 0,
            paused: false,
            ambient_buffer: 0,
            build_direction: Direction::default(),
            next_id: default_next_id(),
            entities: Vec::new(),
        }
    }
}
