use bevy::prelude::*;
use prompt_factory::{
    Entity, EntityKind, GRID_HEIGHT, GRID_WIDTH, ItemKind, Simulation, TileCoord,
};

#[derive(Resource, Debug, Clone)]
pub struct RuntimeConfig {
    pub cell_size: f32,
    pub cell_gap: f32,
    pub tick_hz: f32,
    /// Credits granted by the debug "grade prompt" hotkey.
    pub grade_reward: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cell_size: 13.0,
            cell_gap: 1.0,
            tick_hz: 20.0,
            grade_reward: 10.0,
        }
    }
}

#[derive(Resource, Debug)]
pub struct SessionState {
    pub simulation: Simulation,
    pub tick_timer: Timer,
    /// The single in-memory snapshot, as an opaque base64 string.
    pub snapshot: Option<String>,
    pub status: Option<String>,
}

#[derive(Resource, Debug, Default)]
pub struct HoveredCell(pub Option<TileCoord>);

#[derive(Resource, Debug, Clone, Copy)]
pub struct GridLayout {
    pub origin: Vec2,
    pub cell_size: f32,
    pub cell_gap: f32,
}

impl GridLayout {
    pub fn new(cell_size: f32, cell_gap: f32) -> Self {
        let span = |cells: i32| cells as f32 * cell_size + (cells - 1).max(0) as f32 * cell_gap;

        Self {
            origin: Vec2::new(-span(GRID_WIDTH) * 0.5, -span(GRID_HEIGHT) * 0.5),
            cell_size,
            cell_gap,
        }
    }

    /// Row 0 is drawn at the top of the screen.
    pub fn cell_center(&self, coord: TileCoord) -> Vec3 {
        let stride = self.cell_size + self.cell_gap;
        let row = GRID_HEIGHT - 1 - coord.y;
        let x = self.origin.x + coord.x as f32 * stride + self.cell_size * 0.5;
        let y = self.origin.y + row as f32 * stride + self.cell_size * 0.5;
        Vec3::new(x, y, 0.0)
    }

    pub fn world_to_coord(&self, world: Vec2) -> Option<TileCoord> {
        let stride = self.cell_size + self.cell_gap;
        let local = world - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let x = (local.x / stride).floor() as i32;
        let row = (local.y / stride).floor() as i32;
        if x >= GRID_WIDTH || row >= GRID_HEIGHT {
            return None;
        }

        let x_in_cell = local.x - x as f32 * stride;
        let y_in_cell = local.y - row as f32 * stride;
        if x_in_cell > self.cell_size || y_in_cell > self.cell_size {
            return None;
        }

        Some(TileCoord::new(x, GRID_HEIGHT - 1 - row))
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub enum GridAction {
    /// Apply the pending build mode.
    Apply(TileCoord),
    Remove(TileCoord),
}

#[derive(Event, Debug, Clone, Copy)]
pub enum CraftingAction {
    Fill(TileCoord, ItemKind),
    Clear(TileCoord),
    Collect(TileCoord),
}

#[derive(Component, Debug, Clone, Copy)]
pub struct GridTile {
    pub coord: TileCoord,
}

#[derive(Component)]
pub struct HudText;

pub fn item_color(item: ItemKind) -> Color {
    match item {
        ItemKind::PromptCoal => Color::srgb(0.62, 0.36, 0.86),
        ItemKind::Iron => Color::srgb(0.78, 0.80, 0.84),
        ItemKind::Gear => Color::srgb(0.93, 0.71, 0.25),
        ItemKind::CraneArm => Color::srgb(0.96, 0.42, 0.32),
    }
}

/// Tile color for an entity. Belts carrying an item take the item's color and
/// machines brighten while their output waits.
pub fn entity_color(entity: &Entity) -> Color {
    if let Some(item) = entity.belt().and_then(|belt| belt.item.as_ref()) {
        return item_color(item.kind);
    }
    match entity.kind() {
        EntityKind::Belt => Color::srgb(0.30, 0.32, 0.36),
        EntityKind::Machine => match entity.machine() {
            Some(machine) if machine.output_ready => Color::srgb(0.98, 0.55, 0.20),
            Some(machine) if machine.processing_ticks > 0 => Color::srgb(0.80, 0.42, 0.18),
            _ => Color::srgb(0.52, 0.30, 0.16),
        },
        EntityKind::Generator => Color::srgb(0.95, 0.86, 0.22),
        EntityKind::Storage => Color::srgb(0.27, 0.58, 0.88),
        EntityKind::CraftingTable => match entity.crafting().and_then(|c| c.output_slot()) {
            Some(_) => Color::srgb(0.57, 0.95, 0.54),
            None => Color::srgb(0.36, 0.70, 0.40),
        },
        EntityKind::CraneArm => match entity.crane() {
            Some(crane) if crane.cooldown_ticks > 0 => Color::srgb(0.96, 0.42, 0.32),
            _ => Color::srgb(0.84, 0.53, 0.87),
        },
    }
}
