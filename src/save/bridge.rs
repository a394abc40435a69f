use std::collections::HashSet;

use anyhow::{Result, bail};

use crate::Simulation;
use crate::core::{PlayerInventory, ResourcePool};
use crate::model::{Entity, EntityId, EntityState, IdGenerator, TileCoord};

use super::{SAVE_VERSION, SaveData, SaveEntity, SaveResources};

pub fn save_data_from_simulation(sim: &Simulation) -> SaveData {
    let entities = sim
        .grid
        .iter()
        .map(|entity| SaveEntity {
            id: entity.id.0,
            x: entity.coord.x,
            y: entity.coord.y,
            direction: entity.direction,
            state: entity.state.clone(),
        })
        .collect();

    SaveData {
        version: SAVE_VERSION,
        resources: SaveResources {
            credits: sim.resources.credits,
            energy: sim.resources.energy,
        },
        crane_arms: sim.player.crane_arms,
        player_items: sim.player.items.clone(),
        tick_index: sim.tick_index,
        paused: sim.paused,
        ambient_buffer: sim.ambient_buffer,
        build_direction: sim.build.direction,
        next_id: sim.ids.peek(),
        entities,
    }
}

/// Replaces the simulation's state with `save`. Entries that fall outside the
/// grid, land on an already restored tile, or reuse a restored id are skipped. The simulation is
/// left untouched if the snapshot version is not supported.
pub fn apply_save_data(sim: &mut Simulation, save: &SaveData) -> Result<()> {
    if save.version != SAVE_VERSION {
        bail!("unsupported snapshot version {}", save.version);
    }

    sim.resources = ResourcePool::new(save.resources.credits, save.resources.energy);
    sim.player = PlayerInventory {
        crane_arms: save.crane_arms,
        items: save.player_items.clone(),
    };
    sim.tick_index = save.tick_index;
    sim.paused = save.paused;
    sim.ambient_buffer = save.ambient_buffer;
    sim.build.direction = save.build_direction;
    sim.grid.clear();

    let mut ids = IdGenerator::starting_from(save.next_id);
    let mut restored_ids = HashSet::new();
    let mut skipped = 0usize;
    for entry in &save.entities {
        if restored_ids.contains(&entry.id) {
            tracing::warn!(id = entry.id, "skipping snapshot entity: duplicate id");
            skipped += 1;
            continue;
        }
        let mut entity = Entity {
            id: EntityId(entry.id),
            coord: TileCoord::new(entry.x, entry.y),
            direction: entry.direction,
            state: entry.state.clone(),
        };
        normalize_state(&mut entity.state, sim);

        if let Err(err) = sim.grid.set(entity) {
            tracing::warn!(%err, id = entry.id, "skipping snapshot entity");
            skipped += 1;
            continue;
        }
        restored_ids.insert(entry.id);
        ids.observe(entry.id);
        if let EntityState::Belt(belt) = &entry.state {
            if let Some(item) = belt.item {
                ids.observe(item.id);
            }
        }
    }
    sim.ids = ids;

    tracing::info!(
        entities = sim.grid.len(),
        skipped,
        tick = sim.tick_index,
        "snapshot restored"
    );
    Ok(())
}

/// Re-establishes invariants a hand-edited snapshot could break.
fn normalize_state(state: &mut EntityState, sim: &Simulation) {
    match state {
        EntityState::Machine(machine) if machine.output_ready => {
            machine.processing_ticks = 0;
        }
        EntityState::Belt(belt) => {
            if let Some(item) = belt.item.as_mut() {
                item.progress = item.progress.clamp(0.0, 1.0);
            }
        }
        EntityState::CraftingTable(crafting) => {
            crafting.refresh_output(|slots| sim.recipes.match_recipe(slots));
        }
        _ => {}
    }
}
