use anyhow::Result;
use bevy::prelude::*;
use prompt_factory::{
    Entity, EntityId, Simulation, TileCoord, apply_save_data, export_to_base64,
    import_from_base64, save_data_from_simulation,
};

use super::resources::{CraftingAction, GridAction, RuntimeConfig, SessionState};
use super::state::SimRunState;

pub fn apply_grid_actions(mut actions: EventReader<GridAction>, mut session: ResMut<SessionState>) {
    for action in actions.read() {
        let changed = match *action {
            GridAction::Apply(coord) => session.simulation.apply_build_at(coord),
            GridAction::Remove(coord) => session.simulation.remove(coord),
        };
        if !changed {
            debug!(?action, "grid action had no effect");
        }
    }
}

pub fn apply_crafting_actions(
    mut actions: EventReader<CraftingAction>,
    mut session: ResMut<SessionState>,
) {
    let simulation = &mut session.simulation;
    for action in actions.read() {
        match *action {
            CraftingAction::Fill(coord, item) => {
                let Some(id) = crafting_table_at(simulation, coord) else {
                    continue;
                };
                let Some(slot) = first_empty_slot(simulation, id) else {
                    debug!(%coord, "crafting table is full");
                    continue;
                };
                simulation.update_crafting_slot(id, slot, Some(item));
            }
            CraftingAction::Clear(coord) => {
                let Some(id) = crafting_table_at(simulation, coord) else {
                    continue;
                };
                for slot in filled_slots(simulation, id) {
                    simulation.update_crafting_slot(id, slot, None);
                }
            }
            CraftingAction::Collect(coord) => {
                let Some(id) = crafting_table_at(simulation, coord) else {
                    continue;
                };
                if let Some(output) = simulation.collect_output(id) {
                    info!(item = output.item.label(), count = output.count, "crafted");
                }
            }
        }
    }
}

pub fn tick_simulation(time: Res<Time>, mut session: ResMut<SessionState>) {
    let steps = session
        .tick_timer
        .tick(time.delta())
        .times_finished_this_tick();

    for _ in 0..steps {
        session.simulation.tick();
    }
}

pub fn mark_sim_running(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.simulation.set_paused(false);
    }
}

pub fn mark_sim_paused(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.simulation.set_paused(true);
    }
}

/// F5 stores the simulation in the in-memory snapshot slot, F9 restores it.
pub fn handle_snapshot_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<SessionState>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
) {
    if keys.just_pressed(KeyCode::F5) {
        match export_to_base64(&save_data_from_simulation(&session.simulation)) {
            Ok(encoded) => {
                session.snapshot = Some(encoded);
                session.status = Some("snapshot saved".to_string());
            }
            Err(err) => {
                warn!("snapshot save failed: {err:#}");
                session.status = Some(format!("save failed: {err}"));
            }
        }
    }

    if keys.just_pressed(KeyCode::F9) {
        let Some(encoded) = session.snapshot.clone() else {
            session.status = Some("no snapshot to load".to_string());
            return;
        };
        match restore_snapshot(&mut session.simulation, &encoded) {
            Ok(()) => {
                next_run_state.set(if session.simulation.paused {
                    SimRunState::Paused
                } else {
                    SimRunState::Running
                });
                session.status = Some("snapshot loaded".to_string());
            }
            Err(err) => {
                warn!("snapshot load failed: {err:#}");
                session.status = Some(format!("load failed: {err}"));
            }
        }
    }
}

/// Stand-in for an externally graded prompt: a credit reward plus one ambient
/// item.
pub fn handle_grade_hotkey(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<RuntimeConfig>,
    mut session: ResMut<SessionState>,
) {
    if !keys.just_pressed(KeyCode::Enter) {
        return;
    }
    session.simulation.add_credits(config.grade_reward);
    session.simulation.spawn_ambient_buffer(1);
}

fn restore_snapshot(simulation: &mut Simulation, encoded: &str) -> Result<()> {
    let save_data = import_from_base64(encoded)?;
    apply_save_data(simulation, &save_data)
}

fn crafting_table_at(simulation: &Simulation, coord: TileCoord) -> Option<EntityId> {
    simulation
        .entity_at(coord)
        .filter(|entity| entity.crafting().is_some())
        .map(|entity| entity.id)
}

fn first_empty_slot(simulation: &Simulation, id: EntityId) -> Option<usize> {
    simulation
        .entity_by_id(id)
        .and_then(Entity::crafting)?
        .input_slots()
        .iter()
        .position(Option::is_none)
}

fn filled_slots(simulation: &Simulation, id: EntityId) -> Vec<usize> {
    simulation
        .entity_by_id(id)
        .and_then(Entity::crafting)
        .map(|crafting| {
            crafting
                .input_slots()
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_some())
                .map(|(index, _)| index)
                .collect()
        })
        .unwrap_or_default()
}
