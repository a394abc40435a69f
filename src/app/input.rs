use bevy::prelude::*;
use prompt_factory::{BuildMode, EntityKind, ItemKind};

use super::resources::{CraftingAction, GridAction, GridLayout, HoveredCell, SessionState};
use super::state::SimRunState;

const BUILD_HOTKEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

const SLOT_HOTKEYS: [(KeyCode, ItemKind); 3] = [
    (KeyCode::KeyI, ItemKind::Iron),
    (KeyCode::KeyG, ItemKind::Gear),
    (KeyCode::KeyP, ItemKind::PromptCoal),
];

pub fn handle_keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<SessionState>,
    run_state: Res<State<SimRunState>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
) {
    for (key, kind) in BUILD_HOTKEYS.into_iter().zip(EntityKind::ALL) {
        if keys.just_pressed(key) {
            session.simulation.set_build_mode(Some(BuildMode::Place(kind)));
        }
    }

    if keys.just_pressed(KeyCode::KeyX) {
        session.simulation.set_build_mode(Some(BuildMode::Delete));
    }
    if keys.just_pressed(KeyCode::Escape) {
        session.simulation.set_build_mode(None);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        session.simulation.rotate_build_direction();
    }

    if keys.just_pressed(KeyCode::Space) {
        let next = match run_state.get() {
            SimRunState::Running => SimRunState::Paused,
            SimRunState::Paused => SimRunState::Running,
        };
        next_run_state.set(next);
    }
}

pub fn update_hovered_cell(
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    layout: Res<GridLayout>,
    mut hovered: ResMut<HoveredCell>,
) {
    let Ok(window) = windows.get_single() else {
        hovered.0 = None;
        return;
    };

    let Some(cursor_position) = window.cursor_position() else {
        hovered.0 = None;
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        hovered.0 = None;
        return;
    };

    let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor_position) else {
        hovered.0 = None;
        return;
    };

    hovered.0 = layout.world_to_coord(world);
}

pub fn emit_mouse_actions(
    buttons: Res<ButtonInput<MouseButton>>,
    hovered: Res<HoveredCell>,
    mut actions: EventWriter<GridAction>,
) {
    let Some(coord) = hovered.0 else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) {
        actions.send(GridAction::Apply(coord));
    }

    if buttons.just_pressed(MouseButton::Right) {
        actions.send(GridAction::Remove(coord));
    }
}

/// Crafting hotkeys act on the crafting table under the cursor.
pub fn emit_crafting_actions(
    keys: Res<ButtonInput<KeyCode>>,
    hovered: Res<HoveredCell>,
    mut actions: EventWriter<CraftingAction>,
) {
    let Some(coord) = hovered.0 else {
        return;
    };

    for (key, item) in SLOT_HOTKEYS {
        if keys.just_pressed(key) {
            actions.send(CraftingAction::Fill(coord, item));
        }
    }
    if keys.just_pressed(KeyCode::Backspace) {
        actions.send(CraftingAction::Clear(coord));
    }
    if keys.just_pressed(KeyCode::KeyC) {
        actions.send(CraftingAction::Collect(coord));
    }
}
