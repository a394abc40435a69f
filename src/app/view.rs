use bevy::prelude::*;
use prompt_factory::{BuildMode, Entity, GRID_HEIGHT, GRID_WIDTH, ItemKind, TileCoord};

use super::resources::{
    GridLayout, GridTile, HoveredCell, HudText, SessionState, entity_color,
};
use super::state::SimRunState;

const EMPTY_TILE_COLOR: Color = Color::srgb(0.11, 0.13, 0.16);
const HOVER_TILE_COLOR: Color = Color::srgb(0.24, 0.27, 0.31);

pub fn spawn_grid(mut commands: Commands, layout: Res<GridLayout>) {
    for y in 0..GRID_HEIGHT {
        for x in 0..GRID_WIDTH {
            let coord = TileCoord::new(x, y);
            commands.spawn((
                Name::new(format!("Tile({x},{y})")),
                Sprite::from_color(EMPTY_TILE_COLOR, Vec2::splat(layout.cell_size)),
                Transform::from_translation(layout.cell_center(coord)),
                GridTile { coord },
            ));
        }
    }
}

pub fn refresh_grid_visuals(
    session: Res<SessionState>,
    hovered: Res<HoveredCell>,
    mut tiles: Query<(&GridTile, &mut Sprite)>,
) {
    for (tile, mut sprite) in &mut tiles {
        let is_hovered = hovered.0 == Some(tile.coord);

        sprite.color = match session.simulation.entity_at(tile.coord) {
            Some(entity) if is_hovered => entity_color(entity).with_alpha(0.75),
            Some(entity) => entity_color(entity),
            None if is_hovered => HOVER_TILE_COLOR,
            None => EMPTY_TILE_COLOR,
        };
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HudText"),
        HudText,
        Text::new("Initializing..."),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.94, 0.97, 0.99)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));
}

pub fn refresh_hud(
    session: Res<SessionState>,
    hovered: Res<HoveredCell>,
    run_state: Res<State<SimRunState>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut hud) = hud_query.get_single_mut() else {
        return;
    };

    let sim = &session.simulation;

    let run_label = match run_state.get() {
        SimRunState::Running => "RUNNING",
        SimRunState::Paused => "PAUSED",
    };

    let mode_label = match sim.build.mode {
        Some(BuildMode::Place(kind)) => kind.label(),
        Some(BuildMode::Delete) => "Delete",
        None => "None",
    };

    let hovered_label = hovered
        .0
        .map(|coord| {
            let detail = sim
                .entity_at(coord)
                .map(describe_entity)
                .unwrap_or_else(|| "empty".to_string());
            format!("{coord} {detail}")
        })
        .unwrap_or_else(|| "-".to_string());

    let stored = sim.storage_totals();
    let status_line = session
        .status
        .as_deref()
        .unwrap_or("F5 snapshot, F9 restore");

    *hud = Text::new(format!(
        "Credits: {:.2}  Energy: {:.2}  Tick: {}  {}\n\
         Held: {} iron, {} gear, {} crane arms  Stored: {} iron, {} gear, {} coal  Ambient queue: {}\n\
         Build: {} facing {:?}  Hover: {}\n\
         1-6 build, X delete, Esc clear, R rotate, Space pause, Enter grade\n\
         On a crafting table: I/G/P fill slot, Backspace clear, C collect\n\
         {}",
        sim.resources.credits,
        sim.resources.energy,
        sim.tick_index,
        run_label,
        sim.player.items.count(ItemKind::Iron),
        sim.player.items.count(ItemKind::Gear),
        sim.player.crane_arms,
        stored.count(ItemKind::Iron),
        stored.count(ItemKind::Gear),
        stored.count(ItemKind::PromptCoal),
        sim.ambient_buffer,
        mode_label,
        sim.build.direction,
        hovered_label,
        status_line,
    ));
}

fn describe_entity(entity: &Entity) -> String {
    let mut text = format!("{} {:?}", entity.kind().label(), entity.direction);
    if let Some(belt) = entity.belt() {
        if let Some(item) = &belt.item {
            text.push_str(&format!(" carrying {} ({:.0}%)", item.kind.label(), item.progress * 100.0));
        }
    }
    if let Some(machine) = entity.machine() {
        if machine.output_ready {
            text.push_str(" output waiting");
        } else if machine.processing_ticks > 0 {
            text.push_str(&format!(" {} ticks left", machine.processing_ticks));
        }
    }
    if let Some(storage) = entity.storage() {
        text.push_str(&format!(" holding {}", storage.inventory.total()));
    }
    if let Some(crafting) = entity.crafting() {
        let slots = crafting
            .input_slots()
            .iter()
            .map(|slot| slot.map(ItemKind::label).unwrap_or("-"))
            .collect::<Vec<_>>()
            .join(", ");
        let output = crafting
            .output_slot()
            .map(|output| format!("{} x{}", output.item.label(), output.count))
            .unwrap_or_else(|| "nothing".to_string());
        text.push_str(&format!(" [{slots}] -> {output}"));
    }
    text
}
