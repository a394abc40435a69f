use bevy::prelude::*;
use prompt_factory::{RecipeBook, SimTuning, Simulation, load_recipes, load_tuning};

use super::resources::{GridLayout, RuntimeConfig, SessionState};
use super::state::{AppPhase, SimRunState};

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("PrimaryCamera"), Camera2d));
}

pub fn bootstrap_session(
    mut commands: Commands,
    config: Res<RuntimeConfig>,
    mut next_phase: ResMut<NextState<AppPhase>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
) {
    let tuning = load_tuning().unwrap_or_else(|err| {
        warn!("using built-in tuning: {err:#}");
        SimTuning::default()
    });
    let recipes = load_recipes().unwrap_or_else(|err| {
        warn!("using built-in recipes: {err:#}");
        RecipeBook::default()
    });
    info!(recipes = recipes.len(), "session ready");

    commands.insert_resource(GridLayout::new(config.cell_size, config.cell_gap));

    commands.insert_resource(SessionState {
        simulation: Simulation::new(tuning, recipes),
        tick_timer: Timer::from_seconds((1.0 / config.tick_hz).max(0.01), TimerMode::Repeating),
        snapshot: None,
        status: None,
    });

    next_run_state.set(SimRunState::Running);
    next_phase.set(AppPhase::InGame);
}
