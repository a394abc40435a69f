pub mod core;
pub mod data;
pub mod model;
pub mod recipes;
pub mod save;

pub use crate::core::{
    BuildMode, BuildState, PlayerInventory, ResourcePool, Simulation, TickDeltas,
};
pub use data::{
    RecipesFile, SimTuning, load_recipes, load_recipes_from_path, load_tuning,
    load_tuning_from_path,
};
pub use model::{
    BeltItem, BeltState, CraftOutput, CraftingState, CraneArmState, Direction, Entity, EntityId,
    EntityKind, EntityState, FactoryGrid, GRID_HEIGHT, GRID_WIDTH, GridError, Inventory,
    ItemKind, MachineState, StorageState, TileCoord,
};
pub use recipes::{Recipe, RecipeBook, RecipeError};
pub use save::{
    SaveData, SaveEntity, SaveResources, apply_save_data, export_to_base64, import_from_base64,
    load_from_json_string, save_data_from_simulation, save_to_json_string,
};
