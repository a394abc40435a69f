mod entity;
mod grid;
mod id;

pub use entity::{
    BeltItem, BeltState, CRAFTING_SLOT_COUNT, CraftOutput, CraftingState, CraneArmState,
    Direction, Entity, EntityId, EntityKind, EntityState, Inventory, ItemKind, MachineState,
    StorageState,
};
pub use grid::{FactoryGrid, GRID_HEIGHT, GRID_WIDTH, GridError, NEIGHBOR_OFFSETS, TileCoord};
pub use id::IdGenerator;
