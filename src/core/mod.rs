mod build;
mod resource_store;
mod simulation;

pub use build::{BuildMode, BuildState};
pub use resource_store::{PlayerInventory, ResourcePool, TickDeltas};
pub use simulation::Simulation;
