use std::collections::HashSet;

use crate::data::SimTuning;
use crate::model::{
    BeltItem, BeltState, Entity, EntityId, EntityKind, EntityState, FactoryGrid, IdGenerator,
    Inventory, ItemKind, MachineState, NEIGHBOR_OFFSETS, TileCoord,
};
use crate::recipes::RecipeBook;

use super::build::BuildState;
use super::resource_store::{PlayerInventory, ResourcePool};

/// Belt progress this close to 1.0 counts as arrived, so accumulated float
/// error never costs an extra tick.
const ARRIVAL_TOLERANCE: f64 = 1e-9;

/// Where an arrived belt item goes.
enum Handoff {
    /// Empty or off-grid tile ahead: the item is lost.
    Drop,
    Belt,
    Storage,
    Blocked,
}

/// The whole simulation context. Every tick phase and every build action reads
/// and mutates this one value; nothing lives in globals.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub grid: FactoryGrid,
    pub resources: ResourcePool,
    pub player: PlayerInventory,
    pub build: BuildState,
    pub paused: bool,
    pub tick_index: u64,
    /// Ambient items waiting to be dropped into storage, one per tick.
    pub ambient_buffer: u32,
    pub tuning: SimTuning,
    pub recipes: RecipeBook,
    pub(crate) ids: IdGenerator,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimTuning::default(), RecipeBook::default())
    }
}

impl Simulation {
    pub fn new(tuning: SimTuning, recipes: RecipeBook) -> Self {
        Self {
            grid: FactoryGrid::default(),
            resources: ResourcePool::new(tuning.starting_credits, tuning.starting_energy),
            player: PlayerInventory::new(tuning.starting_iron, tuning.starting_crane_arms),
            build: BuildState::default(),
            paused: false,
            tick_index: 0,
            ambient_buffer: 0,
            tuning,
            recipes,
            ids: IdGenerator::new(),
        }
    }

    /// Clears the grid and restores every counter to its starting value. The
    /// pending build mode and direction are kept.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.resources =
            ResourcePool::new(self.tuning.starting_credits, self.tuning.starting_energy);
        self.player =
            PlayerInventory::new(self.tuning.starting_iron, self.tuning.starting_crane_arms);
        self.paused = false;
        self.tick_index = 0;
        self.ambient_buffer = 0;
        self.ids = IdGenerator::new();
        tracing::info!("simulation reset");
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Credit injection from outside the simulation. Energy rises by half the
    /// credited amount, rounded down.
    pub fn add_credits(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            tracing::debug!(amount, "ignoring non-positive or non-finite credit grant");
            return;
        }
        self.resources.add_credits(amount);
        self.resources.add_energy((amount * 0.5).floor());
        tracing::info!(amount, credits = self.resources.credits, "credits granted");
    }

    pub fn spawn_ambient_buffer(&mut self, count: u32) {
        self.ambient_buffer = self.ambient_buffer.saturating_add(count);
    }

    pub fn entity_at(&self, coord: TileCoord) -> Option<&Entity> {
        self.grid.get(coord)
    }

    pub fn entity_by_id(&self, id: EntityId) -> Option<&Entity> {
        self.grid.find(id)
    }

    /// Sum of every storage entity's inventory.
    pub fn storage_totals(&self) -> Inventory {
        let mut totals = Inventory::default();
        for storage in self.grid.iter().filter_map(Entity::storage) {
            totals.merge(&storage.inventory);
        }
        totals
    }

    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.resources.begin_tick();

        self.run_generators();
        self.run_machines();
        self.run_belts();
        self.run_crane_arms();
        self.drain_ambient_buffer();

        self.resources
            .add_credits(self.tuning.passive_credits_per_tick);
        self.tick_index += 1;

        tracing::trace!(
            tick = self.tick_index,
            energy = self.resources.energy,
            credits = self.resources.credits,
            "tick complete"
        );
    }

    fn run_generators(&mut self) {
        let generators = self
            .grid
            .iter()
            .filter(|entity| entity.kind() == EntityKind::Generator)
            .count();
        for _ in 0..generators {
            self.resources
                .add_energy(self.tuning.generator_energy_per_tick);
        }
    }

    fn run_machines(&mut self) {
        let powered = self
            .grid
            .iter()
            .filter(|entity| entity.kind() == EntityKind::Generator)
            .flat_map(|generator| {
                NEIGHBOR_OFFSETS
                    .iter()
                    .map(move |&(dx, dy)| generator.coord.offset(dx, dy))
            })
            .collect::<HashSet<_>>();
        let process_ticks = self.tuning.machine_process_ticks.max(1);

        for coord in self.grid.coords_of(EntityKind::Machine) {
            let Some((state, ahead)) = self
                .grid
                .get(coord)
                .and_then(|entity| entity.machine().map(|machine| (*machine, entity.ahead())))
            else {
                continue;
            };

            let next = if state.output_ready {
                if !self.belt_is_free(ahead) {
                    continue;
                }
                let item = BeltItem {
                    id: self.ids.next_id(),
                    kind: self.tuning.machine_output,
                    progress: 0.0,
                };
                if let Some(belt) = self.grid.get_mut(ahead).and_then(Entity::belt_mut) {
                    belt.item = Some(item);
                }
                MachineState {
                    processing_ticks: process_ticks,
                    output_ready: false,
                }
            } else if state.processing_ticks > 0 {
                let remaining = state.processing_ticks - 1;
                MachineState {
                    processing_ticks: remaining,
                    output_ready: remaining == 0,
                }
            } else if powered.contains(&coord)
                && self
                    .resources
                    .try_spend_energy(self.tuning.machine_energy_cost)
            {
                MachineState {
                    processing_ticks: process_ticks,
                    output_ready: false,
                }
            } else {
                continue;
            };

            if let Some(machine) = self.grid.get_mut(coord).and_then(Entity::machine_mut) {
                *machine = next;
            }
        }
    }

    /// Advance every item first, then transfer. Doing both in one scan would
    /// let an item hop several tiles in a tick depending on iteration order.
    fn run_belts(&mut self) {
        let belts = self.grid.coords_of(EntityKind::Belt);
        if belts.is_empty() {
            return;
        }

        // Items still move when the pool cannot cover the whole batch; the
        // charge is simply skipped.
        let cost = belts.len() as f64 * self.tuning.belt_energy_per_tick;
        if !self.resources.try_spend_energy(cost) {
            tracing::trace!(cost, energy = self.resources.energy, "belt upkeep skipped");
        }

        let speed = self.tuning.belt_speed;
        for &coord in &belts {
            let Some(item) = self
                .grid
                .get_mut(coord)
                .and_then(Entity::belt_mut)
                .and_then(|belt| belt.item.as_mut())
            else {
                continue;
            };
            item.progress = (item.progress + speed).clamp(0.0, 1.0);
            if 1.0 - item.progress <= ARRIVAL_TOLERANCE {
                item.progress = 1.0;
            }
        }

        for &coord in &belts {
            let Some((item, target)) = self.grid.get(coord).and_then(|entity| {
                entity
                    .belt()
                    .and_then(|belt| belt.item)
                    .map(|item| (item, entity.ahead()))
            }) else {
                continue;
            };
            if item.progress < 1.0 {
                continue;
            }

            let handoff = match self.grid.get(target).map(|entity| &entity.state) {
                None => Handoff::Drop,
                Some(EntityState::Belt(BeltState { item: None })) => Handoff::Belt,
                Some(EntityState::Storage(_)) => Handoff::Storage,
                Some(_) => Handoff::Blocked,
            };

            match handoff {
                Handoff::Drop => {
                    self.take_belt_item(coord);
                }
                Handoff::Belt => {
                    self.take_belt_item(coord);
                    if let Some(belt) = self.grid.get_mut(target).and_then(Entity::belt_mut) {
                        belt.item = Some(BeltItem {
                            progress: 0.0,
                            ..item
                        });
                    }
                }
                Handoff::Storage => {
                    self.take_belt_item(coord);
                    self.deposit(target, item.kind);
                }
                Handoff::Blocked => {
                    if let Some(held) = self
                        .grid
                        .get_mut(coord)
                        .and_then(Entity::belt_mut)
                        .and_then(|belt| belt.item.as_mut())
                    {
                        held.progress = 1.0;
                    }
                }
            }
        }
    }

    fn run_crane_arms(&mut self) {
        let cooldown = self.tuning.crane_cooldown_ticks;

        for coord in self.grid.coords_of(EntityKind::CraneArm) {
            let Some(state) = self.grid.get(coord).and_then(Entity::crane).copied() else {
                continue;
            };

            if state.cooldown_ticks > 0 {
                if let Some(crane) = self.grid.get_mut(coord).and_then(Entity::crane_mut) {
                    crane.cooldown_ticks -= 1;
                    crane.active = false;
                }
                continue;
            }

            let source = self
                .grid
                .neighbors8(coord)
                .find(|entity| entity.belt().is_some_and(|belt| belt.item.is_some()))
                .map(|entity| entity.coord);
            let target = self
                .grid
                .neighbors8(coord)
                .find(|entity| entity.kind() == EntityKind::Storage)
                .map(|entity| entity.coord);

            let moved = match (source, target) {
                (Some(source), Some(target)) => match self.take_belt_item(source) {
                    Some(item) => {
                        self.deposit(target, item.kind);
                        true
                    }
                    None => false,
                },
                _ => false,
            };

            if let Some(crane) = self.grid.get_mut(coord).and_then(Entity::crane_mut) {
                crane.active = moved;
                if moved {
                    crane.cooldown_ticks = cooldown;
                }
            }
        }
    }

    fn drain_ambient_buffer(&mut self) {
        if self.ambient_buffer == 0 {
            return;
        }
        let Some(storage) = self.grid.iter_mut().find_map(Entity::storage_mut) else {
            return;
        };
        storage.inventory.add(ItemKind::PromptCoal, 1);
        self.ambient_buffer -= 1;
    }

    fn belt_is_free(&self, coord: TileCoord) -> bool {
        self.grid
            .get(coord)
            .and_then(Entity::belt)
            .is_some_and(|belt| belt.item.is_none())
    }

    fn take_belt_item(&mut self, coord: TileCoord) -> Option<BeltItem> {
        self.grid
            .get_mut(coord)
            .and_then(Entity::belt_mut)
            .and_then(|belt| belt.item.take())
    }

    fn deposit(&mut self, coord: TileCoord, kind: ItemKind) {
        if let Some(storage) = self.grid.get_mut(coord).and_then(Entity::storage_mut) {
            storage.inventory.add(kind, 1);
        }
    }
}
