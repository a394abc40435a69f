use serde::{Deserialize, Serialize};

use crate::model::{Inventory, ItemKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickDeltas {
    pub credits: f64,
    pub energy: f64,
}

impl TickDeltas {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Credits and energy shared by every tick phase.
///
/// Every deduction path is guarded: a spend either succeeds in full or leaves
/// the pool untouched, so energy never drops below zero through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub credits: f64,
    pub energy: f64,
    #[serde(skip)]
    pub tick_deltas: TickDeltas,
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new(0.0, 10.0)
    }
}

impl ResourcePool {
    pub fn new(credits: f64, energy: f64) -> Self {
        Self {
            credits,
            energy,
            tick_deltas: TickDeltas::default(),
        }
    }

    pub fn begin_tick(&mut self) {
        self.tick_deltas.reset();
    }

    pub fn add_credits(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.credits += amount;
        self.tick_deltas.credits += amount;
    }

    pub fn add_energy(&mut self, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.energy += amount;
        self.tick_deltas.energy += amount;
    }

    pub fn can_afford_energy(&self, amount: f64) -> bool {
        self.energy >= amount
    }

    /// All-or-nothing energy spend. Returns whether `amount` was deducted.
    pub fn try_spend_energy(&mut self, amount: f64) -> bool {
        if amount <= 0.0 {
            return true;
        }
        if !self.can_afford_energy(amount) {
            return false;
        }
        self.energy -= amount;
        self.tick_deltas.energy -= amount;
        true
    }
}

/// Counters the player carries outside the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInventory {
    pub crane_arms: u32,
    pub items: Inventory,
}

impl PlayerInventory {
    pub fn new(starting_iron: u32, crane_arms: u32) -> Self {
        let mut items = Inventory::default();
        items.add(ItemKind::Iron, starting_iron);
        Self { crane_arms, items }
    }

    /// Crane arms are counted separately from held items.
    pub fn receive(&mut self, item: ItemKind, count: u32) {
        match item {
            ItemKind::CraneArm => self.crane_arms += count,
            other => self.items.add(other, count),
        }
    }
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new(50, 5)
    }
}
