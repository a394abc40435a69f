use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::TileCoord;

pub const CRAFTING_SLOT_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    PromptCoal,
    Iron,
    Gear,
    CraneArm,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [Self::PromptCoal, Self::Iron, Self::Gear, Self::CraneArm];

    pub fn label(self) -> &'static str {
        match self {
            Self::PromptCoal => "Prompt Coal",
            Self::Iron => "Iron",
            Self::Gear => "Gear",
            Self::CraneArm => "Crane Arm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Clockwise: up, right, down, left.
    pub fn rotated_cw(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    pub fn ahead_of(self, coord: TileCoord) -> TileCoord {
        let (dx, dy) = self.delta();
        coord.offset(dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Belt,
    Machine,
    Generator,
    Storage,
    CraftingTable,
    CraneArm,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        Self::Belt,
        Self::Machine,
        Self::Generator,
        Self::Storage,
        Self::CraftingTable,
        Self::CraneArm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Belt => "Belt",
            Self::Machine => "Machine",
            Self::Generator => "Generator",
            Self::Storage => "Storage",
            Self::CraftingTable => "Crafting Table",
            Self::CraneArm => "Crane Arm",
        }
    }

    /// Sub-state for a freshly placed entity of this kind.
    pub fn fresh_state(self) -> EntityState {
        match self {
            Self::Belt => EntityState::Belt(BeltState::default()),
            Self::Machine => EntityState::Machine(MachineState::default()),
            Self::Generator => EntityState::Generator,
            Self::Storage => EntityState::Storage(StorageState::default()),
            Self::CraftingTable => EntityState::CraftingTable(CraftingState::default()),
            Self::CraneArm => EntityState::CraneArm(CraneArmState::default()),
        }
    }
}

/// Item counts keyed by kind. Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<ItemKind, u32>);

impl Inventory {
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn add(&mut self, kind: ItemKind, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.0.entry(kind).or_insert(0) += amount;
    }

    /// Removes exactly `amount` units, or nothing if fewer are held.
    pub fn take(&mut self, kind: ItemKind, amount: u32) -> bool {
        let held = self.count(kind);
        if held < amount {
            return false;
        }
        if held == amount {
            self.0.remove(&kind);
        } else {
            self.0.insert(kind, held - amount);
        }
        true
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.0.iter().map(|(&kind, &count)| (kind, count))
    }

    pub fn merge(&mut self, other: &Inventory) {
        for (kind, count) in other.iter() {
            self.add(kind, count);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeltItem {
    pub id: u64,
    pub kind: ItemKind,
    /// 0.0 on entry, 1.0 when ready to leave the tile.
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeltState {
    pub item: Option<BeltItem>,
}

/// `output_ready` and a non-zero `processing_ticks` never hold together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    pub processing_ticks: u32,
    pub output_ready: bool,
}

impl MachineState {
    pub fn is_idle(&self) -> bool {
        !self.output_ready && self.processing_ticks == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageState {
    pub inventory: Inventory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftOutput {
    pub item: ItemKind,
    pub count: u32,
}

/// The output slot is private so it can only be derived from the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingState {
    input_slots: [Option<ItemKind>; CRAFTING_SLOT_COUNT],
    output_slot: Option<CraftOutput>,
}

impl CraftingState {
    pub fn input_slots(&self) -> &[Option<ItemKind>; CRAFTING_SLOT_COUNT] {
        &self.input_slots
    }

    pub fn output_slot(&self) -> Option<CraftOutput> {
        self.output_slot
    }

    /// Replaces one input slot and re-derives the output through `matcher`.
    /// Returns the displaced item, if any.
    pub fn set_slot(
        &mut self,
        index: usize,
        item: Option<ItemKind>,
        matcher: impl Fn(&[Option<ItemKind>; CRAFTING_SLOT_COUNT]) -> Option<CraftOutput>,
    ) -> Option<ItemKind> {
        let slot = self.input_slots.get_mut(index)?;
        let displaced = std::mem::replace(slot, item);
        self.output_slot = matcher(&self.input_slots);
        displaced
    }

    /// Recomputes the output from the current inputs, e.g. after restoring a
    /// snapshot.
    pub fn refresh_output(
        &mut self,
        matcher: impl Fn(&[Option<ItemKind>; CRAFTING_SLOT_COUNT]) -> Option<CraftOutput>,
    ) {
        self.output_slot = matcher(&self.input_slots);
    }

    /// Empties every slot and returns the input items that were held.
    pub fn clear(&mut self) -> Vec<ItemKind> {
        self.output_slot = None;
        self.input_slots
            .iter_mut()
            .filter_map(Option::take)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraneArmState {
    pub active: bool,
    pub cooldown_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityState {
    Belt(BeltState),
    Machine(MachineState),
    Generator,
    Storage(StorageState),
    CraftingTable(CraftingState),
    CraneArm(CraneArmState),
}

impl EntityState {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Belt(_) => EntityKind::Belt,
            Self::Machine(_) => EntityKind::Machine,
            Self::Generator => EntityKind::Generator,
            Self::Storage(_) => EntityKind::Storage,
            Self::CraftingTable(_) => EntityKind::CraftingTable,
            Self::CraneArm(_) => EntityKind::CraneArm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub coord: TileCoord,
    pub direction: Direction,
    pub state: EntityState,
}

impl Entity {
    pub fn new(id: EntityId, coord: TileCoord, direction: Direction, kind: EntityKind) -> Self {
        Self {
            id,
            coord,
            direction,
            state: kind.fresh_state(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.state.kind()
    }

    pub fn ahead(&self) -> TileCoord {
        self.direction.ahead_of(self.coord)
    }

    pub fn belt(&self) -> Option<&BeltState> {
        match &self.state {
            EntityState::Belt(belt) => Some(belt),
            _ => None,
        }
    }

    pub fn belt_mut(&mut self) -> Option<&mut BeltState> {
        match &mut self.state {
            EntityState::Belt(belt) => Some(belt),
            _ => None,
        }
    }

    pub fn machine(&self) -> Option<&MachineState> {
        match &self.state {
            EntityState::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    pub fn machine_mut(&mut self) -> Option<&mut MachineState> {
        match &mut self.state {
            EntityState::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    pub fn storage(&self) -> Option<&StorageState> {
        match &self.state {
            EntityState::Storage(storage) => Some(storage),
            _ => None,
        }
    }

    pub fn storage_mut(&mut self) -> Option<&mut StorageState> {
        match &mut self.state {
            EntityState::Storage(storage) => Some(storage),
            _ => None,
        }
    }

    pub fn crafting(&self) -> Option<&CraftingState> {
        match &self.state {
            EntityState::CraftingTable(crafting) => Some(crafting),
            _ => None,
        }
    }

    pub fn crafting_mut(&mut self) -> Option<&mut CraftingState> {
        match &mut self.state {
            EntityState::CraftingTable(crafting) => Some(crafting),
            _ => None,
        }
    }

    pub fn crane(&self) -> Option<&CraneArmState> {
        match &self.state {
            EntityState::CraneArm(crane) => Some(crane),
            _ => None,
        }
    }

    pub fn crane_mut(&mut self) -> Option<&mut CraneArmState> {
        match &mut self.state {
            EntityState::CraneArm(crane) => Some(crane),
            _ => None,
        }
    }
}
