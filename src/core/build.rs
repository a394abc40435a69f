use crate::model::{
    CRAFTING_SLOT_COUNT, CraftOutput, Direction, Entity, EntityId, EntityKind, ItemKind,
    TileCoord,
};

use super::simulation::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Place(EntityKind),
    Delete,
}

/// What a click on the grid will do, and which way new entities face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildState {
    pub mode: Option<BuildMode>,
    pub direction: Direction,
}

impl Simulation {
    pub fn set_build_mode(&mut self, mode: Option<BuildMode>) {
        self.build.mode = mode;
    }

    pub fn rotate_build_direction(&mut self) {
        self.build.direction = self.build.direction.rotated_cw();
    }

    /// Applies the pending build mode at `coord`. Returns whether the grid
    /// changed.
    pub fn apply_build_at(&mut self, coord: TileCoord) -> bool {
        match self.build.mode {
            None => false,
            Some(BuildMode::Delete) => self.remove(coord),
            Some(BuildMode::Place(kind)) => {
                let direction = self.build.direction;
                self.place(coord, kind, direction).is_some()
            }
        }
    }

    /// Places a fresh entity. Rejected without any state change when the tile
    /// is occupied or off-grid, or when a crane arm is requested and the
    /// player holds none.
    pub fn place(
        &mut self,
        coord: TileCoord,
        kind: EntityKind,
        direction: Direction,
    ) -> Option<EntityId> {
        if !self.grid.in_bounds(coord) {
            tracing::debug!(%coord, ?kind, "placement rejected: outside grid");
            return None;
        }
        if self.grid.is_occupied(coord) {
            tracing::debug!(%coord, ?kind, "placement rejected: tile occupied");
            return None;
        }
        if kind == EntityKind::CraneArm && self.player.crane_arms == 0 {
            tracing::debug!(%coord, "placement rejected: no crane arms held");
            return None;
        }

        let id = EntityId(self.ids.next_id());
        if let Err(err) = self.grid.set(Entity::new(id, coord, direction, kind)) {
            tracing::debug!(%err, "placement rejected");
            return None;
        }
        if kind == EntityKind::CraneArm {
            self.player.crane_arms -= 1;
        }
        Some(id)
    }

    /// Removes whatever stands at `coord`. Crane arms go back to the player in
    /// full, and items reserved in a crafting table's slots are refunded.
    pub fn remove(&mut self, coord: TileCoord) -> bool {
        let Some(mut entity) = self.grid.remove(coord) else {
            return false;
        };
        if entity.kind() == EntityKind::CraneArm {
            self.player.crane_arms += 1;
        }
        if let Some(crafting) = entity.crafting_mut() {
            for item in crafting.clear() {
                self.player.items.add(item, 1);
            }
        }
        true
    }

    /// Sets one input slot of a crafting table and re-derives its output.
    ///
    /// Filling a slot reserves one unit of the item, taken from the first
    /// storage that holds it or else from the player's held items. A unit
    /// displaced from the slot goes back to the player's held items. Returns
    /// `false` with no state change if the entity is not a crafting table, the
    /// slot index is out of range, or no unit is available.
    pub fn update_crafting_slot(
        &mut self,
        entity_id: EntityId,
        slot: usize,
        item: Option<ItemKind>,
    ) -> bool {
        if slot >= CRAFTING_SLOT_COUNT {
            tracing::debug!(slot, "crafting slot index out of range");
            return false;
        }
        let Some(current) = self
            .grid
            .find(entity_id)
            .and_then(Entity::crafting)
            .map(|crafting| crafting.input_slots()[slot])
        else {
            tracing::debug!(?entity_id, "crafting update on a non-crafting entity");
            return false;
        };
        if current == item {
            return true;
        }
        if let Some(kind) = item {
            if !self.reserve_item(kind) {
                tracing::debug!(?kind, "no unit available for crafting slot");
                return false;
            }
        }

        let recipes = &self.recipes;
        let displaced = self
            .grid
            .find_mut(entity_id)
            .and_then(Entity::crafting_mut)
            .and_then(|crafting| crafting.set_slot(slot, item, |slots| recipes.match_recipe(slots)));
        if let Some(kind) = displaced {
            self.player.items.add(kind, 1);
        }
        true
    }

    /// Moves the crafting table's output to the player and consumes the
    /// reserved inputs. No-op when nothing matches.
    pub fn collect_output(&mut self, entity_id: EntityId) -> Option<CraftOutput> {
        let crafting = self
            .grid
            .find_mut(entity_id)
            .and_then(Entity::crafting_mut)?;
        let output = crafting.output_slot()?;
        crafting.clear();
        self.player.receive(output.item, output.count);
        tracing::debug!(item = ?output.item, count = output.count, "crafted output collected");
        Some(output)
    }

    fn reserve_item(&mut self, kind: ItemKind) -> bool {
        if let Some(storage) = self
            .grid
            .iter_mut()
            .filter_map(Entity::storage_mut)
            .find(|storage| storage.inventory.count(kind) > 0)
        {
            return storage.inventory.take(kind, 1);
        }
        self.player.items.take(kind, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::BuildMode;
    use crate::core::Simulation;
    use crate::model::{Direction, EntityId, EntityKind, ItemKind, TileCoord};

    fn crafting_table(sim: &mut Simulation) -> EntityId {
        sim.place(TileCoord::new(1, 1), EntityKind::CraftingTable, Direction::Up)
            .expect("crafting table placed")
    }

    #[test]
    fn place_on_occupied_tile_leaves_state_untouched() {
        let mut sim = Simulation::default();
        let coord = TileCoord::new(3, 3);
        sim.place(coord, EntityKind::Storage, Direction::Up)
            .expect("first placement");
        let before = sim.clone();

        assert!(sim.place(coord, EntityKind::Belt, Direction::Left).is_none());
        assert!(sim.place(coord, EntityKind::CraneArm, Direction::Left).is_none());

        assert_eq!(sim, before);
    }

    #[test]
    fn place_outside_grid_is_rejected() {
        let mut sim = Simulation::default();
        assert!(
            sim.place(TileCoord::new(50, 0), EntityKind::Belt, Direction::Up)
                .is_none()
        );
        assert!(
            sim.place(TileCoord::new(-1, 4), EntityKind::Belt, Direction::Up)
                .is_none()
        );
        assert!(sim.grid.is_empty());
    }

    #[test]
    fn crane_placement_consumes_and_removal_refunds() {
        let mut sim = Simulation::default();
        sim.player.crane_arms = 1;

        let coord = TileCoord::new(2, 2);
        sim.place(coord, EntityKind::CraneArm, Direction::Up)
            .expect("crane placed");
        assert_eq!(sim.player.crane_arms, 0);
        assert!(
            sim.place(TileCoord::new(4, 4), EntityKind::CraneArm, Direction::Up)
                .is_none()
        );

        assert!(sim.remove(coord));
        assert_eq!(sim.player.crane_arms, 1);
        assert!(!sim.remove(coord));
        assert_eq!(sim.player.crane_arms, 1);
    }

    #[test]
    fn build_mode_drives_apply_build_at() {
        let mut sim = Simulation::default();
        let coord = TileCoord::new(0, 0);
        assert!(!sim.apply_build_at(coord));

        sim.set_build_mode(Some(BuildMode::Place(EntityKind::Belt)));
        sim.rotate_build_direction();
        assert!(sim.apply_build_at(coord));
        let belt = sim.entity_at(coord).expect("belt placed");
        assert_eq!(belt.kind(), EntityKind::Belt);
        assert_eq!(belt.direction, Direction::Down);

        sim.set_build_mode(Some(BuildMode::Delete));
        assert!(sim.apply_build_at(coord));
        assert!(sim.entity_at(coord).is_none());
    }

    #[test]
    fn rotation_cycles_through_four_directions() {
        let mut sim = Simulation::default();
        assert_eq!(sim.build.direction, Direction::Right);
        let mut seen = Vec::new();
        for _ in 0..4 {
            sim.rotate_build_direction();
            seen.push(sim.build.direction);
        }
        assert_eq!(
            seen,
            vec![Direction::Down, Direction::Left, Direction::Up, Direction::Right]
        );
    }

    #[test]
    fn four_iron_craft_a_gear_and_clear_the_table() {
        let mut sim = Simulation::default();
        let table = crafting_table(&mut sim);

        for slot in 0..4 {
            assert!(sim.update_crafting_slot(table, slot, Some(ItemKind::Iron)));
        }
        assert_eq!(sim.player.items.count(ItemKind::Iron), 46);

        let output = sim.collect_output(table).expect("gear crafted");
        assert_eq!(output.item, ItemKind::Gear);
        assert_eq!(sim.player.items.count(ItemKind::Gear), 1);
        assert_eq!(sim.player.items.count(ItemKind::Iron), 46);

        let crafting = sim
            .entity_by_id(table)
            .and_then(|entity| entity.crafting())
            .expect("table still exists");
        assert!(crafting.input_slots().iter().all(Option::is_none));
        assert!(crafting.output_slot().is_none());
        assert!(sim.collect_output(table).is_none());
    }

    #[test]
    fn slot_reservation_prefers_storage_and_refunds_to_player() {
        let mut sim = Simulation::default();
        let table = crafting_table(&mut sim);
        sim.place(TileCoord::new(5, 5), EntityKind::Storage, Direction::Up)
            .expect("storage placed");
        if let Some(storage) = sim
            .grid
            .get_mut(TileCoord::new(5, 5))
            .and_then(|entity| entity.storage_mut())
        {
            storage.inventory.add(ItemKind::Gear, 1);
        }

        assert!(sim.update_crafting_slot(table, 0, Some(ItemKind::Gear)));
        assert_eq!(sim.storage_totals().count(ItemKind::Gear), 0);

        assert!(!sim.update_crafting_slot(table, 1, Some(ItemKind::Gear)));

        assert!(sim.update_crafting_slot(table, 0, None));
        assert_eq!(sim.player.items.count(ItemKind::Gear), 1);
    }

    #[test]
    fn crafting_crane_arm_adds_to_crane_count() {
        let mut sim = Simulation::default();
        let table = crafting_table(&mut sim);
        sim.player.items.add(ItemKind::Gear, 2);

        let slots = [ItemKind::Gear, ItemKind::Iron, ItemKind::Gear, ItemKind::Iron];
        for (slot, item) in slots.into_iter().enumerate() {
            assert!(sim.update_crafting_slot(table, slot, Some(item)));
        }
        sim.collect_output(table).expect("crane arm crafted");

        assert_eq!(sim.player.crane_arms, 6);
        assert_eq!(sim.player.items.count(ItemKind::Gear), 0);
    }

    #[test]
    fn crafting_updates_on_other_entities_are_ignored() {
        let mut sim = Simulation::default();
        let belt = sim
            .place(TileCoord::new(0, 0), EntityKind::Belt, Direction::Up)
            .expect("belt placed");
        let table = crafting_table(&mut sim);
        let before = sim.clone();

        assert!(!sim.update_crafting_slot(belt, 0, Some(ItemKind::Iron)));
        assert!(!sim.update_crafting_slot(table, 4, Some(ItemKind::Iron)));
        assert!(!sim.update_crafting_slot(EntityId(999), 0, Some(ItemKind::Iron)));
        assert!(sim.collect_output(belt).is_none());

        assert_eq!(sim, before);
    }

    #[test]
    fn removing_a_table_refunds_reserved_items() {
        let mut sim = Simulation::default();
        let table = crafting_table(&mut sim);
        assert!(sim.update_crafting_slot(table, 2, Some(ItemKind::Iron)));
        assert_eq!(sim.player.items.count(ItemKind::Iron), 49);

        assert!(sim.remove(TileCoord::new(1, 1)));
        assert_eq!(sim.player.items.count(ItemKind::Iron), 50);
    }
}
