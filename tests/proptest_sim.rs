//! Property-based checks for the factory simulation.
//!
//! Random build, interaction and tick sequences are applied to a fresh
//! simulation, then structural invariants are verified.

use std::collections::HashSet;

use prompt_factory::{
    Direction, Entity, EntityKind, ItemKind, RecipeBook, Simulation, TileCoord,
};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
enum Op {
    Place(i32, i32, usize, usize),
    Remove(i32, i32),
    Tick(u8),
    SetSlot(usize, usize, Option<usize>),
    Collect(usize),
    Credits(u8),
    Ambient(u8),
}

fn arb_coord() -> impl Strategy<Value = (i32, i32)> {
    (-1..8i32, -1..8i32)
}

fn arb_item() -> impl Strategy<Value = Option<usize>> {
    prop::option::of(0..ItemKind::ALL.len())
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (arb_coord(), 0..6usize, 0..4usize)
                .prop_map(|((x, y), kind, dir)| Op::Place(x, y, kind, dir)),
            arb_coord().prop_map(|(x, y)| Op::Remove(x, y)),
            (1..30u8).prop_map(Op::Tick),
            (0..8usize, 0..5usize, arb_item())
                .prop_map(|(table, slot, item)| Op::SetSlot(table, slot, item)),
            (0..8usize).prop_map(Op::Collect),
            (0..20u8).prop_map(Op::Credits),
            (0..5u8).prop_map(Op::Ambient),
        ],
        1..=max_ops,
    )
}

const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

fn apply(sim: &mut Simulation, op: &Op) {
    match *op {
        Op::Place(x, y, kind, dir) => {
            sim.place(TileCoord::new(x, y), EntityKind::ALL[kind], DIRECTIONS[dir]);
        }
        Op::Remove(x, y) => {
            sim.remove(TileCoord::new(x, y));
        }
        Op::Tick(n) => {
            for _ in 0..n {
                sim.tick();
            }
        }
        Op::SetSlot(table, slot, item) => {
            if let Some(id) = nth_table(sim, table) {
                sim.update_crafting_slot(id, slot, item.map(|index| ItemKind::ALL[index]));
            }
        }
        Op::Collect(table) => {
            if let Some(id) = nth_table(sim, table) {
                sim.collect_output(id);
            }
        }
        Op::Credits(amount) => sim.add_credits(f64::from(amount)),
        Op::Ambient(count) => sim.spawn_ambient_buffer(u32::from(count)),
    }
}

fn nth_table(sim: &Simulation, index: usize) -> Option<prompt_factory::EntityId> {
    sim.grid
        .iter()
        .filter(|entity| entity.kind() == EntityKind::CraftingTable)
        .nth(index)
        .map(|entity| entity.id)
}

fn crane_arms_on_grid(sim: &Simulation) -> u32 {
    sim.grid
        .iter()
        .filter(|entity| entity.kind() == EntityKind::CraneArm)
        .count() as u32
}

fn reserved_in_slots(sim: &Simulation, kind: ItemKind) -> u32 {
    sim.grid
        .iter()
        .filter_map(Entity::crafting)
        .flat_map(|crafting| crafting.input_slots().iter())
        .filter(|slot| **slot == Some(kind))
        .count() as u32
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every entity sits on its own coordinate and no id repeats.
    #[test]
    fn occupancy_is_unique(ops in arb_ops(60)) {
        let mut sim = Simulation::default();
        for op in &ops {
            apply(&mut sim, op);

            let mut coords = HashSet::new();
            let mut ids = HashSet::new();
            for entity in sim.grid.iter() {
                prop_assert!(coords.insert(entity.coord));
                prop_assert!(ids.insert(entity.id));
                prop_assert!(sim.grid.in_bounds(entity.coord));
            }
        }
    }

    /// Crane arms on the grid plus those held never change without crafting.
    #[test]
    fn crane_arms_are_conserved(ops in arb_ops(60)) {
        let mut sim = Simulation::default();
        let total = sim.player.crane_arms;
        for op in ops.iter().filter(|op| !matches!(op, Op::Collect(_))) {
            apply(&mut sim, op);
            prop_assert_eq!(sim.player.crane_arms + crane_arms_on_grid(&sim), total);
        }
    }

    /// Placing then removing N crane arms returns the held count.
    #[test]
    fn crane_place_remove_round_trip(n in 0..=5usize) {
        let mut sim = Simulation::default();
        let before = sim.player.crane_arms;
        for x in 0..n {
            prop_assert!(sim.place(TileCoord::new(x as i32, 3), EntityKind::CraneArm, Direction::Up).is_some());
        }
        prop_assert_eq!(sim.player.crane_arms, before - n as u32);
        for x in 0..n {
            prop_assert!(sim.remove(TileCoord::new(x as i32, 3)));
        }
        prop_assert_eq!(sim.player.crane_arms, before);
    }

    /// Slot order never changes what a recipe produces.
    #[test]
    fn recipe_matching_ignores_slot_order(
        slots in prop::array::uniform4(arb_item()),
        rotation in 0..4usize,
        swap in (0..4usize, 0..4usize),
    ) {
        let book = RecipeBook::default();
        let slots = slots.map(|slot| slot.map(|index| ItemKind::ALL[index]));
        let mut permuted = slots;
        permuted.rotate_left(rotation);
        permuted.swap(swap.0, swap.1);

        prop_assert_eq!(book.match_recipe(&slots), book.match_recipe(&permuted));
        if slots.iter().any(Option::is_none) {
            prop_assert_eq!(book.match_recipe(&slots), None);
        }
    }

    /// Guarded deductions keep energy at or above zero.
    #[test]
    fn energy_never_goes_negative(ops in arb_ops(80), energy in 0.0..2.0f64) {
        let mut sim = Simulation::default();
        sim.resources.energy = energy;
        for op in &ops {
            apply(&mut sim, op);
            prop_assert!(sim.resources.energy >= 0.0, "energy {}", sim.resources.energy);
        }
    }

    /// Iron is never created or destroyed by slot edits alone.
    #[test]
    fn crafting_slot_edits_conserve_items(
        edits in prop::collection::vec((0..4usize, arb_item()), 1..40),
        stored in 0..6u32,
    ) {
        let mut sim = Simulation::default();
        let table = sim
            .place(TileCoord::new(0, 0), EntityKind::CraftingTable, Direction::Up)
            .expect("table placed");
        sim.place(TileCoord::new(2, 0), EntityKind::Storage, Direction::Up)
            .expect("storage placed");
        if let Some(storage) = sim.grid.get_mut(TileCoord::new(2, 0)).and_then(Entity::storage_mut) {
            storage.inventory.add(ItemKind::Gear, stored);
        }

        let count = |sim: &Simulation, kind: ItemKind| {
            sim.player.items.count(kind)
                + sim.storage_totals().count(kind)
                + reserved_in_slots(sim, kind)
        };
        let iron = count(&sim, ItemKind::Iron);
        let gear = count(&sim, ItemKind::Gear);

        for (slot, item) in edits {
            sim.update_crafting_slot(table, slot, item.map(|index| ItemKind::ALL[index]));
            prop_assert_eq!(count(&sim, ItemKind::Iron), iron);
            prop_assert_eq!(count(&sim, ItemKind::Gear), gear);
        }
    }
}
