mod bridge;
mod codec;
mod model;

pub use bridge::{apply_save_data, save_data_from_simulation};
pub use codec::{export_to_base64, import_from_base64, load_from_json_string, save_to_json_string};
pub use model::{SAVE_VERSION, SaveData, SaveEntity, SaveResources};

#[cfg(test)]
mod tests {
    use super::{
        SaveData, SaveEntity, apply_save_data, export_to_base64, import_from_base64,
        load_from_json_string, save_data_from_simulation, save_to_json_string,
    };
    use crate::model::{
        BeltItem, CraftOutput, Direction, EntityId, EntityKind, EntityState, ItemKind,
        MachineState, TileCoord,
    };
    use crate::Simulation;

    fn busy_simulation() -> Simulation {
        let mut sim = Simulation::default();
        sim.place(TileCoord::new(2, 2), EntityKind::Generator, Direction::Up)
            .expect("generator");
        sim.place(TileCoord::new(3, 2), EntityKind::Machine, Direction::Right)
            .expect("machine");
        for x in 4..7 {
            sim.place(TileCoord::new(x, 2), EntityKind::Belt, Direction::Right)
                .expect("belt");
        }
        sim.place(TileCoord::new(7, 2), EntityKind::Storage, Direction::Up)
            .expect("storage");
        sim.place(TileCoord::new(5, 3), EntityKind::CraneArm, Direction::Up)
            .expect("crane");
        let table = sim
            .place(TileCoord::new(0, 0), EntityKind::CraftingTable, Direction::Up)
            .expect("table");
        sim.update_crafting_slot(table, 1, Some(ItemKind::Iron));
        sim.spawn_ambient_buffer(3);
        sim.add_credits(4.0);
        for _ in 0..60 {
            sim.tick();
        }
        sim
    }

    #[test]
    fn save_json_round_trip() {
        let original = save_data_from_simulation(&busy_simulation());
        let json = save_to_json_string(&original).expect("snapshot JSON should serialize");
        let restored = load_from_json_string(&json).expect("snapshot JSON should deserialize");

        assert_eq!(restored, original);
    }

    #[test]
    fn save_base64_round_trip() {
        let original = save_data_from_simulation(&busy_simulation());
        let encoded = export_to_base64(&original).expect("snapshot should export to base64");
        let restored = import_from_base64(&encoded).expect("snapshot should import from base64");

        assert_eq!(restored, original);
    }

    #[test]
    fn restored_simulation_continues_identically() {
        let mut original = busy_simulation();
        let save = save_data_from_simulation(&original);

        let mut restored = Simulation::default();
        apply_save_data(&mut restored, &save).expect("snapshot apply should succeed");
        assert_eq!(restored.grid, original.grid);
        assert_eq!(restored.player, original.player);

        for _ in 0..120 {
            original.tick();
            restored.tick();
        }
        assert_eq!(restored.grid, original.grid);
        assert_eq!(restored.resources.energy, original.resources.energy);
        assert_eq!(restored.tick_index, original.tick_index);
    }

    #[test]
    fn unsupported_version_leaves_simulation_untouched() {
        let mut sim = busy_simulation();
        let before = sim.clone();
        let save = SaveData {
            version: 99,
            ..SaveData::default()
        };

        assert!(apply_save_data(&mut sim, &save).is_err());
        assert_eq!(sim, before);

        let json = save_to_json_string(&save).expect("serializes");
        assert!(load_from_json_string(&json).is_err());
        assert!(import_from_base64("not base64 at all!").is_err());
    }

    #[test]
    fn invalid_entries_are_skipped_and_invariants_restored() {
        let save = SaveData {
            entities: vec![
                SaveEntity {
                    id: 4,
                    x: 1,
                    y: 1,
                    direction: Direction::Up,
                    state: EntityState::Machine(MachineState {
                        processing_ticks: 12,
                        output_ready: true,
                    }),
                },
                SaveEntity {
                    id: 5,
                    x: 1,
                    y: 1,
                    direction: Direction::Up,
                    state: EntityState::Generator,
                },
                SaveEntity {
                    id: 6,
                    x: 80,
                    y: 1,
                    direction: Direction::Up,
                    state: EntityState::Generator,
                },
                SaveEntity {
                    id: 7,
                    x: 2,
                    y: 1,
                    direction: Direction::Left,
                    state: EntityState::Belt(crate::model::BeltState {
                        item: Some(BeltItem {
                            id: 40,
                            kind: ItemKind::Gear,
                            progress: 3.0,
                        }),
                    }),
                },
            ],
            ..SaveData::default()
        };

        let mut sim = Simulation::default();
        apply_save_data(&mut sim, &save).expect("snapshot apply should succeed");

        assert_eq!(sim.grid.len(), 2);
        let machine = sim
            .entity_at(TileCoord::new(1, 1))
            .and_then(|entity| entity.machine())
            .expect("machine restored");
        assert!(machine.output_ready);
        assert_eq!(machine.processing_ticks, 0);
        let item = sim
            .entity_at(TileCoord::new(2, 1))
            .and_then(|entity| entity.belt())
            .and_then(|belt| belt.item)
            .expect("belt item restored");
        assert_eq!(item.progress, 1.0);

        let fresh = sim
            .place(TileCoord::new(9, 9), EntityKind::Belt, Direction::Up)
            .expect("placement after restore");
        assert_eq!(fresh.0, 41);
    }

    #[test]
    fn restored_crafting_output_is_rederived() {
        let mut sim = Simulation::default();
        let table = sim
            .place(TileCoord::new(0, 0), EntityKind::CraftingTable, Direction::Up)
            .expect("table");
        for slot in 0..4 {
            sim.update_crafting_slot(table, slot, Some(ItemKind::Iron));
        }
        let save = save_data_from_simulation(&sim);

        let mut restored = Simulation::default();
        apply_save_data(&mut restored, &save).expect("snapshot apply should succeed");
        let output = restored
            .entity_by_id(table)
            .and_then(|entity| entity.crafting())
            .and_then(|crafting| crafting.output_slot());
        assert_eq!(
            output,
            Some(CraftOutput {
                item: ItemKind::Gear,
                count: 1
            })
        );
    }

    #[test]
    fn snapshot_without_version_is_rejected() {
        let json = r#"{ "resources": { "credits": 5.0, "energy": 1.0 }, "entities": [] }"#;
        assert!(load_from_json_string(json).is_err());

        let minimal = load_from_json_string(r#"{ "version": 1 }"#)
            .expect("version alone is a valid snapshot");
        assert_eq!(minimal, SaveData::default());
    }

    #[test]
    fn duplicate_entity_ids_are_skipped() {
        let save = SaveData {
            entities: vec![
                SaveEntity {
                    id: 3,
                    x: 0,
                    y: 0,
                    direction: Direction::Up,
                    state: EntityState::Generator,
                },
                SaveEntity {
                    id: 3,
                    x: 4,
                    y: 0,
                    direction: Direction::Up,
                    state: EntityState::Generator,
                },
            ],
            ..SaveData::default()
        };

        let mut sim = Simulation::default();
        apply_save_data(&mut sim, &save).expect("snapshot apply should succeed");

        assert_eq!(sim.grid.len(), 1);
        let restored = sim
            .entity_by_id(EntityId(3))
            .expect("first entry restored");
        assert_eq!(restored.coord, TileCoord::new(0, 0));
        assert!(sim.entity_at(TileCoord::new(4, 0)).is_none());
    }
}
