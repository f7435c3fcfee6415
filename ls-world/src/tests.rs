use crate::{GridPos, Voxel, VoxelGrid, grid_index, parse_snapshot};

#[test]
fn out_of_range_positions_are_absent() {
    let grid = VoxelGrid::air_filled([4, 3, 2]);
    assert!(grid.get(GridPos::new(0, 0, 0)).is_some());
    assert!(grid.get(GridPos::new(3, 2, 1)).is_some());
    assert!(grid.get(GridPos::new(4, 0, 0)).is_none());
    assert!(grid.get(GridPos::new(-1, 0, 0)).is_none());
    assert!(grid.get(GridPos::new(0, 3, 0)).is_none());
    assert!(grid.get(GridPos::new(0, 0, 2)).is_none());
}

#[test]
fn position_order_matches_index_layout() {
    let size = [3, 2, 4];
    let grid = VoxelGrid::air_filled(size);
    for (i, pos) in grid.positions().enumerate() {
        assert_eq!(grid_index(size, pos), Some(i));
    }
    assert_eq!(grid.positions().count(), grid.len());
}

#[test]
fn set_then_get_round_trips() {
    let mut grid = VoxelGrid::air_filled([2, 2, 2]);
    let pos = GridPos::new(1, 0, 1);
    assert!(grid.set(pos, Voxel::named("stone")));
    assert_eq!(grid.get(pos).unwrap().name, "stone");
    assert!(!grid.set(GridPos::new(5, 0, 0), Voxel::named("stone")));
}

#[test]
fn malformed_numeric_attributes_read_as_zero() {
    let voxel = Voxel::with_state("wheat", &[("age", "banana"), ("level", "6")]);
    assert_eq!(voxel.attr_u8("age"), 0);
    assert_eq!(voxel.attr_u8("level"), 6);
    assert_eq!(voxel.attr_u8("missing"), 0);
}

#[test]
fn snapshot_parses_names_states_and_nulls() {
    let raw = r#"{
        "size": [2, 1, 1],
        "voxels": [
            {"name": "furnace", "state": {"facing": "west", "lit": "true"}, "biome": 6},
            null
        ]
    }"#;
    let grid = parse_snapshot(raw).unwrap();
    let furnace = grid.get(GridPos::new(0, 0, 0)).unwrap();
    assert_eq!(furnace.name, "furnace");
    assert!(furnace.attr_is("facing", "west"));
    assert_eq!(furnace.biome, 6);
    assert_eq!(grid.get(GridPos::new(1, 0, 0)).unwrap().name, "air");
}

#[test]
fn snapshot_rejects_wrong_voxel_count() {
    let raw = r#"{"size": [2, 2, 2], "voxels": [null]}"#;
    assert!(parse_snapshot(raw).is_err());
}
