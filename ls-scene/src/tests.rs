use ls_model::{
    BlockGeometry, ElementRotation, FaceDir, GeometryElement, GeometryFace, Material, ModelCatalog,
    ModelKind, ResolvedGrid, TintKind,
};
use ls_model::{Axis, resolve_block};
use ls_world::{GridPos, Voxel, VoxelGrid};

use crate::emitter::write_block;
use crate::error::ExportError;
use crate::fluid::{CellSurface, FluidField, SURFACE_DROP, level_height, surface_mesh};
use crate::material::write_material;
use crate::scene::{SceneSetup, export_scene};
use crate::stream::SceneStream;
use crate::textures::{TextureOracle, used_textures};
use crate::traversal::traverse;

fn marker_geometry(name: &str) -> BlockGeometry {
    BlockGeometry {
        elements: vec![GeometryElement {
            from: [0.0, 0.0, 0.0],
            to: [1.0, 1.0, 1.0],
            rotation: None,
            faces: vec![GeometryFace {
                dir: FaceDir::Up,
                texture: format!("tex/{name}"),
                uv: [0.0, 0.0, 1.0, 1.0],
                rotation: 0.0,
                tinted: false,
            }],
        }],
    }
}

fn catalog_with(names: &[&str]) -> ModelCatalog {
    let mut catalog = ModelCatalog::default();
    for name in names {
        catalog.insert(name, marker_geometry(name), ModelKind::Other);
    }
    catalog
}

fn emit_block(voxel: &Voxel, catalog: &mut ModelCatalog) -> String {
    let block = resolve_block(voxel, catalog);
    let mut buf = Vec::new();
    let mut oracle = TextureOracle::preloaded(&[]);
    {
        let mut stream = SceneStream::new(&mut buf);
        write_block(&mut stream, &mut oracle, voxel, &block, GridPos::new(0, 0, 0)).unwrap();
        assert_eq!(stream.depth(), 0, "every opened bracket must close");
    }
    String::from_utf8(buf).unwrap()
}

#[test]
fn level_heights_are_monotonic_with_exact_endpoints() {
    assert_eq!(level_height(8), 1.0);
    assert_eq!(level_height(12), 1.0);
    assert_eq!(level_height(0), 1.0 - SURFACE_DROP);
    for level in 0..7 {
        assert!(
            level_height(level) >= level_height(level + 1),
            "height must not grow from level {level} to {}",
            level + 1
        );
    }
    let expected = (1.0 - SURFACE_DROP) * 3.0 / 7.0;
    assert!((level_height(5) - expected).abs() < 1e-6);
}

fn water(level: &str) -> Voxel {
    Voxel::with_state("water", &[("level", level)])
}

#[test]
fn partial_column_among_full_neighbors_has_no_skirts() {
    let mut grid = VoxelGrid::air_filled([3, 1, 3]);
    for z in 0..3 {
        for x in 0..3 {
            grid.set(GridPos::new(x, 0, z), water("8"));
        }
    }
    grid.set(GridPos::new(1, 0, 1), water("4"));

    let field = FluidField::build(&grid);
    let surface = field.surface(GridPos::new(1, 0, 1)).unwrap();
    assert!(surface.top);
    assert!(surface.bottom);
    assert_eq!(surface.skirts, [false; 4]);
    let expected = (1.0 - SURFACE_DROP) * 4.0 / 7.0;
    assert!((surface.heights[1][1] - expected).abs() < 1e-6);

    // Top patch (8 triangles) plus bottom quad (2), nothing else.
    let (_, indices) = surface_mesh(&surface);
    assert_eq!(indices.len(), 30);
}

#[test]
fn submerged_columns_render_no_top_surface() {
    let mut grid = VoxelGrid::air_filled([1, 2, 1]);
    grid.set(GridPos::new(0, 0, 0), water("0"));
    grid.set(GridPos::new(0, 1, 0), water("0"));

    let field = FluidField::build(&grid);
    let lower = field.surface(GridPos::new(0, 0, 0)).unwrap();
    assert!(!lower.top);
    assert_eq!(lower.heights, [[1.0; 3]; 3]);
    assert!(lower.bottom);

    let upper = field.surface(GridPos::new(0, 1, 0)).unwrap();
    assert!(upper.top);
    assert!(!upper.bottom);
}

#[test]
fn waterlogged_and_submerged_plants_force_level_zero() {
    let mut grid = VoxelGrid::air_filled([3, 1, 1]);
    grid.set(
        GridPos::new(0, 0, 0),
        Voxel::with_state("oak_stairs", &[("waterlogged", "true")]),
    );
    grid.set(GridPos::new(1, 0, 0), Voxel::named("seagrass"));
    grid.set(GridPos::new(2, 0, 0), Voxel::named("dirt"));

    let field = FluidField::build(&grid);
    assert_eq!(field.get(GridPos::new(0, 0, 0)).unwrap().level, 0);
    assert_eq!(field.get(GridPos::new(1, 0, 0)).unwrap().level, 0);
    assert!(field.get(GridPos::new(2, 0, 0)).is_none());
}

fn cross(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

#[test]
fn skirts_face_outward_on_every_side() {
    let surface = CellSurface {
        heights: [[0.5; 3]; 3],
        top: false,
        bottom: false,
        skirts: [true; 4],
    };
    let (points, indices) = surface_mesh(&surface);
    // Four sides, two segments each, two triangles per segment.
    assert_eq!(indices.len(), 4 * 4 * 3);

    // Outward directions in SKIRT_SIDES order: north, south, west, east.
    let outward = [[0.0, 0.0, -1.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
    for (side, out) in outward.iter().enumerate() {
        let first = side * 4 * 3;
        let a = points[indices[first] as usize];
        let b = points[indices[first + 1] as usize];
        let c = points[indices[first + 2] as usize];
        let n = cross(a, b, c);
        let dot = n[0] * out[0] + n[1] * out[1] + n[2] * out[2];
        assert!(dot > 0.0, "side {side} skirt must face {out:?}, normal {n:?}");
    }
}

fn solid_box_grid() -> VoxelGrid {
    let mut grid = VoxelGrid::air_filled([5, 5, 5]);
    for y in 1..4 {
        for z in 1..4 {
            for x in 1..4 {
                grid.set(GridPos::new(x, y, z), Voxel::named("stone"));
            }
        }
    }
    grid
}

#[test]
fn traversal_renders_the_shell_but_never_the_enclosed_core() {
    let grid = solid_box_grid();
    let mut catalog = ModelCatalog::default();
    let resolved = ResolvedGrid::build(&grid, &mut catalog);
    let visited = traverse(&resolved, GridPos::new(0, 0, 0));

    assert!(!visited.contains(GridPos::new(2, 2, 2)));
    assert!(visited.contains(GridPos::new(1, 1, 1)));
    assert!(visited.contains(GridPos::new(3, 3, 3)));
    // 98 air cells around the box plus its 26 shell cells.
    assert_eq!(visited.len(), 124);
    for pos in visited.iter() {
        assert!(grid.contains(pos));
    }
}

#[test]
fn traversal_from_inside_solid_stops_at_the_seed_neighborhood() {
    let grid = VoxelGrid::filled([3, 3, 3], Voxel::named("stone"));
    let mut catalog = ModelCatalog::default();
    let resolved = ResolvedGrid::build(&grid, &mut catalog);
    let visited = traverse(&resolved, GridPos::new(1, 1, 1));
    // The seed and its six neighbors are emitted, nothing propagates.
    assert_eq!(visited.len(), 7);
}

#[test]
fn left_stairs_emit_the_right_geometry_inside_one_extra_turn() {
    let mut catalog = catalog_with(&["oak_stairs_inner"]);
    let left = emit_block(
        &Voxel::with_state("oak_stairs", &[("shape", "inner_left")]),
        &mut catalog,
    );
    let right = emit_block(
        &Voxel::with_state("oak_stairs", &[("shape", "inner_right")]),
        &mut catalog,
    );

    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.lines().collect();
    // The mirrored variant adds a quarter turn and its inverse, six lines.
    assert_eq!(left.len(), right.len() + 6);
    assert_eq!(left[..2], right[..2]);
    assert!(left[3].starts_with("Rotate 90.000000 0 1 0"));
    let inner = right.len() - 3;
    assert_eq!(left[5..5 + inner], right[2..2 + inner]);
    assert!(left[5 + inner + 1].starts_with("Rotate -90.000000 0 1 0"));
    assert_eq!(left.last(), right.last());

    let begins = left.iter().filter(|l| **l == "AttributeBegin").count();
    let ends = left.iter().filter(|l| **l == "AttributeEnd").count();
    assert_eq!(begins, ends);
}

#[test]
fn empty_resolution_opens_no_bracket() {
    let mut catalog = ModelCatalog::default();
    let text = emit_block(&Voxel::named("air"), &mut catalog);
    assert!(text.is_empty());
}

#[test]
fn facing_conventions_differ_by_model_kind() {
    let mut catalog = ModelCatalog::default();
    catalog.insert("furnace", marker_geometry("furnace"), ModelKind::Orientable);
    catalog.insert("piston", marker_geometry("piston"), ModelKind::TemplatePiston);
    catalog.insert("ladder", marker_geometry("ladder"), ModelKind::Other);

    let orientable = emit_block(&Voxel::with_state("furnace", &[("facing", "west")]), &mut catalog);
    assert!(orientable.contains("Rotate 270.000000 0 1 0"));

    let piston = emit_block(&Voxel::with_state("piston", &[("facing", "north")]), &mut catalog);
    assert!(piston.contains("Rotate 180.000000 0 1 0"));

    let default = emit_block(&Voxel::with_state("ladder", &[("facing", "north")]), &mut catalog);
    assert!(default.contains("Rotate 90.000000 0 1 0"));

    let down = emit_block(&Voxel::with_state("piston", &[("facing", "down")]), &mut catalog);
    assert!(down.contains("Rotate -90.000000 0 0 1"));
}

#[test]
fn axis_attribute_brackets_a_rotation_except_for_portals() {
    let mut catalog = catalog_with(&["oak_log", "nether_portal_ns"]);
    let log = emit_block(&Voxel::with_state("oak_log", &[("axis", "x")]), &mut catalog);
    assert!(log.contains("Rotate 90.000000 0 0 1"));

    let portal = emit_block(
        &Voxel::with_state("nether_portal", &[("axis", "x")]),
        &mut catalog,
    );
    assert!(!portal.contains("Rotate 90.000000 0 0 1"));
}

#[test]
fn rescaled_element_rotation_stretches_the_off_axis_components() {
    let mut catalog = ModelCatalog::default();
    let mut geometry = marker_geometry("cross_plant");
    geometry.elements[0].rotation = Some(ElementRotation {
        axis: Axis::Y,
        origin: [0.5, 0.5, 0.5],
        angle: 45.0,
        rescale: true,
    });
    catalog.insert("cross_plant", geometry, ModelKind::Other);
    let text = emit_block(&Voxel::named("cross_plant"), &mut catalog);
    assert!(text.contains("Rotate 45.000000 0 1 0"));
    assert!(text.contains("Scale 1.414214 1.000000 1.414214"));
}

#[test]
fn material_directives_cover_every_variant() {
    let mut buf = Vec::new();
    {
        let mut stream = SceneStream::new(&mut buf);
        write_material(
            &mut stream,
            Material::Matte { tint: TintKind::Grass },
            0,
            0.0,
            "block/dirt",
            false,
        )
        .unwrap();
        write_material(
            &mut stream,
            Material::Matte { tint: TintKind::Grass },
            0,
            0.0,
            "block/grass_top",
            true,
        )
        .unwrap();
        write_material(&mut stream, Material::Glass, 0, 0.0, "block/glass", false).unwrap();
        write_material(&mut stream, Material::Foliage, 6, 0.0, "block/oak_leaves", true).unwrap();
        write_material(&mut stream, Material::Light, 0, 15.0, "block/glowstone", false).unwrap();
    }
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("Material \"matte\" \"texture Kd\" \"block/dirt-color\"\n"));
    assert!(text.contains(
        "Material \"matte\" \"texture Kd\" \"block/grass_top-color\" \"rgb tintMap\" [0.360000 0.740000 0.290000]"
    ));
    assert!(text.contains("Material \"glass\" \"texture Kr\" \"block/glass-color\""));
    // Swamp foliage, reflect and transmit alike.
    assert!(text.contains(
        "Material \"translucent\" \"texture Kd\" \"block/oak_leaves-color\" \"rgb reflect\" [0.350000 0.500000 0.200000] \"rgb transmit\" [0.350000 0.500000 0.200000]"
    ));
    // A full-strength light maps onto the full emission scale.
    assert!(text.contains(
        "AreaLightSource \"texlight\" \"texture L\" \"block/glowstone-color\" \"rgb scale\" [5.000000 5.000000 5.000000]"
    ));
}

#[test]
fn unresolved_texture_references_abort_the_export() {
    let mut catalog = ModelCatalog::default();
    let mut geometry = marker_geometry("dangler");
    geometry.elements[0].faces[0].texture = "#side".to_string();
    catalog.insert("dangler", geometry, ModelKind::Other);

    let mut grid = VoxelGrid::air_filled([1, 1, 1]);
    grid.set(GridPos::new(0, 0, 0), Voxel::named("dangler"));
    let resolved = ResolvedGrid::build(&grid, &mut catalog);
    assert!(matches!(
        used_textures(&resolved),
        Err(ExportError::UnresolvedTexture { .. })
    ));
}

#[test]
fn export_writes_a_balanced_world_with_fluid_and_blocks() {
    let mut catalog = catalog_with(&["glowstone"]);
    let mut grid = VoxelGrid::air_filled([2, 1, 1]);
    grid.set(GridPos::new(0, 0, 0), Voxel::named("glowstone"));
    grid.set(GridPos::new(1, 0, 0), water("0"));

    let mut oracle = TextureOracle::preloaded(&[("tex/glowstone", false)]);
    let setup = SceneSetup {
        eye: [0.5, 0.5, 0.5],
        ..SceneSetup::default()
    };
    let mut buf = Vec::new();
    let stats = export_scene(&mut buf, &grid, &mut catalog, &mut oracle, &setup).unwrap();

    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("Scale 1 -1 1\n"));
    assert!(text.contains("WorldBegin"));
    assert!(text.ends_with("WorldEnd\n"));
    assert!(text.contains("Shape \"trianglemesh\""));
    assert_eq!(stats.blocks_written, 1);
    assert_eq!(stats.fluid_cells, 1);
    assert_eq!(stats.visited, 2);
    assert_eq!(stats.textures, 1);

    let begins = text.matches("AttributeBegin").count();
    let ends = text.matches("AttributeEnd").count();
    assert_eq!(begins, ends);
}
