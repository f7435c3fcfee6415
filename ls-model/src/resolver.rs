use std::sync::Arc;

use ls_world::{GridPos, Voxel, VoxelGrid, grid_index};

use crate::catalog::{BlockGeometry, ModelCatalog, ModelKind};
use crate::light::block_light;
use crate::transform::{Axis, TransformStep};

/// Which biome color a tinted face under a matte material picks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintKind {
    Foliage,
    Grass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Matte { tint: TintKind },
    Foliage,
    Grass,
    Glass,
    Light,
}

#[derive(Debug, Clone)]
pub struct RenderEntry {
    pub geometry: Arc<BlockGeometry>,
    pub kind: ModelKind,
    pub transforms: Vec<TransformStep>,
    pub material: Material,
}

/// Everything derived from one voxel's type and attributes. Pure function
/// of its inputs; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedBlock {
    pub entries: Vec<RenderEntry>,
    pub passable: bool,
    pub light: f32,
}

impl ResolvedBlock {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Model-category tag used to pick the facing rotation convention.
    pub fn kind(&self) -> ModelKind {
        self.entries
            .last()
            .map(|e| e.kind)
            .unwrap_or(ModelKind::Other)
    }
}

/// Exact name or suffix-after-underscore match: "oak_stairs" matches the
/// "stairs" category, "restairs" does not.
pub fn matches_category(name: &str, category: &str) -> bool {
    name == category
        || (name.ends_with(category) && name[..name.len() - category.len()].ends_with('_'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Empty,
    SplitHalf,
    PortalAxis,
    Slab,
    Trapdoor,
    Stairs,
    Post,
    Gate,
    CropStage,
    CropSparseStage,
    Cake,
    Hopper,
    Farmland,
    SnowLayer,
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Exact(&'static str),
    Suffix(&'static str),
}

impl Matcher {
    fn matches(self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => name == expected,
            Self::Suffix(category) => matches_category(name, category),
        }
    }
}

/// Priority-ordered dispatch table; the first matching row wins and
/// anything unmatched falls through to the bare type name.
const RULES: &[(Matcher, Strategy)] = &[
    // Invisible and intentionally skipped types come ahead of everything.
    (Matcher::Exact("air"), Strategy::Empty),
    (Matcher::Exact("cave_air"), Strategy::Empty),
    (Matcher::Exact("void_air"), Strategy::Empty),
    (Matcher::Suffix("bed"), Strategy::Empty),
    (Matcher::Exact("redstone_wire"), Strategy::Empty),
    (Matcher::Exact("repeater"), Strategy::Empty),
    (Matcher::Exact("tripwire"), Strategy::Empty),
    (Matcher::Suffix("door"), Strategy::SplitHalf),
    // Two-block plants get the same lower/upper treatment as doors.
    (Matcher::Exact("tall_seagrass"), Strategy::SplitHalf),
    (Matcher::Exact("sunflower"), Strategy::SplitHalf),
    (Matcher::Exact("lilac"), Strategy::SplitHalf),
    (Matcher::Exact("rose_bush"), Strategy::SplitHalf),
    (Matcher::Exact("peony"), Strategy::SplitHalf),
    (Matcher::Exact("tall_grass"), Strategy::SplitHalf),
    (Matcher::Exact("large_fern"), Strategy::SplitHalf),
    (Matcher::Exact("nether_portal"), Strategy::PortalAxis),
    (Matcher::Suffix("slab"), Strategy::Slab),
    (Matcher::Suffix("trapdoor"), Strategy::Trapdoor),
    (Matcher::Suffix("stairs"), Strategy::Stairs),
    (Matcher::Suffix("fence"), Strategy::Post),
    (Matcher::Suffix("wall"), Strategy::Post),
    (Matcher::Suffix("pane"), Strategy::Post),
    (Matcher::Exact("iron_bars"), Strategy::Post),
    (Matcher::Suffix("gate"), Strategy::Gate),
    (Matcher::Exact("wheat"), Strategy::CropStage),
    (Matcher::Exact("beetroots"), Strategy::CropStage),
    (Matcher::Exact("melon_stem"), Strategy::CropStage),
    (Matcher::Exact("pumpkin_stem"), Strategy::CropStage),
    (Matcher::Exact("potatoes"), Strategy::CropSparseStage),
    (Matcher::Exact("carrots"), Strategy::CropSparseStage),
    (Matcher::Exact("cake"), Strategy::Cake),
    (Matcher::Exact("hopper"), Strategy::Hopper),
    (Matcher::Exact("farmland"), Strategy::Farmland),
    (Matcher::Exact("snow"), Strategy::SnowLayer),
];

/// Eight growth values compress onto four sprite stages.
const SPARSE_STAGES: [u8; 8] = [0, 0, 1, 1, 2, 2, 2, 3];

/// Side emissions rotate about y by a quarter turn count per direction.
const POST_SIDES: [(&str, u8); 4] = [("north", 0), ("east", 3), ("south", 2), ("west", 1)];

pub fn resolve_block(voxel: &Voxel, catalog: &mut ModelCatalog) -> ResolvedBlock {
    let light = block_light(voxel);
    let mut builder = BlockBuilder::new(voxel, catalog, light);
    let strategy = RULES
        .iter()
        .find(|(matcher, _)| matcher.matches(&voxel.name))
        .map(|(_, strategy)| *strategy);

    match strategy {
        Some(Strategy::Empty) => {}
        Some(Strategy::SplitHalf) => {
            let suffix = if voxel.attr_is("half", "upper") {
                "top"
            } else {
                "bottom"
            };
            builder.add(&format!("{}_{suffix}", voxel.name));
        }
        Some(Strategy::PortalAxis) => {
            // Both orientations are baked into dedicated models, so the
            // emitter's generic axis rotation skips this block.
            if voxel.attr_is("axis", "x") {
                builder.add("nether_portal_ns");
            } else {
                builder.add("nether_portal_ew");
            }
        }
        Some(Strategy::Slab) => match voxel.attr("type") {
            Some("double") => builder.add(&slab_full_block(&voxel.name)),
            Some("top") => builder.add(&format!("{}_top", voxel.name)),
            _ => builder.add(&voxel.name),
        },
        Some(Strategy::Trapdoor) => {
            if voxel.attr_is("open", "true") {
                builder.add(&format!("{}_open", voxel.name));
            } else {
                let half = voxel.attr("half").unwrap_or("bottom");
                builder.add(&format!("{}_{half}", voxel.name));
            }
        }
        Some(Strategy::Stairs) => {
            let shape = voxel.attr("shape").unwrap_or("straight");
            let (model, mirrored) = match shape {
                "inner_left" => (format!("{}_inner", voxel.name), true),
                "inner_right" => (format!("{}_inner", voxel.name), false),
                "outer_left" => (format!("{}_outer", voxel.name), true),
                "outer_right" => (format!("{}_outer", voxel.name), false),
                _ => (voxel.name.clone(), false),
            };
            // Left shapes reuse the right geometry turned a quarter about y.
            let transforms = if mirrored {
                vec![TransformStep::rotate(Axis::Y, 90.0)]
            } else {
                Vec::new()
            };
            builder.add_with(&model, transforms);
        }
        Some(Strategy::Post) => {
            builder.add(&format!("{}_post", voxel.name));
            for (dir, quarters) in POST_SIDES {
                if voxel.attr_is(dir, "true") {
                    builder.add_with(
                        &format!("{}_side", voxel.name),
                        vec![TransformStep::rotate(Axis::Y, quarters as f32 * 90.0)],
                    );
                }
            }
        }
        Some(Strategy::Gate) => {
            let mut model = voxel.name.clone();
            if voxel.attr_is("in_wall", "true") {
                model.push_str("_wall");
            }
            if voxel.attr_is("open", "true") {
                model.push_str("_open");
            }
            builder.add(&model);
        }
        Some(Strategy::CropStage) => {
            builder.add(&format!("{}_stage{}", voxel.name, voxel.attr_u8("age")));
        }
        Some(Strategy::CropSparseStage) => {
            let age = (voxel.attr_u8("age") as usize).min(SPARSE_STAGES.len() - 1);
            builder.add(&format!("{}_stage{}", voxel.name, SPARSE_STAGES[age]));
        }
        Some(Strategy::Cake) => {
            let bites = voxel.attr_u8("bites");
            if bites == 0 {
                builder.add("cake");
            } else {
                builder.add(&format!("cake_slice{bites}"));
            }
        }
        Some(Strategy::Hopper) => {
            if voxel.attr_is("facing", "down") {
                builder.add("hopper");
            } else {
                builder.add("hopper_side");
            }
        }
        Some(Strategy::Farmland) => {
            if voxel.attr_u8("moisture") == 7 {
                builder.add("farm_land_moist");
            } else {
                builder.add("farm_land");
            }
        }
        Some(Strategy::SnowLayer) => {
            let layers = voxel.attr_u8("layers");
            if layers >= 8 {
                builder.add("snow_block");
            } else {
                builder.add(&format!("snow_height{}", layers * 2));
            }
        }
        None => builder.add(&voxel.name),
    }

    ResolvedBlock {
        entries: builder.entries,
        passable: can_pass(&voxel.name),
        light,
    }
}

struct BlockBuilder<'a> {
    catalog: &'a mut ModelCatalog,
    material: Material,
    entries: Vec<RenderEntry>,
}

impl<'a> BlockBuilder<'a> {
    fn new(voxel: &Voxel, catalog: &'a mut ModelCatalog, light: f32) -> Self {
        Self {
            catalog,
            material: default_material(&voxel.name, light),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, model: &str) {
        self.add_with(model, Vec::new());
    }

    fn add_with(&mut self, model: &str, transforms: Vec<TransformStep>) {
        // Missing geometry degrades to an empty resolution, not an error.
        let Some((geometry, kind)) = self.catalog.lookup(model) else {
            return;
        };
        self.entries.push(RenderEntry {
            geometry,
            kind,
            transforms,
            material: self.material,
        });
    }
}

const GRASS_PLANTS: &[&str] = &[
    "grass",
    "tall_grass",
    "fern",
    "large_fern",
    "seagrass",
    "tall_seagrass",
    "sugar_cane",
];

fn default_material(name: &str, light: f32) -> Material {
    if light > 0.0 {
        return Material::Light;
    }
    if matches_category(name, "glass") || matches_category(name, "pane") {
        return Material::Glass;
    }
    if matches_category(name, "leaves") {
        return Material::Foliage;
    }
    if GRASS_PLANTS.contains(&name) {
        return Material::Grass;
    }
    let tint = if matches_category(name, "vine") {
        TintKind::Foliage
    } else {
        TintKind::Grass
    };
    Material::Matte { tint }
}

/// Rebuild the full-size block name a doubled slab stands in for:
/// cobblestone slabs drop the suffix, the plain stone slab has a dedicated
/// double model, brick slabs pluralize, and everything else swaps "slab"
/// for "planks" whether or not such a planks block exists.
fn slab_full_block(name: &str) -> String {
    if matches_category(name, "cobblestone_slab") {
        return name.strip_suffix("_slab").unwrap_or(name).to_string();
    }
    if name == "stone_slab" {
        return "stone_slab_double".to_string();
    }
    if matches_category(name, "brick_slab") {
        let base = name.strip_suffix("brick_slab").unwrap_or("");
        return format!("{base}bricks");
    }
    let base = name.strip_suffix("slab").unwrap_or(name);
    format!("{base}planks")
}

const SOLID_NAMES: &[&str] = &["stone", "podzol", "clay"];
const SOLID_CATEGORIES: &[&str] = &[
    "ore", "granite", "diorite", "andesite", "planks", "dirt", "block", "wood",
];

/// Whether the reachability expansion may continue through this type.
/// Independent of geometry: a voxel can be passable with or without
/// rendered models.
pub fn can_pass(name: &str) -> bool {
    if SOLID_NAMES.contains(&name) {
        return false;
    }
    !SOLID_CATEGORIES
        .iter()
        .any(|category| matches_category(name, category))
}

/// Grid-parallel array of resolved blocks, computed once per export.
pub struct ResolvedGrid {
    size: [i32; 3],
    blocks: Vec<ResolvedBlock>,
}

impl ResolvedGrid {
    pub fn build(grid: &VoxelGrid, catalog: &mut ModelCatalog) -> Self {
        let mut blocks = Vec::with_capacity(grid.len());
        for pos in grid.positions() {
            let Some(voxel) = grid.get(pos) else {
                continue;
            };
            blocks.push(resolve_block(voxel, catalog));
        }
        Self {
            size: grid.size(),
            blocks,
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<&ResolvedBlock> {
        grid_index(self.size, pos).map(|i| &self.blocks[i])
    }

    pub fn passable(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|block| block.passable)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &ResolvedBlock> {
        self.blocks.iter()
    }
}
