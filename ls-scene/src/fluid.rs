use std::io::{self, Write};

use ls_model::matches_category;
use ls_world::{GridPos, Voxel, VoxelGrid, grid_index};

use crate::biome;
use crate::stream::SceneStream;

/// A resting surface sits slightly below the voxel ceiling.
pub const SURFACE_DROP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidCell {
    pub level: u8,
}

/// Discrete fill levels map onto continuous surface heights: 8 and above
/// fill the cell, 0 is a resting surface, 1..7 drain linearly.
pub fn level_height(level: u8) -> f32 {
    if level >= 8 {
        return 1.0;
    }
    if level == 0 {
        return 1.0 - SURFACE_DROP;
    }
    (1.0 - SURFACE_DROP) * (8 - level) as f32 / 7.0
}

fn classify(voxel: &Voxel) -> Option<FluidCell> {
    if voxel.name == "water" || voxel.name == "flowing_water" {
        return Some(FluidCell {
            level: voxel.attr_u8("level"),
        });
    }
    if voxel.attr_is("waterlogged", "true") {
        return Some(FluidCell { level: 0 });
    }
    // Plants that only grow inside water columns.
    if matches_category(&voxel.name, "seagrass") || voxel.name == "kelp_plant" {
        return Some(FluidCell { level: 0 });
    }
    None
}

/// Grid-parallel scalar field of fluid fill levels, derived once per
/// export and never mutated afterwards.
pub struct FluidField {
    size: [i32; 3],
    cells: Vec<Option<FluidCell>>,
}

impl FluidField {
    pub fn build(grid: &VoxelGrid) -> Self {
        let mut cells = Vec::with_capacity(grid.len());
        for pos in grid.positions() {
            cells.push(grid.get(pos).and_then(classify));
        }
        Self {
            size: grid.size(),
            cells,
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<FluidCell> {
        grid_index(self.size, pos).and_then(|i| self.cells[i])
    }

    fn is_fluid(&self, pos: GridPos) -> bool {
        self.get(pos).is_some()
    }

    /// Stencil sample for one column: the neighbor's own surface height,
    /// a full cell under a continued column, 0 where no fluid is present.
    fn sample(&self, pos: GridPos) -> f32 {
        let Some(cell) = self.get(pos) else {
            return 0.0;
        };
        if self.is_fluid(pos.offset(0, 1, 0)) {
            return 1.0;
        }
        level_height(cell.level)
    }

    /// Boundary-aware surface description for one fluid cell, or `None`
    /// when the position holds no fluid.
    pub fn surface(&self, pos: GridPos) -> Option<CellSurface> {
        self.get(pos)?;
        let submerged = self.is_fluid(pos.offset(0, 1, 0));

        let mut heights = [[1.0f32; 3]; 3];
        if !submerged {
            let mut stencil = [[0.0f32; 3]; 3];
            for (dz, row) in stencil.iter_mut().enumerate() {
                for (dx, sample) in row.iter_mut().enumerate() {
                    *sample = self.sample(pos.offset(dx as i32 - 1, 0, dz as i32 - 1));
                }
            }
            // Corners average the four meeting columns, edge midpoints the
            // two adjacent ones, the center only itself.
            for iz in 0..3 {
                for ix in 0..3 {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    for &sz in span(iz) {
                        for &sx in span(ix) {
                            sum += stencil[sz][sx];
                            count += 1.0;
                        }
                    }
                    heights[iz][ix] = sum / count;
                }
            }
        }

        let mut skirts = [false; 4];
        for (i, side) in SKIRT_SIDES.iter().enumerate() {
            skirts[i] = !self.is_fluid(pos.offset(side.dx, 0, side.dz));
        }

        Some(CellSurface {
            heights,
            top: !submerged,
            bottom: !self.is_fluid(pos.offset(0, -1, 0)),
            skirts,
        })
    }
}

fn span(i: usize) -> &'static [usize] {
    match i {
        0 => &[0, 1],
        1 => &[1],
        _ => &[1, 2],
    }
}

/// Nine surface heights across one cell at half-cell steps, row-major
/// over local (z, x), plus which closure faces the cell needs.
#[derive(Debug, Clone)]
pub struct CellSurface {
    pub heights: [[f32; 3]; 3],
    pub top: bool,
    pub bottom: bool,
    /// North, south, west, east, matching `SKIRT_SIDES`.
    pub skirts: [bool; 4],
}

struct SkirtSide {
    dx: i32,
    dz: i32,
    /// The edge's three height samples as (iz, ix) grid indices.
    edge: [(usize, usize); 3],
    /// Mirrored sides reverse the winding so the skirt faces outward.
    mirrored: bool,
}

const SKIRT_SIDES: [SkirtSide; 4] = [
    SkirtSide {
        dx: 0,
        dz: -1,
        edge: [(0, 0), (0, 1), (0, 2)],
        mirrored: true,
    },
    SkirtSide {
        dx: 0,
        dz: 1,
        edge: [(2, 0), (2, 1), (2, 2)],
        mirrored: false,
    },
    SkirtSide {
        dx: -1,
        dz: 0,
        edge: [(0, 0), (1, 0), (2, 0)],
        mirrored: false,
    },
    SkirtSide {
        dx: 1,
        dz: 0,
        edge: [(0, 2), (1, 2), (2, 2)],
        mirrored: true,
    },
];

fn tri(points: &mut Vec<[f32; 3]>, indices: &mut Vec<u32>, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
    for p in [a, b, c] {
        indices.push(points.len() as u32);
        points.push(p);
    }
}

fn grid_point(iz: usize, ix: usize, h: f32) -> [f32; 3] {
    [ix as f32 * 0.5, h, iz as f32 * 0.5]
}

/// Triangulate one cell surface in cell-local coordinates.
pub fn surface_mesh(surface: &CellSurface) -> (Vec<[f32; 3]>, Vec<u32>) {
    let mut points = Vec::new();
    let mut indices = Vec::new();

    if surface.top {
        for iz in 0..2 {
            for ix in 0..2 {
                let p00 = grid_point(iz, ix, surface.heights[iz][ix]);
                let p10 = grid_point(iz, ix + 1, surface.heights[iz][ix + 1]);
                let p01 = grid_point(iz + 1, ix, surface.heights[iz + 1][ix]);
                let p11 = grid_point(iz + 1, ix + 1, surface.heights[iz + 1][ix + 1]);
                tri(&mut points, &mut indices, p00, p01, p11);
                tri(&mut points, &mut indices, p00, p11, p10);
            }
        }
    }

    if surface.bottom {
        let b00 = [0.0, 0.0, 0.0];
        let b10 = [1.0, 0.0, 0.0];
        let b01 = [0.0, 0.0, 1.0];
        let b11 = [1.0, 0.0, 1.0];
        tri(&mut points, &mut indices, b00, b10, b11);
        tri(&mut points, &mut indices, b00, b11, b01);
    }

    for (side, &enabled) in SKIRT_SIDES.iter().zip(&surface.skirts) {
        if !enabled {
            continue;
        }
        for seg in 0..2 {
            let (za, xa) = side.edge[seg];
            let (zb, xb) = side.edge[seg + 1];
            let a_top = grid_point(za, xa, surface.heights[za][xa]);
            let b_top = grid_point(zb, xb, surface.heights[zb][xb]);
            let a_bottom = [a_top[0], 0.0, a_top[2]];
            let b_bottom = [b_top[0], 0.0, b_top[2]];
            for t in [[a_bottom, b_bottom, b_top], [a_bottom, b_top, a_top]] {
                if side.mirrored {
                    tri(&mut points, &mut indices, t[2], t[1], t[0]);
                } else {
                    tri(&mut points, &mut indices, t[0], t[1], t[2]);
                }
            }
        }
    }

    (points, indices)
}

/// Full-grid fluid pass, independent of camera reachability: water-table
/// surfaces are visible from above even where the traversal never walked.
pub fn write_surfaces<W: Write>(
    stream: &mut SceneStream<W>,
    field: &FluidField,
    grid: &VoxelGrid,
) -> io::Result<u32> {
    let mut written = 0;
    for pos in grid.positions() {
        let Some(surface) = field.surface(pos) else {
            continue;
        };
        let biome_id = grid.get(pos).map(|v| v.biome).unwrap_or(0);
        write_cell(stream, pos, &surface, biome_id)?;
        written += 1;
    }
    Ok(written)
}

fn write_cell<W: Write>(
    stream: &mut SceneStream<W>,
    pos: GridPos,
    surface: &CellSurface,
    biome_id: u8,
) -> io::Result<()> {
    let (points, indices) = surface_mesh(surface);
    if indices.is_empty() {
        return Ok(());
    }

    stream.attribute_begin()?;
    stream.translate([pos.x as f32, pos.y as f32, pos.z as f32])?;
    let c = biome::water_color(biome_id);
    stream.line(&format!(
        "Material \"glass\" \"float eta\" [1.33] \"rgb Kt\" [{:.6} {:.6} {:.6}]",
        c[0], c[1], c[2]
    ))?;

    let mut directive = String::from("Shape \"trianglemesh\" \"integer indices\" [");
    for (i, index) in indices.iter().enumerate() {
        if i > 0 {
            directive.push(' ');
        }
        directive.push_str(&index.to_string());
    }
    directive.push_str("] \"point P\" [");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            directive.push(' ');
        }
        directive.push_str(&format!("{:.6} {:.6} {:.6}", p[0], p[1], p[2]));
    }
    directive.push(']');
    stream.line(&directive)?;

    stream.attribute_end()
}
