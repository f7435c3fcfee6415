use std::io::Write;

use tracing::info;

use ls_model::{ModelCatalog, ResolvedGrid};
use ls_world::{GridPos, VoxelGrid};

use crate::emitter::write_block;
use crate::error::ExportError;
use crate::fluid::{FluidField, write_surfaces};
use crate::stream::SceneStream;
use crate::textures::{TextureOracle, used_textures};
use crate::traversal::traverse;

/// Camera and integrator setup for one export run.
#[derive(Debug, Clone)]
pub struct SceneSetup {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub fov: f32,
    pub samples: u32,
    pub integrator: String,
    pub resolution: [u32; 2],
}

impl Default for SceneSetup {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, 1.0],
            up: [0.0, 1.0, 0.0],
            fov: 70.0,
            samples: 16,
            integrator: "sppm".to_string(),
            resolution: [960, 480],
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ExportStats {
    pub visited: usize,
    pub blocks_written: u32,
    pub fluid_cells: u32,
    pub textures: usize,
}

/// One deterministic pass over the grid: header, fluid surfaces, then the
/// reachability-bounded block emission.
pub fn export_scene<W: Write>(
    out: W,
    grid: &VoxelGrid,
    catalog: &mut ModelCatalog,
    textures: &mut TextureOracle,
    setup: &SceneSetup,
) -> Result<ExportStats, ExportError> {
    let resolved = ResolvedGrid::build(grid, catalog);
    // Collected up front so an unresolved reference aborts before any
    // block output lands in the stream.
    let used = used_textures(&resolved)?;
    info!("resolved grid references {} textures", used.len());

    let mut stream = SceneStream::new(out);

    // The voxel grid is right-handed, the renderer left-handed.
    stream.line("Scale 1 -1 1")?;
    stream.line(&format!(
        "Film \"image\" \"integer xresolution\" [{}] \"integer yresolution\" [{}]",
        setup.resolution[0], setup.resolution[1]
    ))?;
    stream.line(&format!(
        "LookAt {:.6} {:.6} {:.6}  {:.6} {:.6} {:.6}  {:.6} {:.6} {:.6}",
        setup.eye[0],
        setup.eye[1],
        setup.eye[2],
        setup.target[0],
        setup.target[1],
        setup.target[2],
        setup.up[0],
        setup.up[1],
        setup.up[2],
    ))?;
    stream.line(&format!(
        "Camera \"perspective\" \"float fov\" [{:.6}]",
        setup.fov
    ))?;
    stream.line(&format!("Integrator \"{}\"", setup.integrator))?;
    stream.line(&format!(
        "Sampler \"lowdiscrepancy\" \"integer pixelsamples\" [{}]",
        setup.samples
    ))?;
    stream.line("WorldBegin")?;

    let field = FluidField::build(grid);
    let fluid_cells = write_surfaces(&mut stream, &field, grid)?;

    let seed = GridPos::new(
        setup.eye[0].floor() as i32,
        setup.eye[1].floor() as i32,
        setup.eye[2].floor() as i32,
    );
    let visited = traverse(&resolved, seed);
    let mut blocks_written = 0;
    for pos in visited.iter() {
        let (Some(voxel), Some(block)) = (grid.get(pos), resolved.get(pos)) else {
            continue;
        };
        blocks_written += write_block(&mut stream, textures, voxel, block, pos)?;
    }

    stream.line("WorldEnd")?;
    stream.flush()?;
    debug_assert_eq!(stream.depth(), 0, "unbalanced scene brackets");

    info!(
        "scene export complete: {} visited, {} blocks, {} fluid cells",
        visited.len(),
        blocks_written,
        fluid_cells
    );
    Ok(ExportStats {
        visited: visited.len(),
        blocks_written,
        fluid_cells,
        textures: used.len(),
    })
}
