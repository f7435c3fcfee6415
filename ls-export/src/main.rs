use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::{error, info};

use ls_model::ModelCatalog;
use ls_scene::{SceneSetup, TextureOracle, export_scene};
use ls_world::load_snapshot;

/// Convert a voxel world snapshot into a renderer scene description.
#[derive(Parser)]
#[command(name = "ls-export", version)]
struct Args {
    /// Voxel snapshot: a JSON grid of typed, stateful samples.
    #[arg(long)]
    snapshot: PathBuf,

    /// Camera and integrator configuration (JSON). Defaults apply when
    /// omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root holding models/ and textures/.
    #[arg(long)]
    assets: PathBuf,

    /// Output scene file.
    #[arg(long, default_value = "scene.pbrt")]
    out: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    eye: [f32; 3],
    target: [f32; 3],
    up: [f32; 3],
    fov: f32,
    samples: u32,
    integrator: String,
    resolution: [u32; 2],
}

impl Default for ConfigFile {
    fn default() -> Self {
        let setup = SceneSetup::default();
        Self {
            eye: setup.eye,
            target: setup.target,
            up: setup.up,
            fov: setup.fov,
            samples: setup.samples,
            integrator: setup.integrator,
            resolution: setup.resolution,
        }
    }
}

impl From<ConfigFile> for SceneSetup {
    fn from(config: ConfigFile) -> Self {
        Self {
            eye: config.eye,
            target: config.target,
            up: config.up,
            fov: config.fov,
            samples: config.samples,
            integrator: config.integrator,
            resolution: config.resolution,
        }
    }
}

fn main() {
    tracing_subscriber::fmt().without_time().compact().init();

    let args = Args::parse();
    if let Err(message) = run(&args) {
        error!("{message}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let grid = load_snapshot(&args.snapshot)?;
    info!("loaded snapshot of size {:?}", grid.size());

    let setup = match &args.config {
        Some(path) => load_config(path)?,
        None => SceneSetup::default(),
    };

    let mut catalog = ModelCatalog::new(vec![args.assets.join("models")]);
    let mut textures = TextureOracle::new(args.assets.join("textures"));

    let file = fs::File::create(&args.out)
        .map_err(|e| format!("failed to create {}: {e}", args.out.display()))?;
    let stats = export_scene(
        BufWriter::new(file),
        &grid,
        &mut catalog,
        &mut textures,
        &setup,
    )
    .map_err(|e| e.to_string())?;

    info!(
        "wrote {} blocks and {} fluid cells ({} textures) to {}",
        stats.blocks_written,
        stats.fluid_cells,
        stats.textures,
        args.out.display()
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<SceneSetup, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
    let config: ConfigFile =
        serde_json::from_str(&raw).map_err(|e| format!("malformed config: {e}"))?;
    Ok(config.into())
}
