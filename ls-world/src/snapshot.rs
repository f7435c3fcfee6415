use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{Voxel, VoxelGrid};

#[derive(Debug, Clone, Deserialize)]
struct SnapshotFile {
    size: [u32; 3],
    voxels: Vec<Option<SnapshotVoxel>>,
}

#[derive(Debug, Clone, Deserialize)]
struct SnapshotVoxel {
    name: String,
    #[serde(default)]
    state: BTreeMap<String, String>,
    #[serde(default)]
    biome: u8,
}

pub fn load_snapshot(path: &Path) -> Result<VoxelGrid, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read snapshot {}: {e}", path.display()))?;
    parse_snapshot(&raw)
}

/// Grid ingestion: a flat list of (name, state) samples in
/// `x + sx * (z + sz * y)` order. A `null` entry stands for air.
pub fn parse_snapshot(raw: &str) -> Result<VoxelGrid, String> {
    let parsed: SnapshotFile =
        serde_json::from_str(raw).map_err(|e| format!("malformed snapshot: {e}"))?;
    let size = [
        parsed.size[0] as i32,
        parsed.size[1] as i32,
        parsed.size[2] as i32,
    ];
    let voxels = parsed
        .voxels
        .into_iter()
        .map(|sample| match sample {
            Some(sample) => Voxel {
                name: sample.name,
                state: sample.state,
                biome: sample.biome,
            },
            None => Voxel::air(),
        })
        .collect();
    VoxelGrid::from_voxels(size, voxels)
}
