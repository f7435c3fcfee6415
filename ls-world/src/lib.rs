use std::collections::BTreeMap;

pub mod snapshot;

pub use snapshot::{load_snapshot, parse_snapshot};

/// Signed grid coordinate. Neighbor math may step outside the grid;
/// `VoxelGrid::get` answers `None` for such positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn neighbors(self) -> [Self; 6] {
        [
            self.offset(1, 0, 0),
            self.offset(-1, 0, 0),
            self.offset(0, 1, 0),
            self.offset(0, -1, 0),
            self.offset(0, 0, 1),
            self.offset(0, 0, -1),
        ]
    }
}

/// Flat index for `pos` inside `size`, laid out as `x + sx * (z + sz * y)`.
pub fn grid_index(size: [i32; 3], pos: GridPos) -> Option<usize> {
    let [sx, sy, sz] = size;
    if pos.x < 0 || pos.x >= sx || pos.y < 0 || pos.y >= sy || pos.z < 0 || pos.z >= sz {
        return None;
    }
    Some((pos.x + sx * (pos.z + sz * pos.y)) as usize)
}

/// Every in-bounds position in index order.
pub fn grid_positions(size: [i32; 3]) -> impl Iterator<Item = GridPos> {
    let [sx, sy, sz] = size;
    (0..sy).flat_map(move |y| (0..sz).flat_map(move |z| (0..sx).map(move |x| GridPos::new(x, y, z))))
}

/// One grid cell: a type name plus its attribute map and the biome the
/// sample was taken from. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Voxel {
    pub name: String,
    pub state: BTreeMap<String, String>,
    pub biome: u8,
}

impl Voxel {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn air() -> Self {
        Self::named("air")
    }

    pub fn with_state(name: &str, pairs: &[(&str, &str)]) -> Self {
        let mut voxel = Self::named(name);
        for (key, value) in pairs {
            voxel.state.insert(key.to_string(), value.to_string());
        }
        voxel
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.state.get(key).map(String::as_str)
    }

    pub fn attr_is(&self, key: &str, value: &str) -> bool {
        self.attr(key) == Some(value)
    }

    /// Numeric attributes arrive as strings; anything malformed reads as 0.
    pub fn attr_u8(&self, key: &str) -> u8 {
        self.attr(key).and_then(|v| v.parse().ok()).unwrap_or(0)
    }
}

/// Fixed-size 3D array of voxels, immutable for the lifetime of one export.
pub struct VoxelGrid {
    size: [i32; 3],
    voxels: Vec<Voxel>,
}

impl VoxelGrid {
    pub fn filled(size: [i32; 3], fill: Voxel) -> Self {
        let len = (size[0] * size[1] * size[2]).max(0) as usize;
        Self {
            size,
            voxels: vec![fill; len],
        }
    }

    pub fn air_filled(size: [i32; 3]) -> Self {
        Self::filled(size, Voxel::air())
    }

    pub fn from_voxels(size: [i32; 3], voxels: Vec<Voxel>) -> Result<Self, String> {
        let expected = (size[0] * size[1] * size[2]).max(0) as usize;
        if voxels.len() != expected {
            return Err(format!(
                "grid of size {size:?} needs {expected} voxels, got {}",
                voxels.len()
            ));
        }
        Ok(Self { size, voxels })
    }

    pub fn size(&self) -> [i32; 3] {
        self.size
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        grid_index(self.size, pos).is_some()
    }

    pub fn get(&self, pos: GridPos) -> Option<&Voxel> {
        grid_index(self.size, pos).map(|i| &self.voxels[i])
    }

    /// Returns false when `pos` is out of range.
    pub fn set(&mut self, pos: GridPos, voxel: Voxel) -> bool {
        let Some(i) = grid_index(self.size, pos) else {
            return false;
        };
        self.voxels[i] = voxel;
        true
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> {
        grid_positions(self.size)
    }
}

#[cfg(test)]
mod tests;
