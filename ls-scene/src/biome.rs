//! Biome color tables consulted by tint-aware materials and fluid
//! surfaces. Static lookups, no I/O.

pub fn grass_color(biome_id: u8) -> [f32; 3] {
    tint(biome_id).grass
}

pub fn foliage_color(biome_id: u8) -> [f32; 3] {
    tint(biome_id).foliage
}

pub fn water_color(biome_id: u8) -> [f32; 3] {
    tint(biome_id).water
}

struct BiomeTint {
    grass: [f32; 3],
    foliage: [f32; 3],
    water: [f32; 3],
}

fn tint(biome_id: u8) -> BiomeTint {
    match biome_id {
        // Deserts and desert hills.
        2 | 17 => BiomeTint {
            grass: [0.91, 0.77, 0.38],
            foliage: [0.85, 0.74, 0.4],
            water: [0.25, 0.42, 0.8],
        },
        // Swampland.
        6 => BiomeTint {
            grass: [0.4, 0.56, 0.2],
            foliage: [0.35, 0.5, 0.2],
            water: [0.2, 0.36, 0.5],
        },
        // Taiga family.
        5 | 19 | 20 | 30 | 31 => BiomeTint {
            grass: [0.5, 0.6, 0.5],
            foliage: [0.45, 0.55, 0.45],
            water: [0.25, 0.42, 0.8],
        },
        // Nether.
        8 | 9 => BiomeTint {
            grass: [0.3, 0.3, 0.3],
            foliage: [0.25, 0.25, 0.25],
            water: [0.4, 0.1, 0.1],
        },
        // Ice plains.
        12 | 140 => BiomeTint {
            grass: [0.8, 0.8, 0.9],
            foliage: [0.8, 0.8, 0.9],
            water: [0.25, 0.42, 0.8],
        },
        // Jungle.
        21 | 22 | 23 => BiomeTint {
            grass: [0.2, 0.6, 0.2],
            foliage: [0.2, 0.55, 0.2],
            water: [0.25, 0.42, 0.8],
        },
        // Savanna.
        35 | 36 => BiomeTint {
            grass: [0.5, 0.7, 0.2],
            foliage: [0.45, 0.65, 0.2],
            water: [0.25, 0.42, 0.8],
        },
        // Mesa.
        37 | 38 | 39 => BiomeTint {
            grass: [0.75, 0.65, 0.4],
            foliage: [0.6, 0.55, 0.35],
            water: [0.25, 0.42, 0.8],
        },
        _ => BiomeTint {
            grass: [0.36, 0.74, 0.29],
            foliage: [0.28, 0.7, 0.22],
            water: [0.25, 0.42, 0.8],
        },
    }
}
