use ls_world::Voxel;

/// Emission intensity for a voxel. Most values live on the 0..15 game
/// scale; torches carry a boosted intensity past that range so the tiny
/// emitter stays visible.
pub fn block_light(voxel: &Voxel) -> f32 {
    if let Some(level) = fixed_light(&voxel.name) {
        return level;
    }
    match conditional_light(&voxel.name) {
        Some(ConditionalLight::SeaPickle) => sea_pickle_light(voxel),
        Some(ConditionalLight::Lit(level)) => {
            if voxel.attr_is("lit", "true") {
                level
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

fn fixed_light(name: &str) -> Option<f32> {
    Some(match name {
        "beacon" | "end_portal" | "fire" | "glowstone" | "jack_o_lantern" | "lava"
        | "sea_lantern" | "conduit" => 15.0,
        "end_rod" => 14.0,
        "torch" | "wall_torch" => 112.0,
        "nether_portal" => 11.0,
        "ender_chest" => 7.0,
        "magma_block" => 3.0,
        "brewing_stand" | "brown_mushroom" | "dragon_egg" | "end_portal_frame" => 1.0,
        _ => return None,
    })
}

/// Intensities that depend on the voxel's own attributes, as explicit
/// tagged variants rather than captured closures.
enum ConditionalLight {
    SeaPickle,
    Lit(f32),
}

fn conditional_light(name: &str) -> Option<ConditionalLight> {
    Some(match name {
        "sea_pickle" => ConditionalLight::SeaPickle,
        "furnace" => ConditionalLight::Lit(13.0),
        "redstone_ore" => ConditionalLight::Lit(9.0),
        "redstone_lamp" => ConditionalLight::Lit(15.0),
        "redstone_torch" => ConditionalLight::Lit(7.0),
        _ => return None,
    })
}

const PICKLE_LIGHT: [f32; 5] = [0.0, 6.0, 9.0, 12.0, 15.0];

fn sea_pickle_light(voxel: &Voxel) -> f32 {
    // Dry pickles do not glow.
    if !voxel.attr_is("waterlogged", "true") {
        return 0.0;
    }
    let pickles = (voxel.attr_u8("pickles") as usize).min(PICKLE_LIGHT.len() - 1);
    PICKLE_LIGHT[pickles]
}
