use std::io::{self, Write};

use ls_model::{Material, TintKind};

use crate::biome;
use crate::stream::SceneStream;

/// Emission scale a full-strength (level 15) block light maps onto.
const FULL_LIGHT: f32 = 5.0;

/// Write the shading directive for one face ahead of its quad.
pub fn write_material<W: Write>(
    stream: &mut SceneStream<W>,
    material: Material,
    biome_id: u8,
    light: f32,
    texture: &str,
    tinted: bool,
) -> io::Result<()> {
    match material {
        Material::Matte { tint } => {
            if tinted {
                let c = match tint {
                    TintKind::Foliage => biome::foliage_color(biome_id),
                    TintKind::Grass => biome::grass_color(biome_id),
                };
                stream.line(&format!(
                    "Material \"matte\" \"texture Kd\" \"{texture}-color\" \"rgb tintMap\" [{:.6} {:.6} {:.6}]",
                    c[0], c[1], c[2]
                ))
            } else {
                stream.line(&format!(
                    "Material \"matte\" \"texture Kd\" \"{texture}-color\""
                ))
            }
        }
        Material::Foliage => translucent(stream, texture, biome::foliage_color(biome_id)),
        Material::Grass => translucent(stream, texture, biome::grass_color(biome_id)),
        Material::Glass => stream.line(&format!(
            "Material \"glass\" \"texture Kr\" \"{texture}-color\""
        )),
        Material::Light => {
            let le = (light / 15.0).powi(2) * FULL_LIGHT;
            stream.line(&format!(
                "AreaLightSource \"texlight\" \"texture L\" \"{texture}-color\" \"rgb scale\" [{le:.6} {le:.6} {le:.6}]"
            ))
        }
    }
}

fn translucent<W: Write>(
    stream: &mut SceneStream<W>,
    texture: &str,
    c: [f32; 3],
) -> io::Result<()> {
    stream.line(&format!(
        "Material \"translucent\" \"texture Kd\" \"{texture}-color\" \"rgb reflect\" [{:.6} {:.6} {:.6}] \"rgb transmit\" [{:.6} {:.6} {:.6}]",
        c[0], c[1], c[2], c[0], c[1], c[2]
    ))
}
