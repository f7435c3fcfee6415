use std::io::{self, Write};

use ls_model::{
    Axis, ElementRotation, FaceDir, GeometryElement, GeometryFace, Material, ModelKind,
    ResolvedBlock,
};
use ls_world::{GridPos, Voxel};

use crate::material::write_material;
use crate::stream::SceneStream;
use crate::textures::TextureOracle;

/// Write one resolved voxel at its world position. Returns how many
/// blocks were emitted (0 or 1); an empty resolution opens no bracket.
pub fn write_block<W: Write>(
    stream: &mut SceneStream<W>,
    textures: &mut TextureOracle,
    voxel: &Voxel,
    block: &ResolvedBlock,
    pos: GridPos,
) -> io::Result<u32> {
    if block.is_empty() {
        return Ok(0);
    }

    stream.attribute_begin()?;
    stream.translate([pos.x as f32, pos.y as f32, pos.z as f32])?;

    write_axis_orientation(stream, voxel)?;
    write_facing_orientation(stream, voxel, block.kind())?;

    for entry in &block.entries {
        for step in &entry.transforms {
            stream.transform_step(*step)?;
        }
        for element in &entry.geometry.elements {
            write_element(
                stream,
                textures,
                element,
                entry.material,
                voxel.biome,
                block.light,
            )?;
        }
        // Undo the entry's transforms in reverse so the next entry starts
        // from the block's own frame again.
        for step in entry.transforms.iter().rev() {
            stream.transform_step(step.inverse())?;
        }
    }

    stream.attribute_end()?;
    Ok(1)
}

fn write_axis_orientation<W: Write>(stream: &mut SceneStream<W>, voxel: &Voxel) -> io::Result<()> {
    // The portal models already encode both axis orientations.
    if voxel.name == "nether_portal" {
        return Ok(());
    }
    match voxel.attr("axis") {
        Some("x") => stream.rotate_about_center(Axis::Z, 90.0),
        Some("z") => stream.rotate_about_center(Axis::X, 90.0),
        _ => Ok(()),
    }
}

fn write_facing_orientation<W: Write>(
    stream: &mut SceneStream<W>,
    voxel: &Voxel,
    kind: ModelKind,
) -> io::Result<()> {
    let Some(facing) = voxel.attr("facing") else {
        return Ok(());
    };
    let quarters: [(&str, u8); 4] = match kind {
        ModelKind::Orientable => [("north", 0), ("east", 1), ("south", 2), ("west", 3)],
        ModelKind::TemplatePiston => [("north", 2), ("east", 3), ("south", 0), ("west", 1)],
        ModelKind::Other => [("north", 1), ("east", 0), ("south", 3), ("west", 2)],
    };
    if let Some((_, turns)) = quarters.iter().find(|(dir, _)| *dir == facing) {
        return stream.rotate_about_center(Axis::Y, *turns as f32 * 90.0);
    }
    match facing {
        "down" => stream.rotate_about_center(Axis::Z, -90.0),
        "top" => stream.rotate_about_center(Axis::Z, 90.0),
        _ => Ok(()),
    }
}

fn write_element<W: Write>(
    stream: &mut SceneStream<W>,
    textures: &mut TextureOracle,
    element: &GeometryElement,
    material: Material,
    biome_id: u8,
    light: f32,
) -> io::Result<()> {
    let mid = midpoint(element.from, element.to);
    let cube = diff(element.to, element.from);

    stream.attribute_begin()?;
    stream.translate(mid)?;
    if let Some(rotation) = element.rotation {
        write_element_rotation(stream, mid, rotation)?;
    }

    for face in &element.faces {
        let quad = face_quad(face.dir, cube);
        stream.attribute_begin()?;
        if face.rotation != 0.0 {
            stream.rotate(face.rotation * quad.orient as f32, quad.axis)?;
        }
        write_material(stream, material, biome_id, light, &face.texture, face.tinted)?;
        stream.translate(quad.offset)?;
        write_face_shape(stream, textures, face, &quad)?;
        stream.attribute_end()?;
    }

    stream.attribute_end()?;
    Ok(())
}

fn write_element_rotation<W: Write>(
    stream: &mut SceneStream<W>,
    mid: [f32; 3],
    rotation: ElementRotation,
) -> io::Result<()> {
    let org = diff(mid, rotation.origin);
    stream.translate(neg(org))?;
    stream.rotate(rotation.angle, rotation.axis)?;
    if rotation.rescale {
        let factor = 1.0 / rotation.angle.to_radians().cos();
        let unit = rotation.axis.unit();
        let across = rotation.axis.across();
        stream.scale([
            across[0] * factor + unit[0],
            across[1] * factor + unit[1],
            across[2] * factor + unit[2],
        ])?;
    }
    stream.translate(org)
}

struct FaceQuad {
    offset: [f32; 3],
    l1: f32,
    l2: f32,
    orient: i32,
    shape: &'static str,
    axis: Axis,
}

/// Fixed per-face table: offset from the element midpoint, the two
/// in-plane lengths, the orientation sign, and the shape tag.
fn face_quad(dir: FaceDir, cube: [f32; 3]) -> FaceQuad {
    let [cx, cy, cz] = cube;
    match dir {
        FaceDir::Up => FaceQuad {
            offset: [0.0, cy / 2.0, 0.0],
            l1: cx,
            l2: cz,
            orient: 1,
            shape: "quady",
            axis: Axis::Y,
        },
        FaceDir::Down => FaceQuad {
            offset: [0.0, -cy / 2.0, 0.0],
            l1: cx,
            l2: cz,
            orient: -1,
            shape: "quady",
            axis: Axis::Y,
        },
        FaceDir::South => FaceQuad {
            offset: [0.0, 0.0, cz / 2.0],
            l1: cx,
            l2: cy,
            orient: 1,
            shape: "quadz",
            axis: Axis::Z,
        },
        FaceDir::North => FaceQuad {
            offset: [0.0, 0.0, -cz / 2.0],
            l1: cx,
            l2: cy,
            orient: -1,
            shape: "quadz",
            axis: Axis::Z,
        },
        FaceDir::East => FaceQuad {
            offset: [cx / 2.0, 0.0, 0.0],
            l1: cz,
            l2: cy,
            orient: 1,
            shape: "quadx",
            axis: Axis::X,
        },
        FaceDir::West => FaceQuad {
            offset: [-cx / 2.0, 0.0, 0.0],
            l1: cz,
            l2: cy,
            orient: -1,
            shape: "quadx",
            axis: Axis::X,
        },
    }
}

fn write_face_shape<W: Write>(
    stream: &mut SceneStream<W>,
    textures: &mut TextureOracle,
    face: &GeometryFace,
    quad: &FaceQuad,
) -> io::Result<()> {
    let [u0, v0, u1, v1] = face.uv;
    if textures.has_alpha(&face.texture) {
        stream.line(&format!(
            "Shape \"{}\" \"float l1\" [{:.6}] \"float l2\" [{:.6}] \"float dir\" [{}] \"texture alpha\" \"{}-alpha\" \"float u0\" [{u0:.6}] \"float v0\" [{v0:.6}] \"float u1\" [{u1:.6}] \"float v1\" [{v1:.6}]",
            quad.shape, quad.l1, quad.l2, quad.orient, face.texture
        ))
    } else {
        stream.line(&format!(
            "Shape \"{}\" \"float l1\" [{:.6}] \"float l2\" [{:.6}] \"float dir\" [{}] \"float u0\" [{u0:.6}] \"float v0\" [{v0:.6}] \"float u1\" [{u1:.6}] \"float v1\" [{v1:.6}]",
            quad.shape, quad.l1, quad.l2, quad.orient
        ))
    }
}

fn midpoint(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        (a[0] + b[0]) * 0.5,
        (a[1] + b[1]) * 0.5,
        (a[2] + b[2]) * 0.5,
    ]
}

fn diff(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn neg(v: [f32; 3]) -> [f32; 3] {
    [-v[0], -v[1], -v[2]]
}
