use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::transform::Axis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceDir {
    Up,
    Down,
    North,
    South,
    East,
    West,
}

impl FaceDir {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            _ => None,
        }
    }
}

/// Category tag of the model template a block geometry descends from.
/// Different templates encode `facing` with different angular conventions,
/// so the emitter needs to know which family it is rotating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Orientable,
    TemplatePiston,
    Other,
}

impl ModelKind {
    fn from_parent(parent: Option<&str>) -> Self {
        let Some(parent) = parent else {
            return Self::Other;
        };
        let short = parent.strip_prefix("minecraft:").unwrap_or(parent);
        let short = short.strip_prefix("block/").unwrap_or(short);
        match short {
            "orientable" | "orientable_with_bottom" | "orientable_vertical" => Self::Orientable,
            s if s.starts_with("template_piston") => Self::TemplatePiston,
            _ => Self::Other,
        }
    }
}

/// Immutable cuboid-element geometry for one model name.
#[derive(Debug, Clone)]
pub struct BlockGeometry {
    pub elements: Vec<GeometryElement>,
}

#[derive(Debug, Clone)]
pub struct GeometryElement {
    /// Corners in the normalized local cube, already divided down from the
    /// 0..16 model-space coordinates.
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub rotation: Option<ElementRotation>,
    pub faces: Vec<GeometryFace>,
}

#[derive(Debug, Clone, Copy)]
pub struct ElementRotation {
    pub axis: Axis,
    pub origin: [f32; 3],
    pub angle: f32,
    pub rescale: bool,
}

#[derive(Debug, Clone)]
pub struct GeometryFace {
    pub dir: FaceDir,
    /// Resolved texture id. A leading `#` survives only when the model's
    /// texture map never resolves the reference; the export aborts on it.
    pub texture: String,
    pub uv: [f32; 4],
    pub rotation: f32,
    pub tinted: bool,
}

/// Lazy JSON model loader over a list of asset roots. Parent chains are
/// flattened child-over-parent, texture references resolved through the
/// merged texture map, and results cached per model name.
#[derive(Default)]
pub struct ModelCatalog {
    roots: Vec<PathBuf>,
    files: HashMap<String, Option<ModelFile>>,
    resolved: HashMap<String, Option<(Arc<BlockGeometry>, ModelKind)>>,
}

impl ModelCatalog {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    /// Pre-resolved entry, for tests and synthetic scenes.
    pub fn insert(&mut self, name: &str, geometry: BlockGeometry, kind: ModelKind) {
        self.resolved
            .insert(name.to_string(), Some((Arc::new(geometry), kind)));
    }

    /// Absence is not an error: a block whose model cannot be found simply
    /// renders nothing.
    pub fn lookup(&mut self, name: &str) -> Option<(Arc<BlockGeometry>, ModelKind)> {
        if let Some(cached) = self.resolved.get(name) {
            return cached.clone();
        }
        let built = self.build(name);
        if built.is_none() {
            warn!("no geometry for model {name}");
        }
        self.resolved.insert(name.to_string(), built.clone());
        built
    }

    fn build(&mut self, name: &str) -> Option<(Arc<BlockGeometry>, ModelKind)> {
        let key = format!("block/{name}");
        let direct_parent = self.load_file(&key)?.parent.clone();
        let merged = self.merge(&key, 0)?;
        // A model that neither holds nor inherits elements renders nothing.
        if merged.elements.is_empty() {
            return None;
        }
        let elements = merged
            .elements
            .iter()
            .map(|el| convert_element(el, &merged.textures))
            .collect();
        let kind = ModelKind::from_parent(direct_parent.as_deref());
        Some((Arc::new(BlockGeometry { elements }), kind))
    }

    fn merge(&mut self, key: &str, depth: usize) -> Option<MergedModel> {
        if depth > 24 {
            return None;
        }
        let file = self.load_file(key)?.clone();
        let mut out = if let Some(parent) = file.parent.as_deref() {
            self.merge(&normalize_key(parent), depth + 1)?
        } else {
            MergedModel::default()
        };
        if let Some(textures) = file.textures {
            for (k, v) in textures {
                out.textures.insert(k, v);
            }
        }
        if let Some(elements) = file.elements {
            out.elements = elements;
        }
        Some(out)
    }

    fn load_file(&mut self, key: &str) -> Option<&ModelFile> {
        if !self.files.contains_key(key) {
            let parsed = self
                .read_first(&format!("models/{key}.json"))
                .and_then(|raw| serde_json::from_str::<ModelFile>(&raw).ok());
            self.files.insert(key.to_string(), parsed);
        }
        self.files.get(key).and_then(|v| v.as_ref())
    }

    fn read_first(&self, rel: &str) -> Option<String> {
        for root in &self.roots {
            let path = root.join(rel);
            if path.is_file()
                && let Ok(content) = fs::read_to_string(&path)
            {
                return Some(content);
            }
        }
        None
    }
}

fn normalize_key(key: &str) -> String {
    key.strip_prefix("minecraft:").unwrap_or(key).to_string()
}

fn convert_element(el: &ElementFile, textures: &HashMap<String, String>) -> GeometryElement {
    let rotation = el.rotation.as_ref().and_then(|rot| {
        Some(ElementRotation {
            axis: Axis::from_attr(&rot.axis)?,
            origin: scaled(rot.origin),
            angle: rot.angle,
            rescale: rot.rescale,
        })
    });
    let mut faces = Vec::new();
    if let Some(raw) = &el.faces {
        for (key, face) in raw {
            let Some(dir) = FaceDir::from_key(key) else {
                continue;
            };
            let uv = face
                .uv
                .map(|uv| [uv[0] / 16.0, uv[1] / 16.0, uv[2] / 16.0, uv[3] / 16.0])
                .unwrap_or([0.0, 0.0, 1.0, 1.0]);
            faces.push(GeometryFace {
                dir,
                texture: resolve_texture_ref(textures, &face.texture, 0),
                uv,
                rotation: face.rotation.unwrap_or(0.0),
                tinted: face.tintindex.is_some(),
            });
        }
    }
    GeometryElement {
        from: scaled(el.from),
        to: scaled(el.to),
        rotation,
        faces,
    }
}

fn scaled(v: [f32; 3]) -> [f32; 3] {
    [v[0] / 16.0, v[1] / 16.0, v[2] / 16.0]
}

fn resolve_texture_ref(textures: &HashMap<String, String>, tex_ref: &str, depth: usize) -> String {
    if depth > 16 {
        return tex_ref.to_string();
    }
    if let Some(key) = tex_ref.strip_prefix('#') {
        if let Some(next) = textures.get(key) {
            return resolve_texture_ref(textures, next, depth + 1);
        }
        // Unresolvable reference, caught when textures are collected.
        return tex_ref.to_string();
    }
    tex_ref
        .strip_prefix("minecraft:")
        .unwrap_or(tex_ref)
        .to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct ModelFile {
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    textures: Option<HashMap<String, String>>,
    #[serde(default)]
    elements: Option<Vec<ElementFile>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ElementFile {
    from: [f32; 3],
    to: [f32; 3],
    #[serde(default)]
    rotation: Option<RotationFile>,
    #[serde(default)]
    faces: Option<BTreeMap<String, FaceFile>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RotationFile {
    origin: [f32; 3],
    axis: String,
    angle: f32,
    #[serde(default)]
    rescale: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct FaceFile {
    texture: String,
    #[serde(default)]
    uv: Option<[f32; 4]>,
    #[serde(default)]
    rotation: Option<f32>,
    #[serde(default)]
    tintindex: Option<i32>,
}

#[derive(Debug, Clone, Default)]
struct MergedModel {
    textures: HashMap<String, String>,
    elements: Vec<ElementFile>,
}
