use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tracing::warn;

use ls_model::ResolvedGrid;

use crate::error::ExportError;

/// Answers per-texture alpha queries, caching decode results. Passed
/// explicitly wherever face directives are written rather than living in
/// ambient global state.
pub struct TextureOracle {
    root: PathBuf,
    alpha: HashMap<String, bool>,
}

impl TextureOracle {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            alpha: HashMap::new(),
        }
    }

    /// In-memory oracle for tests and synthetic scenes.
    pub fn preloaded(entries: &[(&str, bool)]) -> Self {
        let mut oracle = Self::new(PathBuf::new());
        for (texture, alpha) in entries {
            oracle.alpha.insert(texture.to_string(), *alpha);
        }
        oracle
    }

    pub fn has_alpha(&mut self, texture: &str) -> bool {
        if let Some(&cached) = self.alpha.get(texture) {
            return cached;
        }
        let value = self.probe(texture);
        self.alpha.insert(texture.to_string(), value);
        value
    }

    fn probe(&self, texture: &str) -> bool {
        let path = self.root.join(format!("{texture}.png"));
        match image::open(&path) {
            Ok(img) => img.to_rgba8().pixels().any(|p| p.0[3] < 255),
            Err(_) => {
                warn!("missing texture {}, treating as opaque", path.display());
                false
            }
        }
    }
}

/// Every texture the resolved grid will reference. A texture id still
/// carrying the `#` reference marker cannot be turned into a consistent
/// texture set, so it aborts the export before any block output.
pub fn used_textures(resolved: &ResolvedGrid) -> Result<BTreeSet<String>, ExportError> {
    let mut used = BTreeSet::new();
    for block in resolved.blocks() {
        for entry in &block.entries {
            for element in &entry.geometry.elements {
                for face in &element.faces {
                    if face.texture.starts_with('#') {
                        return Err(ExportError::UnresolvedTexture {
                            texture: face.texture.clone(),
                        });
                    }
                    used.insert(face.texture.clone());
                }
            }
        }
    }
    Ok(used)
}
