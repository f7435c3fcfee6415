pub mod biome;
pub mod emitter;
pub mod error;
pub mod fluid;
pub mod material;
pub mod scene;
pub mod stream;
pub mod textures;
pub mod traversal;

pub use error::ExportError;
pub use scene::{ExportStats, SceneSetup, export_scene};
pub use stream::SceneStream;
pub use textures::TextureOracle;
pub use traversal::{VisitedSet, traverse};

#[cfg(test)]
mod tests;
