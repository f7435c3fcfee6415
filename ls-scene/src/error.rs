use thiserror::Error;

/// Fatal export failures. Missing geometry never lands here: a voxel
/// whose model cannot be found renders nothing and the export continues.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("texture reference {texture:?} never resolved to a concrete texture")]
    UnresolvedTexture { texture: String },
}
