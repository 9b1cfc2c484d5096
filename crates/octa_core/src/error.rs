use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading textures, materials and meshes.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load texture {path}: {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to load OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Material '{material}' used by piece '{piece}' is not defined")]
    UnresolvedMaterial { piece: String, material: String },

    #[error("Face in piece '{piece}' references {kind} index {index} out of {len}")]
    InvalidIndex {
        piece: String,
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
