use std::path::PathBuf;

use octa_core::CoreError;
use thiserror::Error;

/// Errors raised while setting up or writing out a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Light radius must be greater than zero, got {0}")]
    InvalidLightRadius(f32),

    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid render options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
