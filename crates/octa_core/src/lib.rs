//! Octa Core - Meshes, materials and textures for the Octa ray tracer.
//!
//! This crate provides:
//!
//! - **Geometry**: `Mesh` with shared vertex arrays and material `Piece`s
//! - **Materials**: MTL-style `Material` with albedo weights and presets
//! - **Textures**: `Texture`, `TextureSampler` (nearest/bilinear, clamp/repeat), `TextureCache`
//! - **Loading**: OBJ/MTL files via `tobj`
//!
//! # Example
//!
//! ```ignore
//! use octa_core::{load_obj, TextureCache};
//!
//! let mut textures = TextureCache::new();
//! let scene = load_obj("teapot.obj", &mut textures)?;
//! println!("Loaded {} meshes, {} faces", scene.meshes.len(), scene.face_count());
//! ```

pub mod error;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod texture;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use loader::{load_obj, LoadedScene, DEFAULT_MATERIAL_NAME};
pub use material::{Albedo, Material, MaterialTextures};
pub use mesh::{Face, FaceVertex, Mesh, Piece};
pub use texture::{spherical, Filtering, Texture, TextureCache, TextureSampler, Wrapping};
