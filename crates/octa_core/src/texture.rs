//! Texture loading, caching and sampling.
//!
//! Textures keep their pixels exactly as stored in the image, scaled to the
//! 0-1 range. The same sampler serves material textures and the
//! equirectangular environment map.

use std::collections::HashMap;
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use octa_math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A loaded texture with pixel data.
///
/// Row 0 is the top of the image, so `v` grows downward.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data as [R, G, B, A] in 0-1 range, row-major order
    pub pixels: Vec<[f32; 4]>,

    /// Source file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            path: "<solid>".to_string(),
        }
    }

    /// Get pixel at integer coordinates. Missing pixels read as opaque black.
    pub fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = y as usize * self.width as usize + x as usize;
        let [r, g, b, _] = self
            .pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0]);
        Vec3::new(r, g, b)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// How texels are combined at a lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filtering {
    Nearest,
    #[default]
    Bilinear,
}

/// How texel coordinates outside the image are brought back inside.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrapping {
    Clamp,
    #[default]
    Repeat,
}

impl Wrapping {
    fn wrap(self, coord: i64, size: u32) -> u32 {
        let size = i64::from(size.max(1));
        let wrapped = match self {
            Wrapping::Clamp => coord.clamp(0, size - 1),
            Wrapping::Repeat => coord.rem_euclid(size),
        };
        wrapped as u32
    }
}

/// Samples textures at continuous `(u, v)` coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextureSampler {
    pub filtering: Filtering,
    pub wrapping: Wrapping,
}

impl TextureSampler {
    pub fn new(filtering: Filtering, wrapping: Wrapping) -> Self {
        Self {
            filtering,
            wrapping,
        }
    }

    pub fn sample(&self, u: f32, v: f32, texture: &Texture) -> Vec3 {
        match self.filtering {
            Filtering::Nearest => self.nearest(u, v, texture),
            Filtering::Bilinear => self.bilinear(u, v, texture),
        }
    }

    pub fn sample_uv(&self, uv: Vec2, texture: &Texture) -> Vec3 {
        self.sample(uv.x, uv.y, texture)
    }

    fn texel(&self, x: i64, y: i64, texture: &Texture) -> Vec3 {
        texture.get_pixel(
            self.wrapping.wrap(x, texture.width),
            self.wrapping.wrap(y, texture.height),
        )
    }

    fn nearest(&self, u: f32, v: f32, texture: &Texture) -> Vec3 {
        let x = (u * texture.width as f32).floor() as i64;
        let y = (v * texture.height as f32).floor() as i64;
        self.texel(x, y, texture)
    }

    fn bilinear(&self, u: f32, v: f32, texture: &Texture) -> Vec3 {
        let fx = u * texture.width as f32 - 0.5;
        let fy = v * texture.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top_left = self.texel(x0, y0, texture);
        let top_right = self.texel(x0 + 1, y0, texture);
        let bottom_left = self.texel(x0, y0 + 1, texture);
        let bottom_right = self.texel(x0 + 1, y0 + 1, texture);

        let top = top_left.lerp(top_right, tx);
        let bottom = bottom_left.lerp(bottom_right, tx);
        top.lerp(bottom, ty)
    }
}

/// Map a unit direction to equirectangular `(u, v)`:
/// longitude from `atan2(z, x)`, latitude from `acos(y)`.
pub fn spherical(direction: Vec3) -> Vec2 {
    let u = direction.z.atan2(direction.x) / (2.0 * PI) + 0.5;
    let v = direction.y.clamp(-1.0, 1.0).acos() / PI;
    Vec2::new(u, v)
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse. Entries are keyed on
/// the resolved path, so the same relative name under two base directories
/// gives two textures.
pub struct TextureCache {
    /// Cached textures by resolved file path
    textures: HashMap<PathBuf, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Set the base directory for resolving relative paths.
    pub fn set_base_dir(&mut self, base_dir: impl Into<PathBuf>) {
        self.base_dir = Some(base_dir.into());
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> Result<Arc<Texture>> {
        let full_path = self.resolve_path(path);
        if let Some(texture) = self.textures.get(&full_path) {
            return Ok(texture.clone());
        }

        let texture = Arc::new(load_texture_file(&full_path)?);
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );
        self.textures.insert(full_path, texture.clone());

        Ok(texture)
    }

    /// Get a cached texture without loading. Relative paths resolve against
    /// the current base directory.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(&self.resolve_path(path)).cloned()
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(base) = &self.base_dir {
            base.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a texture from a file path.
pub fn load_texture_file(path: &Path) -> Result<Texture> {
    let img = image::open(path).map_err(|source| CoreError::Texture {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| p.0.map(|channel| f32::from(channel) / 255.0))
        .collect();

    Ok(Texture::new(
        width,
        height,
        pixels,
        path.to_string_lossy().to_string(),
    ))
}
