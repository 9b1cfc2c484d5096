//! Render configuration.

use std::path::{Path, PathBuf};

use octa_core::{Filtering, TextureSampler, Wrapping};
use octa_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::bvh::DEFAULT_MAX_DEPTH;
use crate::sampler::AntiAliasing;
use crate::Result;

/// Everything a render reads at start-up.
///
/// Missing fields in a JSON file fall back to [`RenderOptions::production`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub output_path: PathBuf,
    pub environment_map: PathBuf,
    pub camera_position: Vec3,
    pub camera_rotation_degrees: Vec3,
    pub camera_vfov_degrees: f32,
    /// Recursion depth for reflection and refraction
    pub ray_bounces: i32,
    pub anti_aliasing: AntiAliasing,
    pub texture_filtering: Filtering,
    pub tex_coord_wrapping: Wrapping,
    pub ambient_light: Vec3,
    pub bvh_max_depth: u32,
    /// Render buckets on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::production()
    }
}

impl RenderOptions {
    /// Full-quality settings.
    pub fn production() -> Self {
        Self {
            width: 640,
            height: 480,
            output_path: PathBuf::from("render.png"),
            environment_map: PathBuf::from("textures/EnvironmentMap.jpg"),
            camera_position: Vec3::new(0.0, 7.0, 12.5),
            camera_rotation_degrees: Vec3::ZERO,
            camera_vfov_degrees: 60.0,
            ray_bounces: 3,
            anti_aliasing: AntiAliasing::SuperSampling,
            texture_filtering: Filtering::Bilinear,
            tex_coord_wrapping: Wrapping::Repeat,
            ambient_light: Vec3::splat(0.095),
            bvh_max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
        }
    }

    /// Quick preview settings.
    pub fn development() -> Self {
        Self {
            width: 320,
            height: 240,
            ray_bounces: 2,
            anti_aliasing: AntiAliasing::None,
            texture_filtering: Filtering::Nearest,
            ..Self::production()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn texture_sampler(&self) -> TextureSampler {
        TextureSampler::new(self.texture_filtering, self.tex_coord_wrapping)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderError;

    #[test]
    fn test_presets() {
        let production = RenderOptions::default();
        assert_eq!(production.width, 640);
        assert_eq!(production.height, 480);
        assert_eq!(production.ray_bounces, 3);
        assert_eq!(production.anti_aliasing, AntiAliasing::SuperSampling);
        assert_eq!(production.bvh_max_depth, 2);

        let development = RenderOptions::development();
        assert_eq!(development.width, 320);
        assert_eq!(development.ray_bounces, 2);
        assert_eq!(development.anti_aliasing, AntiAliasing::None);
        assert_eq!(development.texture_filtering, Filtering::Nearest);
        assert_eq!(development.camera_position, production.camera_position);
    }

    #[test]
    fn test_partial_json() {
        let options = RenderOptions::from_json_str(
            r#"{
                "width": 64,
                "height": 48,
                "anti_aliasing": "none",
                "tex_coord_wrapping": "clamp",
                "camera_position": [1.0, 2.0, 3.0]
            }"#,
        )
        .unwrap();

        assert_eq!(options.width, 64);
        assert_eq!(options.height, 48);
        assert_eq!(options.anti_aliasing, AntiAliasing::None);
        assert_eq!(options.tex_coord_wrapping, Wrapping::Clamp);
        assert_eq!(options.camera_position, Vec3::new(1.0, 2.0, 3.0));
        // Untouched fields keep production values
        assert_eq!(options.ray_bounces, 3);
        assert_eq!(options.texture_filtering, Filtering::Bilinear);
    }

    #[test]
    fn test_invalid_json() {
        let result = RenderOptions::from_json_str(r#"{ "anti_aliasing": "sometimes" }"#);
        assert!(matches!(result, Err(RenderError::Options(_))));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{ "ray_bounces": 5, "parallel": true }"#).unwrap();

        let options = RenderOptions::from_json_file(&path).unwrap();
        assert_eq!(options.ray_bounces, 5);
        assert!(options.parallel);

        let missing = RenderOptions::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(RenderError::Io(_))));
    }
}
