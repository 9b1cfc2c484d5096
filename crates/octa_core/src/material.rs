//! Surface materials for the ray tracer.
//!
//! Colours and coefficients follow the MTL vocabulary (Ka, Kd, Ks, Ke, Ns, Ni,
//! d, Tr, Tf, illum). Four albedo weights scale the diffuse, specular,
//! reflective and refractive contributions of the shader independently.

use std::sync::Arc;

use octa_math::Vec3;

use crate::texture::Texture;

/// Weights applied to each shading contribution.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Albedo {
    pub diffuse: f32,
    pub specular: f32,
    pub reflective: f32,
    pub refractive: f32,
}

impl Albedo {
    pub const fn new(diffuse: f32, specular: f32, reflective: f32, refractive: f32) -> Self {
        Self {
            diffuse,
            specular,
            reflective,
            refractive,
        }
    }
}

impl Default for Albedo {
    /// Fully lit, neither reflective nor refractive.
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.0, 0.0)
    }
}

/// Optional texture maps of a material.
#[derive(Clone, Debug, Default)]
pub struct MaterialTextures {
    pub ambient: Option<Arc<Texture>>,
    pub diffuse: Option<Arc<Texture>>,
    pub specular: Option<Arc<Texture>>,
    pub emissive: Option<Arc<Texture>>,
    pub specular_exponent: Option<Arc<Texture>>,
    pub index_of_refraction: Option<Arc<Texture>>,
    pub dissolve: Option<Arc<Texture>>,
    pub transparency: Option<Arc<Texture>>,
    pub transmission_filter: Option<Arc<Texture>>,
}

impl MaterialTextures {
    pub fn count(&self) -> usize {
        [
            &self.ambient,
            &self.diffuse,
            &self.specular,
            &self.emissive,
            &self.specular_exponent,
            &self.index_of_refraction,
            &self.dissolve,
            &self.transparency,
            &self.transmission_filter,
        ]
        .iter()
        .filter(|t| t.is_some())
        .count()
    }
}

/// A named surface description.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,

    /// Illumination model, 0..=10
    pub illumination_model: u8,

    pub ambient_colour: Vec3,
    pub diffuse_colour: Vec3,
    pub specular_colour: Vec3,
    pub emissive_colour: Vec3,
    pub transmission_filter: Vec3,

    /// Phong exponent
    pub specular_exponent: f32,
    pub index_of_refraction: f32,
    pub dissolve: f32,
    pub transparency: f32,

    pub albedo: Albedo,
    pub textures: MaterialTextures,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            illumination_model: 2,
            ambient_colour: Vec3::ZERO,
            diffuse_colour: Vec3::ONE,
            specular_colour: Vec3::ZERO,
            emissive_colour: Vec3::ZERO,
            transmission_filter: Vec3::ONE,
            specular_exponent: 1.0,
            index_of_refraction: 1.0,
            dissolve: 1.0,
            transparency: 0.0,
            albedo: Albedo::default(),
            textures: MaterialTextures::default(),
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse colour.
    pub fn new(name: impl Into<String>, diffuse_colour: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse_colour,
            ..Default::default()
        }
    }

    fn preset(
        name: &str,
        diffuse_colour: Vec3,
        specular_colour: Vec3,
        albedo: Albedo,
        specular_exponent: f32,
        index_of_refraction: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            diffuse_colour,
            specular_colour,
            albedo,
            specular_exponent,
            index_of_refraction,
            ..Default::default()
        }
    }

    pub fn with_diffuse_texture(mut self, texture: Option<Arc<Texture>>) -> Self {
        self.textures.diffuse = texture;
        self
    }

    pub fn glass() -> Self {
        Self::preset(
            "Glass",
            Vec3::new(0.5, 0.6, 0.7),
            Vec3::splat(0.8),
            Albedo::new(0.0, 0.5, 0.1, 0.8),
            125.0,
            1.5,
        )
    }

    pub fn mirror() -> Self {
        Self::preset(
            "Mirror",
            Vec3::ONE,
            Vec3::ONE,
            Albedo::new(0.0, 10.0, 0.8, 0.0),
            1425.0,
            1.0,
        )
    }

    pub fn shiny_green() -> Self {
        Self::preset(
            "ShinyGreen",
            Vec3::new(0.4, 1.0, 0.3),
            Vec3::splat(0.85),
            Albedo::new(0.65, 0.85, 0.0, 0.0),
            40.0,
            1.0,
        )
    }

    pub fn shiny_red() -> Self {
        Self::preset(
            "ShinyRed",
            Vec3::new(0.98, 0.25, 0.28),
            Vec3::new(0.82, 0.62, 0.62),
            Albedo::new(0.55, 0.75, 0.0, 0.0),
            32.0,
            1.0,
        )
    }

    pub fn blue_box() -> Self {
        Self::preset(
            "BlueBox",
            Vec3::new(0.185, 0.125, 0.827),
            Vec3::splat(0.85),
            Albedo::new(0.65, 0.81, 0.0, 0.0),
            16.0,
            1.0,
        )
    }

    /// Planet surface; pass the planet map as the diffuse texture.
    pub fn mars(texture: Option<Arc<Texture>>) -> Self {
        Self::preset(
            "Mars",
            Vec3::new(0.98, 0.97, 0.97),
            Vec3::splat(0.62),
            Albedo::new(0.95, 0.35, 0.0, 0.0),
            24.0,
            1.0,
        )
        .with_diffuse_texture(texture)
    }

    pub fn crate_wood(texture: Option<Arc<Texture>>) -> Self {
        Self::preset(
            "Crate",
            Vec3::splat(0.977),
            Vec3::splat(0.65),
            Albedo::new(0.73, 0.11, 0.0, 0.0),
            4.0,
            1.0,
        )
        .with_diffuse_texture(texture)
    }

    pub fn old_painting(texture: Option<Arc<Texture>>) -> Self {
        Self::preset(
            "OldPainting",
            Vec3::splat(0.977),
            Vec3::splat(0.65),
            Albedo::new(0.73, 0.11, 0.0, 0.0),
            2.0,
            1.0,
        )
        .with_diffuse_texture(texture)
    }

    pub fn has_textures(&self) -> bool {
        self.textures.count() > 0
    }

    pub fn is_reflective(&self) -> bool {
        self.albedo.reflective > 0.0
    }

    pub fn is_refractive(&self) -> bool {
        self.albedo.refractive > 0.0
    }
}
