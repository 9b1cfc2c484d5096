//! Point lights with a finite radius of influence.

use octa_math::Vec3;

use crate::{RenderError, Result};

/// A point light.
///
/// Light falls off as `(1 - d/radius)²` and contributes nothing beyond
/// `radius`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionalLight {
    pub colour: Vec3,
    pub position: Vec3,
    pub power: f32,
    radius: f32,
}

impl PositionalLight {
    /// Fails if `radius` is not greater than zero.
    pub fn new(colour: Vec3, position: Vec3, power: f32, radius: f32) -> Result<Self> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(RenderError::InvalidLightRadius(radius));
        }
        Ok(Self {
            colour,
            position,
            power,
            radius,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Attenuation at `distance` from the light, in `[0, 1]`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        let falloff = (1.0 - distance / self.radius).clamp(0.0, 1.0);
        falloff * falloff
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.radius
    }
}
