//! Sphere primitive for ray tracing.

use std::sync::Arc;

use octa_core::{spherical, Material, TextureSampler};
use octa_math::{Ray, Vec3};

use crate::hittable::{Hittable, Intersection};

/// A sphere centred at its local origin.
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(radius: f32, material: Arc<Material>) -> Self {
        Self {
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection> {
        // Geometric solution: project the centre onto the ray
        let l = -ray.origin;
        let tca = l.dot(ray.direction);
        let d2 = l.dot(l) - tca * tca;
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }

        // Near root only; hits behind the origin (including from inside) are rejected
        let t = tca - (r2 - d2).sqrt();
        if t < 0.0 {
            return None;
        }

        let point = ray.at(t);
        let normal = point.normalize_or_zero();
        let diffuse_colour = match &self.material.textures.diffuse {
            Some(texture) => sampler.sample_uv(spherical(normal), texture),
            None => Vec3::ONE,
        };

        Some(Intersection {
            point,
            normal,
            material: self.material.clone(),
            distance: (ray.origin - point).length(),
            diffuse_colour,
        })
    }
}
