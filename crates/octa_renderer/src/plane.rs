//! Bounded plane primitive.

use std::sync::Arc;

use octa_core::{Material, TextureSampler};
use octa_math::{Ray, Vec3};

use crate::hittable::{Hittable, Intersection};

/// Rays closer than this to parallel with the plane miss it.
const PARALLEL_EPSILON: f32 = 1e-3;

/// A rectangle in the local XZ plane facing +Y, centred on the origin.
///
/// `width` runs along X and `height` along Z.
#[derive(Debug, Clone)]
pub struct BoundedPlane {
    width: f32,
    height: f32,
    material: Arc<Material>,
}

impl BoundedPlane {
    pub const NORMAL: Vec3 = Vec3::Y;

    pub fn new(width: f32, height: f32, material: Arc<Material>) -> Self {
        Self {
            width,
            height,
            material,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Hittable for BoundedPlane {
    fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection> {
        let segment = ray.direction * ray.length;
        let denominator = Self::NORMAL.dot(segment);
        if denominator.abs() <= PARALLEL_EPSILON {
            return None;
        }

        // Fraction of the segment travelled before crossing y = 0
        let percent = -Self::NORMAL.dot(ray.origin) / denominator;
        if !(0.0..=1.0).contains(&percent) {
            return None;
        }

        let travelled = segment * percent;
        let point = ray.origin + travelled;
        if point.x.abs() >= self.width / 2.0 || point.z.abs() >= self.height / 2.0 {
            return None;
        }

        let diffuse_colour = match &self.material.textures.diffuse {
            Some(texture) => sampler.sample(
                point.x / self.width + 0.5,
                point.z / self.height + 0.5,
                texture,
            ),
            None => Vec3::ONE,
        };

        Some(Intersection {
            point,
            normal: Self::NORMAL,
            material: self.material.clone(),
            distance: travelled.length(),
            diffuse_colour,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octa_core::{Filtering, Texture, Wrapping};
    use octa_math::Vec2;

    fn floor() -> BoundedPlane {
        BoundedPlane::new(4.0, 2.0, Arc::new(Material::new("floor", Vec3::ONE)))
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Vec3::new(0.5, 3.0, 0.25), Vec3::NEG_Y, Vec2::ZERO);
        let hit = floor().intersect(&ray, &TextureSampler::default()).unwrap();

        assert!((hit.point - Vec3::new(0.5, 0.0, 0.25)).length() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.distance - 3.0).abs() < 1e-3);
        assert_eq!(hit.diffuse_colour, Vec3::ONE);
    }

    #[test]
    fn test_plane_hit_from_below_keeps_normal() {
        let ray = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y, Vec2::ZERO);
        let hit = floor().intersect(&ray, &TextureSampler::default()).unwrap();

        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.distance - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_plane_bounds_are_strict() {
        let sampler = TextureSampler::default();

        // Inside along X, outside along Z (height 2 => |z| < 1)
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.5), Vec3::NEG_Y, Vec2::ZERO);
        assert!(floor().intersect(&ray, &sampler).is_none());

        // Outside along X (width 4 => |x| < 2)
        let ray = Ray::new(Vec3::new(2.5, 1.0, 0.0), Vec3::NEG_Y, Vec2::ZERO);
        assert!(floor().intersect(&ray, &sampler).is_none());
    }

    #[test]
    fn test_plane_parallel_and_short_rays_miss() {
        let sampler = TextureSampler::default();

        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X, Vec2::ZERO);
        assert!(floor().intersect(&ray, &sampler).is_none());

        // Plane is beyond the end of the segment
        let ray = Ray::with_length(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 2.0, Vec2::ZERO);
        assert!(floor().intersect(&ray, &sampler).is_none());

        // Plane is behind the origin
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, Vec2::ZERO);
        assert!(floor().intersect(&ray, &sampler).is_none());
    }

    #[test]
    fn test_plane_texture_coordinates() {
        // Left half red, right half blue
        let texture = Texture::new(
            2,
            1,
            vec![[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
            "split",
        );
        let material = Material::new("split", Vec3::ONE).with_diffuse_texture(Some(Arc::new(texture)));
        let plane = BoundedPlane::new(4.0, 2.0, Arc::new(material));
        let sampler = TextureSampler::new(Filtering::Nearest, Wrapping::Clamp);

        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::NEG_Y, Vec2::ZERO);
        let hit = plane.intersect(&ray, &sampler).unwrap();
        assert_eq!(hit.diffuse_colour, Vec3::X);

        let ray = Ray::new(Vec3::new(1.0, 1.0, 0.0), Vec3::NEG_Y, Vec2::ZERO);
        let hit = plane.intersect(&ray, &sampler).unwrap();
        assert_eq!(hit.diffuse_colour, Vec3::Z);
    }
}
