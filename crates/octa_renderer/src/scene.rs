//! Scene container and nearest-hit arbitration.

use octa_core::TextureSampler;
use octa_math::Ray;

use crate::hittable::{Intersection, SceneObject};
use crate::zbuffer::ZBuffer;

/// Hits at or beyond this depth count as misses.
pub const FAR_CLIP: f32 = 1000.0;

/// An ordered list of placed primitives.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    sampler: TextureSampler,
}

impl Scene {
    pub fn new(sampler: TextureSampler) -> Self {
        Self {
            objects: Vec::new(),
            sampler,
        }
    }

    pub fn add(&mut self, object: SceneObject) {
        log::debug!("Adding object '{}'", object.name);
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn sampler(&self) -> &TextureSampler {
        &self.sampler
    }

    /// Find the hit for `ray` that wins its z-buffer slot.
    ///
    /// Objects are tested in insertion order and every hit is offered to the
    /// z-buffer at the ray's sample coordinate; the last accepted one is
    /// returned. Because the buffer keeps depths from earlier rays cast for
    /// the same sample, a hit must also be nearer than those to count.
    pub fn intersect(&self, ray: &Ray, zbuffer: &mut ZBuffer) -> Option<Intersection> {
        let (x, y) = (ray.sample.x, ray.sample.y);
        let mut result = None;

        for object in &self.objects {
            if let Some(hit) = object.intersect(ray, &self.sampler) {
                if zbuffer.test_and_update(x, y, hit.distance) {
                    result = Some(hit);
                }
            }
        }

        if zbuffer.depth_at(x, y) >= FAR_CLIP {
            return None;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AntiAliasing, Sphere};
    use octa_core::Material;
    use octa_math::{Transform, Vec2, Vec3};
    use std::sync::Arc;

    fn sphere_at(name: &str, z: f32) -> SceneObject {
        let material = Arc::new(Material::new(name, Vec3::ONE));
        SceneObject::new(
            name,
            Transform::from_position(Vec3::new(0.0, 0.0, z)),
            Sphere::new(1.0, material),
        )
    }

    #[test]
    fn test_nearest_object_wins_in_either_order() {
        let sample = Vec2::new(0.5, 0.5);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, sample);

        for (first, second) in [(0.0, 5.0), (5.0, 0.0)] {
            let mut scene = Scene::default();
            scene.add(sphere_at(&format!("z{first}"), first));
            scene.add(sphere_at(&format!("z{second}"), second));

            let mut zbuffer = AntiAliasing::None.zbuffer(1, 1);
            let hit = scene.intersect(&ray, &mut zbuffer).unwrap();

            assert_eq!(hit.material.name, "z5");
            assert!((hit.distance - 4.0).abs() < 1e-4);
            assert!((zbuffer.depth_at(0.5, 0.5) - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_miss_and_out_of_buffer() {
        let mut scene = Scene::default();
        scene.add(sphere_at("ball", 0.0));
        let mut zbuffer = AntiAliasing::None.zbuffer(1, 1);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Z, Vec2::new(0.5, 0.5));
        assert!(scene.intersect(&ray, &mut zbuffer).is_none());

        // Sample coordinate outside the buffer never claims a slot
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec2::new(3.5, 0.5));
        assert!(scene.intersect(&ray, &mut zbuffer).is_none());
    }

    #[test]
    fn test_secondary_ray_must_beat_recorded_depth() {
        let mut scene = Scene::default();
        scene.add(sphere_at("ball", 0.0));
        let mut zbuffer = AntiAliasing::None.zbuffer(1, 1);
        let sample = Vec2::new(0.5, 0.5);

        let primary = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, sample);
        assert!(scene.intersect(&primary, &mut zbuffer).is_some());

        // Same sample, farther hit: rejected by the buffer
        let secondary = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::NEG_Z, sample);
        assert!(scene.intersect(&secondary, &mut zbuffer).is_none());
    }
}
