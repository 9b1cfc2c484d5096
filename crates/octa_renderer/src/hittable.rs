//! Hittable trait and intersection record for ray-object intersection.

use std::sync::Arc;

use octa_core::{Material, TextureSampler};
use octa_math::{Ray, Transform, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Debug)]
pub struct Intersection {
    /// Point of intersection
    pub point: Vec3,
    /// Surface normal at the intersection (not flipped toward the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: Arc<Material>,
    /// Distance from the ray origin to the point
    pub distance: f32,
    /// Diffuse texture colour at the point, white when untextured
    pub diffuse_colour: Vec3,
}

impl Intersection {
    /// Move a local-space intersection into the space of `transform`'s parent.
    ///
    /// Distances are unchanged since transforms are rigid.
    pub fn to_world(mut self, transform: &Transform) -> Self {
        self.point = transform.point_to_world(self.point);
        self.normal = transform.normal_to_world(self.normal).normalize_or_zero();
        self
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test a ray given in the object's local space.
    ///
    /// Returns the hit in local space, if any.
    fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection>;
}

/// A primitive placed in the world by a transform.
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    shape: Box<dyn Hittable>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, transform: Transform, shape: impl Hittable + 'static) -> Self {
        Self {
            name: name.into(),
            transform,
            shape: Box::new(shape),
        }
    }

    /// Test a world-space ray; the hit comes back in world space.
    pub fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection> {
        let local = self.transform.ray_to_local(ray);
        self.shape
            .intersect(&local, sampler)
            .map(|hit| hit.to_world(&self.transform))
    }
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneObject")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}
