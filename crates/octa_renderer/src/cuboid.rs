//! Box primitive built from six bounded planes.

use std::sync::Arc;

use octa_core::{Material, TextureSampler};
use octa_math::{Ray, Transform, Vec3};

use crate::hittable::{Hittable, Intersection};
use crate::plane::BoundedPlane;

/// An axis-aligned box centred on its local origin.
///
/// Each face is a [`BoundedPlane`] with its own transform inside the box.
/// Face normals are the planes' rotated +Y and are not flipped outward.
#[derive(Debug, Clone)]
pub struct Cuboid {
    size: Vec3,
    faces: Vec<(Transform, BoundedPlane)>,
}

impl Cuboid {
    pub fn new(size: Vec3, material: Arc<Material>) -> Self {
        let half = size / 2.0;
        let face = |position: Vec3, rotation: Vec3, width: f32, height: f32| {
            (
                Transform::new(position, rotation),
                BoundedPlane::new(width, height, material.clone()),
            )
        };

        let faces = vec![
            // Left
            face(Vec3::new(-half.x, 0.0, 0.0), Vec3::new(0.0, 0.0, -90.0), size.y, size.z),
            // Right
            face(Vec3::new(half.x, 0.0, 0.0), Vec3::new(0.0, 0.0, 90.0), size.y, size.z),
            // Bottom
            face(Vec3::new(0.0, -half.y, 0.0), Vec3::new(180.0, 0.0, 0.0), size.x, size.z),
            // Top
            face(Vec3::new(0.0, half.y, 0.0), Vec3::ZERO, size.x, size.z),
            // Back
            face(Vec3::new(0.0, 0.0, -half.z), Vec3::new(-90.0, 0.0, 0.0), size.x, size.y),
            // Front
            face(Vec3::new(0.0, 0.0, half.z), Vec3::new(90.0, 0.0, 0.0), size.x, size.y),
        ];

        Self { size, faces }
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }
}

impl Hittable for Cuboid {
    fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection> {
        self.faces
            .iter()
            .filter_map(|(transform, plane)| {
                let local = transform.ray_to_local(ray);
                plane
                    .intersect(&local, sampler)
                    .map(|hit| hit.to_world(transform))
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
