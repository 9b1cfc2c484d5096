//! Triangle mesh primitive accelerated by an octree.

use std::sync::Arc;

use octa_core::{Face, Material, Mesh, TextureSampler};
use octa_math::{Ray, Vec2, Vec3};

use crate::bvh::Bvh;
use crate::hittable::{Hittable, Intersection};
use crate::triangle::{barycentric, interpolate_tex_coord, ray_triangle_intersect};
use crate::Result;

/// A mesh placed in the scene, with its BVH.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    bvh: Arc<Bvh>,
}

impl Polyhedron {
    pub fn new(bvh: Arc<Bvh>) -> Self {
        Self { bvh }
    }

    /// Build the BVH for `mesh` and wrap it.
    pub fn from_mesh(mesh: Arc<Mesh>, max_depth: u32) -> Result<Self> {
        let bvh = Bvh::build(mesh, max_depth)?;
        bvh.log_debug_information();
        Ok(Self::new(Arc::new(bvh)))
    }

    pub fn bvh(&self) -> &Arc<Bvh> {
        &self.bvh
    }

    /// Diffuse texture colour at `point` on `face`.
    ///
    /// White without a diffuse texture or texture coordinates, black when the
    /// triangle is degenerate.
    fn diffuse_colour(
        &self,
        face: &Face,
        corners: [Vec3; 3],
        point: Vec3,
        material: &Material,
        sampler: &TextureSampler,
    ) -> Vec3 {
        let Some(texture) = &material.textures.diffuse else {
            return Vec3::ONE;
        };
        let Some(tex_coords) = face.tex_coords(&self.bvh.mesh().tex_coords) else {
            return Vec3::ONE;
        };
        match barycentric(point, corners) {
            Some(weights) => {
                let uv = interpolate_tex_coord(weights, tex_coords);
                // OBJ texture coordinates grow upward
                sampler.sample_uv(Vec2::new(uv.x, 1.0 - uv.y), texture)
            }
            None => Vec3::ZERO,
        }
    }
}

impl Hittable for Polyhedron {
    fn intersect(&self, ray: &Ray, sampler: &TextureSampler) -> Option<Intersection> {
        let vertices = &self.bvh.mesh().vertices;
        let mut nearest: Option<Intersection> = None;

        self.bvh.traverse(ray, |face, material| {
            let Some(corners) = face.positions(vertices) else {
                return;
            };
            let Some(hit) = ray_triangle_intersect(ray, corners) else {
                return;
            };

            let distance = (ray.origin - hit.point).length();
            if nearest.as_ref().is_some_and(|n| n.distance <= distance) {
                return;
            }

            nearest = Some(Intersection {
                point: hit.point,
                normal: hit.normal,
                material: material.clone(),
                distance,
                diffuse_colour: self.diffuse_colour(face, corners, hit.point, material, sampler),
            });
        });

        nearest
    }
}
