//! Octa Renderer - CPU Whitted-style ray tracing
//!
//! A recursive ray tracer with reflection, refraction, positional lights
//! with shadows, and environment mapping. Meshes are accelerated by a
//! fixed-depth octree; overlapping primitives are arbitrated per sample by
//! a z-buffer.

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod light;
mod options;
mod plane;
mod polyhedron;
mod renderer;
mod sampler;
mod scene;
mod sphere;
mod tracer;
mod triangle;
mod zbuffer;

pub use bucket::{generate_buckets, render_bucket, render_parallel, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhEntry, BvhNode, DEFAULT_MAX_DEPTH};
pub use camera::{Camera, RayCaster};
pub use cuboid::Cuboid;
pub use error::{RenderError, Result};
pub use hittable::{Hittable, Intersection, SceneObject};
pub use light::PositionalLight;
pub use options::RenderOptions;
pub use plane::BoundedPlane;
pub use polyhedron::Polyhedron;
pub use renderer::{color_to_rgba, prevent_overflow, render, Color, ImageBuffer, RenderContext};
pub use sampler::AntiAliasing;
pub use scene::{Scene, FAR_CLIP};
pub use sphere::Sphere;
pub use tracer::RayTracer;
pub use triangle::{barycentric, interpolate_tex_coord, ray_triangle_intersect, TriangleHit};
pub use zbuffer::{SampleIndexFn, ZBuffer};

/// Re-export common math types from octa_math
pub use octa_math::{Ray, Transform, Vec2, Vec3};
