//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm, plus barycentric weights for texture
//! coordinate interpolation.

use octa_math::{Ray, Vec2, Vec3};

/// Tolerance for parallel rays and self-intersection.
const EPSILON: f32 = 1e-3;

/// Where a ray meets a triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleHit {
    /// Parameter along the ray
    pub t: f32,
    pub point: Vec3,
    /// Face normal (unit length, not interpolated)
    pub normal: Vec3,
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Rejects rays (nearly) parallel to the triangle and hits at or before the
/// ray origin.
pub fn ray_triangle_intersect(ray: &Ray, [v0, v1, v2]: [Vec3; 3]) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Check if intersection is outside triangle (u parameter)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Check if intersection is outside triangle (v parameter)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t <= EPSILON {
        return None;
    }

    Some(TriangleHit {
        t,
        point: ray.at(t),
        normal: edge1.cross(edge2).normalize_or_zero(),
    })
}

/// Barycentric weights `(u, v, w)` of `point` relative to triangle `a, b, c`,
/// so that `point = a·u + b·v + c·w`.
///
/// Returns `None` for degenerate triangles.
pub fn barycentric(point: Vec3, [a, b, c]: [Vec3; 3]) -> Option<Vec3> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);

    let denominator = d00 * d11 - d01 * d01;
    if denominator == 0.0 {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denominator;
    let w = (d00 * d21 - d01 * d20) / denominator;
    Some(Vec3::new(1.0 - v - w, v, w))
}

/// Interpolate per-corner texture coordinates with barycentric weights.
pub fn interpolate_tex_coord(weights: Vec3, [t0, t1, t2]: [Vec2; 3]) -> Vec2 {
    t0 * weights.x + t1 * weights.y + t2 * weights.z
}
