//! Object transforms for ray tracing.
//!
//! Objects are placed by a position and Euler rotation in degrees. Rays are
//! moved into an object's local space by the inverse transform, and hits are
//! moved back out by the model matrix.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::Ray;

/// Position and Euler rotation (degrees) of a scene object.
///
/// Primitives encode their extents directly (radius, width, size), so there
/// is no scale.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO)
    }

    /// Rotation part of the model matrix: `Rx · Ry · Rz`.
    pub fn rotation_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
    }

    /// Inverse of the rotation: `Rz(-z) · Ry(-y) · Rx(-x)`.
    pub fn inverse_rotation_matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_rotation_z(-r.z.to_radians())
            * Mat4::from_rotation_y(-r.y.to_radians())
            * Mat4::from_rotation_x(-r.x.to_radians())
    }

    /// Local-to-world matrix: `T · Rx · Ry · Rz`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.rotation_matrix()
    }

    /// World-to-local matrix: `Rz(-z) · Ry(-y) · Rx(-x) · T(-p)`.
    pub fn inverse_matrix(&self) -> Mat4 {
        self.inverse_rotation_matrix() * Mat4::from_translation(-self.position)
    }

    /// Move a world-space ray into local space. Length and sample coordinate
    /// are preserved.
    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        Ray {
            origin: self.inverse_matrix().transform_point3(ray.origin),
            direction: self.inverse_rotation_matrix().transform_vector3(ray.direction),
            length: ray.length,
            sample: ray.sample,
        }
    }

    pub fn point_to_world(&self, point: Vec3) -> Vec3 {
        self.model_matrix().transform_point3(point)
    }

    pub fn normal_to_world(&self, normal: Vec3) -> Vec3 {
        self.rotation_matrix().transform_vector3(normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    #[test]
    fn test_transform_from_json() {
        let transform: Transform =
            serde_json::from_str(r#"{"position": [1.0, 2.0, 3.0]}"#).unwrap();

        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.rotation, Vec3::ZERO);
    }

    #[test]
    fn test_identity_transform() {
        let transform = Transform::default();
        let point = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(transform.point_to_world(point), point);
        assert_eq!(transform.normal_to_world(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_translation_round_trip() {
        let transform = Transform::from_position(Vec3::new(10.0, 20.0, 30.0));
        let point = Vec3::new(1.0, 2.0, 3.0);

        let world = transform.point_to_world(point);
        assert_eq!(world, Vec3::new(11.0, 22.0, 33.0));

        let local = transform.inverse_matrix().transform_point3(world);
        assert!((local - point).length() < 1e-4);
    }

    #[test]
    fn test_inverse_matrix_undoes_model_matrix() {
        let transform = Transform::new(Vec3::new(-6.7, 9.6, -5.5), Vec3::new(90.0, 25.0, -90.0));
        let product = transform.inverse_matrix() * transform.model_matrix();

        let point = Vec3::new(0.3, -1.2, 4.0);
        assert!((product.transform_point3(point) - point).length() < 1e-4);
    }

    #[test]
    fn test_rotation_degrees() {
        // 90 degrees about Z takes X to Y
        let transform = Transform::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 90.0));
        let rotated = transform.normal_to_world(Vec3::X);

        assert!((rotated - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_ray_to_local_preserves_length_and_sample() {
        let transform = Transform::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 90.0, 0.0));
        let ray = Ray::with_length(Vec3::ZERO, Vec3::NEG_Z, 250.0, Vec2::new(4.25, 7.75));

        let local = transform.ray_to_local(&ray);

        assert_eq!(local.length, 250.0);
        assert_eq!(local.sample, ray.sample);
        assert!((local.direction.length() - 1.0).abs() < 1e-5);
        // The object is 5 units away along the ray either way
        assert!((local.origin.length() - 5.0).abs() < 1e-4);
    }
}
