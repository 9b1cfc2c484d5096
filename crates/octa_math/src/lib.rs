// Re-export glam for convenience
pub use glam::*;

// Octa math types
mod aabb;
mod optics;
mod plane;
mod ray;
mod segment;
mod transform;

pub use aabb::Aabb;
pub use optics::{reflect, refract, TOTAL_INTERNAL_REFLECTION};
pub use plane::{Classification, Plane, SplitResult, PLANE_EPSILON};
pub use ray::Ray;
pub use segment::LineSegment;
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        let c = a + b;
        assert_eq!(c, Vec3::new(5.0, 7.0, 9.0));
    }
}
