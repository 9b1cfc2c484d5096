use crate::{LineSegment, Vec2, Vec3};

/// A bounded ray in 3D space.
///
/// Rays travel from `origin` along a unit `direction` for at most `length`
/// units. Every ray remembers the continuous image coordinate it was cast for
/// (`sample`), so secondary rays spawned while shading can be arbitrated in
/// the same z-buffer slot as their primary ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
    pub sample: Vec2,
}

impl Ray {
    /// Segment length given to rays that don't specify one.
    pub const DEFAULT_LENGTH: f32 = 1000.0;

    /// Create a new ray. The direction is normalised (a zero direction stays zero).
    pub fn new(origin: Vec3, direction: Vec3, sample: Vec2) -> Self {
        Self::with_length(origin, direction, Self::DEFAULT_LENGTH, sample)
    }

    /// Create a new ray with an explicit segment length.
    pub fn with_length(origin: Vec3, direction: Vec3, length: f32, sample: Vec2) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            length,
            sample,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The far end of the ray's bounded segment.
    #[inline]
    pub fn end(&self) -> Vec3 {
        self.at(self.length)
    }

    /// The ray as a line segment from its origin to its far end.
    pub fn to_segment(&self) -> LineSegment {
        LineSegment::new(self.origin, self.end())
    }
}
