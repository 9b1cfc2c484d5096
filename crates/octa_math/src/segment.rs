use crate::Vec3;

/// A bounded piece of a ray, from `begin` to `end`.
///
/// Clipping against half-spaces only ever replaces a segment with a
/// sub-segment of itself, so a segment never grows.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineSegment {
    pub begin: Vec3,
    pub end: Vec3,
}

impl LineSegment {
    pub fn new(begin: Vec3, end: Vec3) -> Self {
        Self { begin, end }
    }

    /// Vector from `begin` to `end`.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.end - self.begin
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }
}
