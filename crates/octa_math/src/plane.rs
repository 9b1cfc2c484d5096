//! Half-space planes and line segment clipping.

use crate::{LineSegment, Vec3};

/// Tolerance used for on-plane classification and parallel rejection.
pub const PLANE_EPSILON: f32 = 1e-3;

/// Where a point or segment lies relative to a plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Classification {
    InFront,
    Spanning,
    Behind,
    OnPlane,
}

/// The two pieces of a segment split by a plane.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SplitResult {
    pub in_front: LineSegment,
    pub behind: LineSegment,
}

/// A plane through `point` with unit `normal`. The normal points "in front".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Classify a point by the angle between the normal and the direction
    /// from the plane's point to it.
    ///
    /// Points whose direction is within the tolerance band of the plane
    /// (including the plane's own point) are `OnPlane`.
    pub fn classify_point(&self, point: Vec3) -> Classification {
        let direction = (point - self.point).normalize_or_zero();
        let dot = self.normal.dot(direction);
        if dot.abs() < PLANE_EPSILON {
            Classification::OnPlane
        } else if dot > 0.0 {
            Classification::InFront
        } else {
            Classification::Behind
        }
    }

    /// Classify a segment. An on-plane endpoint takes the classification of
    /// the other endpoint; endpoints on opposite sides make it `Spanning`.
    pub fn classify(&self, segment: &LineSegment) -> Classification {
        let begin = self.classify_point(segment.begin);
        let end = self.classify_point(segment.end);

        match (begin, end) {
            (Classification::OnPlane, other) => other,
            (other, Classification::OnPlane) => other,
            (Classification::InFront, Classification::InFront) => Classification::InFront,
            (Classification::Behind, Classification::Behind) => Classification::Behind,
            _ => Classification::Spanning,
        }
    }

    /// Split a spanning segment at its exact intersection with the plane.
    ///
    /// Returns `None` when the segment doesn't cross the plane: either end is
    /// on the plane, both ends are on the same side, or the segment is
    /// (nearly) parallel to the plane. Both pieces keep the orientation of
    /// the input segment.
    pub fn split(&self, segment: &LineSegment) -> Option<SplitResult> {
        let begin = self.classify_point(segment.begin);
        let end = self.classify_point(segment.end);
        if begin == Classification::OnPlane || end == Classification::OnPlane || begin == end {
            return None;
        }

        let direction = segment.direction();
        let denominator = self.normal.dot(direction);
        if denominator.abs() < PLANE_EPSILON {
            return None;
        }

        let d = -self.normal.dot(self.point);
        let percent = -(d + self.normal.dot(segment.begin)) / denominator;
        let intersection = segment.begin + direction * percent;

        let result = if begin == Classification::InFront {
            SplitResult {
                in_front: LineSegment::new(segment.begin, intersection),
                behind: LineSegment::new(intersection, segment.end),
            }
        } else {
            SplitResult {
                in_front: LineSegment::new(intersection, segment.end),
                behind: LineSegment::new(segment.begin, intersection),
            }
        };
        Some(result)
    }

    /// The part of a segment behind the plane, or `None` if it is entirely
    /// in front.
    ///
    /// Segments lying on the plane count as behind.
    pub fn portion_behind(&self, segment: &LineSegment) -> Option<LineSegment> {
        match self.classify(segment) {
            Classification::Behind | Classification::OnPlane => Some(*segment),
            Classification::Spanning => self.split(segment).map(|r| r.behind),
            Classification::InFront => None,
        }
    }
}
