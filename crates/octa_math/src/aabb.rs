use crate::{LineSegment, Plane, Ray, Vec3};

/// Axis-Aligned Bounding Box used by the octree BVH.
///
/// Besides its corners the box keeps six outward-facing half-space planes,
/// ordered −X, −Y, −Z, +X, +Y, +Z. Segments are clipped to the box interior
/// by keeping the portion behind each plane in turn.
///
/// The planes are derived from `min`/`max` by [`Aabb::rebuild_planes`]; after
/// growing a box with [`Aabb::adjust`] call it again before clipping.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
    planes: [Plane; 6],
}

impl Default for Aabb {
    /// The degenerate box at the origin.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl Aabb {
    /// Create a box from its corners and derive its clip planes.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        let mut aabb = Self {
            min,
            max,
            planes: [Plane::new(Vec3::ZERO, Vec3::X); 6],
        };
        aabb.rebuild_planes();
        aabb
    }

    /// Create an empty box (inverted bounds) ready to be grown with `adjust`.
    pub fn empty() -> Self {
        Self::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY))
    }

    /// Create the box bounding a set of points.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.adjust(point);
        }
        aabb.rebuild_planes();
        aabb
    }

    /// Grow the box to include a point.
    pub fn adjust(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Whether `other` lies entirely inside this box. Bounds are inclusive.
    pub fn contains(&self, other: &Aabb) -> bool {
        other.min.cmpge(self.min).all() && other.max.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Regenerate the six clip planes from the current bounds.
    ///
    /// Each plane is anchored on its axis, e.g. `(min.x, 0, 0)` for −X. Point
    /// classification is angle-based, so the anchor sets how wide the
    /// on-plane band is for points far from the axis.
    pub fn rebuild_planes(&mut self) {
        let (min, max) = (self.min, self.max);
        self.planes = [
            Plane::new(Vec3::new(min.x, 0.0, 0.0), Vec3::NEG_X),
            Plane::new(Vec3::new(0.0, min.y, 0.0), Vec3::NEG_Y),
            Plane::new(Vec3::new(0.0, 0.0, min.z), Vec3::NEG_Z),
            Plane::new(Vec3::new(max.x, 0.0, 0.0), Vec3::X),
            Plane::new(Vec3::new(0.0, max.y, 0.0), Vec3::Y),
            Plane::new(Vec3::new(0.0, 0.0, max.z), Vec3::Z),
        ];
    }

    /// Clip a segment to the inside of the box.
    ///
    /// Returns `None` as soon as one plane rejects the whole segment.
    pub fn clip_line_segment(&self, begin: Vec3, end: Vec3) -> Option<LineSegment> {
        self.clip_segment(&LineSegment::new(begin, end))
    }

    pub fn clip_segment(&self, segment: &LineSegment) -> Option<LineSegment> {
        self.planes
            .iter()
            .try_fold(*segment, |current, plane| plane.portion_behind(&current))
    }

    /// Clip the bounded segment of a ray to the inside of the box.
    pub fn clip_ray(&self, ray: &Ray) -> Option<LineSegment> {
        self.clip_segment(&ray.to_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_adjust() {
        let mut aabb = Aabb::empty();
        aabb.adjust(Vec3::new(1.0, -2.0, 3.0));
        aabb.adjust(Vec3::new(-1.0, 2.0, 0.0));

        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_aabb_from_points_excludes_origin() {
        let aabb = Aabb::from_points([Vec3::new(2.0, 2.0, 2.0), Vec3::new(3.0, 4.0, 5.0)]);

        assert_eq!(aabb.min, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_aabb_default_is_degenerate() {
        let aabb = Aabb::default();
        assert_eq!(aabb.min, Vec3::ZERO);
        assert_eq!(aabb.max, Vec3::ZERO);
    }

    #[test]
    fn test_aabb_contains_inclusive() {
        let outer = unit_box();

        assert!(outer.contains(&outer));
        assert!(outer.contains(&Aabb::new(Vec3::ZERO, Vec3::splat(1.0))));
        assert!(!outer.contains(&Aabb::new(Vec3::ZERO, Vec3::new(1.5, 0.5, 0.5))));
    }

    #[test]
    fn test_aabb_plane_order() {
        let aabb = unit_box();
        let normals: Vec<Vec3> = aabb.planes().iter().map(|p| p.normal).collect();

        assert_eq!(
            normals,
            vec![Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X, Vec3::Y, Vec3::Z]
        );
    }

    #[test]
    fn test_aabb_planes_anchored_on_axes() {
        let aabb = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let points: Vec<Vec3> = aabb.planes().iter().map(|p| p.point).collect();

        assert_eq!(
            points,
            vec![
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(0.0, 0.0, 3.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(0.0, 5.0, 0.0),
                Vec3::new(0.0, 0.0, 6.0),
            ]
        );
    }

    #[test]
    fn test_clip_offset_box() {
        // Box away from the origin, segment parallel to Z through it
        let aabb = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let clipped = aabb
            .clip_line_segment(Vec3::new(2.0, 3.0, 0.0), Vec3::new(2.0, 3.0, 10.0))
            .unwrap();

        assert!((clipped.begin - Vec3::new(2.0, 3.0, 3.0)).length() < 1e-4);
        assert!((clipped.end - Vec3::new(2.0, 3.0, 6.0)).length() < 1e-4);
    }

    #[test]
    fn test_clip_line_segment_through_box() {
        let aabb = unit_box();
        let clipped = aabb
            .clip_line_segment(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 5.0))
            .expect("segment passes through the box");

        assert!((clipped.begin - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
        assert!((clipped.end - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_clip_line_segment_miss() {
        let aabb = unit_box();
        let clipped = aabb.clip_line_segment(Vec3::new(5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        assert!(clipped.is_none());
    }

    #[test]
    fn test_clip_line_segment_inside_unchanged() {
        let aabb = unit_box();
        let begin = Vec3::new(-0.5, 0.1, 0.2);
        let end = Vec3::new(0.5, -0.1, 0.3);

        let clipped = aabb.clip_line_segment(begin, end).unwrap();
        assert_eq!(clipped, LineSegment::new(begin, end));
    }

    #[test]
    fn test_clip_ray() {
        let aabb = unit_box();
        let ray = Ray::with_length(Vec3::new(-4.0, 0.0, 0.0), Vec3::X, 10.0, Vec2::ZERO);

        let clipped = aabb.clip_ray(&ray).unwrap();
        assert!((clipped.begin.x + 1.0).abs() < 1e-4);
        assert!((clipped.end.x - 1.0).abs() < 1e-4);
        assert!(clipped.length() <= ray.length);

        let short = Ray::with_length(Vec3::new(-4.0, 0.0, 0.0), Vec3::X, 2.0, Vec2::ZERO);
        assert!(aabb.clip_ray(&short).is_none());
    }
}
