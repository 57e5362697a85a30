//! Axis-aligned bounding boxes

use crate::foundation::math::{max_components, min_components, Vec3};
use crate::physics::collision::Triangle;

/// Axis-aligned bounding box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that acts as the identity for [`union`](Self::union)
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box enclosing every point, `None` for an empty iterator
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| {
            Self::new(min_components(&acc.min, &p), max_components(&acc.max, &p))
        }))
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// True when every coordinate is a number and `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|c| !c.is_nan())
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies entirely inside this box
    pub fn contains_aabb(&self, other: &AABB) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(
            min_components(&self.min, &other.min),
            max_components(&self.max, &other.max),
        )
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f32) -> AABB {
        let margin = Vec3::repeat(margin);
        AABB::new(self.min - margin, self.max + margin)
    }

    /// One of the eight octants of this box
    ///
    /// Bit 0 selects +X, bit 1 selects +Y, bit 2 selects +Z.
    pub fn octant(&self, index: usize) -> AABB {
        let center = self.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit != 0 { (mid, hi) } else { (lo, mid) }
        };
        let (min_x, max_x) = pick(1, self.min.x, center.x, self.max.x);
        let (min_y, max_y) = pick(2, self.min.y, center.y, self.max.y);
        let (min_z, max_z) = pick(4, self.min.z, center.z, self.max.z);
        AABB::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z))
    }

    /// Closest point inside the box to `point`
    ///
    /// The box must be valid; see [`is_valid`](Self::is_valid).
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Check if a sphere touches or overlaps this box
    ///
    /// An invalid box (e.g. [`AABB::empty`]) touches nothing.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        if !self.is_valid() {
            return false;
        }
        let distance_sq = (self.closest_point(center) - center).norm_squared();
        distance_sq <= radius * radius
    }

    /// Separating-axis test between this box and a triangle (touching counts)
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        let center = self.center();
        let half = self.extents();

        let v0 = triangle.v0 - center;
        let v1 = triangle.v1 - center;
        let v2 = triangle.v2 - center;
        let edges = [v1 - v0, v2 - v1, v0 - v2];

        // Box face normals
        for axis in 0..3 {
            let lo = v0[axis].min(v1[axis]).min(v2[axis]);
            let hi = v0[axis].max(v1[axis]).max(v2[axis]);
            if lo > half[axis] || hi < -half[axis] {
                return false;
            }
        }

        // Triangle plane
        let normal = edges[0].cross(&edges[1]);
        let plane_radius = half.x * normal.x.abs() + half.y * normal.y.abs() + half.z * normal.z.abs();
        if normal.dot(&v0).abs() > plane_radius {
            return false;
        }

        // Cross products of box axes and triangle edges
        let box_axes = [Vec3::x(), Vec3::y(), Vec3::z()];
        for edge in &edges {
            for box_axis in &box_axes {
                let axis = box_axis.cross(edge);
                if axis.norm_squared() <= f32::EPSILON * f32::EPSILON {
                    continue;
                }
                let p0 = axis.dot(&v0);
                let p1 = axis.dot(&v1);
                let p2 = axis.dot(&v2);
                let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
                if p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r {
                    return false;
                }
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AABB {
        AABB::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = unit_box();
        assert!(aabb.contains_point(Vec3::zeros()));
        assert!(aabb.contains_point(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_aabb_intersection() {
        let aabb1 = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = AABB::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = AABB::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_validity() {
        assert!(unit_box().is_valid());
        assert!(!AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0)).is_valid());
        assert!(!AABB::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0)).is_valid());
        assert!(!AABB::empty().is_valid());
    }

    #[test]
    fn test_union_with_empty_is_identity() {
        assert_eq!(AABB::empty().union(&unit_box()), unit_box());
    }

    #[test]
    fn test_from_points() {
        assert!(AABB::from_points(std::iter::empty()).is_none());
        let aabb = AABB::from_points([Vec3::new(1.0, -2.0, 0.0), Vec3::new(-1.0, 3.0, 0.5)])
            .expect("non-empty");
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_octants_tile_parent() {
        let parent = AABB::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 8.0));
        let mut volume = 0.0;
        for i in 0..8 {
            let child = parent.octant(i);
            assert!(parent.contains_aabb(&child));
            let size = child.max - child.min;
            volume += size.x * size.y * size.z;
        }
        assert_eq!(volume, 64.0);
        assert_eq!(parent.octant(7).min, Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(parent.octant(0).max, Vec3::new(2.0, 1.0, 4.0));
    }

    #[test]
    fn test_sphere_intersection() {
        let aabb = unit_box();
        assert!(aabb.intersects_sphere(Vec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(!aabb.intersects_sphere(Vec3::new(2.0, 2.0, 0.0), 1.0));
        assert!(aabb.intersects_sphere(Vec3::zeros(), 0.1));
    }

    #[test]
    fn test_empty_box_touches_no_sphere() {
        assert!(!AABB::empty().intersects_sphere(Vec3::zeros(), 100.0));
        let inverted = AABB::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
        assert!(!inverted.intersects_sphere(Vec3::zeros(), 1.0));
    }

    #[test]
    fn test_triangle_intersection() {
        let aabb = unit_box();

        // Passes straight through the box
        let crossing = Triangle::new(
            Vec3::new(-5.0, 0.0, -5.0),
            Vec3::new(5.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 5.0),
        );
        assert!(aabb.intersects_triangle(&crossing));

        // Plane x + y + z = 2.5 still cuts the corner region
        let near = Triangle::new(
            Vec3::new(2.5, 0.0, 0.0),
            Vec3::new(0.0, 2.5, 0.0),
            Vec3::new(0.0, 0.0, 2.5),
        );
        assert!(aabb.intersects_triangle(&near));

        // Plane x + y + z = 4 clears the (1, 1, 1) corner though the bounds overlap
        let far = Triangle::new(
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
        );
        assert!(!aabb.intersects_triangle(&far));
        assert!(aabb.intersects(&far.bounds()));
    }
}
