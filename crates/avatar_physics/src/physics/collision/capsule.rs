//! Capsule collider
//!
//! A line segment swept by a sphere. `start` is the foot, `end` the head.

use crate::foundation::math::Vec3;
use crate::physics::PhysicsError;
use crate::spatial::AABB;

use super::primitives::closest_point_on_segment;

/// Swept-sphere collision shape representing the agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Foot endpoint of the central segment
    pub start: Vec3,
    /// Head endpoint of the central segment
    pub end: Vec3,
    radius: f32,
}

impl Capsule {
    /// Create a capsule; the radius must be positive
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Result<Self, PhysicsError> {
        validate_radius(radius)?;
        Ok(Self { start, end, radius })
    }

    /// Capsule radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Move both endpoints by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Midpoint of the central segment
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Vector from foot to head
    pub fn axis(&self) -> Vec3 {
        self.end - self.start
    }

    /// Length of the central segment
    pub fn height(&self) -> f32 {
        self.axis().norm()
    }

    /// Closest point on the central segment to `point`
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        closest_point_on_segment(self.start, self.end, point).0
    }

    /// Box enclosing the whole capsule, hemispherical caps included
    pub fn bounds(&self) -> AABB {
        AABB::new(
            self.start.inf(&self.end),
            self.start.sup(&self.end),
        )
        .expanded(self.radius)
    }

    /// Move the segment without touching the radius
    pub fn set_pose(&mut self, start: Vec3, end: Vec3) {
        self.start = start;
        self.end = end;
    }

    /// Reset segment and radius, used for spawn and recovery
    pub fn reset(&mut self, start: Vec3, end: Vec3, radius: f32) -> Result<(), PhysicsError> {
        validate_radius(radius)?;
        self.start = start;
        self.end = end;
        self.radius = radius;
        Ok(())
    }
}

fn validate_radius(radius: f32) -> Result<(), PhysicsError> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(PhysicsError::NonPositiveRadius(radius));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standing() -> Capsule {
        Capsule::new(Vec3::new(0.0, 0.35, 0.0), Vec3::new(0.0, 1.95, 0.0), 0.35)
            .expect("valid capsule")
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        for radius in [0.0, -1.0, f32::NAN] {
            let result = Capsule::new(Vec3::zeros(), Vec3::y(), radius);
            assert!(matches!(result, Err(PhysicsError::NonPositiveRadius(_))));
        }
    }

    #[test]
    fn test_translate_moves_both_endpoints() {
        let mut capsule = standing();
        capsule.translate(Vec3::new(1.0, -0.5, 2.0));
        assert_relative_eq!(capsule.start, Vec3::new(1.0, -0.15, 2.0), epsilon = 1e-6);
        assert_relative_eq!(capsule.end, Vec3::new(1.0, 1.45, 2.0), epsilon = 1e-6);
        assert_relative_eq!(capsule.height(), 1.6, epsilon = 1e-6);
    }

    #[test]
    fn test_bounds_include_caps() {
        let bounds = standing().bounds();
        assert_relative_eq!(bounds.min, Vec3::new(-0.35, 0.0, -0.35), epsilon = 1e-6);
        assert_relative_eq!(bounds.max, Vec3::new(0.35, 2.3, 0.35), epsilon = 1e-6);
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let capsule = standing();
        assert_relative_eq!(capsule.closest_point(Vec3::new(3.0, 1.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(capsule.closest_point(Vec3::new(0.0, -5.0, 0.0)), capsule.start);
        assert_relative_eq!(capsule.center(), Vec3::new(0.0, 1.15, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_reset_restores_radius() {
        let mut capsule = standing();
        capsule.set_pose(Vec3::new(5.0, 5.0, 5.0), Vec3::new(5.0, 6.0, 5.0));
        assert_relative_eq!(capsule.radius(), 0.35);

        capsule
            .reset(Vec3::zeros(), Vec3::y(), 0.5)
            .expect("valid reset");
        assert_eq!(capsule.start, Vec3::zeros());
        assert_relative_eq!(capsule.radius(), 0.5);

        assert!(capsule.reset(Vec3::zeros(), Vec3::y(), 0.0).is_err());
        assert_relative_eq!(capsule.radius(), 0.5);
    }
}
