//! Integration-style tests for the collision core and integrator
//!
//! Shared world fixtures live here; scenario and property suites pull them in.


use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;
use crate::spatial::AABB;

/// One 60 Hz frame
pub(super) const FRAME: f32 = 1.0 / 60.0;

/// World box used by the reference scenarios
pub(super) fn scenario_bounds() -> AABB {
    AABB::new(Vec3::new(-30.0, 0.0, 0.0), Vec3::new(10.0, 10.5, 30.0))
}

/// The two floor triangles spanning the scenario world at y = 0
pub(super) fn scenario_floor() -> Vec<Triangle> {
    vec![
        Triangle::new(
            Vec3::new(-30.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 30.0),
        ),
        Triangle::new(
            Vec3::new(-30.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 30.0),
            Vec3::new(-30.0, 0.0, 30.0),
        ),
    ]
}

/// Axis-aligned vertical wall quad at `x`, facing -X, spanning `z` in `[z0, z1]`
pub(super) fn wall_at_x(x: f32, z0: f32, z1: f32, height: f32) -> Vec<Triangle> {
    let a = Vec3::new(x, 0.0, z0);
    let b = Vec3::new(x, 0.0, z1);
    let c = Vec3::new(x, height, z1);
    let d = Vec3::new(x, height, z0);
    vec![Triangle::new(a, b, c), Triangle::new(a, c, d)]
}
