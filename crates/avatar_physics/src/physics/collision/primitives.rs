//! Primitive collision shapes and closest-point algorithms
//!
//! Provides the world-space triangle and the segment helpers the capsule
//! tests are built from.

use crate::foundation::math::{max_components, min_components, Vec3};
use crate::spatial::AABB;

/// Squared length below which a direction is treated as zero
const DEGENERATE_EPSILON: f32 = 1.0e-12;

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Triangle vertices in world space
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal (right-hand rule), `None` for zero-area triangles
    pub fn normal(&self) -> Option<Vec3> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(DEGENERATE_EPSILON)
    }

    /// Surface area
    pub fn area(&self) -> f32 {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0)).norm() * 0.5
    }

    /// True when the triangle has no usable plane
    pub fn is_degenerate(&self) -> bool {
        self.normal().is_none()
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Axis-aligned bounds of the three vertices
    pub fn bounds(&self) -> AABB {
        AABB::new(
            min_components(&min_components(&self.v0, &self.v1), &self.v2),
            max_components(&max_components(&self.v0, &self.v1), &self.v2),
        )
    }

    /// The three edges as (start, end) pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        // Project point onto triangle plane
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let v0_to_point = point - self.v0;

        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);

        // Check if point is in vertex region outside v0
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Check if point is in vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Check if point is in vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Check if point is in edge region
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v_val = d1 / (d1 - d3);
            return self.v0 + edge1 * v_val;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + edge2 * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Point is inside triangle
        let denom = 1.0 / (va + vb + vc);
        let v_val = vb * denom;
        let w = vc * denom;
        self.v0 + edge1 * v_val + edge2 * w
    }

    /// Barycentric coordinates `(u, v, w)` of `point` projected onto the plane
    pub fn barycentric(&self, point: Vec3) -> Option<(f32, f32, f32)> {
        let e0 = self.v1 - self.v0;
        let e1 = self.v2 - self.v0;
        let ep = point - self.v0;

        let d00 = e0.dot(&e0);
        let d01 = e0.dot(&e1);
        let d11 = e1.dot(&e1);
        let d20 = ep.dot(&e0);
        let d21 = ep.dot(&e1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() <= DEGENERATE_EPSILON {
            return None;
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        Some((1.0 - v - w, v, w))
    }

    /// Whether `point` (assumed on the plane) lies inside the triangle, edges included
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.barycentric(point)
            .is_some_and(|(u, v, w)| u >= 0.0 && v >= 0.0 && w >= 0.0)
    }

    /// Distance from a point to the triangle plane (signed, zero when degenerate)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal()
            .map_or(0.0, |normal| normal.dot(&(point - self.v0)))
    }
}

/// Closest point on segment `[a, b]` to `point`, with its parameter `t` in `[0, 1]`
pub fn closest_point_on_segment(a: Vec3, b: Vec3, point: Vec3) -> (Vec3, f32) {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    if length_sq <= DEGENERATE_EPSILON {
        return (a, 0.0);
    }
    let t = ((point - a).dot(&ab) / length_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Closest points between segments `[p1, q1]` and `[p2, q2]`
///
/// Returns `(point_on_first, point_on_second)`. Parallel and degenerate
/// segments are handled; the result is the first minimizing pair found.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    if a <= DEGENERATE_EPSILON && e <= DEGENERATE_EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= DEGENERATE_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= DEGENERATE_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;

            // Parallel segments: any s works, pick the start
            let mut s = if denom > DEGENERATE_EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
