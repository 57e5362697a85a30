//! Capsule-vs-triangle narrow phase
//!
//! Each candidate triangle from the broad phase is tested exactly; the
//! per-triangle contacts are then folded into a single correction.

use approx::abs_diff_eq;

use crate::foundation::math::Vec3;
use crate::spatial::{GeometryIndex, TriangleQuery};

use super::collision::{closest_points_between_segments, Capsule, Triangle};

/// Extra distance past the radius that still counts as touching
///
/// Keeps a capsule resting exactly on a surface in contact (at depth 0).
pub const CONTACT_TOLERANCE: f32 = 1.0e-4;

/// Below this segment-to-triangle distance the axis is treated as touching the face
const AXIS_TOUCH_EPSILON: f32 = 1.0e-6;

/// Combined correction for one capsule query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Unit normal pointing away from the surface, toward the capsule
    pub normal: Vec3,
    /// Penetration along `normal` (never negative)
    pub depth: f32,
}

/// Contact against a single triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the triangle in the queried set
    pub triangle: u32,
    /// Unit normal pointing away from the triangle
    pub normal: Vec3,
    /// Penetration depth
    pub depth: f32,
}

/// Exact capsule test against one triangle
///
/// Degenerate triangles never produce a contact.
pub fn triangle_capsule_contact(capsule: &Capsule, triangle: &Triangle) -> Option<CollisionResult> {
    let face_normal = triangle.normal()?;
    let radius = capsule.radius();

    let (segment_point, triangle_point) =
        closest_segment_triangle(capsule.start, capsule.end, triangle, face_normal);
    let offset = segment_point - triangle_point;
    let distance = offset.norm();

    if distance >= radius + CONTACT_TOLERANCE {
        return None;
    }

    if !abs_diff_eq!(distance, 0.0, epsilon = AXIS_TOUCH_EPSILON) {
        // Face region: exact plane normal, oriented toward the segment
        if triangle.contains_point(segment_point) {
            let plane_distance = face_normal.dot(&(segment_point - triangle.v0));
            let normal = if plane_distance < 0.0 { -face_normal } else { face_normal };
            return Some(CollisionResult {
                normal,
                depth: (radius - plane_distance.abs()).max(0.0),
            });
        }

        return Some(CollisionResult {
            normal: offset / distance,
            depth: (radius - distance).max(0.0),
        });
    }

    // The axis touches or crosses the face: push the whole segment to the
    // side the capsule centre is on.
    let normal = if face_normal.dot(&(capsule.center() - triangle.v0)) < 0.0 {
        -face_normal
    } else {
        face_normal
    };
    let lowest = normal
        .dot(&(capsule.start - triangle.v0))
        .min(normal.dot(&(capsule.end - triangle.v0)));

    Some(CollisionResult {
        normal,
        depth: (radius - lowest).max(0.0),
    })
}

/// Closest pair `(on_segment, on_triangle)` between segment `[p, q]` and a triangle
fn closest_segment_triangle(p: Vec3, q: Vec3, triangle: &Triangle, normal: Vec3) -> (Vec3, Vec3) {
    let dp = normal.dot(&(p - triangle.v0));
    let dq = normal.dot(&(q - triangle.v0));

    // Segment pierces the plane inside the triangle
    if dp * dq <= 0.0 && (dp - dq).abs() > f32::EPSILON {
        let hit = p + (q - p) * (dp / (dp - dq));
        if triangle.contains_point(hit) {
            return (hit, hit);
        }
    }

    let mut best = (p, triangle.closest_point(p));
    let mut best_distance = (best.0 - best.1).norm_squared();
    let mut consider = |pair: (Vec3, Vec3)| {
        let distance = (pair.0 - pair.1).norm_squared();
        if distance < best_distance {
            best = pair;
            best_distance = distance;
        }
    };

    consider((q, triangle.closest_point(q)));
    for (a, b) in triangle.edges() {
        consider(closest_points_between_segments(p, q, a, b));
    }

    best
}

/// Fold per-triangle contacts into one correction
///
/// Depth is the largest individual depth; the first contact reaching it wins
/// ties. The normal blends all contact normals weighted by depth, falling
/// back to the deepest normal if they cancel out.
pub fn aggregate_contacts(contacts: &[Contact]) -> Option<CollisionResult> {
    let mut deepest: Option<&Contact> = None;
    let mut blended = Vec3::zeros();

    for contact in contacts {
        if deepest.map_or(true, |best| contact.depth > best.depth) {
            deepest = Some(contact);
        }
        blended += contact.normal * (contact.depth + CONTACT_TOLERANCE);
    }

    let deepest = deepest?;
    Some(CollisionResult {
        normal: blended.try_normalize(AXIS_TOUCH_EPSILON).unwrap_or(deepest.normal),
        depth: deepest.depth,
    })
}

/// Narrow-phase collider with its own scratch buffers
///
/// Reusing one instance per agent avoids per-frame allocation; instances
/// share nothing, so independent simulations can run side by side.
#[derive(Debug, Default, Clone)]
pub struct NarrowPhase {
    candidates: Vec<u32>,
    contacts: Vec<Contact>,
}

impl NarrowPhase {
    /// Create a narrow phase with empty scratch buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every triangle contact for `capsule` to `out`, in ascending triangle order
    pub fn contacts<Q>(&mut self, capsule: &Capsule, query: &Q, out: &mut Vec<Contact>)
    where
        Q: TriangleQuery + ?Sized,
    {
        self.candidates.clear();
        query.candidates(&capsule.bounds().expanded(CONTACT_TOLERANCE), &mut self.candidates);

        out.extend(self.candidates.iter().filter_map(|&index| {
            triangle_capsule_contact(capsule, query.triangle(index)).map(|result| Contact {
                triangle: index,
                normal: result.normal,
                depth: result.depth,
            })
        }));
    }

    /// Combined correction for `capsule`, or `None` when nothing touches it
    pub fn intersect<Q>(&mut self, capsule: &Capsule, query: &Q) -> Option<CollisionResult>
    where
        Q: TriangleQuery + ?Sized,
    {
        let mut contacts = std::mem::take(&mut self.contacts);
        contacts.clear();
        self.contacts(capsule, query, &mut contacts);
        let result = aggregate_contacts(&contacts);
        self.contacts = contacts;
        result
    }

    /// Contacts gathered by the last [`intersect`](Self::intersect)
    pub fn last_contacts(&self) -> &[Contact] {
        &self.contacts
    }
}

/// One-shot capsule query against a geometry index
pub fn capsule_intersect(capsule: &Capsule, index: &GeometryIndex) -> Option<CollisionResult> {
    NarrowPhase::new().intersect(capsule, index)
}
