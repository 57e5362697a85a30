//! Broad-phase interface for triangle candidate lookup
//!
//! The narrow phase only needs "give me triangles whose bounds touch this
//! box" and "give me triangle `i`". This seam lets the exhaustive
//! [`TriangleList`] stand in for the octree, which is how the index is
//! checked for false negatives.

use crate::physics::collision::Triangle;

use super::{GeometryIndex, AABB};

/// Abstract interface for broad-phase triangle lookup
pub trait TriangleQuery {
    /// Append indices of triangles whose bounds overlap `area`, ascending and unique
    fn candidates(&self, area: &AABB, out: &mut Vec<u32>);

    /// Triangle by index
    fn triangle(&self, index: u32) -> &Triangle;

    /// Number of triangles addressable by index
    fn len(&self) -> usize;

    /// True when there are no triangles
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TriangleQuery for GeometryIndex {
    fn candidates(&self, area: &AABB, out: &mut Vec<u32>) {
        self.candidates_in(area, out);
    }

    fn triangle(&self, index: u32) -> &Triangle {
        GeometryIndex::triangle(self, index)
    }

    fn len(&self) -> usize {
        self.triangle_count()
    }
}

/// Exhaustive, non-indexed triangle list
///
/// Every query scans all triangles. Used as the reference the octree is
/// compared against, and handy for tiny worlds.
#[derive(Debug, Clone, Default)]
pub struct TriangleList {
    triangles: Vec<Triangle>,
}

impl TriangleList {
    /// Wrap a triangle list
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// All triangles in input order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl From<Vec<Triangle>> for TriangleList {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self::new(triangles)
    }
}

impl TriangleQuery for TriangleList {
    fn candidates(&self, area: &AABB, out: &mut Vec<u32>) {
        #[allow(clippy::cast_possible_truncation)]
        out.extend(
            self.triangles
                .iter()
                .enumerate()
                .filter(|(_, triangle)| triangle.bounds().intersects(area))
                .map(|(i, _)| i as u32),
        );
    }

    fn triangle(&self, index: u32) -> &Triangle {
        &self.triangles[index as usize]
    }

    fn len(&self) -> usize {
        self.triangles.len()
    }
}
