//! Spatial partitioning data structures
//!
//! Provides the bounding boxes and the octree index the capsule collider
//! queries for nearby world triangles.

mod aabb;
mod octree;
mod spatial_query;

pub use aabb::AABB;
pub use octree::{GeometryIndex, OctreeConfig, OctreeNode};
pub use spatial_query::{TriangleList, TriangleQuery};
