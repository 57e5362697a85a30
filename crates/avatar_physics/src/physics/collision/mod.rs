//! Collision geometry
//!
//! - [`primitives`] - Triangles and segment closest-point helpers
//! - [`capsule`] - The agent's swept-sphere collider
//! - [`mesh`] - World meshes and the triangle-source capability

pub mod primitives;
pub mod capsule;
pub mod mesh;

pub use primitives::{closest_point_on_segment, closest_points_between_segments, Triangle};
pub use capsule::Capsule;
pub use mesh::{collect_triangles, MeshArena, MeshKey, TriangleSource, WorldMesh};
