//! World meshes and the triangle-source capability
//!
//! Meshes are stored already baked into world space. The physics core never
//! holds a live scene graph: a host flattens its scene into a [`MeshArena`]
//! (or a plain slice of [`WorldMesh`]) and hands it to the index builder.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::logging::debug;
use crate::foundation::math::{Point3, Transform, Vec3};
use crate::physics::PhysicsError;
use crate::spatial::{GeometryIndex, OctreeConfig, AABB};

use super::primitives::Triangle;

/// Margin added around computed world bounds
const COMPUTED_BOUNDS_MARGIN: f32 = 1.0;

/// A named world-space triangle mesh
#[derive(Debug, Clone)]
pub struct WorldMesh {
    /// Mesh name for diagnostics
    pub name: String,
    /// Whether the mesh blocks the avatar
    pub collidable: bool,
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
}

impl WorldMesh {
    /// Create a collidable mesh from world-space triangles
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>) -> Self {
        Self {
            name: name.into(),
            collidable: true,
            triangles,
        }
    }

    /// Bake an indexed vertex buffer through `transform`
    ///
    /// Every index must address a vertex; a trailing group of fewer than
    /// three indices is ignored.
    pub fn from_indexed(
        name: impl Into<String>,
        vertices: &[Vec3],
        indices: &[u32],
        transform: &Transform,
    ) -> Result<Self, PhysicsError> {
        let name = name.into();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(PhysicsError::VertexIndexOutOfRange {
                mesh: name,
                index,
                vertex_count: vertices.len(),
            });
        }

        let matrix = transform.to_matrix();
        let bake = |i: u32| {
            matrix
                .transform_point(&Point3::from(vertices[i as usize]))
                .coords
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|chunk| Triangle::new(bake(chunk[0]), bake(chunk[1]), bake(chunk[2])))
            .collect();

        Ok(Self {
            name,
            collidable: true,
            triangles,
        })
    }

    /// Bake a non-indexed vertex buffer (every three vertices form a triangle)
    pub fn from_non_indexed(name: impl Into<String>, vertices: &[Vec3], transform: &Transform) -> Self {
        let matrix = transform.to_matrix();
        let bake = |v: &Vec3| matrix.transform_point(&Point3::from(*v)).coords;

        let triangles = vertices
            .chunks_exact(3)
            .map(|chunk| Triangle::new(bake(&chunk[0]), bake(&chunk[1]), bake(&chunk[2])))
            .collect();

        Self {
            name: name.into(),
            collidable: true,
            triangles,
        }
    }

    /// Mark the mesh as decorative (ignored by the default filter)
    #[must_use]
    pub fn non_collidable(mut self) -> Self {
        self.collidable = false;
        self
    }

    /// Default build filter: only meshes flagged for collision
    pub fn is_collidable(&self) -> bool {
        self.collidable
    }
}

/// Capability of anything that can yield world meshes
pub trait TriangleSource {
    /// Visit every mesh in a stable order
    fn visit_meshes(&self, visitor: &mut dyn FnMut(&WorldMesh));
}

impl TriangleSource for [WorldMesh] {
    fn visit_meshes(&self, visitor: &mut dyn FnMut(&WorldMesh)) {
        for mesh in self {
            visitor(mesh);
        }
    }
}

impl TriangleSource for Vec<WorldMesh> {
    fn visit_meshes(&self, visitor: &mut dyn FnMut(&WorldMesh)) {
        self.as_slice().visit_meshes(visitor);
    }
}

new_key_type! {
    /// Stable handle to a mesh in a [`MeshArena`]
    pub struct MeshKey;
}

/// Arena of world meshes, iterated in insertion-slot order
#[derive(Debug, Clone, Default)]
pub struct MeshArena {
    meshes: SlotMap<MeshKey, WorldMesh>,
}

impl MeshArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh
    pub fn insert(&mut self, mesh: WorldMesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    /// Remove a mesh, returning it if it was present
    pub fn remove(&mut self, key: MeshKey) -> Option<WorldMesh> {
        self.meshes.remove(key)
    }

    /// Look up a mesh
    pub fn get(&self, key: MeshKey) -> Option<&WorldMesh> {
        self.meshes.get(key)
    }

    /// Mutable lookup (e.g. to toggle collision)
    pub fn get_mut(&mut self, key: MeshKey) -> Option<&mut WorldMesh> {
        self.meshes.get_mut(key)
    }

    /// Number of meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when no meshes are stored
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Drop every mesh
    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

impl TriangleSource for MeshArena {
    fn visit_meshes(&self, visitor: &mut dyn FnMut(&WorldMesh)) {
        for mesh in self.meshes.values() {
            visitor(mesh);
        }
    }
}

/// Flatten every mesh accepted by `filter` into one triangle list
pub fn collect_triangles<S, F>(source: &S, mut filter: F) -> Vec<Triangle>
where
    S: TriangleSource + ?Sized,
    F: FnMut(&WorldMesh) -> bool,
{
    let mut triangles = Vec::new();
    source.visit_meshes(&mut |mesh| {
        if filter(mesh) {
            triangles.extend_from_slice(&mesh.triangles);
        }
    });
    triangles
}

impl GeometryIndex {
    /// Build an index from the meshes of `source` accepted by `filter`
    ///
    /// With `bounds` of `None` the world box is the enclosing box of the
    /// collected triangles plus a small margin.
    pub fn from_source<S, F>(
        source: &S,
        filter: F,
        bounds: Option<AABB>,
        config: OctreeConfig,
    ) -> Result<Self, PhysicsError>
    where
        S: TriangleSource + ?Sized,
        F: FnMut(&WorldMesh) -> bool,
    {
        let triangles = collect_triangles(source, filter);
        let world_bounds = match bounds {
            Some(bounds) => bounds,
            None => AABB::from_points(
                triangles
                    .iter()
                    .flat_map(|t| [t.v0, t.v1, t.v2])
                    .filter(|v| v.iter().all(|c| c.is_finite())),
            )
            .map_or_else(
                || AABB::new(Vec3::zeros(), Vec3::zeros()),
                |b| b.expanded(COMPUTED_BOUNDS_MARGIN),
            ),
        };

        debug!("Collected {} collidable triangles from world source", triangles.len());
        Self::with_config(&triangles, world_bounds, config)
    }
}
