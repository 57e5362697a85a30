//! Octree geometry index over a static triangle set
//!
//! Divides the world box hierarchically into octants and assigns each
//! triangle to every octant its bounding box touches. Built once, read-only
//! afterwards, replaced wholesale when the world changes.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::foundation::logging::debug;
use crate::foundation::math::Vec3;
use crate::foundation::time::Stopwatch;
use crate::physics::collision::{Capsule, Triangle};
use crate::physics::narrow_phase::CONTACT_TOLERANCE;
use crate::physics::PhysicsError;

use super::AABB;

/// Deepest subdivision a configuration may request
const MAX_SUPPORTED_DEPTH: u32 = 16;

/// Configuration for octree construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Nodes holding this many triangles or fewer become leaves
    pub min_triangles_per_leaf: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            min_triangles_per_leaf: 8,
        }
    }
}

impl OctreeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_triangles_per_leaf == 0 {
            return Err(ConfigError::Invalid(
                "octree.min_triangles_per_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "octree.max_depth must be at most {MAX_SUPPORTED_DEPTH}, got {}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// Octant of space this node covers
    pub region: AABB,

    /// Tight box around every triangle stored at or below this node
    pub bounds: AABB,

    /// Triangle indices (leaves only)
    pub triangles: Vec<u32>,

    /// Non-empty child octants, empty for a leaf
    pub children: Vec<OctreeNode>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    fn leaf(region: AABB, bounds: AABB, triangles: Vec<u32>, depth: u32) -> Self {
        Self {
            region,
            bounds,
            triangles,
            children: Vec::new(),
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn build(
        region: AABB,
        indices: Vec<u32>,
        depth: u32,
        tri_bounds: &[AABB],
        config: &OctreeConfig,
    ) -> Self {
        let bounds = indices
            .iter()
            .fold(AABB::empty(), |acc, &i| acc.union(&tri_bounds[i as usize]));

        if indices.len() <= config.min_triangles_per_leaf || depth >= config.max_depth {
            return Self::leaf(region, bounds, indices, depth);
        }

        let subsets: Vec<(AABB, Vec<u32>)> = (0..8)
            .map(|octant| {
                let child_region = region.octant(octant);
                let subset = indices
                    .iter()
                    .copied()
                    .filter(|&i| tri_bounds[i as usize].intersects(&child_region))
                    .collect::<Vec<_>>();
                (child_region, subset)
            })
            .filter(|(_, subset)| !subset.is_empty())
            .collect();

        // Splitting would only copy the same set into every child
        if subsets.iter().all(|(_, subset)| subset.len() == indices.len()) {
            return Self::leaf(region, bounds, indices, depth);
        }

        let children = subsets
            .into_iter()
            .map(|(child_region, subset)| {
                Self::build(child_region, subset, depth + 1, tri_bounds, config)
            })
            .collect();

        Self {
            region,
            bounds,
            triangles: Vec::new(),
            children,
            depth,
        }
    }

    fn collect_box(&self, area: &AABB, tri_bounds: &[AABB], out: &mut Vec<u32>) {
        if !self.bounds.intersects(area) {
            return;
        }

        if self.is_leaf() {
            out.extend(
                self.triangles
                    .iter()
                    .copied()
                    .filter(|&i| tri_bounds[i as usize].intersects(area)),
            );
        } else {
            for child in &self.children {
                child.collect_box(area, tri_bounds, out);
            }
        }
    }

    fn collect_sphere(&self, center: Vec3, radius: f32, tri_bounds: &[AABB], out: &mut Vec<u32>) {
        if !self.bounds.intersects_sphere(center, radius) {
            return;
        }

        if self.is_leaf() {
            out.extend(
                self.triangles
                    .iter()
                    .copied()
                    .filter(|&i| tri_bounds[i as usize].intersects_sphere(center, radius)),
            );
        } else {
            for child in &self.children {
                child.collect_sphere(center, radius, tri_bounds, out);
            }
        }
    }

    /// Get all leaf nodes (for visualization)
    fn get_all_leaves<'a>(&'a self, leaves: &mut Vec<&'a OctreeNode>) {
        if self.is_leaf() {
            leaves.push(self);
        } else {
            for child in &self.children {
                child.get_all_leaves(leaves);
            }
        }
    }

    /// Get all nodes at a specific depth (for visualization)
    fn get_nodes_at_depth<'a>(&'a self, target_depth: u32, nodes: &mut Vec<&'a OctreeNode>) {
        if self.depth == target_depth {
            nodes.push(self);
        } else {
            for child in &self.children {
                child.get_nodes_at_depth(target_depth, nodes);
            }
        }
    }

    fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Self::count_nodes).sum::<usize>()
    }

    fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(Self::max_depth)
            .max()
            .unwrap_or(self.depth)
    }
}

/// Read-only spatial index over a static triangle soup
#[derive(Debug, Clone)]
pub struct GeometryIndex {
    root: OctreeNode,
    triangles: Vec<Triangle>,
    tri_bounds: Vec<AABB>,
    world_bounds: AABB,
    config: OctreeConfig,
}

impl GeometryIndex {
    /// Build with the default [`OctreeConfig`]
    pub fn build(triangles: &[Triangle], world_bounds: AABB) -> Result<Self, PhysicsError> {
        Self::with_config(triangles, world_bounds, OctreeConfig::default())
    }

    /// Build an index from a triangle list and the declared world box
    ///
    /// Triangle indices refer to positions in `triangles`. Triangles outside
    /// `world_bounds` are still indexed: the root grows to enclose them.
    pub fn with_config(
        triangles: &[Triangle],
        world_bounds: AABB,
        config: OctreeConfig,
    ) -> Result<Self, PhysicsError> {
        if !world_bounds.is_valid() {
            return Err(PhysicsError::InvertedBounds {
                min: world_bounds.min,
                max: world_bounds.max,
            });
        }
        config.validate()?;

        let stopwatch = Stopwatch::start_new();

        let tri_bounds: Vec<AABB> = triangles.iter().map(Triangle::bounds).collect();
        let root_region = tri_bounds
            .iter()
            .filter(|bounds| bounds.is_valid())
            .fold(world_bounds, |acc, bounds| acc.union(bounds));

        #[allow(clippy::cast_possible_truncation)]
        let indices: Vec<u32> = (0..triangles.len()).map(|i| i as u32).collect();
        let root = OctreeNode::build(root_region, indices, 0, &tri_bounds, &config);

        let index = Self {
            root,
            triangles: triangles.to_vec(),
            tri_bounds,
            world_bounds,
            config,
        };

        debug!(
            "Built geometry index: {} triangles, {} nodes, {} leaves, depth {} in {:.2} ms",
            index.triangle_count(),
            index.node_count(),
            index.leaf_count(),
            index.depth(),
            stopwatch.elapsed_millis()
        );

        Ok(index)
    }

    /// An index with no triangles; every query returns nothing
    pub fn empty(world_bounds: AABB) -> Result<Self, PhysicsError> {
        Self::build(&[], world_bounds)
    }

    /// Candidate triangles that may touch `capsule`, ascending by index, no duplicates
    pub fn query_near<'a>(&'a self, capsule: &Capsule) -> impl Iterator<Item = &'a Triangle> + 'a {
        let mut indices = Vec::new();
        self.query_near_into(capsule, &mut indices);
        indices.into_iter().map(move |i| &self.triangles[i as usize])
    }

    /// Allocation-free variant of [`query_near`](Self::query_near) returning indices
    ///
    /// `out` is cleared first.
    pub fn query_near_into(&self, capsule: &Capsule, out: &mut Vec<u32>) {
        out.clear();
        let area = capsule.bounds().expanded(CONTACT_TOLERANCE);
        self.candidates_in(&area, out);
    }

    /// Indices of triangles within `radius` of `center`
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<u32> {
        let mut out = Vec::new();
        self.root.collect_sphere(center, radius, &self.tri_bounds, &mut out);
        sort_and_dedup(&mut out);
        out.retain(|&i| {
            let closest = self.triangles[i as usize].closest_point(center);
            (closest - center).norm_squared() <= radius * radius
        });
        out
    }

    /// Indices of triangles that actually intersect `area`
    pub fn query_box(&self, area: &AABB) -> Vec<u32> {
        let mut out = Vec::new();
        self.candidates_in(area, &mut out);
        out.retain(|&i| area.intersects_triangle(&self.triangles[i as usize]));
        out
    }

    /// Appends indices whose bounding boxes overlap `area`, sorted and unique
    pub(crate) fn candidates_in(&self, area: &AABB, out: &mut Vec<u32>) {
        let start = out.len();
        self.root.collect_box(area, &self.tri_bounds, out);
        let mut tail = out.split_off(start);
        sort_and_dedup(&mut tail);
        out.extend(tail);
    }

    /// Triangle by index
    pub fn triangle(&self, index: u32) -> &Triangle {
        &self.triangles[index as usize]
    }

    /// All indexed triangles in input order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of indexed triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the index holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// World box the index was built with
    pub fn world_bounds(&self) -> AABB {
        self.world_bounds
    }

    /// Root node
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    /// Configuration the index was built with
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.root.count_nodes()
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Depth of the deepest node
    pub fn depth(&self) -> u32 {
        self.root.max_depth()
    }

    /// Get all leaf nodes (for visualization)
    pub fn leaves(&self) -> Vec<&OctreeNode> {
        let mut leaves = Vec::new();
        self.root.get_all_leaves(&mut leaves);
        leaves
    }

    /// Get all nodes at a specific depth (for visualization)
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<&OctreeNode> {
        let mut nodes = Vec::new();
        self.root.get_nodes_at_depth(depth, &mut nodes);
        nodes
    }
}

fn sort_and_dedup(indices: &mut Vec<u32>) {
    indices.sort_unstable();
    indices.dedup();
}
