//! Integration errors raised while setting up the physics core
//!
//! Runtime edge cases (missing index, degenerate triangles, long frames,
//! falling out of the world) are folded into defined behavior and never
//! surface here.

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::math::Vec3;

/// Errors produced while constructing physics state
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Capsule radius was zero, negative or NaN
    #[error("capsule radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    /// Bounds box with `min > max` on some axis, or NaN corners
    #[error("inverted bounds: min {min:?} max {max:?}")]
    InvertedBounds {
        /// Minimum corner as given
        min: Vec3,
        /// Maximum corner as given
        max: Vec3,
    },

    /// A mesh index buffer referenced a vertex that does not exist
    #[error("mesh '{mesh}': vertex index {index} out of range ({vertex_count} vertices)")]
    VertexIndexOutOfRange {
        /// Mesh name
        mesh: String,
        /// Offending index
        index: u32,
        /// Number of vertices in the buffer
        vertex_count: usize,
    },

    /// Configuration failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
