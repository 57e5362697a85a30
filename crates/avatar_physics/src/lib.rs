//! # Avatar Physics
//!
//! First-person capsule physics against static triangle-mesh worlds.
//!
//! ## Features
//!
//! - **Geometry Index**: octree over a static triangle soup, built once per world load
//! - **Capsule Collider**: swept-sphere shape with segment closest-point helpers
//! - **Narrow Phase**: exact capsule-vs-triangle contacts folded into one correction
//! - **Integrator**: substepped gravity, damping, floor detection and out-of-bounds recovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use avatar_physics::prelude::*;
//!
//! fn main() -> Result<(), PhysicsError> {
//!     let mut sim = Simulation::new(PhysicsConfig::default())?;
//!
//!     let floor = WorldMesh::from_indexed(
//!         "floor",
//!         &[
//!             Vec3::new(-10.0, 0.0, -10.0),
//!             Vec3::new(10.0, 0.0, -10.0),
//!             Vec3::new(10.0, 0.0, 10.0),
//!             Vec3::new(-10.0, 0.0, 10.0),
//!         ],
//!         &[0, 2, 1, 0, 3, 2],
//!         &Transform::identity(),
//!     )?;
//!     sim.load_world(&vec![floor])?;
//!
//!     let input = FrameInput::new(MovementIntent { forward: 0.3, right: 0.0, jump: false });
//!     let pose = sim.tick_elapsed(1.0 / 60.0, &input);
//!     println!("eye at {:?}, grounded: {}", pose.eye, pose.on_floor);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod spatial;
pub mod physics;
pub mod input;
pub mod simulation;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{Config, ConfigError, InputConfig, PhysicsConfig};
    pub use crate::foundation::math::{Quat, Transform, Vec3};
    pub use crate::foundation::time::FrameClock;
    pub use crate::input::{FrameInput, KeyCode, KeyboardMovement, MovementIntent};
    pub use crate::physics::{
        capsule_intersect, Capsule, CollisionResult, MeshArena, MeshKey, MotionState,
        NarrowPhase, PhysicsError, PlayerController, PlayerPose, Triangle, TriangleSource,
        WorldMesh,
    };
    pub use crate::simulation::Simulation;
    pub use crate::spatial::{GeometryIndex, OctreeConfig, TriangleList, TriangleQuery, AABB};
}
