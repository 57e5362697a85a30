//! Physics module for capsule collision and movement integration
//!
//! Collision geometry lives in [`collision`], the exact capsule tests in
//! [`narrow_phase`], and the per-frame integrator in [`controller`].

pub mod collision;
pub mod controller;
pub mod error;
pub mod narrow_phase;

#[cfg(test)]
mod tests;

pub use collision::{Capsule, MeshArena, MeshKey, Triangle, TriangleSource, WorldMesh};
pub use controller::{horizontal_basis, MotionState, PlayerController, PlayerPhysicsState, PlayerPose};
pub use error::PhysicsError;
pub use narrow_phase::{
    aggregate_contacts, capsule_intersect, triangle_capsule_contact, CollisionResult, Contact,
    NarrowPhase, CONTACT_TOLERANCE,
};
