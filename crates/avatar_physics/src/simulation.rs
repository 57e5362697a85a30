//! Simulation facade
//!
//! Owns the frame clock, the current geometry index slot and the player
//! controller. The index is swapped as a whole between ticks; holders of a
//! previous `Arc` keep a valid index until they drop it.

use std::sync::Arc;

use crate::config::PhysicsConfig;
use crate::foundation::logging::info;
use crate::foundation::time::FrameClock;
use crate::input::FrameInput;
use crate::physics::collision::{Triangle, TriangleSource, WorldMesh};
use crate::physics::{PhysicsError, PlayerController, PlayerPose};
use crate::spatial::{GeometryIndex, AABB};

/// One avatar simulated against one static world
#[derive(Debug)]
pub struct Simulation {
    config: PhysicsConfig,
    clock: FrameClock,
    index: Option<Arc<GeometryIndex>>,
    player: PlayerController,
}

impl Simulation {
    /// Create a simulation with no world loaded
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        let player = PlayerController::new(config.clone())?;
        Ok(Self {
            config,
            clock: FrameClock::new(),
            index: None,
            player,
        })
    }

    /// Build an index from the collidable meshes of `source` and swap it in
    pub fn load_world<S>(&mut self, source: &S) -> Result<Arc<GeometryIndex>, PhysicsError>
    where
        S: TriangleSource + ?Sized,
    {
        let index = GeometryIndex::from_source(
            source,
            WorldMesh::is_collidable,
            None,
            self.config.octree.clone(),
        )?;
        Ok(self.install(index))
    }

    /// Build an index from a flat triangle list and declared world box
    pub fn load_triangles(
        &mut self,
        triangles: &[Triangle],
        bounds: AABB,
    ) -> Result<Arc<GeometryIndex>, PhysicsError> {
        let index = GeometryIndex::with_config(triangles, bounds, self.config.octree.clone())?;
        Ok(self.install(index))
    }

    fn install(&mut self, index: GeometryIndex) -> Arc<GeometryIndex> {
        info!(
            "World loaded: {} triangles in {} octree nodes",
            index.triangle_count(),
            index.node_count()
        );
        let index = Arc::new(index);
        self.index = Some(Arc::clone(&index));
        index
    }

    /// Swap the index slot, returning what was there
    pub fn replace_index(&mut self, index: Option<Arc<GeometryIndex>>) -> Option<Arc<GeometryIndex>> {
        std::mem::replace(&mut self.index, index)
    }

    /// Drop the current world; the player idles until another is loaded
    pub fn unload_world(&mut self) -> Option<Arc<GeometryIndex>> {
        let previous = self.index.take();
        if previous.is_some() {
            info!("World unloaded");
        }
        previous
    }

    /// Advance using a host timestamp in seconds
    pub fn tick(&mut self, now: f64, input: &FrameInput) -> PlayerPose {
        let elapsed = self.clock.advance(now);
        self.tick_elapsed(elapsed, input)
    }

    /// Advance by an explicit elapsed time, bypassing the clock
    pub fn tick_elapsed(&mut self, elapsed: f32, input: &FrameInput) -> PlayerPose {
        self.player.step(self.index.as_deref(), input, elapsed)
    }

    /// Discard the time gap up to `now` (host was suspended)
    pub fn resync(&mut self, now: f64) {
        self.clock.resync(now);
    }

    /// Current pose
    pub fn pose(&self) -> PlayerPose {
        self.player.pose()
    }

    /// Whether the player stands on a floor
    pub fn is_grounded(&self) -> bool {
        self.player.state().on_floor
    }

    /// The player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Mutable player controller (teleport, respawn)
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// Currently installed index
    pub fn index(&self) -> Option<&Arc<GeometryIndex>> {
        self.index.as_ref()
    }

    /// Frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Configuration in use
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Transform, Vec3};
    use crate::physics::MotionState;

    fn floor_mesh() -> WorldMesh {
        WorldMesh::from_indexed(
            "floor",
            &[
                Vec3::new(-30.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 30.0),
                Vec3::new(-30.0, 0.0, 30.0),
            ],
            &[0, 1, 2, 0, 2, 3],
            &Transform::identity(),
        )
        .expect("valid floor")
    }

    #[test]
    fn test_ticks_without_world_idle() {
        let mut sim = Simulation::new(PhysicsConfig::default()).expect("valid config");
        let pose = sim.tick(0.0, &FrameInput::default());
        assert_eq!(pose.state, MotionState::NoIndex);
        assert!(!sim.is_grounded());
    }

    #[test]
    fn test_load_and_unload_world() {
        let mut sim = Simulation::new(PhysicsConfig::default()).expect("valid config");
        let decoration = floor_mesh().non_collidable();
        let index = sim.load_world(&vec![floor_mesh(), decoration]).expect("load");
        assert_eq!(index.triangle_count(), 2);
        assert!(sim.index().is_some());

        let previous = sim.unload_world().expect("was loaded");
        assert!(Arc::ptr_eq(&previous, &index));
        assert!(sim.index().is_none());
        assert!(sim.unload_world().is_none());
    }

    #[test]
    fn test_replace_index_keeps_old_index_valid() {
        let mut sim = Simulation::new(PhysicsConfig::default()).expect("valid config");
        let bounds = AABB::new(Vec3::new(-30.0, 0.0, 0.0), Vec3::new(10.0, 10.5, 30.0));
        let first = sim.load_triangles(&floor_mesh().triangles, bounds).expect("load");

        let replacement = Arc::new(GeometryIndex::empty(bounds).expect("valid bounds"));
        let old = sim.replace_index(Some(replacement)).expect("had index");
        assert!(Arc::ptr_eq(&old, &first));
        assert_eq!(old.triangle_count(), 2);
        assert_eq!(sim.index().map(|index| index.triangle_count()), Some(0));
    }

    #[test]
    fn test_tick_uses_clock_deltas() {
        let mut sim = Simulation::new(PhysicsConfig::default()).expect("valid config");
        let bounds = AABB::new(Vec3::new(-30.0, 0.0, 0.0), Vec3::new(10.0, 10.5, 30.0));
        sim.load_triangles(&[], bounds).expect("load");

        sim.tick(10.0, &FrameInput::default());
        assert_eq!(sim.player().state().velocity.y, 0.0);

        sim.tick(10.02, &FrameInput::default());
        assert!(sim.player().state().velocity.y < 0.0);
        assert_eq!(sim.clock().frame_count(), 2);
    }
}
