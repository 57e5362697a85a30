//! First-person physics integrator
//!
//! Each frame is clamped and split into a fixed number of substeps. Every
//! substep applies gravity and damping, moves the capsule, resolves the
//! combined contact from the narrow phase and then adds the movement intent.

use crate::config::PhysicsConfig;
use crate::foundation::logging::{info, trace, warn};
use crate::foundation::math::{Vec3, UP};
use crate::input::FrameInput;
use crate::spatial::TriangleQuery;

use super::collision::Capsule;
use super::narrow_phase::{CollisionResult, NarrowPhase};
use super::PhysicsError;

/// Elapsed times this many times over the clamp are reported
const CLAMP_WARN_FACTOR: f32 = 4.0;

/// Integrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// No geometry index loaded; physics is not integrated
    NoIndex,
    /// Last substep found no floor contact
    Airborne,
    /// Last substep ended on an upward-facing contact
    Grounded,
}

/// Velocity and floor flag, updated once per substep
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerPhysicsState {
    /// Current velocity (units/s)
    pub velocity: Vec3,
    /// Whether the last contact was a floor contact
    pub on_floor: bool,
}

/// Capsule pose handed to the rendering layer each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    /// Foot endpoint
    pub start: Vec3,
    /// Head endpoint
    pub end: Vec3,
    /// Camera position
    pub eye: Vec3,
    /// Grounded flag
    pub on_floor: bool,
    /// State machine position
    pub state: MotionState,
}

/// Horizontal camera basis `(forward, right)` for a facing direction
///
/// A vertical or degenerate facing falls back to looking down -Z.
pub fn horizontal_basis(facing: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(facing.x, 0.0, facing.z)
        .try_normalize(1.0e-6)
        .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));
    (forward, forward.cross(&UP))
}

/// Capsule agent integrated against static world geometry
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PhysicsConfig,
    capsule: Capsule,
    spawn: Capsule,
    state: PlayerPhysicsState,
    motion: MotionState,
    narrow_phase: NarrowPhase,
}

impl PlayerController {
    /// Create a controller at the configured spawn pose
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let spawn = Capsule::new(config.spawn_start, config.spawn_end, config.capsule_radius)?;

        Ok(Self {
            config,
            capsule: spawn,
            spawn,
            state: PlayerPhysicsState::default(),
            motion: MotionState::NoIndex,
            narrow_phase: NarrowPhase::new(),
        })
    }

    /// Advance one frame of `elapsed` seconds
    ///
    /// Without an index the capsule is parked at the idle pose instead.
    pub fn step<Q>(&mut self, index: Option<&Q>, input: &FrameInput, elapsed: f32) -> PlayerPose
    where
        Q: TriangleQuery + ?Sized,
    {
        let Some(index) = index else {
            self.idle();
            return self.pose();
        };

        let clamped = self.config.clamp_frame_time(elapsed);
        if elapsed > self.config.max_frame_time * CLAMP_WARN_FACTOR {
            warn!("Frame took {:.3}s, clamped to {:.3}s", elapsed, clamped);
        }

        let substeps = self.config.substep_count_f32();
        let dt = clamped / substeps;
        let (forward, right) = horizontal_basis(input.facing);
        let intent = (forward * input.intent.forward + right * input.intent.right) / substeps;
        let mut jump = input.intent.jump;

        for _ in 0..self.config.substeps.max(1) {
            self.substep(index, dt, intent, &mut jump);

            if self.capsule.start.y <= self.config.out_of_bounds_y {
                info!(
                    "Player fell out of bounds at {:?}, respawning",
                    self.capsule.start
                );
                self.respawn();
                break;
            }
        }

        self.pose()
    }

    fn substep<Q>(&mut self, index: &Q, dt: f32, intent: Vec3, jump: &mut bool)
    where
        Q: TriangleQuery + ?Sized,
    {
        let mut damping = (-self.config.damping_rate * dt).exp() - 1.0;
        if !self.state.on_floor {
            damping *= self.config.air_resistance;
            self.state.velocity.y -= self.config.gravity * dt;
        }
        self.state.velocity += self.state.velocity * damping;

        self.capsule.translate(self.state.velocity * dt);

        match self.narrow_phase.intersect(&self.capsule, index) {
            Some(contact) => self.resolve(contact),
            None => self.state.on_floor = false,
        }

        self.state.velocity += intent;
        if *jump && self.state.on_floor {
            self.state.velocity.y = self.config.jump_speed;
            *jump = false;
        }

        self.motion = if self.state.on_floor {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        };
    }

    fn resolve(&mut self, contact: CollisionResult) {
        let CollisionResult { normal, depth } = contact;
        self.state.on_floor = normal.y > 0.0;

        let along_normal = normal.dot(&self.state.velocity);
        if self.state.on_floor {
            // Only the part moving into the floor is removed
            self.state.velocity -= normal * along_normal.min(0.0);
        } else {
            self.state.velocity -= normal * along_normal;
        }

        self.capsule.translate(normal * depth);

        trace!(
            "Contact normal {:?} depth {:.4} floor {}",
            normal,
            depth,
            self.state.on_floor
        );
    }

    fn idle(&mut self) {
        let axis = self.capsule.axis();
        self.capsule.set_pose(self.config.idle_foot, self.config.idle_foot + axis);
        self.state = PlayerPhysicsState::default();
        self.motion = MotionState::NoIndex;
    }

    /// Reset to the spawn pose with zero velocity
    pub fn respawn(&mut self) {
        self.capsule = self.spawn;
        self.state = PlayerPhysicsState::default();
        if self.motion == MotionState::Grounded {
            self.motion = MotionState::Airborne;
        }
    }

    /// Move the foot to `foot`, keeping the capsule's shape and clearing velocity
    pub fn teleport(&mut self, foot: Vec3) {
        let axis = self.capsule.axis();
        self.capsule.set_pose(foot, foot + axis);
        self.state = PlayerPhysicsState::default();
    }

    /// Override the current velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.state.velocity = velocity;
    }

    /// Current pose
    pub fn pose(&self) -> PlayerPose {
        PlayerPose {
            start: self.capsule.start,
            end: self.capsule.end,
            eye: self.capsule.end,
            on_floor: self.state.on_floor,
            state: self.motion,
        }
    }

    /// The capsule collider
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// Velocity and floor flag
    pub fn state(&self) -> &PlayerPhysicsState {
        &self.state
    }

    /// State machine position
    pub fn motion_state(&self) -> MotionState {
        self.motion
    }

    /// Configuration in use
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MovementIntent;
    use crate::spatial::{GeometryIndex, AABB};
    use approx::assert_relative_eq;

    fn empty_index() -> GeometryIndex {
        GeometryIndex::empty(AABB::new(Vec3::repeat(-10.0), Vec3::repeat(10.0))).expect("valid bounds")
    }

    #[test]
    fn test_basis_ignores_pitch() {
        let (forward, right) = horizontal_basis(Vec3::new(0.0, -0.9, -0.1));
        assert_relative_eq!(forward, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(right, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);

        let (forward, _) = horizontal_basis(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(forward, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_starts_without_index() {
        let controller = PlayerController::new(PhysicsConfig::default()).expect("valid config");
        assert_eq!(controller.motion_state(), MotionState::NoIndex);
        assert!(!controller.pose().on_floor);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PhysicsConfig { capsule_radius: -1.0, ..PhysicsConfig::default() };
        assert!(matches!(PlayerController::new(config), Err(PhysicsError::Config(_))));
    }

    #[test]
    fn test_no_index_parks_at_idle_pose() {
        let mut controller = PlayerController::new(PhysicsConfig::default()).expect("valid config");
        controller.set_velocity(Vec3::new(3.0, -4.0, 0.0));

        let pose = controller.step(None::<&GeometryIndex>, &FrameInput::default(), 0.016);
        assert_relative_eq!(pose.start, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(pose.end - pose.start, Vec3::new(0.0, 1.6, 0.0), epsilon = 1e-6);
        assert_eq!(pose.state, MotionState::NoIndex);
        assert_eq!(controller.state().velocity, Vec3::zeros());
    }

    #[test]
    fn test_intent_moves_along_camera_right() {
        let config = PhysicsConfig { gravity: 0.0, damping_rate: 0.0, ..PhysicsConfig::default() };
        let mut controller = PlayerController::new(config).expect("valid config");
        let index = empty_index();
        let input = FrameInput::new(MovementIntent { forward: 0.0, right: 2.0, jump: false });

        controller.step(Some(&index), &input, 0.05);
        let velocity = controller.state().velocity;
        assert_relative_eq!(velocity, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
        assert!(controller.pose().start.x > 0.0);
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut controller = PlayerController::new(PhysicsConfig::default()).expect("valid config");
        let index = empty_index();
        let input = FrameInput::new(MovementIntent::none().with_jump());

        controller.step(Some(&index), &input, 0.016);
        assert!(controller.state().velocity.y < 0.0);
        assert_eq!(controller.motion_state(), MotionState::Airborne);
    }

    #[test]
    fn test_teleport_keeps_shape() {
        let mut controller = PlayerController::new(PhysicsConfig::default()).expect("valid config");
        controller.set_velocity(Vec3::new(1.0, 1.0, 1.0));
        controller.teleport(Vec3::new(5.0, 3.0, -2.0));

        let pose = controller.pose();
        assert_relative_eq!(pose.start, Vec3::new(5.0, 3.0, -2.0), epsilon = 1e-6);
        assert_relative_eq!(pose.end, Vec3::new(5.0, 4.6, -2.0), epsilon = 1e-5);
        assert_eq!(controller.state().velocity, Vec3::zeros());
    }
}
