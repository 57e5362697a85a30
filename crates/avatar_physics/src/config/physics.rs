//! Physics and input tuning constants

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;
use crate::spatial::OctreeConfig;

/// # Physics Configuration
///
/// Every constant the integrator, collider and geometry index read. Values
/// are fixed once the simulation is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity magnitude (units/s^2), applied while airborne
    pub gravity: f32,
    /// Fixed number of substeps each frame is divided into
    pub substeps: u32,
    /// Upper bound for a single frame's elapsed time (seconds)
    pub max_frame_time: f32,
    /// Exponential velocity damping rate `k` in `exp(-k * dt)`
    pub damping_rate: f32,
    /// Fraction of the damping applied while airborne
    pub air_resistance: f32,
    /// Vertical speed set by a jump
    pub jump_speed: f32,
    /// Capsule radius
    pub capsule_radius: f32,
    /// Capsule foot on spawn / respawn
    pub spawn_start: Vec3,
    /// Capsule head on spawn / respawn
    pub spawn_end: Vec3,
    /// Where the foot rests while no world is loaded
    pub idle_foot: Vec3,
    /// Respawn once the foot is at or below this height
    pub out_of_bounds_y: f32,
    /// Geometry index construction limits
    pub octree: OctreeConfig,
    /// Movement intent scaling
    pub input: InputConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            substeps: 5,
            max_frame_time: 0.05,
            damping_rate: 4.0,
            air_resistance: 0.1,
            jump_speed: 15.0,
            capsule_radius: 0.35,
            spawn_start: Vec3::new(0.0, 0.35, 0.0),
            spawn_end: Vec3::new(0.0, 1.95, 0.0),
            idle_foot: Vec3::new(0.0, 2.0, 0.0),
            out_of_bounds_y: -25.0,
            octree: OctreeConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl Config for PhysicsConfig {}

impl PhysicsConfig {
    /// Length of one substep for a frame of `elapsed` seconds, after clamping
    pub fn substep_duration(&self, elapsed: f32) -> f32 {
        self.clamp_frame_time(elapsed) / self.substep_count_f32()
    }

    /// Clamp a frame's elapsed time into `[0, max_frame_time]`; NaN becomes 0
    pub fn clamp_frame_time(&self, elapsed: f32) -> f32 {
        if elapsed.is_nan() {
            return 0.0;
        }
        elapsed.clamp(0.0, self.max_frame_time)
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn substep_count_f32(&self) -> f32 {
        self.substeps.max(1) as f32
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capsule_radius.is_nan() || self.capsule_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "capsule_radius must be positive, got {}",
                self.capsule_radius
            )));
        }

        if self.substeps == 0 {
            return Err(ConfigError::Invalid("substeps must be at least 1".to_string()));
        }

        if self.max_frame_time.is_nan() || self.max_frame_time < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_frame_time must be non-negative, got {}",
                self.max_frame_time
            )));
        }

        if [self.gravity, self.damping_rate].iter().any(|value| value.is_nan() || *value < 0.0) {
            return Err(ConfigError::Invalid(
                "gravity and damping_rate must be non-negative".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.air_resistance) {
            return Err(ConfigError::Invalid(format!(
                "air_resistance must be within [0, 1], got {}",
                self.air_resistance
            )));
        }

        if (self.spawn_end - self.spawn_start).norm_squared() <= f32::EPSILON {
            return Err(ConfigError::Invalid(
                "spawn_start and spawn_end must not coincide".to_string(),
            ));
        }

        self.octree.validate()?;
        self.input.validate()
    }
}

/// # Input Configuration
///
/// Converts raw key holds and thumbstick deflection into movement intents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Velocity added per second of holding a direction key
    pub walk_speed: f32,
    /// Multiplier while the run modifier is held
    pub run_multiplier: f32,
    /// Scale from thumbstick deflection to per-frame velocity delta
    pub thumbstick_scale: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            walk_speed: 20.0,
            run_multiplier: 2.0,
            thumbstick_scale: 1.0 / 20.0,
        }
    }
}

impl InputConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [self.walk_speed, self.run_multiplier, self.thumbstick_scale];
        if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ConfigError::Invalid(
                "input speeds must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
