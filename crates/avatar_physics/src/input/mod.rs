//! Input adaptation
//!
//! Converts held keys and thumbstick deflection into the per-frame
//! [`MovementIntent`] the integrator consumes. Device polling itself belongs
//! to the host.

use crate::config::InputConfig;
use crate::foundation::math::Vec3;

/// Per-frame movement request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// Velocity delta along the camera's horizontal forward direction
    pub forward: f32,
    /// Velocity delta along the camera's horizontal right direction
    pub right: f32,
    /// Jump requested this frame
    pub jump: bool,
}

impl MovementIntent {
    /// No movement
    pub fn none() -> Self {
        Self::default()
    }

    /// Intent from a thumbstick deflection in `[-1, 1]`
    ///
    /// Pushing the stick forward reports negative `y`.
    pub fn from_thumbstick(x: f32, y: f32, scale: f32) -> Self {
        Self {
            forward: -y * scale,
            right: x * scale,
            jump: false,
        }
    }

    /// Same intent with the jump flag set
    #[must_use]
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }
}

/// Everything the integrator reads from the host for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Requested movement
    pub intent: MovementIntent,
    /// Camera facing direction; only its horizontal part is used
    pub facing: Vec3,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            intent: MovementIntent::none(),
            facing: Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl FrameInput {
    /// Input with the default facing (-Z)
    pub fn new(intent: MovementIntent) -> Self {
        Self {
            intent,
            ..Self::default()
        }
    }

    /// Same input looking along `facing`
    #[must_use]
    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = facing;
        self
    }
}

/// Key codes the movement mapper understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space key
    Space,
    /// Shift (run modifier)
    Shift,
}

/// Held-key state for WASD / arrow movement
#[derive(Debug, Clone, Default)]
pub struct KeyboardMovement {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    run: bool,
    jump_pending: bool,
}

impl KeyboardMovement {
    /// Nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press
    pub fn key_down(&mut self, key: KeyCode) {
        self.set_key(key, true);
    }

    /// Handle a key release
    pub fn key_up(&mut self, key: KeyCode) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::W | KeyCode::Up => self.forward = pressed,
            KeyCode::S | KeyCode::Down => self.backward = pressed,
            KeyCode::A | KeyCode::Left => self.left = pressed,
            KeyCode::D | KeyCode::Right => self.right = pressed,
            KeyCode::Shift => self.run = pressed,
            // Jump fires on press only
            KeyCode::Space => self.jump_pending |= pressed,
        }
    }

    /// Forget every held key (host hidden or unfocused)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Build this frame's intent and consume a pending jump
    pub fn intent(&mut self, elapsed: f32, config: &InputConfig) -> MovementIntent {
        let multiplier = if self.run { config.run_multiplier } else { 1.0 };
        let speed = elapsed.max(0.0) * config.walk_speed * multiplier;
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };

        MovementIntent {
            forward: axis(self.forward, self.backward) * speed,
            right: axis(self.right, self.left) * speed,
            jump: std::mem::take(&mut self.jump_pending),
        }
    }
}
