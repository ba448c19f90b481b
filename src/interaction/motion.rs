//! Rotation angles, spin blending and drag momentum.
//!
//! Angles accumulate without wrapping. Spin changes never snap: every frame
//! the current angular velocity closes a fixed fraction of the gap to the
//! target. Momentum is the pointer velocity (px/ms) left over from a drag,
//! decayed geometrically each frame.

use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Accumulated angles about x, y, z (radians)
    pub angles: Vec3,
    /// Angular velocity applied this frame (rad/frame)
    pub current: Vec3,
    /// Angular velocity being approached
    pub target: Vec3,
}

impl RotationState {
    pub fn spinning(spin: Vec3) -> Self {
        Self {
            angles: Vec3::ZERO,
            current: spin,
            target: spin,
        }
    }

    /// Move `current` a fraction `rate` of the way toward `target`.
    pub fn blend(&mut self, rate: f32) {
        self.current += (self.target - self.current) * rate;
    }

    /// Advance the angles by the current velocity.
    pub fn step(&mut self) {
        self.angles += self.current;
    }

    /// Turn the star by a pointer delta: horizontal motion spins about y,
    /// vertical motion about x.
    pub fn drag_by(&mut self, delta: Vec2, sensitivity: f32) {
        self.angles.y += delta.x * sensitivity;
        self.angles.x += delta.y * sensitivity;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Momentum {
    /// Pointer velocity in px/ms
    pub velocity: Vec2,
}

impl Momentum {
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Both components below `epsilon`.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.velocity.x.abs() < epsilon && self.velocity.y.abs() < epsilon
    }

    /// Rotate by the residual velocity, then decay it.
    pub fn apply(&mut self, rotation: &mut RotationState, gain: f32, decay: f32) {
        rotation.angles.y += self.velocity.x * gain;
        rotation.angles.x += self.velocity.y * gain;
        self.velocity *= decay;
    }
}
