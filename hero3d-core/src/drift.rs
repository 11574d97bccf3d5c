//! Slow hover motion applied to the group around each floating object

use nalgebra::Matrix4;
use rand::Rng;

use crate::config::DriftConfig;
use crate::transform::{RotationState, Transform};

/// Upper bound for the random phase offset given to each group
pub const MAX_PHASE_OFFSET: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drift {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    /// Phase offset in seconds so groups do not move in lockstep
    pub offset: f32,
}

impl Drift {
    /// A drift that never moves
    pub fn still() -> Self {
        Self {
            speed: 0.0,
            rotation_intensity: 0.0,
            float_intensity: 0.0,
            offset: 0.0,
        }
    }

    /// Drift for an object moving at `speed_multiplier`, with a random phase
    pub fn from_config<R: Rng>(config: &DriftConfig, speed_multiplier: f32, rng: &mut R) -> Self {
        Self {
            speed: config.speed * speed_multiplier,
            rotation_intensity: config.rotation_intensity,
            float_intensity: config.float_intensity,
            offset: rng.gen_range(0.0..MAX_PHASE_OFFSET),
        }
    }

    /// Group rotation and vertical lift at `elapsed` seconds
    pub fn pose(&self, elapsed: f32) -> (RotationState, f32) {
        let phase = (self.offset + elapsed) / 4.0 * self.speed;
        let (sin, cos) = phase.sin_cos();
        let rotation = RotationState::new(
            cos / 8.0 * self.rotation_intensity,
            sin / 8.0 * self.rotation_intensity,
            sin / 20.0 * self.rotation_intensity,
        );
        (rotation, sin / 10.0 * self.float_intensity)
    }

    pub fn group_matrix(&self, elapsed: f32) -> Matrix4<f32> {
        let (rotation, lift) = self.pose(elapsed);
        Transform::translation_matrix(0.0, lift, 0.0) * Transform::rotation_matrix(&rotation)
    }
}

impl Default for Drift {
    fn default() -> Self {
        Self::still()
    }
}
