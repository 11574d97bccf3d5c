//! Floating polyhedra and their per-frame animation.
//!
//! Each [`FloatingObject`] tumbles around two axes at rates proportional to
//! its speed multiplier and bobs vertically around its base height. The bob
//! is recomputed from elapsed time every frame rather than accumulated, so
//! it never drifts; only the rotation is an accumulator.

use nalgebra::{Matrix4, Point3};

use crate::driver::FrameInfo;
use crate::drift::Drift;
use crate::geometry::Mesh;
use crate::lighting::Material;
use crate::transform::{RotationState, Transform};

/// Radians per second around X at speed 1
pub const ROTATION_RATE_X: f32 = 0.35;
/// Radians per second around Y at speed 1
pub const ROTATION_RATE_Y: f32 = 0.55;
/// Peak vertical displacement from the base height
pub const BOB_AMPLITUDE: f32 = 0.25;

/// The live, renderer-facing state of a mounted object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub position: Point3<f32>,
    pub rotation: RotationState,
}

impl MeshInstance {
    pub fn at(position: Point3<f32>) -> Self {
        Self {
            position,
            rotation: RotationState::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingObject {
    base_position: Point3<f32>,
    size: f32,
    speed: f32,
    material: Material,
    drift: Drift,
    geometry: Mesh,
    /// `None` until mounted
    instance: Option<MeshInstance>,
}

impl FloatingObject {
    pub fn new(base_position: Point3<f32>, size: f32, speed: f32, material: Material) -> Self {
        Self {
            base_position,
            size,
            speed,
            material,
            drift: Drift::still(),
            geometry: Mesh::icosahedron(size),
            instance: None,
        }
    }

    pub fn with_drift(mut self, drift: Drift) -> Self {
        self.drift = drift;
        self
    }

    pub fn base_position(&self) -> Point3<f32> {
        self.base_position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn drift(&self) -> &Drift {
        &self.drift
    }

    pub fn geometry(&self) -> &Mesh {
        &self.geometry
    }

    pub fn instance(&self) -> Option<&MeshInstance> {
        self.instance.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.instance.is_some()
    }

    /// Attach a render handle at the base position. No-op when already mounted.
    pub fn mount(&mut self) {
        if self.instance.is_none() {
            self.instance = Some(MeshInstance::at(self.base_position));
        }
    }

    pub fn unmount(&mut self) {
        self.instance = None;
    }

    /// Advance one frame.
    ///
    /// Skipped entirely while no render handle is attached.
    pub fn animate(&mut self, frame: &FrameInfo) {
        let Some(instance) = self.instance.as_mut() else {
            return;
        };
        instance.rotation.x += frame.delta * ROTATION_RATE_X * self.speed;
        instance.rotation.y += frame.delta * ROTATION_RATE_Y * self.speed;
        instance.position.y =
            self.base_position.y + (frame.elapsed * self.speed).sin() * BOB_AMPLITUDE;
    }

    pub fn rotation(&self) -> Option<RotationState> {
        self.instance.map(|instance| instance.rotation)
    }

    pub fn vertical_offset(&self) -> Option<f32> {
        self.instance.map(|instance| instance.position.y)
    }

    /// World matrix at `elapsed`: the drift group wrapped around the object's own transform
    pub fn model_matrix(&self, elapsed: f32) -> Option<Matrix4<f32>> {
        let instance = self.instance.as_ref()?;
        let local = Transform::model_matrix(&instance.position, &instance.rotation, 1.0);
        Some(self.drift.group_matrix(elapsed) * local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use std::f32::consts::PI;

    fn floater(y: f32, speed: f32) -> FloatingObject {
        let material = Material::new(Rgb::WHITE, 0.35, 0.3);
        FloatingObject::new(Point3::new(-1.3, y, 0.0), 1.1, speed, material)
    }

    fn mounted(y: f32, speed: f32) -> FloatingObject {
        let mut object = floater(y, speed);
        object.mount();
        object
    }

    #[test]
    fn test_single_update_adds_scaled_delta() {
        for (delta, speed) in [(0.016, 1.0), (0.033, 1.4), (0.5, 0.9), (1.0, 2.5)] {
            let mut object = mounted(0.4, speed);
            object.animate(&FrameInfo { elapsed: 1.0, delta });
            let rotation = object.rotation().unwrap();
            assert_eq!(rotation.x, delta * ROTATION_RATE_X * speed);
            assert_eq!(rotation.y, delta * ROTATION_RATE_Y * speed);
            assert_eq!(rotation.z, 0.0);
        }
    }

    #[test]
    fn test_vertical_offset_ignores_history() {
        let mut fresh = mounted(0.4, 1.4);
        let mut busy = mounted(0.4, 1.4);
        for i in 0..500 {
            busy.animate(&FrameInfo {
                elapsed: i as f32 * 0.016,
                delta: 0.016,
            });
        }

        let frame = FrameInfo {
            elapsed: 3.7,
            delta: 0.016,
        };
        fresh.animate(&frame);
        busy.animate(&frame);

        let expected = 0.4 + (3.7_f32 * 1.4).sin() * BOB_AMPLITUDE;
        assert!((fresh.vertical_offset().unwrap() - expected).abs() < 1e-6);
        assert_eq!(fresh.vertical_offset(), busy.vertical_offset());
    }

    #[test]
    fn test_zero_delta_keeps_rotation() {
        let mut object = mounted(0.4, 1.0);
        object.animate(&FrameInfo {
            elapsed: 0.5,
            delta: 0.2,
        });
        let before = object.rotation();
        object.animate(&FrameInfo {
            elapsed: 0.5,
            delta: 0.0,
        });
        assert_eq!(object.rotation(), before);
    }

    #[test]
    fn test_unmounted_object_is_untouched() {
        let mut object = floater(0.4, 1.0);
        let before = object.clone();
        object.animate(&FrameInfo {
            elapsed: 2.0,
            delta: 0.1,
        });
        assert_eq!(object, before);
        assert!(object.vertical_offset().is_none());
        assert!(object.model_matrix(2.0).is_none());
    }

    #[test]
    fn test_rest_height_at_time_zero() {
        let mut object = mounted(0.4, 1.0);
        object.animate(&FrameInfo {
            elapsed: 0.0,
            delta: 0.0,
        });
        assert!((object.vertical_offset().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_peak_height() {
        let mut object = mounted(-0.2, 1.4);
        object.animate(&FrameInfo {
            elapsed: PI / (2.0 * 1.4),
            delta: 0.016,
        });
        assert!((object.vertical_offset().unwrap() - (-0.2 + 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_scales_with_speed() {
        let mut slow = mounted(0.0, 0.9);
        let mut fast = mounted(0.0, 1.4);
        let mut elapsed = 0.0;
        for delta in [0.016, 0.017, 0.05, 0.0, 0.033].repeat(20) {
            elapsed += delta;
            let frame = FrameInfo { elapsed, delta };
            slow.animate(&frame);
            fast.animate(&frame);
        }

        let slow = slow.rotation().unwrap();
        let fast = fast.rotation().unwrap();
        assert!(fast.x > slow.x);
        assert!((fast.x / slow.x - 1.4 / 0.9).abs() < 1e-4);
        assert!((fast.y / slow.y - 1.4 / 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_mount_is_idempotent() {
        let mut object = mounted(0.4, 1.0);
        object.animate(&FrameInfo {
            elapsed: 1.0,
            delta: 1.0,
        });
        let rotation = object.rotation();
        object.mount();
        assert_eq!(object.rotation(), rotation);

        object.unmount();
        assert!(!object.is_mounted());
    }
}
