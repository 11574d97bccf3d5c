//! Orbit controls: drag to swing the camera around a target

use nalgebra::{Point3, Vector3};

use crate::config::OrbitConfig;
use crate::projection::Camera;

/// Keeps the camera off the exact poles, where `look_at` degenerates
const POLE_EPSILON: f32 = 1e-4;

/// Camera position in spherical coordinates around `target`.
///
/// `azimuth` is measured around +Y from +Z, `polar` down from +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    radius: f32,
    azimuth: f32,
    polar: f32,
    config: OrbitConfig,
}

impl OrbitControls {
    /// Start from wherever `camera` currently is
    pub fn new(camera: &Camera, config: &OrbitConfig) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.norm().max(f32::EPSILON);
        let mut controls = Self {
            target: camera.target,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            config: config.clone(),
        };
        controls.polar = controls.clamp_polar(controls.polar);
        controls
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    fn clamp_polar(&self, polar: f32) -> f32 {
        let min = self.config.min_polar_angle.max(POLE_EPSILON);
        let max = self.config.max_polar_angle.min(std::f32::consts::PI - POLE_EPSILON);
        polar.clamp(min, max.max(min))
    }

    /// Swing around the target by a pointer movement of `(dx, dy)` pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.config.enable_rotate {
            return;
        }
        self.azimuth -= dx * self.config.rotate_speed;
        self.polar = self.clamp_polar(self.polar - dy * self.config.rotate_speed);
    }

    /// Slide the target in the camera plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.config.enable_pan {
            return;
        }
        let forward = -self.offset().normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        let scale = self.config.pan_speed * self.radius;
        self.target += right * (-dx * scale) + up * (dy * scale);
    }

    /// Move toward (positive) or away from (negative) the target
    pub fn zoom(&mut self, delta: f32) {
        if !self.config.enable_zoom {
            return;
        }
        self.radius *= 1.0 - delta * self.config.zoom_speed;
        self.radius = self
            .radius
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    fn offset(&self) -> Vector3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Vector3::new(
            sin_polar * sin_azimuth,
            cos_polar,
            sin_polar * cos_azimuth,
        ) * self.radius
    }

    pub fn camera_position(&self) -> Point3<f32> {
        self.target + self.offset()
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.camera_position();
        camera.target = self.target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> (Camera, OrbitControls) {
        let camera = Camera::default();
        let controls = OrbitControls::new(&camera, &OrbitConfig::default());
        (camera, controls)
    }

    #[test]
    fn test_starts_where_the_camera_is() {
        let (camera, controls) = controls();
        assert!((controls.camera_position() - camera.position).norm() < 1e-4);
        assert!((controls.radius() - 109.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_is_capped() {
        let (mut camera, mut controls) = controls();
        let max = OrbitConfig::default().max_polar_angle;

        controls.rotate(0.0, -10_000.0);
        assert!(controls.polar() <= max + 1e-6);
        controls.apply(&mut camera);
        assert!(camera.position.y > 0.0);

        controls.rotate(0.0, 10_000.0);
        assert!(controls.polar() > 0.0);
        assert!(controls.polar() < 0.01);
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let (_, mut controls) = controls();
        let before = controls.radius();
        controls.rotate(120.0, 35.0);
        let distance = (controls.camera_position() - controls.target).norm();
        assert!((distance - before).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_and_pan_disabled_by_default() {
        let (_, mut controls) = controls();
        let before = controls.clone();
        controls.zoom(5.0);
        controls.pan(40.0, -12.0);
        assert_eq!(controls, before);
    }

    #[test]
    fn test_zoom_clamped_when_enabled() {
        let camera = Camera::default();
        let config = OrbitConfig {
            enable_zoom: true,
            min_distance: 5.0,
            max_distance: 20.0,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(&camera, &config);
        controls.zoom(100.0);
        assert_eq!(controls.radius(), 5.0);
        controls.zoom(-100.0);
        assert_eq!(controls.radius(), 20.0);
    }
}
