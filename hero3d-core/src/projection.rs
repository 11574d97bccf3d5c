//! Camera and projection utilities

use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;

/// Output surface dimensions.
///
/// `pixel_aspect` is the height of one pixel divided by its width; terminal
/// cells are roughly twice as tall as they are wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixel_aspect: 1.0,
        }
    }

    pub fn with_pixel_aspect(mut self, pixel_aspect: f32) -> Self {
        self.pixel_aspect = pixel_aspect;
        self
    }

    /// Physical width over physical height
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / (self.height.max(1) as f32 * self.pixel_aspect)
    }
}

/// A projected point: screen coordinates plus view-space depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, fov_degrees: f32) -> Self {
        Self {
            position,
            target: Point3::origin(),
            up: Vector3::y(),
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let [x, y, z] = config.position;
        let [tx, ty, tz] = config.target;
        Self {
            target: Point3::new(tx, ty, tz),
            near: config.near,
            far: config.far,
            ..Self::new(Point3::new(x, y, z), config.fov)
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix for a viewport
    pub fn projection_matrix(&self, viewport: &Viewport) -> Matrix4<f32> {
        Matrix4::new_perspective(viewport.aspect(), self.fov, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: &Viewport) -> Matrix4<f32> {
        self.projection_matrix(viewport) * self.view_matrix()
    }

    /// Straight-line distance from the camera to a world point
    pub fn distance_to(&self, point: &Point3<f32>) -> f32 {
        (point - self.position).norm()
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `None` for points in front of the near plane. Points outside
    /// the viewport are still returned; rasterizers clip them.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        view_projection: &Matrix4<f32>,
        viewport: &Viewport,
    ) -> Option<ScreenPoint> {
        let clip = view_projection * point.to_homogeneous();

        // w is the view-space depth for a perspective projection
        if clip.w < self.near {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * viewport.width as f32,
            y: (1.0 - ndc_y) * 0.5 * viewport.height as f32,
            depth: clip.w,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
