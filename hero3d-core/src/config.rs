//! Scene description with TOML support.
//!
//! Every section uses `#[serde(default)]`, so a partial file (for example
//! one that only overrides `[fog]`) keeps the hero scene for everything
//! else. `[[floaters]]` and `[[lights]]` replace the default lists when
//! present.

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::SceneError;

/// Top-level scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Clear color behind everything.
    pub background: Rgb,
    pub fog: FogConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub ground: GroundConfig,
    pub sparkles: SparklesConfig,
    /// Hover group wrapped around every floater.
    pub drift: DriftConfig,
    pub lights: Vec<LightConfig>,
    pub floaters: Vec<FloaterConfig>,
}

/// Linear fog between `near` and `far` view distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

/// Orbit controls limits. Angles are radians, speeds are per input pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enable_rotate: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub radius: f32,
    pub segments: usize,
    pub rings: usize,
    pub y: f32,
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub receive_shadows: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklesConfig {
    pub count: usize,
    pub speed: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub size: f32,
    /// Extent of the box particles are scattered in, centered on the origin.
    pub scale: [f32; 3],
    pub noise: f32,
}

/// `speed` is multiplied by each floater's own speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LightConfig {
    Hemisphere {
        sky: Rgb,
        ground: Rgb,
        intensity: f32,
    },
    Directional {
        position: [f32; 3],
        color: Rgb,
        intensity: f32,
        /// Darken the ground where floaters block this light.
        #[serde(default = "default_cast_shadow")]
        cast_shadow: bool,
    },
    Point {
        position: [f32; 3],
        color: Rgb,
        intensity: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloaterConfig {
    pub position: [f32; 3],
    pub color: Rgb,
    #[serde(default = "default_floater_size")]
    pub size: f32,
    #[serde(default = "default_floater_speed")]
    pub speed: f32,
    #[serde(default = "default_floater_metalness")]
    pub metalness: f32,
    #[serde(default = "default_floater_roughness")]
    pub roughness: f32,
}

fn default_cast_shadow() -> bool {
    true
}

fn default_floater_size() -> f32 {
    1.1
}

fn default_floater_speed() -> f32 {
    1.0
}

fn default_floater_metalness() -> f32 {
    0.35
}

fn default_floater_roughness() -> f32 {
    0.3
}

fn hex(literal: &str) -> Rgb {
    // Only used with the literals below, all of which are well formed
    Rgb::from_hex(literal).unwrap_or(Rgb::BLACK)
}

impl FloaterConfig {
    pub fn new(position: [f32; 3], color: Rgb) -> Self {
        Self {
            position,
            color,
            size: default_floater_size(),
            speed: default_floater_speed(),
            metalness: default_floater_metalness(),
            roughness: default_floater_roughness(),
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: hex("#050912"),
            fog: FogConfig::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            ground: GroundConfig::default(),
            sparkles: SparklesConfig::default(),
            drift: DriftConfig::default(),
            lights: vec![
                LightConfig::Hemisphere {
                    sky: hex("#7cc3ff"),
                    ground: hex("#0b1224"),
                    intensity: 0.7,
                },
                LightConfig::Directional {
                    position: [6.0, 8.0, 4.0],
                    color: hex("#9fd4ff"),
                    intensity: 1.25,
                    cast_shadow: true,
                },
                LightConfig::Point {
                    position: [-4.0, 2.0, -3.0],
                    color: hex("#8c81ff"),
                    intensity: 0.8,
                },
            ],
            floaters: vec![
                FloaterConfig::new([-1.3, 0.4, 0.0], hex("#6be6ff")),
                FloaterConfig::new([1.8, -0.2, -0.6], hex("#8c81ff"))
                    .with_size(0.9)
                    .with_speed(1.4),
                FloaterConfig::new([0.4, 1.2, -1.2], hex("#c0f27c"))
                    .with_size(0.8)
                    .with_speed(0.9),
            ],
        }
    }
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: hex("#050912"),
            near: 10.0,
            far: 28.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [6.0, 3.0, 8.0],
            target: [0.0, 0.0, 0.0],
            fov: 46.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_pan: false,
            enable_zoom: false,
            min_polar_angle: 0.0,
            max_polar_angle: PI / 2.15,
            min_distance: 1.0,
            max_distance: 100.0,
            rotate_speed: 0.01,
            pan_speed: 0.01,
            zoom_speed: 0.05,
        }
    }
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            radius: 18.0,
            segments: 64,
            rings: 6,
            y: -1.25,
            color: hex("#0a1020"),
            metalness: 0.1,
            roughness: 0.9,
            receive_shadows: true,
        }
    }
}

impl Default for SparklesConfig {
    fn default() -> Self {
        Self {
            count: 120,
            speed: 0.4,
            opacity: 0.35,
            color: hex("#7ad7ff"),
            size: 2.2,
            scale: [1.0, 1.0, 1.0],
            noise: 1.0,
        }
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            speed: 1.2,
            rotation_intensity: 0.4,
            float_intensity: 1.2,
        }
    }
}

impl SceneConfig {
    /// Load and validate a scene from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!(
            "loaded scene from {} ({} floaters, {} lights)",
            path.display(),
            config.floaters.len(),
            config.lights.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SceneError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, SceneError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the scene to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let content = self.to_toml_string()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the renderer cannot draw sensibly.
    pub fn validate(&self) -> Result<(), SceneError> {
        let fog = &self.fog;
        non_negative("fog.near", fog.near)?;
        if !(fog.far > fog.near) {
            return Err(SceneError::invalid("fog.far", "must be greater than fog.near"));
        }

        let camera = &self.camera;
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            return Err(SceneError::invalid("camera.fov", "must be between 0 and 180 degrees"));
        }
        positive("camera.near", camera.near)?;
        finite("camera.far", camera.far)?;
        if !(camera.far > camera.near) {
            return Err(SceneError::invalid("camera.far", "must be greater than camera.near"));
        }
        finite_point("camera.position", camera.position)?;
        finite_point("camera.target", camera.target)?;
        if camera.position == camera.target {
            return Err(SceneError::invalid("camera.target", "must differ from camera.position"));
        }

        let orbit = &self.orbit;
        if !(0.0 <= orbit.min_polar_angle
            && orbit.min_polar_angle <= orbit.max_polar_angle
            && orbit.max_polar_angle <= PI)
        {
            return Err(SceneError::invalid(
                "orbit.max_polar_angle",
                "polar limits must satisfy 0 <= min <= max <= pi",
            ));
        }
        positive("orbit.min_distance", orbit.min_distance)?;
        finite("orbit.max_distance", orbit.max_distance)?;
        if orbit.max_distance < orbit.min_distance {
            return Err(SceneError::invalid(
                "orbit.max_distance",
                "must not be less than orbit.min_distance",
            ));
        }
        positive("orbit.rotate_speed", orbit.rotate_speed)?;
        positive("orbit.pan_speed", orbit.pan_speed)?;
        positive("orbit.zoom_speed", orbit.zoom_speed)?;

        let ground = &self.ground;
        positive("ground.radius", ground.radius)?;
        if ground.segments < 3 {
            return Err(SceneError::invalid("ground.segments", "need at least 3"));
        }
        if ground.rings == 0 {
            return Err(SceneError::invalid("ground.rings", "need at least 1"));
        }
        finite("ground.y", ground.y)?;
        unit("ground.metalness", ground.metalness)?;
        unit("ground.roughness", ground.roughness)?;

        let sparkles = &self.sparkles;
        non_negative("sparkles.speed", sparkles.speed)?;
        non_negative("sparkles.size", sparkles.size)?;
        unit("sparkles.opacity", sparkles.opacity)?;
        for extent in sparkles.scale {
            non_negative("sparkles.scale", extent)?;
        }
        finite("sparkles.noise", sparkles.noise)?;

        let drift = &self.drift;
        non_negative("drift.speed", drift.speed)?;
        finite("drift.rotation_intensity", drift.rotation_intensity)?;
        finite("drift.float_intensity", drift.float_intensity)?;

        for (i, light) in self.lights.iter().enumerate() {
            let intensity = match light {
                LightConfig::Hemisphere { intensity, .. } => *intensity,
                LightConfig::Directional {
                    position,
                    intensity,
                    ..
                }
                | LightConfig::Point {
                    position,
                    intensity,
                    ..
                } => {
                    finite_point(&format!("lights[{i}].position"), *position)?;
                    *intensity
                }
            };
            non_negative(&format!("lights[{i}].intensity"), intensity)?;
        }

        for (i, floater) in self.floaters.iter().enumerate() {
            finite_point(&format!("floaters[{i}].position"), floater.position)?;
            positive(&format!("floaters[{i}].size"), floater.size)?;
            positive(&format!("floaters[{i}].speed"), floater.speed)?;
            unit(&format!("floaters[{i}].metalness"), floater.metalness)?;
            unit(&format!("floaters[{i}].roughness"), floater.roughness)?;
        }

        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SceneError::invalid(name, format!("must be finite, got {value}")))
    }
}

fn finite_point(name: &str, point: [f32; 3]) -> Result<(), SceneError> {
    point.into_iter().try_for_each(|value| finite(name, value))
}

fn positive(name: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(name, format!("must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::invalid(name, format!("must not be negative, got {value}")))
    }
}

fn unit(name: &str, value: f32) -> Result<(), SceneError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SceneError::invalid(name, format!("must be within [0, 1], got {value}")))
    }
}
