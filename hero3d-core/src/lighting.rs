//! Lights, surface materials and fog.
//!
//! Shading is a hemisphere ambient term, Lambert diffuse for directional and
//! point lights, and a Blinn-Phong highlight whose sharpness follows
//! roughness and whose strength follows metalness.

use nalgebra::{Point3, Vector3};

use crate::color::Rgb;
use crate::config::{FogConfig, LightConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Sky color from above, ground color from below
    Hemisphere { sky: Rgb, ground: Rgb, intensity: f32 },
    /// Parallel rays travelling from `position` toward the origin
    Directional {
        position: Point3<f32>,
        color: Rgb,
        intensity: f32,
        cast_shadow: bool,
    },
    Point {
        position: Point3<f32>,
        color: Rgb,
        intensity: f32,
    },
}

impl From<&LightConfig> for Light {
    fn from(config: &LightConfig) -> Self {
        let point = |[x, y, z]: [f32; 3]| Point3::new(x, y, z);
        match *config {
            LightConfig::Hemisphere {
                sky,
                ground,
                intensity,
            } => Light::Hemisphere {
                sky,
                ground,
                intensity,
            },
            LightConfig::Directional {
                position,
                color,
                intensity,
                cast_shadow,
            } => Light::Directional {
                position: point(position),
                color,
                intensity,
                cast_shadow,
            },
            LightConfig::Point {
                position,
                color,
                intensity,
            } => Light::Point {
                position: point(position),
                color,
                intensity,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    pub fn new(color: Rgb, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
        }
    }

    fn shininess(&self) -> f32 {
        2.0 + (1.0 - self.roughness) * 62.0
    }

    fn specular_strength(&self) -> f32 {
        0.04 + self.metalness * 0.5
    }
}

/// Color of a surface point with unit normal `normal`, seen from `eye`.
pub fn shade(
    material: &Material,
    normal: &Vector3<f32>,
    point: &Point3<f32>,
    eye: &Point3<f32>,
    lights: &[Light],
) -> Rgb {
    let to_eye = (eye - point).try_normalize(f32::EPSILON).unwrap_or(*normal);
    let mut diffuse = Rgb::BLACK;
    let mut specular = Rgb::BLACK;

    for light in lights {
        let (to_light, color, intensity) = match light {
            Light::Hemisphere {
                sky,
                ground,
                intensity,
            } => {
                let t = 0.5 + 0.5 * normal.y;
                diffuse = diffuse + ground.mix(*sky, t).scale(*intensity);
                continue;
            }
            Light::Directional {
                position,
                color,
                intensity,
                ..
            } => (position.coords, color, intensity),
            Light::Point {
                position,
                color,
                intensity,
            } => (position - point, color, intensity),
        };

        let Some(to_light) = to_light.try_normalize(f32::EPSILON) else {
            continue;
        };
        let lambert = normal.dot(&to_light);
        if lambert <= 0.0 {
            continue;
        }
        diffuse = diffuse + color.scale(intensity * lambert);

        let half = (to_light + to_eye).try_normalize(f32::EPSILON).unwrap_or(to_light);
        let highlight = normal.dot(&half).max(0.0).powf(material.shininess());
        specular = specular + color.scale(intensity * highlight * material.specular_strength());
    }

    (material.color.tint(diffuse) + specular).clamped()
}

/// Linear fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Fog {
    /// 0 at `near` or closer, 1 at `far` or beyond
    pub fn factor(&self, distance: f32) -> f32 {
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }

    pub fn apply(&self, color: Rgb, distance: f32) -> Rgb {
        color.mix(self.color, self.factor(distance))
    }
}

impl From<&FogConfig> for Fog {
    fn from(config: &FogConfig) -> Self {
        Self {
            color: config.color,
            near: config.near,
            far: config.far,
        }
    }
}
