//! Floating particle field

use nalgebra::{Point3, Vector3};
use rand::Rng;

use crate::color::Rgb;
use crate::config::SparklesConfig;

/// Peak displacement of a particle from its base position, per axis
pub const WANDER_AMPLITUDE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub base: Point3<f32>,
    /// Phase of the per-axis wander, derived from the base position and noise
    pub phase: Vector3<f32>,
    /// Size relative to the field's nominal size
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sparkles {
    particles: Vec<Particle>,
    pub color: Rgb,
    pub opacity: f32,
    pub size: f32,
    pub speed: f32,
}

impl Sparkles {
    pub fn new<R: Rng>(config: &SparklesConfig, rng: &mut R) -> Self {
        let [sx, sy, sz] = config.scale;
        let particles = (0..config.count)
            .map(|_| {
                let base = Point3::new(
                    (0.5 - rng.gen::<f32>()) * sx,
                    (0.5 - rng.gen::<f32>()) * sy,
                    (0.5 - rng.gen::<f32>()) * sz,
                );
                let noise = Vector3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>())
                    * config.noise;
                Particle {
                    base,
                    phase: noise * base.x * 100.0,
                    size: rng.gen_range(0.5..=1.0),
                }
            })
            .collect();

        Self {
            particles,
            color: config.color,
            opacity: config.opacity,
            size: config.size,
            speed: config.speed,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Where `particle` is at `elapsed` seconds
    pub fn position_at(&self, particle: &Particle, elapsed: f32) -> Point3<f32> {
        let t = elapsed * self.speed;
        particle.base
            + Vector3::new(
                (t + particle.phase.z).cos(),
                (t + particle.phase.x).sin(),
                (t + particle.phase.y).cos(),
            ) * WANDER_AMPLITUDE
    }

    pub fn positions_at(&self, elapsed: f32) -> impl Iterator<Item = (Point3<f32>, &Particle)> + '_ {
        self.particles
            .iter()
            .map(move |particle| (self.position_at(particle, elapsed), particle))
    }
}
