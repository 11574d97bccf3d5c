//! The hero scene: floating polyhedra over a ground disc, with sparkles,
//! lights, fog and an orbiting camera.

use nalgebra::{Matrix4, Point3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::driver::{FrameDriver, FrameInfo, FrameLoop};
use crate::drift::Drift;
use crate::error::SceneError;
use crate::floating::FloatingObject;
use crate::geometry::Mesh;
use crate::lighting::{Fog, Light, Material};
use crate::orbit::OrbitControls;
use crate::projection::{Camera, Viewport};
use crate::render::{DrawList, Projector, ShadowReceiver};
use crate::sparkles::Sparkles;
use crate::transform::Transform;

/// Seed used when the caller does not pick one
pub const DEFAULT_SEED: u64 = 0x5EED_1CE5;

#[derive(Debug, Clone, PartialEq)]
struct Ground {
    mesh: Mesh,
    material: Material,
    model: Matrix4<f32>,
    height: f32,
    radius: f32,
    receive_shadows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    background: Rgb,
    fog: Fog,
    lights: Vec<Light>,
    camera: Camera,
    orbit: OrbitControls,
    floaters: Vec<FloatingObject>,
    ground: Ground,
    sparkles: Sparkles,
    /// Latest elapsed time seen from the frame driver
    elapsed: f32,
}

impl Scene {
    /// Build every entity described by `config`. Floaters start unmounted.
    pub fn from_config(config: &SceneConfig, seed: u64) -> Result<Self, SceneError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);

        let floaters = config
            .floaters
            .iter()
            .map(|floater| {
                let [x, y, z] = floater.position;
                let material = Material::new(floater.color, floater.metalness, floater.roughness);
                let drift = Drift::from_config(&config.drift, floater.speed, &mut rng);
                FloatingObject::new(Point3::new(x, y, z), floater.size, floater.speed, material)
                    .with_drift(drift)
            })
            .collect();

        let ground = Ground {
            mesh: Mesh::disc(config.ground.radius, config.ground.segments, config.ground.rings),
            material: Material::new(
                config.ground.color,
                config.ground.metalness,
                config.ground.roughness,
            ),
            model: Transform::translation_matrix(0.0, config.ground.y, 0.0),
            height: config.ground.y,
            radius: config.ground.radius,
            receive_shadows: config.ground.receive_shadows,
        };

        let camera = Camera::from_config(&config.camera);
        let orbit = OrbitControls::new(&camera, &config.orbit);
        let sparkles = Sparkles::new(&config.sparkles, &mut rng);

        log::debug!(
            "built scene: {} floaters, {} lights, {} sparkles, seed {seed:#x}",
            config.floaters.len(),
            config.lights.len(),
            sparkles.len()
        );

        Ok(Self {
            background: config.background,
            fog: Fog::from(&config.fog),
            lights: config.lights.iter().map(Light::from).collect(),
            camera,
            orbit,
            floaters,
            ground,
            sparkles,
            elapsed: 0.0,
        })
    }

    /// Attach render handles to every floater
    pub fn mount(&mut self) {
        for floater in &mut self.floaters {
            floater.mount();
        }
    }

    pub fn unmount(&mut self) {
        for floater in &mut self.floaters {
            floater.unmount();
        }
        self.elapsed = 0.0;
    }

    /// Register the scene's per-frame callbacks: one timekeeper and one
    /// animator per floater.
    pub fn register<D: FrameDriver<Scene>>(&self, driver: &mut D) {
        driver.on_each_frame(Box::new(|frame: &FrameInfo, scene: &mut Scene| {
            scene.elapsed = frame.elapsed;
        }));

        for index in 0..self.floaters.len() {
            driver.on_each_frame(Box::new(move |frame: &FrameInfo, scene: &mut Scene| {
                if let Some(floater) = scene.floaters.get_mut(index) {
                    floater.animate(frame);
                }
            }));
        }
    }

    /// Start animating on `frames`: (re)register every callback, then mount
    /// both the scene and the loop. Safe to call again after [`Scene::detach`]
    /// or on a loop already driving this scene.
    pub fn attach(&mut self, frames: &mut FrameLoop<Scene>) {
        frames.unmount();
        self.register(frames);
        self.mount();
        frames.mount();
    }

    /// Stop dispatch before dropping the render handles
    pub fn detach(&mut self, frames: &mut FrameLoop<Scene>) {
        frames.unmount();
        self.unmount();
    }

    /// Swap in `next`, keeping `frames` attached if it was driving this scene
    pub fn replace(&mut self, next: Scene, frames: &mut FrameLoop<Scene>) {
        let attached = frames.is_ready();
        self.detach(frames);
        *self = next;
        if attached {
            self.attach(frames);
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn floaters(&self) -> &[FloatingObject] {
        &self.floaters
    }

    pub fn sparkles(&self) -> &Sparkles {
        &self.sparkles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    /// Drag the orbit controls by `(dx, dy)` pixels
    pub fn orbit_rotate(&mut self, dx: f32, dy: f32) {
        self.orbit.rotate(dx, dy);
        self.orbit.apply(&mut self.camera);
    }

    pub fn orbit_pan(&mut self, dx: f32, dy: f32) {
        self.orbit.pan(dx, dy);
        self.orbit.apply(&mut self.camera);
    }

    pub fn orbit_zoom(&mut self, delta: f32) {
        self.orbit.zoom(delta);
        self.orbit.apply(&mut self.camera);
    }

    /// Project the current state of the scene for one viewport
    pub fn draw_list(&self, viewport: &Viewport) -> DrawList {
        let projector = Projector::new(&self.camera, viewport, &self.lights, &self.fog);
        let mut list = DrawList::new(self.background);

        let ground = &self.ground;
        projector.push_mesh(&ground.mesh, &ground.model, &ground.material, &mut list.floor);

        let models: Vec<_> = self
            .floaters
            .iter()
            .filter_map(|floater| Some((floater, floater.model_matrix(self.elapsed)?)))
            .collect();

        if ground.receive_shadows {
            for (index, light) in self.lights.iter().enumerate() {
                let Light::Directional {
                    position,
                    cast_shadow: true,
                    ..
                } = light
                else {
                    continue;
                };
                let unblocked: Vec<Light> = self
                    .lights
                    .iter()
                    .enumerate()
                    .filter(|&(other, _)| other != index)
                    .map(|(_, light)| light.clone())
                    .collect();
                let receiver = ShadowReceiver {
                    height: ground.height,
                    radius: ground.radius,
                    material: &ground.material,
                    unblocked: &unblocked,
                };
                for (floater, model) in &models {
                    projector.push_shadow(
                        floater.geometry(),
                        model,
                        &position.coords,
                        &receiver,
                        &mut list.floor,
                    );
                }
            }
        }

        for (floater, model) in &models {
            projector.push_mesh(floater.geometry(), model, floater.material(), &mut list.triangles);
        }

        let sparkles = &self.sparkles;
        for (position, particle) in sparkles.positions_at(self.elapsed) {
            projector.push_sprite(
                &position,
                sparkles.size * particle.size,
                sparkles.color,
                sparkles.opacity,
                &mut list,
            );
        }

        list.sort_back_to_front();
        list
    }
}
