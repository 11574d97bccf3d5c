//! hero3d Web - canvas renderer for the hero scene
//!
//! JavaScript owns the animation loop: call `render` from
//! `requestAnimationFrame` with its timestamp and forward pointer drags to
//! `rotate`.

use std::f64::consts::TAU;

use hero3d_core::{DrawItem, DrawList, FrameLoop, Scene, SceneConfig, Viewport, DEFAULT_SEED};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
    frames: FrameLoop<Scene>,
    context: Option<CanvasRenderingContext2d>,
    viewport: Viewport,
    seed: u64,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebRenderer, JsValue> {
        let scene = Scene::from_config(&SceneConfig::default(), DEFAULT_SEED).map_err(js_error)?;

        Ok(WebRenderer {
            scene,
            frames: FrameLoop::new(),
            context: None,
            viewport: Viewport::new(1, 1),
            seed: DEFAULT_SEED,
        })
    }

    /// Initialize the renderer with a canvas element
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;

        self.viewport = Viewport::new(canvas.width(), canvas.height());
        self.context = Some(context);
        self.scene.attach(&mut self.frames);
        log::info!(
            "hero scene mounted on #{canvas_id} ({}x{})",
            self.viewport.width,
            self.viewport.height
        );
        Ok(())
    }

    /// Replace the scene with one described by a TOML document
    pub fn load_config(&mut self, toml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_toml_str(toml).map_err(js_error)?;
        let scene = Scene::from_config(&config, self.seed).map_err(js_error)?;
        self.scene.replace(scene, &mut self.frames);
        Ok(())
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Render a frame at `timestamp_ms` (as passed to `requestAnimationFrame`)
    pub fn render(&mut self, timestamp_ms: f64) -> Result<(), JsValue> {
        let Some(context) = self.context.as_ref() else {
            return Ok(());
        };
        self.frames.tick(timestamp_ms / 1000.0, &mut self.scene);
        let list = self.scene.draw_list(&self.viewport);
        paint(context, &list, &self.viewport)
    }

    /// Orbit the camera by a pointer drag of `(dx, dy)` CSS pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.scene.orbit_rotate(dx, dy);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Stop animating and release render handles
    pub fn unmount(&mut self) {
        self.scene.detach(&mut self.frames);
        self.context = None;
        log::info!("hero scene unmounted");
    }

    /// Seconds since the first rendered frame
    pub fn elapsed(&self) -> f32 {
        self.scene.elapsed()
    }
}

fn paint(context: &CanvasRenderingContext2d, list: &DrawList, viewport: &Viewport) -> Result<(), JsValue> {
    context.set_global_alpha(1.0);
    context.set_fill_style_str(&list.background.to_hex());
    context.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);

    // Far to near, so later fills cover earlier ones
    context.set_line_width(0.5);
    for item in list.items() {
        match item {
            DrawItem::Triangle(triangle) => {
                let css = triangle.color.to_hex();
                let [a, b, c] = triangle.points;
                context.set_global_alpha(1.0);
                context.begin_path();
                context.move_to(a.x as f64, a.y as f64);
                context.line_to(b.x as f64, b.y as f64);
                context.line_to(c.x as f64, c.y as f64);
                context.close_path();
                context.set_fill_style_str(&css);
                context.fill();
                // Hairline stroke in the same color hides anti-aliasing seams
                context.set_stroke_style_str(&css);
                context.stroke();
            }
            DrawItem::Sprite(sprite) => {
                context.set_global_alpha(sprite.alpha as f64);
                context.set_fill_style_str(&sprite.color.to_hex());
                context.begin_path();
                context.arc(
                    sprite.center.x as f64,
                    sprite.center.y as f64,
                    sprite.radius.max(0.5) as f64,
                    0.0,
                    TAU,
                )?;
                context.fill();
            }
        }
    }
    context.set_global_alpha(1.0);

    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(js_error)?;
    Ok(())
}
