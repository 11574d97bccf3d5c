//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use hero3d_core::{DrawList, DrawTriangle, Rgb, Sprite};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Sprites smaller than this (in cells) draw as a dot, larger ones as a star
const SPRITE_STAR_RADIUS: f32 = 1.5;

/// ASCII renderer that converts draw lists to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    background: Rgb,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            background: Rgb::BLACK,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::BLACK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(background);
    }

    pub fn render(&mut self, list: &DrawList) {
        self.clear(list.background);
        for triangle in list.floor.iter().chain(&list.triangles) {
            self.rasterize_triangle(triangle);
        }
        for sprite in &list.sprites {
            self.plot_sprite(sprite);
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Rgb)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    fn rasterize_triangle(&mut self, triangle: &DrawTriangle) {
        let [v0, v1, v2] = triangle.points;

        // Map brightness to character; surfaces never vanish into blank cells
        let char_index = (triangle.color.luminance() * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.x, v0.y),
                    (v1.x, v1.y),
                    (v2.x, v2.y),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = triangle.color;
                        }
                    }
                }
            }
        }
    }

    /// Sprites are translucent: they blend over whatever is behind them and
    /// do not write depth.
    fn plot_sprite(&mut self, sprite: &Sprite) {
        let x = sprite.center.x.floor();
        let y = sprite.center.y.floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if sprite.center.depth >= self.depth_buffer[idx] {
            return;
        }

        self.char_buffer[idx] = if sprite.radius >= SPRITE_STAR_RADIUS { '*' } else { '.' };
        // Glyphs cover little of the cell, so push alpha up to keep them visible
        let alpha = (sprite.alpha * 2.0).min(1.0);
        self.color_buffer[idx] = self.color_buffer[idx].mix(sprite.color, alpha);
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_terminal(self.background)))?;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(to_terminal(self.color_buffer[idx])))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_terminal(color: Rgb) -> Color {
    let (r, g, b) = color.to_u8();
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero3d_core::ScreenPoint;

    fn point(x: f32, y: f32, depth: f32) -> ScreenPoint {
        ScreenPoint { x, y, depth }
    }

    fn triangle(depth: f32, color: Rgb) -> DrawTriangle {
        DrawTriangle {
            points: [point(0.0, 0.0, depth), point(10.0, 0.0, depth), point(0.0, 10.0, depth)],
            color,
            depth,
        }
    }

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-6);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let mut renderer = AsciiRenderer::new(12, 12);
        let red = Rgb::new(1.0, 0.0, 0.0);
        let blue = Rgb::new(0.0, 0.0, 1.0);
        let mut list = DrawList::new(Rgb::BLACK);
        list.triangles.push(triangle(2.0, red));
        list.triangles.push(triangle(5.0, blue));
        renderer.render(&list);

        assert_eq!(renderer.cell(1, 1).unwrap().1, red);
        assert_eq!(renderer.cell(11, 11).unwrap(), (' ', Rgb::BLACK));
        assert!(renderer.cell(12, 0).is_none());
    }

    #[test]
    fn test_shadow_covers_floor_beneath_it() {
        let mut renderer = AsciiRenderer::new(12, 12);
        let ground = Rgb::new(0.2, 0.3, 0.5);
        let shadow = Rgb::new(0.05, 0.05, 0.1);
        let mut list = DrawList::new(Rgb::BLACK);
        list.floor.push(triangle(6.0, ground));
        list.floor.push(triangle(5.99, shadow));
        renderer.render(&list);

        assert_eq!(renderer.cell(1, 1).unwrap().1, shadow);
    }

    #[test]
    fn test_sprite_hidden_behind_surface() {
        let mut renderer = AsciiRenderer::new(12, 12);
        let mut list = DrawList::new(Rgb::BLACK);
        list.triangles.push(triangle(2.0, Rgb::WHITE));
        list.sprites.push(Sprite {
            center: point(1.5, 1.5, 8.0),
            radius: 2.0,
            color: Rgb::new(0.0, 1.0, 0.0),
            alpha: 0.35,
        });
        list.sprites.push(Sprite {
            center: point(11.5, 11.5, 8.0),
            radius: 2.0,
            color: Rgb::new(0.0, 1.0, 0.0),
            alpha: 0.35,
        });
        renderer.render(&list);

        assert_ne!(renderer.cell(1, 1).unwrap().0, '*');
        assert_eq!(renderer.cell(11, 11).unwrap().0, '*');
    }

    #[test]
    fn test_draw_emits_every_row() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
