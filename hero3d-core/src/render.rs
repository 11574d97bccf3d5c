//! Screen-space draw lists shared by every rasterizer

use nalgebra::{Matrix4, Point3, Vector3};

use crate::color::Rgb;
use crate::geometry::Mesh;
use crate::lighting::{shade, Fog, Light, Material};
use crate::projection::{Camera, ScreenPoint, Viewport};

/// Point-sprite diameter, in pixels, of a size-1 sprite one unit from the camera
pub const SPRITE_PIXELS_PER_UNIT: f32 = 25.0;

/// Height of shadows above their receiving plane, so z-buffers keep them on top
pub const SHADOW_LIFT: f32 = 0.01;

/// A lit, fogged triangle ready to fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTriangle {
    pub points: [ScreenPoint; 3],
    pub color: Rgb,
    /// Mean view depth, used for back-to-front ordering
    pub depth: f32,
}

/// A round, translucent point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub center: ScreenPoint,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// Everything needed to draw one frame.
///
/// `floor` holds the ground and the shadows on it, in paint order; nothing
/// above the ground can be hidden by it, so it always goes first.
/// `triangles` and `sprites` are ordered far to near.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub background: Rgb,
    pub floor: Vec<DrawTriangle>,
    pub triangles: Vec<DrawTriangle>,
    pub sprites: Vec<Sprite>,
}

impl DrawList {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            floor: Vec::new(),
            triangles: Vec::new(),
            sprites: Vec::new(),
        }
    }

    pub fn sort_back_to_front(&mut self) {
        self.triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        self.sprites
            .sort_by(|a, b| b.center.depth.total_cmp(&a.center.depth));
    }

    /// Paint order for painter's-algorithm renderers: the floor, then
    /// triangles and sprites interleaved far to near. Both of those lists
    /// must already be sorted.
    pub fn items(&self) -> DrawItems<'_> {
        DrawItems {
            list: self,
            floor: 0,
            triangle: 0,
            sprite: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawItem<'a> {
    Triangle(&'a DrawTriangle),
    Sprite(&'a Sprite),
}

pub struct DrawItems<'a> {
    list: &'a DrawList,
    floor: usize,
    triangle: usize,
    sprite: usize,
}

impl<'a> Iterator for DrawItems<'a> {
    type Item = DrawItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(floor) = self.list.floor.get(self.floor) {
            self.floor += 1;
            return Some(DrawItem::Triangle(floor));
        }
        let triangle = self.list.triangles.get(self.triangle);
        let sprite = self.list.sprites.get(self.sprite);
        match (triangle, sprite) {
            (Some(t), Some(s)) if t.depth >= s.center.depth => {
                self.triangle += 1;
                Some(DrawItem::Triangle(t))
            }
            (_, Some(s)) => {
                self.sprite += 1;
                Some(DrawItem::Sprite(s))
            }
            (Some(t), None) => {
                self.triangle += 1;
                Some(DrawItem::Triangle(t))
            }
            (None, None) => None,
        }
    }
}

/// Projects and shades world geometry for one viewport
pub(crate) struct Projector<'a> {
    camera: &'a Camera,
    viewport: Viewport,
    view_projection: Matrix4<f32>,
    lights: &'a [Light],
    fog: &'a Fog,
}

impl<'a> Projector<'a> {
    pub fn new(camera: &'a Camera, viewport: &Viewport, lights: &'a [Light], fog: &'a Fog) -> Self {
        Self {
            camera,
            viewport: *viewport,
            view_projection: camera.view_projection(viewport),
            lights,
            fog,
        }
    }

    fn project(&self, point: &Point3<f32>) -> Option<ScreenPoint> {
        self.camera
            .project_to_screen(point, &self.view_projection, &self.viewport)
    }

    /// Append every front-facing, fully visible triangle of `mesh`
    pub fn push_mesh(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        material: &Material,
        out: &mut Vec<DrawTriangle>,
    ) {
        let eye = self.camera.position;

        for triangle in &mesh.triangles {
            let world = triangle.vertices.map(|v| model.transform_point(&v.position));
            let centroid = centroid(&world);
            let Some(normal) = model
                .transform_vector(&triangle.normal())
                .try_normalize(f32::EPSILON)
            else {
                continue;
            };

            if normal.dot(&(eye - centroid)) <= 0.0 {
                continue;
            }

            let (Some(a), Some(b), Some(c)) = (
                self.project(&world[0]),
                self.project(&world[1]),
                self.project(&world[2]),
            ) else {
                continue;
            };

            let lit = shade(material, &normal, &centroid, &eye, self.lights);
            let color = self.fog.apply(lit, self.camera.distance_to(&centroid));

            out.push(DrawTriangle {
                points: [a, b, c],
                color,
                depth: (a.depth + b.depth + c.depth) / 3.0,
            });
        }
    }

    /// Flatten the faces of `mesh` that face `toward_light` onto the
    /// receiver's plane along the light's rays, shaded by the lights that
    /// still reach it.
    pub fn push_shadow(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        toward_light: &Vector3<f32>,
        receiver: &ShadowReceiver<'_>,
        out: &mut Vec<DrawTriangle>,
    ) {
        let eye = self.camera.position;
        let plane = receiver.height + SHADOW_LIFT;
        if eye.y <= plane {
            return;
        }
        let Some(toward_light) = toward_light.try_normalize(f32::EPSILON) else {
            return;
        };
        // A light at or below the horizon never reaches the plane from above
        if toward_light.y <= f32::EPSILON {
            return;
        }

        for triangle in &mesh.triangles {
            let normal = model.transform_vector(&triangle.normal());
            if normal.dot(&toward_light) <= 0.0 {
                continue;
            }
            let world = triangle.vertices.map(|v| model.transform_point(&v.position));
            if world.iter().any(|p| p.y < plane) {
                continue;
            }
            let flat = world.map(|p| p - toward_light * ((p.y - plane) / toward_light.y));
            if flat.iter().any(|p| p.x.hypot(p.z) > receiver.radius) {
                continue;
            }

            let (Some(a), Some(b), Some(c)) = (
                self.project(&flat[0]),
                self.project(&flat[1]),
                self.project(&flat[2]),
            ) else {
                continue;
            };

            let centroid = centroid(&flat);
            let lit = shade(receiver.material, &Vector3::y(), &centroid, &eye, receiver.unblocked);
            let color = self.fog.apply(lit, self.camera.distance_to(&centroid));

            out.push(DrawTriangle {
                points: [a, b, c],
                color,
                depth: (a.depth + b.depth + c.depth) / 3.0,
            });
        }
    }

    pub fn push_sprite(&self, position: &Point3<f32>, size: f32, color: Rgb, alpha: f32, list: &mut DrawList) {
        let Some(center) = self.project(position) else {
            return;
        };
        list.sprites.push(Sprite {
            center,
            radius: size * SPRITE_PIXELS_PER_UNIT / center.depth / 2.0,
            color,
            alpha,
        });
    }
}

/// A horizontal disc, centered over the origin, that shows shadows
pub(crate) struct ShadowReceiver<'a> {
    pub height: f32,
    pub radius: f32,
    pub material: &'a Material,
    /// Every light except the one being blocked
    pub unblocked: &'a [Light],
}

fn centroid(points: &[Point3<f32>; 3]) -> Point3<f32> {
    Point3::from((points[0].coords + points[1].coords + points[2].coords) / 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Triangle;
    use crate::transform::Transform;

    fn fog() -> Fog {
        Fog {
            color: Rgb::BLACK,
            near: 10.0,
            far: 28.0,
        }
    }

    #[test]
    fn test_only_front_faces_survive() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let mut list = DrawList::new(Rgb::BLACK);

        let mesh = Mesh::icosahedron(1.0);
        let material = Material::new(Rgb::WHITE, 0.0, 1.0);
        projector.push_mesh(&mesh, &Matrix4::identity(), &material, &mut list.triangles);

        assert!(!list.triangles.is_empty());
        assert!(list.triangles.len() < mesh.triangles.len());
    }

    #[test]
    fn test_culling_follows_stored_normal() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let material = Material::new(Rgb::WHITE, 0.0, 1.0);

        let toward_camera = camera.position.coords;
        let face = Triangle::facing(
            Point3::new(-0.5, 0.0, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.0, 0.5, 0.0),
            &toward_camera,
        );
        let mut flipped = face.clone();
        for vertex in &mut flipped.vertices {
            vertex.normal = -vertex.normal;
        }

        let mut shown = Vec::new();
        let mesh = Mesh { triangles: vec![face] };
        projector.push_mesh(&mesh, &Matrix4::identity(), &material, &mut shown);
        assert_eq!(shown.len(), 1);

        let mut hidden = Vec::new();
        let mesh = Mesh { triangles: vec![flipped] };
        projector.push_mesh(&mesh, &Matrix4::identity(), &material, &mut hidden);
        assert!(hidden.is_empty());
    }

    fn receiver<'a>(material: &'a Material, unblocked: &'a [Light]) -> ShadowReceiver<'a> {
        ShadowReceiver {
            height: -1.25,
            radius: 18.0,
            material,
            unblocked,
        }
    }

    #[test]
    fn test_shadow_lands_on_receiver() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let ground = Material::new(Rgb::WHITE, 0.1, 0.9);
        let model = Transform::translation_matrix(0.0, 1.0, 0.0);

        let mut shadow = Vec::new();
        projector.push_shadow(
            &Mesh::icosahedron(0.5),
            &model,
            &Vector3::y(),
            &receiver(&ground, &lights),
            &mut shadow,
        );

        assert!(!shadow.is_empty());
        assert!(shadow.len() < 20);
        // Nothing else lights the shadowed ground, and the fog is black
        assert!(shadow.iter().all(|t| t.color == Rgb::BLACK));
    }

    #[test]
    fn test_no_shadow_from_light_below_horizon() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let ground = Material::new(Rgb::WHITE, 0.1, 0.9);

        let mut shadow = Vec::new();
        projector.push_shadow(
            &Mesh::icosahedron(0.5),
            &Matrix4::identity(),
            &Vector3::new(1.0, -0.2, 0.0),
            &receiver(&ground, &lights),
            &mut shadow,
        );
        assert!(shadow.is_empty());
    }

    #[test]
    fn test_shadow_outside_receiver_is_dropped() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let ground = Material::new(Rgb::WHITE, 0.1, 0.9);
        let model = Transform::translation_matrix(0.0, 1.0, 0.0);
        let small = ShadowReceiver {
            radius: 0.1,
            ..receiver(&ground, &lights)
        };

        let mut shadow = Vec::new();
        projector.push_shadow(&Mesh::icosahedron(0.5), &model, &Vector3::y(), &small, &mut shadow);
        assert!(shadow.is_empty());
    }

    #[test]
    fn test_sort_back_to_front() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let mut list = DrawList::new(Rgb::BLACK);
        let material = Material::new(Rgb::WHITE, 0.0, 1.0);

        let near = Transform::translation_matrix(2.0, 1.0, 3.0);
        let far = Transform::translation_matrix(-3.0, 0.0, -4.0);
        projector.push_mesh(&Mesh::icosahedron(0.5), &near, &material, &mut list.triangles);
        projector.push_mesh(&Mesh::icosahedron(0.5), &far, &material, &mut list.triangles);
        list.sort_back_to_front();

        assert!(list
            .triangles
            .windows(2)
            .all(|pair| pair[0].depth >= pair[1].depth));
    }

    #[test]
    fn test_items_interleave_by_depth() {
        let at = |depth: f32| ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth,
        };
        let triangle = |depth: f32| DrawTriangle {
            points: [at(depth); 3],
            color: Rgb::WHITE,
            depth,
        };
        let sprite = |depth: f32| Sprite {
            center: at(depth),
            radius: 1.0,
            color: Rgb::WHITE,
            alpha: 0.5,
        };

        let mut list = DrawList::new(Rgb::BLACK);
        list.floor = vec![triangle(4.0), triangle(3.0)];
        list.triangles = vec![triangle(2.0), triangle(9.0), triangle(5.0)];
        list.sprites = vec![sprite(1.0), sprite(7.0)];
        list.sort_back_to_front();

        let depths: Vec<(char, f32)> = list
            .items()
            .map(|item| match item {
                DrawItem::Triangle(t) => ('t', t.depth),
                DrawItem::Sprite(s) => ('s', s.center.depth),
            })
            .collect();
        assert_eq!(
            depths,
            vec![
                ('t', 4.0),
                ('t', 3.0),
                ('t', 9.0),
                ('s', 7.0),
                ('t', 5.0),
                ('t', 2.0),
                ('s', 1.0)
            ]
        );
    }

    #[test]
    fn test_sprite_shrinks_with_distance() {
        let camera = Camera::default();
        let lights: [Light; 0] = [];
        let fog = fog();
        let projector = Projector::new(&camera, &Viewport::new(800, 600), &lights, &fog);
        let mut list = DrawList::new(Rgb::BLACK);

        projector.push_sprite(&Point3::new(3.0, 1.5, 4.0), 2.2, Rgb::WHITE, 0.35, &mut list);
        projector.push_sprite(&Point3::origin(), 2.2, Rgb::WHITE, 0.35, &mut list);
        assert_eq!(list.sprites.len(), 2);
        assert!(list.sprites[0].radius > list.sprites[1].radius);
    }
}
