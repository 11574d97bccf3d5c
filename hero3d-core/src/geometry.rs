//! Geometry primitives for 3D rendering

use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded face whose winding makes its normal point along `outward`
    pub fn facing(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>, outward: &Vector3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a));
        let (b, c, normal) = if normal.dot(outward) < 0.0 {
            (c, b, -normal)
        } else {
            (b, c, normal)
        };
        let n = normal.normalize();
        let vertex = |p: Point3<f32>| Vertex {
            position: p,
            normal: n,
        };
        Self::new(vertex(a), vertex(b), vertex(c))
    }

    /// Face normal stored on the vertices; faces are flat shaded
    pub fn normal(&self) -> Vector3<f32> {
        self.vertices[0].normal
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = &self.vertices;
        Point3::from((a.position.coords + b.position.coords + c.position.coords) / 3.0)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Regular icosahedron with circumradius `radius` (20 flat faces)
    pub fn icosahedron(radius: f32) -> Self {
        let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let scale = radius / (1.0 + phi * phi).sqrt();

        let corners: [Point3<f32>; 12] = [
            Point3::new(-1.0, phi, 0.0),
            Point3::new(1.0, phi, 0.0),
            Point3::new(-1.0, -phi, 0.0),
            Point3::new(1.0, -phi, 0.0),
            Point3::new(0.0, -1.0, phi),
            Point3::new(0.0, 1.0, phi),
            Point3::new(0.0, -1.0, -phi),
            Point3::new(0.0, 1.0, -phi),
            Point3::new(phi, 0.0, -1.0),
            Point3::new(phi, 0.0, 1.0),
            Point3::new(-phi, 0.0, -1.0),
            Point3::new(-phi, 0.0, 1.0),
        ]
        .map(|p| p * scale);

        #[rustfmt::skip]
        const FACES: [[usize; 3]; 20] = [
            [0, 5, 11], [0, 1, 5],  [0, 7, 1],  [0, 10, 7], [0, 11, 10],
            [1, 9, 5],  [5, 4, 11], [11, 2, 10], [10, 6, 7], [7, 8, 1],
            [3, 4, 9],  [3, 2, 4],  [3, 6, 2],  [3, 8, 6],  [3, 9, 8],
            [4, 5, 9],  [2, 11, 4], [6, 10, 2], [8, 7, 6],  [9, 1, 8],
        ];

        let mut mesh = Self::with_capacity(FACES.len());
        for [a, b, c] in FACES {
            let (a, b, c) = (corners[a], corners[b], corners[c]);
            // Convex and centered on the origin, so the centroid points outward
            let outward = (a.coords + b.coords + c.coords) / 3.0;
            mesh.add_triangle(Triangle::facing(a, b, c, &outward));
        }
        mesh
    }

    /// Flat disc in the XZ plane facing +Y, split into `rings` concentric bands
    pub fn disc(radius: f32, segments: usize, rings: usize) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(1);
        let up = Vector3::y();
        let mut mesh = Self::with_capacity(segments * (2 * rings - 1));

        let point = |ring: usize, segment: usize| {
            let r = radius * ring as f32 / rings as f32;
            let theta = std::f32::consts::TAU * (segment % segments) as f32 / segments as f32;
            Point3::new(r * theta.cos(), 0.0, r * theta.sin())
        };

        for segment in 0..segments {
            mesh.add_triangle(Triangle::facing(
                Point3::origin(),
                point(1, segment),
                point(1, segment + 1),
                &up,
            ));
        }

        for ring in 1..rings {
            for segment in 0..segments {
                let inner0 = point(ring, segment);
                let inner1 = point(ring, segment + 1);
                let outer0 = point(ring + 1, segment);
                let outer1 = point(ring + 1, segment + 1);
                mesh.add_triangle(Triangle::facing(inner0, outer0, outer1, &up));
                mesh.add_triangle(Triangle::facing(inner0, outer1, inner1, &up));
            }
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icosahedron_faces_point_outward() {
        let mesh = Mesh::icosahedron(1.1);
        assert_eq!(mesh.triangles.len(), 20);

        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            assert!(normal.dot(&triangle.centroid().coords) > 0.0);
            assert!((triangle.normal() - normal).norm() < 1e-5);
            for vertex in &triangle.vertices {
                assert!((vertex.position.coords.norm() - 1.1).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_disc_faces_up() {
        let mesh = Mesh::disc(18.0, 64, 4);
        assert_eq!(mesh.triangles.len(), 64 * 7);

        for triangle in &mesh.triangles {
            assert!((triangle.calculate_normal() - Vector3::y()).norm() < 1e-5);
            for vertex in &triangle.vertices {
                assert_eq!(vertex.position.y, 0.0);
                assert!(vertex.position.coords.norm() <= 18.0 + 1e-4);
            }
        }
    }

    #[test]
    fn test_single_ring_disc_is_a_fan() {
        let mesh = Mesh::disc(1.0, 8, 1);
        assert_eq!(mesh.triangles.len(), 8);
        assert!(mesh
            .triangles
            .iter()
            .all(|t| t.vertices.iter().any(|v| v.position == Point3::origin())));
    }
}
