use crate::core::geometry::Vertex;
use nalgebra::{Point3, Vector2, Vector3};

/// Raw geometry handed in by a loader: a vertex list plus triangles as index triples.
///
/// Front faces wind clockwise when seen from outside, so the face normal
/// `(v1 - v0) x (v2 - v0)` points out of the surface.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Every face index must address an existing vertex.
    pub fn validate(&self) -> Result<(), String> {
        let count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(bad) = face.iter().find(|&&idx| idx >= count) {
                return Err(format!(
                    "Face {} references vertex {} but the mesh has only {} vertices",
                    i, bad, count
                ));
            }
        }
        Ok(())
    }

    /// Axis-aligned cube centred on the origin, 4 vertices per side so that
    /// every side carries its own full 0..1 texture square.
    pub fn create_cube(size: f32) -> Self {
        let h = size * 0.5;
        // (outward normal, right, up) as seen from outside; up x right = normal.
        let sides = [
            (-Vector3::z(), Vector3::x(), Vector3::y()),
            (Vector3::z(), -Vector3::x(), Vector3::y()),
            (Vector3::x(), Vector3::z(), Vector3::y()),
            (-Vector3::x(), -Vector3::z(), Vector3::y()),
            (Vector3::y(), Vector3::x(), Vector3::z()),
            (-Vector3::y(), Vector3::x(), -Vector3::z()),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);

        for (normal, right, up) in sides {
            let base = vertices.len();
            // bottom-left, top-left, top-right, bottom-right
            let corners = [
                (-1.0, -1.0, 0.0, 1.0),
                (-1.0, 1.0, 0.0, 0.0),
                (1.0, 1.0, 1.0, 0.0),
                (1.0, -1.0, 1.0, 1.0),
            ];
            for (s, t, u, v) in corners {
                let p = (normal + right * s + up * t) * h;
                vertices.push(Vertex::new(Point3::from(p), normal, Vector2::new(u, v)));
            }
            faces.push([base, base + 1, base + 2]);
            faces.push([base, base + 2, base + 3]);
        }

        Self::new(vertices, faces)
    }

    /// Square in the XZ plane at y = 0 facing +y.
    pub fn create_plane(size: f32) -> Self {
        let h = size * 0.5;
        let n = Vector3::y();
        let vertices = vec![
            Vertex::new(Point3::new(-h, 0.0, -h), n, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(-h, 0.0, h), n, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(h, 0.0, h), n, Vector2::new(1.0, 0.0)),
            Vertex::new(Point3::new(h, 0.0, -h), n, Vector2::new(1.0, 1.0)),
        ];
        Self::new(vertices, vec![[0, 1, 2], [0, 2, 3]])
    }

    /// A single triangle in the XY plane facing -z.
    pub fn create_test_triangle() -> Self {
        let n = -Vector3::z();
        let vertices = vec![
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), n, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(0.0, 0.5, 0.0), n, Vector2::new(0.5, 0.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), n, Vector2::new(1.0, 1.0)),
        ];
        Self::new(vertices, vec![[0, 1, 2]])
    }

    /// Built-in mesh by name, if there is one.
    pub fn builtin(name: &str, size: f32) -> Option<Self> {
        match name {
            "cube" => Some(Self::create_cube(size)),
            "plane" => Some(Self::create_plane(size)),
            "triangle" => Some(Self::create_test_triangle()),
            _ => None,
        }
    }
}
