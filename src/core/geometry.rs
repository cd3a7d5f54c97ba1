use crate::core::color::Color;
use crate::core::pipeline::Shading;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector2, Vector3};
use std::sync::Arc;

/// A single vertex. The position is in whatever space its buffer currently holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub color: Color,
    /// Normalized texture coordinates (0..1).
    pub texcoord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            color: Color::WHITE,
            texcoord,
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Point3::new(x, y, z), Vector3::zeros(), Vector2::zeros())
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_texcoord(mut self, u: f32, v: f32) -> Self {
        self.texcoord = Vector2::new(u, v);
        self
    }

    /// Blends every attribute; used when clipping creates new vertices.
    pub fn lerp(a: &Vertex, b: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: a.position + (b.position - a.position) * t,
            normal: a.normal + (b.normal - a.normal) * t,
            color: a.color * (1.0 - t) + b.color * t,
            texcoord: a.texcoord + (b.texcoord - a.texcoord) * t,
        }
    }
}

/// Three indices into an object's vertex buffer, plus per-face state.
///
/// Faces are never removed from an object; culling flips `active` and the next
/// frame's reset turns it back on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub indices: [usize; 3],
    pub normal: Vector3<f32>,
    /// Unlit color, restored every frame.
    pub base_color: Color,
    /// Lit color for the current frame.
    pub color: Color,
    pub active: bool,
}

impl Face {
    pub fn new(indices: [usize; 3], color: Color) -> Self {
        Self {
            indices,
            normal: Vector3::zeros(),
            base_color: color,
            color,
            active: true,
        }
    }
}

/// A self-contained triangle in the frame arena.
///
/// Holds copies of its vertices so that clipping can add triangles without
/// touching object buffers.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    pub normal: Vector3<f32>,
    pub color: Color,
    pub shading: Shading,
    pub texture: Option<Arc<Texture>>,
    pub active: bool,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], color: Color, shading: Shading) -> Self {
        Self {
            vertices,
            normal: Vector3::zeros(),
            color,
            shading,
            texture: None,
            active: true,
        }
    }

    pub fn average_z(&self) -> f32 {
        (self.vertices[0].position.z + self.vertices[1].position.z + self.vertices[2].position.z)
            / 3.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_lerp_blends_all_attributes() {
        let a = Vertex::at(0.0, 0.0, 1.0)
            .with_color(Color::rgb(0.0, 100.0, 200.0))
            .with_texcoord(0.0, 1.0);
        let b = Vertex::at(2.0, 4.0, 3.0)
            .with_color(Color::rgb(100.0, 100.0, 0.0))
            .with_texcoord(1.0, 0.0);

        let m = Vertex::lerp(&a, &b, 0.5);
        assert_eq!(m.position, Point3::new(1.0, 2.0, 2.0));
        assert_eq!(m.color, Color::rgb(50.0, 100.0, 100.0));
        assert_eq!(m.texcoord, Vector2::new(0.5, 0.5));
    }

    #[test]
    fn triangle_average_depth() {
        let t = Triangle::new(
            [
                Vertex::at(0.0, 0.0, 2.0),
                Vertex::at(1.0, 0.0, 4.0),
                Vertex::at(0.0, 1.0, 6.0),
            ],
            Color::WHITE,
            Shading::Flat,
        );
        assert_eq!(t.average_z(), 4.0);
    }
}
