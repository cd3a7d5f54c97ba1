use crate::core::color::Color;
use crate::core::geometry::{Face, Vertex};
use crate::core::pipeline::Shading;
use crate::scene::mesh::Mesh;
use crate::scene::texture::Texture;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// Which vertex buffer the object-level stages operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coords {
    /// Model space, persistent across frames.
    Local,
    /// Per-frame working copy, overwritten every frame.
    Trans,
}

/// What the working buffer currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Local,
    World,
    Camera,
    Perspective,
    Screen,
}

/// A renderable object: persistent local geometry plus a per-frame working copy.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub local: Vec<Vertex>,
    pub trans: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub coords: Coords,
    pub space: Space,

    pub world_pos: Point3<f32>,
    /// Local basis (right, up, forward), turned by rotations baked into `local`.
    pub orientation: [Vector3<f32>; 3],
    pub shading: Shading,
    pub texture: Option<Arc<Texture>>,
    pub radius: f32,
    pub active: bool,
    /// Degrees added to `rotation` every frame.
    pub spin: Vector3<f32>,
    /// Accumulated spin in degrees, wrapped into [0, 360). Applied to the
    /// working copy each frame; `local` is never rotated by it.
    pub rotation: Vector3<f32>,

    /// Marks vertices already lit this frame (Gouraud).
    pub(crate) lit: Vec<bool>,
}

impl Object {
    /// Builds an object from a mesh, painting every face `color`.
    ///
    /// Fails when a face points past the vertex list.
    pub fn new(name: &str, mesh: Mesh, color: Color, shading: Shading) -> Result<Self, String> {
        mesh.validate()
            .map_err(|e| format!("Object '{}': {}", name, e))?;

        let faces: Vec<Face> = mesh.faces.iter().map(|&idx| Face::new(idx, color)).collect();
        let mut local = mesh.vertices;
        for v in &mut local {
            v.color = color;
        }
        let radius = local
            .iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0_f32, f32::max);
        let count = local.len();

        Ok(Self {
            name: name.to_string(),
            trans: local.clone(),
            local,
            faces,
            coords: Coords::Local,
            space: Space::Local,
            world_pos: Point3::origin(),
            orientation: [Vector3::x(), Vector3::y(), Vector3::z()],
            shading,
            texture: None,
            radius,
            active: true,
            spin: Vector3::zeros(),
            rotation: Vector3::zeros(),
            lit: vec![false; count],
        })
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn at(mut self, position: Point3<f32>) -> Self {
        self.world_pos = position;
        self
    }

    /// Selects the buffer for the next stages.
    pub fn set_coords(&mut self, coords: Coords) {
        self.coords = coords;
    }

    pub fn vertices(&self) -> &[Vertex] {
        match self.coords {
            Coords::Local => &self.local,
            Coords::Trans => &self.trans,
        }
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        match self.coords {
            Coords::Local => &mut self.local,
            Coords::Trans => &mut self.trans,
        }
    }

    /// Overwrites one buffer with the other. Copying into `Trans` starts a new
    /// frame's working copy in local space.
    pub fn copy_coords(&mut self, from: Coords, to: Coords) {
        match (from, to) {
            (Coords::Local, Coords::Trans) => {
                self.trans.clone_from(&self.local);
                self.space = Space::Local;
            }
            (Coords::Trans, Coords::Local) => self.local.clone_from(&self.trans),
            _ => {}
        }
    }

    /// Start-of-frame reset: object and faces active, face colors back to base,
    /// lit markers cleared.
    pub fn reset_attributes(&mut self) {
        self.active = true;
        for face in &mut self.faces {
            face.active = true;
            face.color = face.base_color;
        }
        for (v, l) in self.trans.iter_mut().zip(self.local.iter()) {
            v.color = l.color;
        }
        self.lit.iter_mut().for_each(|m| *m = false);
    }

    /// Advances the accumulated rotation by one frame of spin.
    pub fn advance_spin(&mut self) {
        self.rotation = (self.rotation + self.spin).map(|a| a.rem_euclid(360.0));
    }

    pub fn active_face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.active).count()
    }

    /// Recomputes the bounding radius from the local vertices.
    pub fn update_radius(&mut self) {
        self.radius = self
            .local
            .iter()
            .map(|v| v.position.coords.norm())
            .fold(0.0_f32, f32::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_copies_mesh_and_paints_faces() {
        let obj = Object::new(
            "cube",
            Mesh::create_cube(2.0),
            Color::rgb(10.0, 20.0, 30.0),
            Shading::Flat,
        )
        .unwrap();
        assert_eq!(obj.faces.len(), 12);
        assert_eq!(obj.trans.len(), obj.local.len());
        assert!((obj.radius - 3.0_f32.sqrt()).abs() < 1e-5);
        assert!(obj.faces.iter().all(|f| f.color == Color::rgb(10.0, 20.0, 30.0)));
    }

    #[test]
    fn invalid_mesh_is_fatal() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.faces.push([3, 4, 5]);
        assert!(Object::new("broken", mesh, Color::WHITE, Shading::Const).is_err());
    }

    #[test]
    fn reset_restores_faces_and_colors() {
        let mut obj =
            Object::new("tri", Mesh::create_test_triangle(), Color::WHITE, Shading::Gouraud)
                .unwrap();
        obj.active = false;
        obj.faces[0].active = false;
        obj.faces[0].color = Color::BLACK;
        obj.trans[1].color = Color::BLACK;
        obj.lit[2] = true;

        obj.reset_attributes();

        assert!(obj.active);
        assert!(obj.faces[0].active);
        assert_eq!(obj.faces[0].color, Color::WHITE);
        assert_eq!(obj.trans[1].color, Color::WHITE);
        assert!(obj.lit.iter().all(|&m| !m));
    }

    #[test]
    fn spin_accumulates_and_wraps() {
        let mut obj =
            Object::new("tri", Mesh::create_test_triangle(), Color::WHITE, Shading::Flat).unwrap();
        obj.spin = Vector3::new(0.4, -0.5, 100.0);
        for _ in 0..50 {
            obj.advance_spin();
        }
        assert!((obj.rotation.x - 20.0).abs() < 1e-3);
        assert!((obj.rotation.y - 335.0).abs() < 1e-3);
        assert!((obj.rotation.z - 320.0).abs() < 1e-3);
    }

    #[test]
    fn copy_coords_overwrites_working_buffer() {
        let mut obj =
            Object::new("tri", Mesh::create_test_triangle(), Color::WHITE, Shading::Flat).unwrap();
        obj.trans[0].position = Point3::new(100.0, 0.0, 0.0);
        obj.space = Space::Camera;
        obj.copy_coords(Coords::Local, Coords::Trans);
        assert_eq!(obj.trans[0].position, obj.local[0].position);
        assert_eq!(obj.space, Space::Local);
    }
}
