use crate::core::color::Color;
use crate::core::math::vector::try_normalize;
use crate::core::pipeline::Shading;
use crate::pipeline::triangles::TriangleList;
use crate::scene::light::Light;
use crate::scene::object::Object;
use nalgebra::{Point3, Vector3};
use std::str::FromStr;

/// Where the lighting stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightSpace {
    /// Objects are lit after back-face removal, with world-space lights.
    #[default]
    World,
    /// The triangle list is lit after the camera transform, with the
    /// camera-space light copies.
    Camera,
}

impl FromStr for LightSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "world" => Ok(LightSpace::World),
            "camera" => Ok(LightSpace::Camera),
            other => Err(format!("Unknown light space '{}'", other)),
        }
    }
}

/// Sums every light's contribution for one surface sample and clamps the result.
///
/// Starts from black with the base alpha. A zero-length normal only receives
/// ambient light.
pub fn shade(base: &Color, point: &Point3<f32>, normal: &Vector3<f32>, lights: &[Light]) -> Color {
    let unit = try_normalize(normal).ok();
    let mut total = Color::new(0.0, 0.0, 0.0, base.a);
    for light in lights {
        let c = light.contribution(base, point, unit.as_ref());
        total.r += c.r;
        total.g += c.g;
        total.b += c.b;
    }
    total.clamped()
}

/// Lights one object in the space its working buffer is in; `lights` must be
/// expressed in that same space.
///
/// FLAT writes one color per active face, GOURAUD one per vertex (each vertex
/// once, even when shared), CONST leaves base colors alone. Inactive objects and
/// faces are skipped.
pub fn light_object(obj: &mut Object, lights: &[Light]) {
    if !obj.active {
        return;
    }

    match obj.shading {
        Shading::Const => {}
        Shading::Flat => {
            for face in obj.faces.iter_mut().filter(|f| f.active) {
                let point = obj.trans[face.indices[0]].position;
                face.color = shade(&face.base_color, &point, &face.normal, lights);
            }
        }
        Shading::Gouraud => {
            for face in obj.faces.iter().filter(|f| f.active) {
                for &i in &face.indices {
                    if obj.lit[i] {
                        continue;
                    }
                    let base = obj.local[i].color;
                    let v = &mut obj.trans[i];
                    v.color = shade(&base, &v.position, &v.normal, lights);
                    obj.lit[i] = true;
                }
            }
        }
    }
}

/// Lights every object; returns how many were lit.
pub fn light_objects(objects: &mut [Object], lights: &[Light]) -> usize {
    let mut lit = 0;
    for obj in objects.iter_mut().filter(|o| o.active) {
        light_object(obj, lights);
        lit += 1;
    }
    lit
}

/// Lights the active triangles of the arena. `lights` must be in the same
/// space as the triangles (camera space once they leave their objects).
///
/// FLAT shades the triangle once at its first vertex and paints all three
/// vertices; GOURAUD shades each vertex from its own color; CONST is skipped.
/// Returns how many triangles were lit.
pub fn light_triangles(list: &mut TriangleList, lights: &[Light]) -> usize {
    let mut lit = 0;
    for tri in list.triangles.iter_mut().filter(|t| t.active) {
        match tri.shading {
            Shading::Const => continue,
            Shading::Flat => {
                let point = tri.vertices[0].position;
                tri.color = shade(&tri.color, &point, &tri.normal, lights);
                for v in &mut tri.vertices {
                    v.color = tri.color;
                }
            }
            Shading::Gouraud => {
                for v in &mut tri.vertices {
                    v.color = shade(&v.color, &v.position, &v.normal, lights);
                }
            }
        }
        lit += 1;
    }
    lit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::objects::{compute_face_normals, compute_vertex_normals};
    use crate::scene::mesh::Mesh;

    const BASE: Color = Color::rgb(100.0, 150.0, 200.0);

    #[test]
    fn contributions_sum_then_clamp() {
        let lights = [
            Light::new_ambient(Color::WHITE, 1.0),
            Light::new_infinite(Vector3::new(0.0, 0.0, 1.0), Color::WHITE, 1.0),
        ];
        let c = shade(&BASE, &Point3::origin(), &Vector3::new(0.0, 0.0, -3.0), &lights);
        assert_eq!(c, Color::rgb(200.0, 255.0, 255.0));
    }

    #[test]
    fn zero_normal_gets_ambient_only() {
        let lights = [
            Light::new_ambient(Color::WHITE, 0.5),
            Light::new_infinite(Vector3::new(0.0, 0.0, 1.0), Color::WHITE, 1.0),
        ];
        let c = shade(&BASE, &Point3::origin(), &Vector3::zeros(), &lights);
        assert_eq!(c, Color::rgb(50.0, 75.0, 100.0));
    }

    #[test]
    fn flat_and_gouraud_write_different_targets() {
        let lights = [Light::new_ambient(Color::rgb(255.0, 0.0, 0.0), 1.0)];

        let mut flat = Object::new("f", Mesh::create_cube(1.0), BASE, Shading::Flat).unwrap();
        compute_face_normals(&mut flat);
        light_object(&mut flat, &lights);
        assert!(flat.faces.iter().all(|f| f.color == Color::rgb(100.0, 0.0, 0.0)));
        assert_eq!(flat.trans[0].color, BASE);

        let mut smooth = Object::new("g", Mesh::create_cube(1.0), BASE, Shading::Gouraud).unwrap();
        compute_face_normals(&mut smooth);
        compute_vertex_normals(&mut smooth);
        light_object(&mut smooth, &lights);
        assert!(smooth.trans.iter().all(|v| v.color == Color::rgb(100.0, 0.0, 0.0)));
        assert_eq!(smooth.faces[0].color, BASE);
    }

    #[test]
    fn shared_gouraud_vertices_are_shaded_once() {
        let lights = [Light::new_ambient(Color::WHITE, 0.5)];
        let mut obj = Object::new("g", Mesh::create_cube(1.0), BASE, Shading::Gouraud).unwrap();
        compute_face_normals(&mut obj);
        compute_vertex_normals(&mut obj);
        // The first side's two triangles share two vertices.
        let [a, b] = [obj.faces[0].indices, obj.faces[1].indices];
        let shared: Vec<usize> = a.iter().copied().filter(|i| b.contains(i)).collect();
        assert_eq!(shared.len(), 2);

        light_object(&mut obj, &lights);
        let once = Color::rgb(50.0, 75.0, 100.0);
        for &i in &shared {
            assert!(obj.lit[i]);
            assert_eq!(obj.trans[i].color, once);
        }

        // Marked vertices are skipped when their faces come round again.
        for &i in &shared {
            obj.trans[i].color = Color::BLACK;
        }
        light_object(&mut obj, &lights);
        for &i in &shared {
            assert_eq!(obj.trans[i].color, Color::BLACK);
        }
    }

    #[test]
    fn inactive_faces_leave_their_vertices_unlit() {
        let lights = [Light::new_ambient(Color::rgb(255.0, 0.0, 0.0), 1.0)];
        let mut obj = Object::new("g", Mesh::create_cube(1.0), BASE, Shading::Gouraud).unwrap();
        compute_face_normals(&mut obj);
        compute_vertex_normals(&mut obj);
        // Side 0 owns vertices 0..4 and both its faces are off.
        obj.faces[0].active = false;
        obj.faces[1].active = false;
        light_object(&mut obj, &lights);
        for i in 0..4 {
            assert!(!obj.lit[i]);
            assert_eq!(obj.trans[i].color, BASE);
        }
        assert!(obj.lit[4]);
    }

    #[test]
    fn triangle_lighting_follows_shading_mode() {
        use crate::core::geometry::{Triangle, Vertex};
        let lights = [Light::new_infinite(Vector3::new(0.0, 0.0, 1.0), Color::WHITE, 1.0)];
        let corners = [
            Vertex::at(0.0, 0.0, 5.0).with_color(BASE),
            Vertex::at(0.0, 1.0, 5.0).with_color(BASE),
            Vertex::at(1.0, 0.0, 5.0).with_color(BASE),
        ];
        let mut list = TriangleList::new();
        for shading in [Shading::Const, Shading::Flat, Shading::Gouraud] {
            let mut tri = Triangle::new(corners, BASE, shading);
            tri.normal = Vector3::new(0.0, 0.0, -1.0);
            for v in &mut tri.vertices {
                v.normal = Vector3::new(0.0, 0.0, -1.0);
            }
            list.triangles.push(tri);
        }
        list.triangles[2].vertices[1].normal = Vector3::new(0.0, 0.0, 1.0);

        assert_eq!(light_triangles(&mut list, &lights), 2);

        assert_eq!(list.triangles[0].color, BASE);
        assert!(list.triangles[1].vertices.iter().all(|v| v.color == BASE));
        let g = &list.triangles[2].vertices;
        assert_eq!(g[0].color, BASE);
        assert_eq!(g[1].color, Color::new(0.0, 0.0, 0.0, BASE.a));
    }

    #[test]
    fn const_and_inactive_objects_are_untouched() {
        let lights = [Light::new_ambient(Color::BLACK, 1.0)];
        let mut obj = Object::new("c", Mesh::create_cube(1.0), BASE, Shading::Const).unwrap();
        light_object(&mut obj, &lights);
        assert_eq!(obj.faces[0].color, BASE);

        obj.shading = Shading::Flat;
        obj.active = false;
        assert_eq!(light_objects(std::slice::from_mut(&mut obj), &lights), 0);
        assert_eq!(obj.faces[0].color, BASE);
    }
}
