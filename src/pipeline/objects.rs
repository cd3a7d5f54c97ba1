//! Object-level stages. Each one works on the buffer selected by
//! [`Object::set_coords`] unless it says otherwise, and overwrites it in place.

use crate::core::math::matrix::{transform_direction, transform_point};
use crate::core::math::transform::{
    TransformFactory, camera_to_perspective as project_point, perspective_to_screen as map_point,
};
use crate::core::math::trig::TrigTable;
use crate::core::math::vector::try_normalize;
use crate::scene::camera::Camera;
use crate::scene::object::{Coords, Object, Space};
use nalgebra::{Matrix4, Point3, Vector3};

/// Rotates the current buffer X, then Y, then Z. Rotating `local` also turns
/// the object's orientation vectors.
pub fn rotate(obj: &mut Object, trig: &TrigTable, degrees: &Vector3<f32>) {
    let m = TransformFactory::rotation_xyz(trig, degrees);
    for v in obj.vertices_mut() {
        v.position = transform_point(&m, &v.position);
        v.normal = transform_direction(&m, &v.normal);
    }
    if obj.coords == Coords::Local {
        for axis in &mut obj.orientation {
            *axis = transform_direction(&m, axis);
        }
    }
}

/// Scales the current buffer about the object origin.
pub fn scale(obj: &mut Object, factors: &Vector3<f32>) {
    let m = TransformFactory::scaling_nonuniform(factors);
    for v in obj.vertices_mut() {
        v.position = transform_point(&m, &v.position);
    }
    if obj.coords == Coords::Local {
        obj.update_radius();
    } else {
        obj.radius *= factors.x.abs().max(factors.y.abs()).max(factors.z.abs());
    }
}

/// Moves the current buffer by `offset`.
pub fn translate(obj: &mut Object, offset: &Vector3<f32>) {
    for v in obj.vertices_mut() {
        v.position += offset;
    }
}

/// Working buffer from local to world: offset by the object's world position.
pub fn local_to_world(obj: &mut Object) {
    let offset = obj.world_pos.coords;
    for v in &mut obj.trans {
        v.position += offset;
    }
    obj.space = Space::World;
}

/// Face normals from the working buffer: `(v1 - v0) x (v2 - v0)`, unnormalized.
pub fn compute_face_normals(obj: &mut Object) {
    for face in &mut obj.faces {
        let [a, b, c] = face.indices;
        let p0 = obj.trans[a].position;
        let p1 = obj.trans[b].position;
        let p2 = obj.trans[c].position;
        face.normal = (p1 - p0).cross(&(p2 - p0));
    }
}

/// Vertex normals as the normalized sum of adjacent face normals. Vertices
/// whose faces cancel out keep a zero normal.
pub fn compute_vertex_normals(obj: &mut Object) {
    for v in &mut obj.trans {
        v.normal = Vector3::zeros();
    }
    for face in &obj.faces {
        let n = try_normalize(&face.normal).unwrap_or_else(|_| Vector3::zeros());
        for &i in &face.indices {
            obj.trans[i].normal += n;
        }
    }
    for v in &mut obj.trans {
        v.normal = try_normalize(&v.normal).unwrap_or_else(|_| Vector3::zeros());
    }
}

/// Bounding-sphere test against the view frustum. A culled object is marked
/// inactive for the rest of the frame. Returns whether it was culled.
pub fn cull_object(obj: &mut Object, camera: &Camera, world_to_camera: &Matrix4<f32>) -> bool {
    let c = transform_point(world_to_camera, &obj.world_pos);
    let r = obj.radius;

    let tan_x = camera.wov() * 0.5 / camera.dov;
    let tan_y = tan_x / camera.aspect();

    let outside = c.z + r < camera.near
        || c.z - r > camera.far
        || c.x - r > c.z * tan_x
        || c.x + r < -c.z * tan_x
        || c.y - r > c.z * tan_y
        || c.y + r < -c.z * tan_y;

    if outside {
        obj.active = false;
    }
    outside
}

/// Back-face removal on the working buffer: a face is dropped when its normal
/// points away from the camera, i.e. `n . (p - cam) >= 0`. Returns how many
/// faces were removed.
pub fn remove_hidden_surfaces(obj: &mut Object, camera_pos: &Point3<f32>) -> usize {
    if !obj.active {
        return 0;
    }
    let mut removed = 0;
    for face in obj.faces.iter_mut().filter(|f| f.active) {
        let [a, b, c] = face.indices;
        let p0 = obj.trans[a].position;
        let n = (obj.trans[b].position - p0).cross(&(obj.trans[c].position - p0));
        if n.dot(&(p0 - camera_pos)) >= 0.0 {
            face.active = false;
            removed += 1;
        }
    }
    removed
}

/// Working buffer from world to camera space, normals included.
pub fn world_to_camera(obj: &mut Object, world_to_camera: &Matrix4<f32>) {
    for v in &mut obj.trans {
        v.position = transform_point(world_to_camera, &v.position);
        v.normal = transform_direction(world_to_camera, &v.normal);
    }
    for face in &mut obj.faces {
        face.normal = transform_direction(world_to_camera, &face.normal);
    }
    obj.space = Space::Camera;
}

/// Camera space to the projection plane. Only valid when every vertex is in
/// front of the camera, which `cull_object` guarantees for objects that are
/// wholly beyond the near plane.
pub fn camera_to_perspective(obj: &mut Object, camera: &Camera) {
    for v in &mut obj.trans {
        v.position = project_point(&v.position, camera.dov, camera.aspect());
    }
    obj.space = Space::Perspective;
}

pub fn perspective_to_screen(obj: &mut Object, camera: &Camera) {
    let (w, h) = (camera.width as f32, camera.height as f32);
    for v in &mut obj.trans {
        v.position = map_point(&v.position, camera.wov(), w, h);
    }
    obj.space = Space::Screen;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::core::pipeline::Shading;
    use crate::scene::mesh::Mesh;

    const EPS: f32 = 1e-4;

    fn camera() -> Camera {
        Camera::new_euler(Point3::origin(), Vector3::zeros(), 90.0, 1.0, 1.0, 100.0, 640, 480)
    }

    fn cube_at(z: f32) -> Object {
        Object::new("cube", Mesh::create_cube(1.0), Color::WHITE, Shading::Flat)
            .unwrap()
            .at(Point3::new(0.0, 0.0, z))
    }

    fn to_world(obj: &mut Object) {
        obj.copy_coords(Coords::Local, Coords::Trans);
        local_to_world(obj);
    }

    #[test]
    fn cube_seen_head_on_keeps_only_its_front_side() {
        let cam = camera();
        let mut obj = cube_at(10.0);
        to_world(&mut obj);
        assert_eq!(obj.active_face_count(), 12);

        let removed = remove_hidden_surfaces(&mut obj, &cam.position);
        // Straight on, only the front side (2 triangles) survives.
        assert_eq!(removed, 10);
        assert_eq!(obj.active_face_count(), 2);
    }

    #[test]
    fn backface_test_matches_normal_view_dot() {
        let cam = camera();
        let mut obj = cube_at(10.0);
        obj.set_coords(Coords::Local);
        rotate(&mut obj, &TrigTable::default(), &Vector3::new(30.0, 40.0, 0.0));
        to_world(&mut obj);
        compute_face_normals(&mut obj);
        remove_hidden_surfaces(&mut obj, &cam.position);
        for face in &obj.faces {
            let p = obj.trans[face.indices[0]].position;
            let facing = face.normal.dot(&(p - cam.position)) < 0.0;
            assert_eq!(face.active, facing);
        }
    }

    #[test]
    fn rotation_turns_orientation_vectors() {
        let mut obj = cube_at(0.0);
        rotate(&mut obj, &TrigTable::default(), &Vector3::new(0.0, 90.0, 0.0));
        assert!((obj.orientation[2] - Vector3::x()).norm() < EPS);
        assert!((obj.orientation[1] - Vector3::y()).norm() < EPS);
    }

    #[test]
    fn vertex_normals_are_unit_face_averages() {
        let mut obj = cube_at(0.0);
        to_world(&mut obj);
        compute_face_normals(&mut obj);
        compute_vertex_normals(&mut obj);
        // Each cube side owns its vertices, so vertex normals equal the side normal.
        assert!((obj.trans[0].normal - (-Vector3::z())).norm() < EPS);
        assert!(obj.trans.iter().all(|v| (v.normal.norm() - 1.0).abs() < EPS));
    }

    #[test]
    fn objects_outside_the_frustum_are_culled() {
        let cam = camera();
        let view = cam.world_to_camera(&TrigTable::default());

        let mut visible = cube_at(10.0);
        assert!(!cull_object(&mut visible, &cam, &view));
        assert!(visible.active);

        let mut behind = cube_at(-10.0);
        assert!(cull_object(&mut behind, &cam, &view));
        assert!(!behind.active);

        let mut beyond_far = cube_at(200.0);
        assert!(cull_object(&mut beyond_far, &cam, &view));

        let mut aside = cube_at(10.0).at(Point3::new(50.0, 0.0, 10.0));
        assert!(cull_object(&mut aside, &cam, &view));
    }

    #[test]
    fn translate_moves_only_the_selected_buffer() {
        let mut obj = cube_at(0.0);
        let before = obj.local[0].position;
        obj.set_coords(Coords::Trans);
        translate(&mut obj, &Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.trans[0].position, before + Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.local[0].position, before);
    }

    #[test]
    fn scale_updates_the_bounding_radius() {
        let mut obj = cube_at(0.0);
        let before = obj.radius;
        scale(&mut obj, &Vector3::new(2.0, 2.0, 2.0));
        assert!((obj.radius - before * 2.0).abs() < EPS);
    }

    #[test]
    fn object_projection_path_centres_the_view() {
        let cam = camera();
        let trig = TrigTable::default();
        let mut obj = Object::new("t", Mesh::create_test_triangle(), Color::WHITE, Shading::Const)
            .unwrap()
            .at(Point3::new(0.0, 0.0, 5.0));
        to_world(&mut obj);
        world_to_camera(&mut obj, &cam.world_to_camera(&trig));
        camera_to_perspective(&mut obj, &cam);
        perspective_to_screen(&mut obj, &cam);
        assert_eq!(obj.space, Space::Screen);

        // Top vertex (0, 0.5, 5) lands on the centre column, above the middle row.
        let top = obj.trans[1].position;
        assert!((top.x - 320.0).abs() < EPS);
        assert!(top.y < 240.0);
        assert!((top.z - 5.0).abs() < EPS);
    }
}
