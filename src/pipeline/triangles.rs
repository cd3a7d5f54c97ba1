//! Triangle-level stages over a per-frame arena.
//!
//! Triangles are copied out of objects once they are in camera space, then
//! culled, clipped against the near plane, sorted through an index list and
//! projected. The arena keeps its allocation across frames.

use crate::core::geometry::{Face, Triangle, Vertex};
use crate::core::math::transform::{
    camera_to_perspective as project_point, perspective_to_screen as map_point,
};
use crate::core::pipeline::Shading;
use crate::scene::camera::Camera;
use crate::scene::object::Object;
use log::debug;
use std::cmp::Ordering;

/// Draw order for [`TriangleList::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Nearest first; fewest overdraws with a depth buffer.
    FrontToBack,
    /// Farthest first; painter's algorithm without a depth buffer.
    BackToFront,
}

#[derive(Debug, Default)]
pub struct TriangleList {
    pub triangles: Vec<Triangle>,
    /// Indices of active triangles in draw order.
    pub order: Vec<usize>,
}

impl TriangleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the arena, keeping its capacity.
    pub fn clear(&mut self) {
        self.triangles.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.triangles.iter().filter(|t| t.active).count()
    }

    /// Appends the active faces of `obj`. Flat and constant faces carry the
    /// face color on all three vertices, Gouraud faces their lit vertex colors.
    pub fn add_from_object(&mut self, obj: &Object) {
        if !obj.active {
            return;
        }
        for face in obj.faces.iter().filter(|f| f.active) {
            self.triangles.push(face_triangle(obj, face));
        }
    }

    pub fn add_from_objects(&mut self, objects: &[Object]) {
        for obj in objects {
            self.add_from_object(obj);
        }
    }

    /// Drops triangles wholly outside the frustum and clips the rest against
    /// the near plane. A clipped triangle is replaced by the first triangle of
    /// its fan; a second one, if any, is appended. Returns the number culled.
    pub fn cull_and_clip(&mut self, camera: &Camera) -> usize {
        let tan_x = camera.wov() * 0.5 / camera.dov;
        let tan_y = tan_x / camera.aspect();
        let near = camera.near;

        let mut culled = 0;
        let mut clipped = 0;
        let mut poly: Vec<Vertex> = Vec::with_capacity(4);
        let original = self.triangles.len();

        for idx in 0..original {
            let tri = &mut self.triangles[idx];
            if !tri.active {
                continue;
            }

            let p = tri.vertices.map(|v| v.position);
            let outside = p.iter().all(|v| v.z < near)
                || p.iter().all(|v| v.z > camera.far)
                || p.iter().all(|v| v.x > v.z * tan_x)
                || p.iter().all(|v| v.x < -v.z * tan_x)
                || p.iter().all(|v| v.y > v.z * tan_y)
                || p.iter().all(|v| v.y < -v.z * tan_y);
            if outside {
                tri.active = false;
                culled += 1;
                continue;
            }

            if p.iter().all(|v| v.z >= near) {
                continue;
            }

            clip_near(&tri.vertices, near, &mut poly);
            clipped += 1;
            match poly.len() {
                3 => tri.vertices = [poly[0], poly[1], poly[2]],
                4 => {
                    tri.vertices = [poly[0], poly[1], poly[2]];
                    let mut extra = tri.clone();
                    extra.vertices = [poly[0], poly[2], poly[3]];
                    self.triangles.push(extra);
                }
                _ => {
                    tri.active = false;
                    culled += 1;
                }
            }
        }

        debug!(
            "Triangles: {} culled, {} clipped, {} added by clipping",
            culled,
            clipped,
            self.triangles.len() - original
        );
        culled
    }

    /// Rebuilds the draw order over active triangles by average depth.
    pub fn sort(&mut self, order: SortOrder) {
        self.order.clear();
        self.order
            .extend((0..self.triangles.len()).filter(|&i| self.triangles[i].active));

        let tris = &self.triangles;
        let by_depth = |a: &usize, b: &usize| -> Ordering {
            tris[*a].average_z().total_cmp(&tris[*b].average_z())
        };
        match order {
            SortOrder::FrontToBack => self.order.sort_by(by_depth),
            SortOrder::BackToFront => self.order.sort_by(|a, b| by_depth(b, a)),
        }
    }

    /// Order without sorting: active triangles in arena order.
    pub fn make_order(&mut self) {
        self.order.clear();
        self.order
            .extend((0..self.triangles.len()).filter(|&i| self.triangles[i].active));
    }

    /// Camera space to the projection plane. z is kept for depth.
    pub fn camera_to_perspective(&mut self, camera: &Camera) {
        let (dov, aspect) = (camera.dov, camera.aspect());
        for tri in self.triangles.iter_mut().filter(|t| t.active) {
            for v in &mut tri.vertices {
                v.position = project_point(&v.position, dov, aspect);
            }
        }
    }

    pub fn perspective_to_screen(&mut self, camera: &Camera) {
        let (wov, w, h) = (camera.wov(), camera.width as f32, camera.height as f32);
        for tri in self.triangles.iter_mut().filter(|t| t.active) {
            for v in &mut tri.vertices {
                v.position = map_point(&v.position, wov, w, h);
            }
        }
    }
}

/// Copies one face of `obj` out of its working buffer.
pub fn face_triangle(obj: &Object, face: &Face) -> Triangle {
    let mut vertices = face.indices.map(|i| obj.trans[i]);
    if obj.shading != Shading::Gouraud {
        for v in &mut vertices {
            v.color = face.color;
        }
    }
    let mut tri = Triangle::new(vertices, face.color, obj.shading);
    tri.normal = face.normal;
    tri.texture = obj.texture.clone();
    tri
}

/// Sutherland-Hodgman against `z >= near` for a single triangle. Writes the
/// surviving polygon (0, 3 or 4 vertices) into `output`, in winding order.
///
/// New vertices are interpolated in every attribute and pinned to z = near.
pub fn clip_near(input: &[Vertex; 3], near: f32, output: &mut Vec<Vertex>) {
    output.clear();

    let inside = |v: &Vertex| v.position.z >= near;
    let intersect = |a: &Vertex, b: &Vertex| {
        let t = (near - a.position.z) / (b.position.z - a.position.z);
        let mut v = Vertex::lerp(a, b, t);
        v.position.z = near;
        v
    };

    let mut prev = &input[2];
    let mut prev_inside = inside(prev);

    for curr in input {
        let curr_inside = inside(curr);
        if curr_inside {
            if !prev_inside {
                // OUT -> IN: Intersection point + Current point
                output.push(intersect(prev, curr));
            }
            output.push(*curr);
        } else if prev_inside {
            // IN -> OUT: Intersection point only
            output.push(intersect(prev, curr));
        }
        prev = curr;
        prev_inside = curr_inside;
    }
}
