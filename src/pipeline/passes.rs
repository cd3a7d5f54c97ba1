use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shading;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::lighting::{LightSpace, light_object, light_triangles};
use crate::pipeline::objects;
use crate::pipeline::renderer::RenderSettings;
use crate::pipeline::triangles::{SortOrder, TriangleList};
use crate::scene::context::SceneContext;
use crate::scene::object::Coords;
use log::debug;
use nalgebra::Vector3;

/// What the geometry pass removed before triangles were built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryStats {
    pub objects_culled: usize,
    pub faces_hidden: usize,
}

/// Object stages for one frame, in order: spin, local -> world, object cull,
/// back-face removal, normals, lighting (world space only), world -> camera.
///
/// Spin is applied to a fresh copy of `local` using the accumulated angle, so
/// table rounding never piles up from frame to frame. With camera-space
/// lighting the lights get their camera copies refreshed here instead.
pub fn run_geometry_pass(scene: &mut SceneContext, light_space: LightSpace) -> GeometryStats {
    let trig = &scene.trig;
    let camera = &scene.camera;
    let view = camera.world_to_camera(trig);
    let mut stats = GeometryStats::default();

    if light_space == LightSpace::Camera {
        scene.lights.world_to_camera(&view);
    }

    for obj in &mut scene.objects {
        obj.reset_attributes();

        obj.copy_coords(Coords::Local, Coords::Trans);
        obj.set_coords(Coords::Trans);
        if obj.spin != Vector3::zeros() {
            obj.advance_spin();
        }
        if obj.rotation != Vector3::zeros() {
            let rotation = obj.rotation;
            objects::rotate(obj, trig, &rotation);
        }
        objects::local_to_world(obj);

        if objects::cull_object(obj, camera, &view) {
            stats.objects_culled += 1;
            continue;
        }

        stats.faces_hidden += objects::remove_hidden_surfaces(obj, &camera.position);
        objects::compute_face_normals(obj);
        if obj.shading == Shading::Gouraud {
            objects::compute_vertex_normals(obj);
        }
        if light_space == LightSpace::World {
            light_object(obj, &scene.lights.world);
        }
        objects::world_to_camera(obj, &view);
    }

    debug!(
        "Geometry: {} object(s) culled, {} face(s) hidden",
        stats.objects_culled, stats.faces_hidden
    );
    stats
}

/// Builds, lights (camera space only), clips, projects and orders the frame's
/// triangles. Returns the number of triangles culled.
pub fn run_triangle_pass(
    scene: &SceneContext,
    triangles: &mut TriangleList,
    settings: &RenderSettings,
) -> usize {
    let camera = &scene.camera;

    triangles.clear();
    triangles.add_from_objects(&scene.objects);
    if settings.light_space == LightSpace::Camera {
        light_triangles(triangles, scene.lights.in_camera());
    }
    let culled = triangles.cull_and_clip(camera);
    triangles.camera_to_perspective(camera);
    triangles.perspective_to_screen(camera);

    if settings.sort_triangles {
        let order = if settings.raster.zbuffer {
            SortOrder::FrontToBack
        } else {
            SortOrder::BackToFront
        };
        triangles.sort(order);
    } else {
        triangles.make_order();
    }
    culled
}

/// Rasterizes the ordered triangles into the framebuffer.
pub fn run_raster_pass(
    rasterizer: &mut Rasterizer,
    framebuffer: &mut FrameBuffer,
    triangles: &TriangleList,
) {
    for &idx in &triangles.order {
        rasterizer.draw_triangle(framebuffer, &triangles.triangles[idx]);
    }
}
