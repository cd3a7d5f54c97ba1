use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{RasterSettings, RasterStats, Rasterizer};
use crate::pipeline::lighting::LightSpace;
use crate::pipeline::passes::{GeometryStats, run_geometry_pass, run_raster_pass, run_triangle_pass};
use crate::pipeline::triangles::{TriangleList, face_triangle};
use crate::scene::context::SceneContext;
use crate::scene::object::{Object, Space};
use log::debug;

/// Per-frame switches that sit above the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub raster: RasterSettings,
    pub background: Color,
    /// Sort the draw order by depth (front-to-back with the z-buffer,
    /// back-to-front without it).
    pub sort_triangles: bool,
    pub light_space: LightSpace,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            raster: RasterSettings::default(),
            background: Color::BLACK,
            sort_triangles: true,
            light_space: LightSpace::World,
        }
    }
}

/// Everything counted while producing one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub geometry: GeometryStats,
    pub triangles_culled: usize,
    pub triangles_built: usize,
    pub raster: RasterStats,
}

/// The high-level renderer that orchestrates the pipeline stages.
///
/// Owns the targets and the triangle arena; all of them are reused from
/// frame to frame.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    pub triangles: TriangleList,
    pub settings: RenderSettings,
    pub stats: FrameStats,
}

impl Renderer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            rasterizer: Rasterizer::new(settings.raster),
            framebuffer: FrameBuffer::new(width, height),
            triangles: TriangleList::new(),
            settings,
            stats: FrameStats::default(),
        }
    }

    /// Clears color and depth and zeroes the frame counters.
    pub fn clear(&mut self) {
        self.framebuffer.clear(self.settings.background);
        self.rasterizer.settings = self.settings.raster;
        self.rasterizer.stats.reset();
    }

    /// Runs the whole pipeline for one frame: objects, triangles, raster.
    pub fn render_frame(&mut self, scene: &mut SceneContext) -> &FrameStats {
        self.clear();

        let geometry = run_geometry_pass(scene, self.settings.light_space);
        let culled = run_triangle_pass(scene, &mut self.triangles, &self.settings);
        run_raster_pass(&mut self.rasterizer, &mut self.framebuffer, &self.triangles);

        self.stats = FrameStats {
            geometry,
            triangles_culled: culled,
            triangles_built: self.triangles.len(),
            raster: self.rasterizer.stats.clone(),
        };
        debug!(
            "Frame: {} triangle(s) built, {} culled, {} drawn, {} pixel(s)",
            self.stats.triangles_built,
            self.stats.triangles_culled,
            self.stats.raster.triangles_drawn,
            self.stats.raster.pixels_drawn
        );
        &self.stats
    }

    /// Draws objects already mapped to screen space, face by face, without
    /// the triangle arena. Faces with a vertex at or behind the eye are skipped.
    pub fn draw_objects(&mut self, objects: &[Object]) {
        for obj in objects.iter().filter(|o| o.active && o.space == Space::Screen) {
            for face in obj.faces.iter().filter(|f| f.active) {
                let tri = face_triangle(obj, face);
                self.rasterizer.draw_triangle(&mut self.framebuffer, &tri);
            }
        }
        self.stats.raster = self.rasterizer.stats.clone();
    }

    /// The finished image for the display collaborator.
    pub fn color_buffer(&self) -> &[u32] {
        self.framebuffer.color_buffer()
    }

    pub fn width(&self) -> usize {
        self.framebuffer.width
    }

    pub fn height(&self) -> usize {
        self.framebuffer.height
    }
}
