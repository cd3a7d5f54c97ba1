use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::Triangle;
use crate::core::math::interpolation::{edge_t, lerp, signed_area, sort_by_y};
use crate::core::pipeline::{Shading, Varying};
use crate::scene::texture::MipLevel;
use nalgebra::Point3;

/// Rasterizer switches, fixed for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    pub zbuffer: bool,
    pub wireframe: bool,
    /// Wireframe edges drawn anti-aliased (Wu) instead of with Bresenham.
    pub smooth_lines: bool,
    pub bifiltering: bool,
    pub mipmapping: bool,
    /// Average depth at which the first smaller mip level kicks in.
    pub mipmap_distance: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            zbuffer: true,
            wireframe: false,
            smooth_lines: false,
            bifiltering: true,
            mipmapping: true,
            mipmap_distance: 10.0,
        }
    }
}

/// Counters for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RasterStats {
    pub triangles_drawn: usize,
    pub triangles_skipped: usize,
    pub pixels_drawn: usize,
    /// Textured triangles per mip level.
    pub mip_levels: Vec<usize>,
}

impl RasterStats {
    pub fn reset(&mut self) {
        self.triangles_drawn = 0;
        self.triangles_skipped = 0;
        self.pixels_drawn = 0;
        self.mip_levels.clear();
    }

    fn count_mip(&mut self, level: usize) {
        if self.mip_levels.len() <= level {
            self.mip_levels.resize(level + 1, 0);
        }
        self.mip_levels[level] += 1;
    }
}

/// Scan-converts screen-space triangles into a [`FrameBuffer`].
///
/// Triangle vertices are expected in pixels (x right, y down) with the camera
/// depth kept in z.
pub struct Rasterizer {
    pub settings: RasterSettings,
    pub stats: RasterStats,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(RasterSettings::default())
    }
}

impl Rasterizer {
    pub fn new(settings: RasterSettings) -> Self {
        Self {
            settings,
            stats: RasterStats::default(),
        }
    }

    /// Draws one triangle with the variant its shading and texture call for.
    ///
    /// Triangles with zero or negative screen area are skipped.
    pub fn draw_triangle(&mut self, framebuffer: &mut FrameBuffer, tri: &Triangle) {
        let [a, b, c] = tri.vertices.map(|v| v.position);
        if signed_area(&a, &b, &c) <= 0.0 || a.z <= 0.0 || b.z <= 0.0 || c.z <= 0.0 {
            self.stats.triangles_skipped += 1;
            return;
        }
        self.stats.triangles_drawn += 1;

        if self.settings.wireframe {
            self.draw_wire(framebuffer, tri);
            return;
        }

        match &tri.texture {
            Some(texture) => {
                let level_index = if self.settings.mipmapping {
                    texture.mip_level_for(tri.average_z(), self.settings.mipmap_distance)
                } else {
                    0
                };
                self.stats.count_mip(level_index);
                self.draw_textured(framebuffer, tri, texture.level(level_index));
            }
            None => match tri.shading {
                Shading::Gouraud => self.draw_gouraud(framebuffer, tri),
                Shading::Const | Shading::Flat => self.draw_flat(framebuffer, tri),
            },
        }
    }

    /// One color for the whole face.
    fn draw_flat(&mut self, framebuffer: &mut FrameBuffer, tri: &Triangle) {
        let packed = tri.color.to_packed();
        let corners = tri
            .vertices
            .map(|v| (v.position, Varying::new(v.position.z, Color::BLACK, 0.0, 0.0)));
        self.scan(framebuffer, corners, |_| packed);
    }

    /// Vertex colors blended across the face.
    fn draw_gouraud(&mut self, framebuffer: &mut FrameBuffer, tri: &Triangle) {
        let corners = tri
            .vertices
            .map(|v| (v.position, Varying::new(v.position.z, v.color, 0.0, 0.0)));
        self.scan(framebuffer, corners, |var| var.color.to_packed());
    }

    /// Perspective-correct texture lookup, modulated by the light for FLAT and
    /// GOURAUD and taken as is for CONST.
    fn draw_textured(&mut self, framebuffer: &mut FrameBuffer, tri: &Triangle, level: &MipLevel) {
        let su = (level.width - 1) as f32;
        let sv = (level.height - 1) as f32;
        let corners = tri.vertices.map(|v| {
            (
                v.position,
                Varying::new(v.position.z, v.color, v.texcoord.x * su, v.texcoord.y * sv),
            )
        });
        let bilinear = self.settings.bifiltering;
        let shading = tri.shading;
        let face_color = tri.color;

        self.scan(framebuffer, corners, |var| {
            let (u, v) = var.texcoord();
            let texel = if bilinear {
                level.sample_bilinear(u, v)
            } else {
                level.sample_nearest(u, v)
            };
            let lit = match shading {
                Shading::Const => texel,
                Shading::Flat => texel.modulate(&face_color),
                Shading::Gouraud => texel.modulate(&var.color),
            };
            lit.to_packed()
        });
    }

    /// Single top-to-bottom pass. The long edge runs v0 -> v2; the short side
    /// switches from v0 -> v1 to v1 -> v2 at v1's row, which covers the
    /// flat-top and flat-bottom halves in one loop.
    ///
    /// Rows and spans are inclusive of pixel centres lying exactly on an edge,
    /// so a pixel at a vertex receives exactly that vertex's values.
    fn scan<F>(&mut self, framebuffer: &mut FrameBuffer, mut v: [(Point3<f32>, Varying); 3], shade: F)
    where
        F: Fn(&Varying) -> u32,
    {
        sort_by_y(&mut v, |(p, _)| (p.x, p.y));
        let [(p0, a0), (p1, a1), (p2, a2)] = v;

        let max_x = framebuffer.width as f32 - 1.0;
        let max_y = framebuffer.height as f32 - 1.0;
        let y_start = p0.y.ceil().max(0.0);
        let y_end = p2.y.floor().min(max_y);
        if y_start > y_end {
            return;
        }

        let zbuffer = self.settings.zbuffer;
        let mut pixels = 0;

        let mut yf = y_start;
        while yf <= y_end {
            let t_long = edge_t(p0.y, p2.y, yf);
            let x_long = lerp(p0.x, p2.x, t_long);
            let var_long = lerp(a0, a2, t_long);

            let (x_short, var_short) = if yf < p1.y {
                let t = edge_t(p0.y, p1.y, yf);
                (lerp(p0.x, p1.x, t), lerp(a0, a1, t))
            } else {
                let t = edge_t(p1.y, p2.y, yf);
                (lerp(p1.x, p2.x, t), lerp(a1, a2, t))
            };

            let (xl, vl, xr, vr) = if x_long <= x_short {
                (x_long, var_long, x_short, var_short)
            } else {
                (x_short, var_short, x_long, var_long)
            };

            let x_start = xl.ceil().max(0.0);
            let x_end = xr.floor().min(max_x);
            let span = xr - xl;
            let y = yf as usize;

            let mut xf = x_start;
            while xf <= x_end {
                let t = if span > f32::EPSILON { (xf - xl) / span } else { 0.0 };
                let var = lerp(vl, vr, t);
                let x = xf as usize;
                if !zbuffer || framebuffer.depth_test_and_update(x, y, var.inv_z) {
                    framebuffer.set_pixel(x, y, shade(&var));
                    pixels += 1;
                }
                xf += 1.0;
            }
            yf += 1.0;
        }

        self.stats.pixels_drawn += pixels;
    }

    fn draw_wire(&mut self, framebuffer: &mut FrameBuffer, tri: &Triangle) {
        if self.settings.smooth_lines {
            let p = tri.vertices.map(|v| (v.position.x, v.position.y));
            for i in 0..3 {
                let (x0, y0) = p[i];
                let (x1, y1) = p[(i + 1) % 3];
                self.stats.pixels_drawn += draw_line_wu(framebuffer, x0, y0, x1, y1, &tri.color);
            }
            return;
        }

        let packed = tri.color.to_packed();
        let p = tri.vertices.map(|v| (v.position.x.round() as i32, v.position.y.round() as i32));
        for i in 0..3 {
            let (x0, y0) = p[i];
            let (x1, y1) = p[(i + 1) % 3];
            self.stats.pixels_drawn += draw_line(framebuffer, x0, y0, x1, y1, packed);
        }
    }
}

/// Bresenham line, clipped per pixel to the viewport. Returns pixels written.
pub fn draw_line(
    framebuffer: &mut FrameBuffer,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    packed: u32,
) -> usize {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut written = 0;

    loop {
        if framebuffer.in_bounds(x0, y0) {
            framebuffer.set_pixel(x0 as usize, y0 as usize, packed);
            written += 1;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
    written
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Xiaolin Wu anti-aliased line. Each step along the major axis splits the
/// color between the two pixels straddling the ideal line, blended over what
/// is already in the buffer. Returns pixels touched.
pub fn draw_line_wu(
    framebuffer: &mut FrameBuffer,
    mut x0: f32,
    mut y0: f32,
    mut x1: f32,
    mut y1: f32,
    color: &Color,
) -> usize {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let gradient = if dx > f32::EPSILON { (y1 - y0) / dx } else { 1.0 };
    let mut plot = |x: i32, y: i32, coverage: f32| -> usize {
        let (px, py) = if steep { (y, x) } else { (x, y) };
        usize::from(framebuffer.blend_pixel(px, py, color, coverage))
    };
    let mut written = 0;

    // First endpoint.
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpx1 = xend as i32;
    let ypx1 = yend.floor() as i32;
    written += plot(xpx1, ypx1, rfpart(yend) * xgap);
    written += plot(xpx1, ypx1 + 1, fpart(yend) * xgap);
    let mut intery = yend + gradient;

    // Second endpoint.
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpx2 = xend as i32;
    let ypx2 = yend.floor() as i32;
    written += plot(xpx2, ypx2, rfpart(yend) * xgap);
    written += plot(xpx2, ypx2 + 1, fpart(yend) * xgap);

    for x in (xpx1 + 1)..xpx2 {
        let y = intery.floor() as i32;
        written += plot(x, y, rfpart(intery));
        written += plot(x, y + 1, fpart(intery));
        intery += gradient;
    }
    written
}
