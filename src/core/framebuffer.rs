use crate::core::color::Color;

/// Color and depth targets for one viewport.
///
/// Color is packed `0xRRGGBBAA`. Depth stores 1/z: larger is closer and a
/// cleared buffer holds 0, which any visible fragment beats.
/// Both buffers are allocated once and cleared in place every frame.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Color::BLACK.to_packed(); size],
            depth_buffer: vec![0.0; size],
        }
    }

    pub fn clear(&mut self, background: Color) {
        self.color_buffer.fill(background.to_packed());
        self.depth_buffer.fill(0.0);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Keeps the fragment when its 1/z is strictly larger than the stored one,
    /// and records it.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, inv_z: f32) -> bool {
        let idx = self.index(x, y);
        if inv_z > self.depth_buffer[idx] {
            self.depth_buffer[idx] = inv_z;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, packed: u32) {
        let idx = self.index(x, y);
        self.color_buffer[idx] = packed;
    }

    /// Mixes `color` over the stored pixel by `coverage` (0..1). Returns
    /// false, touching nothing, outside the viewport or at zero coverage.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: &Color, coverage: f32) -> bool {
        if coverage <= 0.0 || !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x as usize, y as usize);
        let dst = Color::from_packed(self.color_buffer[idx]);
        let k = coverage.min(1.0);
        let mixed = Color::new(
            dst.r + (color.r - dst.r) * k,
            dst.g + (color.g - dst.g) * k,
            dst.b + (color.b - dst.b) * k,
            dst.a,
        );
        self.color_buffer[idx] = mixed.to_packed();
        true
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    /// The finished image, row-major from the top-left corner.
    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closer_fragment_wins_regardless_of_order() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(0, 0, 1.0 / 10.0));
        assert!(fb.depth_test_and_update(0, 0, 1.0 / 5.0));
        assert!(!fb.depth_test_and_update(0, 0, 1.0 / 10.0));
    }

    #[test]
    fn blending_mixes_by_coverage() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.clear(Color::BLACK);
        assert!(fb.blend_pixel(0, 0, &Color::rgb(200.0, 100.0, 0.0), 0.25));
        assert_eq!(fb.get_pixel(0, 0), Some(Color::rgb(50.0, 25.0, 0.0).to_packed()));
        assert!(!fb.blend_pixel(1, 0, &Color::WHITE, 0.0));
        assert!(!fb.blend_pixel(2, 0, &Color::WHITE, 1.0));
        assert_eq!(fb.get_pixel(1, 0), Some(Color::BLACK.to_packed()));
    }

    #[test]
    fn clear_resets_both_buffers_in_place() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(1, 1, 0xdeadbeef);
        fb.depth_test_and_update(1, 1, 0.5);
        let ptr = fb.color_buffer().as_ptr();

        fb.clear(Color::WHITE);

        assert_eq!(fb.get_pixel(1, 1), Some(0xffffffff));
        assert!(fb.depth_test_and_update(1, 1, 0.01));
        assert_eq!(fb.color_buffer().as_ptr(), ptr);
        assert_eq!(fb.get_pixel(3, 0), None);
    }
}
