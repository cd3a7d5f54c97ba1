use crate::core::color::Color;
use log::{debug, info};
use std::path::Path;

/// One level of a mip chain.
#[derive(Debug, Clone)]
pub struct MipLevel {
    pub width: usize,
    pub height: usize,
    texels: Vec<Color>,
}

impl MipLevel {
    #[inline]
    fn texel(&self, x: usize, y: usize) -> Color {
        self.texels[y * self.width + x]
    }

    /// Helper to get a texel with WRAPPING (repeat) logic.
    #[inline]
    fn texel_wrapped(&self, x: i32, y: i32) -> Color {
        let xw = x.rem_euclid(self.width as i32) as usize;
        let yw = y.rem_euclid(self.height as i32) as usize;
        self.texel(xw, yw)
    }

    /// Nearest texel. Coordinates are in texels of this level.
    pub fn sample_nearest(&self, x: f32, y: f32) -> Color {
        self.texel_wrapped(x.round() as i32, y.round() as i32)
    }

    /// Blends the 2x2 block at (floor(x), floor(y)) by the fractional offsets.
    ///
    /// Integer coordinates land exactly on one texel. Neighbours wrap like
    /// the texel itself, so tiled coordinates blend across the seam.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Color {
        let fx = x.floor();
        let fy = y.floor();
        let wx = x - fx;
        let wy = y - fy;
        let (x0, y0) = (fx as i32, fy as i32);

        let c00 = self.texel_wrapped(x0, y0);
        let c10 = self.texel_wrapped(x0 + 1, y0);
        let c01 = self.texel_wrapped(x0, y0 + 1);
        let c11 = self.texel_wrapped(x0 + 1, y0 + 1);

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    /// 2x2 box filter; odd edges reuse their last row or column.
    fn downsample(&self) -> MipLevel {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut texels = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let sx = (x * 2).min(self.width - 1);
                let sy = (y * 2).min(self.height - 1);
                let sx1 = (sx + 1).min(self.width - 1);
                let sy1 = (sy + 1).min(self.height - 1);
                let sum = self.texel(sx, sy)
                    + self.texel(sx1, sy)
                    + self.texel(sx, sy1)
                    + self.texel(sx1, sy1);
                texels.push(sum * 0.25);
            }
        }

        MipLevel {
            width,
            height,
            texels,
        }
    }
}

/// A 2D texture with an optional chain of smaller levels.
#[derive(Debug, Clone)]
pub struct Texture {
    levels: Vec<MipLevel>,
}

impl Texture {
    /// Wraps raw texels (row-major, top-left first).
    pub fn from_pixels(width: usize, height: usize, texels: Vec<Color>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Texture has empty size {}x{}", width, height));
        }
        if texels.len() != width * height {
            return Err(format!(
                "Texture size mismatch: {}x{} needs {} texels, got {}",
                width,
                height,
                width * height,
                texels.len()
            ));
        }
        Ok(Self {
            levels: vec![MipLevel {
                width,
                height,
                texels,
            }],
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?
            .to_rgba8();

        let width = img.width() as usize;
        let height = img.height() as usize;
        let texels = img
            .pixels()
            .map(|p| Color::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32 / 255.0))
            .collect();

        info!("Loaded texture: {:?} ({}x{})", path_ref, width, height);
        Self::from_pixels(width, height, texels)
    }

    /// Builds up to `levels` total levels (the original included), halving
    /// each time, stopping early at 1x1. Existing smaller levels are replaced.
    pub fn generate_mipmaps(&mut self, levels: usize) {
        self.levels.truncate(1);
        while self.levels.len() < levels {
            let last = &self.levels[self.levels.len() - 1];
            if last.width == 1 && last.height == 1 {
                break;
            }
            let next = last.downsample();
            self.levels.push(next);
        }
        debug!(
            "Mip chain: {} level(s), base {}x{}",
            self.levels.len(),
            self.width(),
            self.height()
        );
    }

    pub fn width(&self) -> usize {
        self.levels[0].width
    }

    pub fn height(&self) -> usize {
        self.levels[0].height
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level `index`, clamped to the smallest one available.
    pub fn level(&self, index: usize) -> &MipLevel {
        &self.levels[index.min(self.levels.len() - 1)]
    }

    /// Level 0 until `avg_z` reaches `distance`, then one level per doubling of depth.
    pub fn mip_level_for(&self, avg_z: f32, distance: f32) -> usize {
        if distance <= 0.0 || avg_z < distance {
            return 0;
        }
        // Clamp in float space; an infinite depth must not overflow the cast.
        let last = (self.levels.len() - 1) as f32;
        (1.0 + (avg_z / distance).log2().floor()).min(last) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        let texels = vec![
            Color::rgb(0.0, 0.0, 0.0),
            Color::rgb(255.0, 0.0, 0.0),
            Color::rgb(0.0, 255.0, 0.0),
            Color::rgb(0.0, 0.0, 255.0),
        ];
        Texture::from_pixels(2, 2, texels).unwrap()
    }

    #[test]
    fn bilinear_is_identity_on_texel_centres() {
        let tex = checker();
        let level = tex.level(0);
        assert_eq!(level.sample_bilinear(1.0, 0.0), Color::rgb(255.0, 0.0, 0.0));
        assert_eq!(level.sample_bilinear(0.0, 1.0), Color::rgb(0.0, 255.0, 0.0));
        assert_eq!(level.sample_bilinear(1.0, 1.0), Color::rgb(0.0, 0.0, 255.0));
    }

    #[test]
    fn bilinear_blends_between_texels() {
        let tex = checker();
        let c = tex.level(0).sample_bilinear(0.5, 0.0);
        assert!((c.r - 127.5).abs() < 1e-3);
        assert!(c.g.abs() < 1e-3);
    }

    #[test]
    fn bilinear_wraps_across_the_seam() {
        let tex = checker();
        let level = tex.level(0);
        // Between the last column and the first one again.
        let c = level.sample_bilinear(1.5, 0.0);
        assert!((c.r - 127.5).abs() < 1e-3);
        assert_eq!(level.sample_bilinear(2.5, 0.0), level.sample_bilinear(0.5, 0.0));
        let d = level.sample_bilinear(0.0, 1.5);
        assert!((d.g - 127.5).abs() < 1e-3);
    }

    #[test]
    fn mip_chain_halves_down_to_one_texel() {
        let mut tex = checker();
        tex.generate_mipmaps(8);
        assert_eq!(tex.level_count(), 2);
        let avg = tex.level(1).sample_nearest(0.0, 0.0);
        assert!((avg.r - 63.75).abs() < 1e-3);
        assert!((avg.b - 63.75).abs() < 1e-3);
    }

    #[test]
    fn mip_selection_follows_distance() {
        let texels = vec![Color::WHITE; 16 * 16];
        let mut tex = Texture::from_pixels(16, 16, texels).unwrap();
        tex.generate_mipmaps(4);
        assert_eq!(tex.level_count(), 4);
        assert_eq!(tex.mip_level_for(5.0, 10.0), 0);
        assert_eq!(tex.mip_level_for(10.0, 10.0), 1);
        assert_eq!(tex.mip_level_for(25.0, 10.0), 2);
        assert_eq!(tex.mip_level_for(1000.0, 10.0), 3);
        assert_eq!(tex.mip_level_for(f32::INFINITY, 10.0), 3);
        assert_eq!(tex.mip_level_for(f32::MAX, 10.0), 3);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        assert!(Texture::from_pixels(2, 2, vec![Color::WHITE; 3]).is_err());
        assert!(Texture::from_pixels(0, 2, Vec::new()).is_err());
    }
}
