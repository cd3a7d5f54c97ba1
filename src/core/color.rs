use std::ops::{Add, Mul};

/// RGB in 0..255 with alpha in 0..1.
///
/// Channels stay floating point through lighting and interpolation and are only
/// quantized when packed into the color buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Unpacks `0xRRGGBBAA`.
    pub fn from_packed(packed: u32) -> Self {
        Self {
            r: ((packed >> 24) & 0xff) as f32,
            g: ((packed >> 16) & 0xff) as f32,
            b: ((packed >> 8) & 0xff) as f32,
            a: (packed & 0xff) as f32 / 255.0,
        }
    }

    /// Packs into `0xRRGGBBAA`, clamping every channel first.
    pub fn to_packed(&self) -> u32 {
        let c = self.clamped();
        let r = c.r.round() as u32;
        let g = c.g.round() as u32;
        let b = c.b.round() as u32;
        let a = (c.a * 255.0).round() as u32;
        (r << 24) | (g << 16) | (b << 8) | a
    }

    pub fn clamped(&self) -> Self {
        Self {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Component-wise product with `light` treated as a 0..1 filter. Alpha is kept.
    pub fn modulate(&self, light: &Color) -> Self {
        Self {
            r: self.r * light.r / 255.0,
            g: self.g * light.g / 255.0,
            b: self.b * light.b / 255.0,
            a: self.a,
        }
    }

    /// Scales RGB, leaving alpha alone.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a,
        }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}
