use crate::core::color::Color;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// Trait for types that can be linearly interpolated along triangle edges and spans.
///
/// Add + Mul<f32> is all the scanline needs: `a * (1 - t) + b * t`.
pub trait Interpolatable: Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> {}

impl<T> Interpolatable for T where T: Copy + Clone + Add<Output = T> + Mul<f32, Output = T> {}

/// How a surface receives light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Base color only; lighting is skipped.
    Const,
    /// One lit color per face.
    #[default]
    Flat,
    /// One lit color per vertex, blended across the face.
    Gouraud,
}

impl FromStr for Shading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "const" | "constant" => Ok(Shading::Const),
            "flat" => Ok(Shading::Flat),
            "gouraud" | "smooth" => Ok(Shading::Gouraud),
            other => Err(format!("Unknown shading mode '{}'", other)),
        }
    }
}

impl fmt::Display for Shading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shading::Const => "const",
            Shading::Flat => "flat",
            Shading::Gouraud => "gouraud",
        };
        f.write_str(name)
    }
}

/// Per-vertex values carried across a screen triangle.
///
/// Texture coordinates travel divided by z so that linear interpolation in
/// screen space stays perspective-correct; `inv_z` doubles as the depth value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Varying {
    pub inv_z: f32,
    pub color: Color,
    pub u_over_z: f32,
    pub v_over_z: f32,
}

impl Varying {
    /// `u`, `v` are already in texel units.
    pub fn new(z: f32, color: Color, u: f32, v: f32) -> Self {
        let inv_z = 1.0 / z;
        Self {
            inv_z,
            color,
            u_over_z: u * inv_z,
            v_over_z: v * inv_z,
        }
    }

    /// Recovers (u, v) for the current pixel.
    #[inline]
    pub fn texcoord(&self) -> (f32, f32) {
        let z = 1.0 / self.inv_z;
        (self.u_over_z * z, self.v_over_z * z)
    }
}

impl Add for Varying {
    type Output = Varying;

    fn add(self, rhs: Varying) -> Varying {
        Varying {
            inv_z: self.inv_z + rhs.inv_z,
            color: self.color + rhs.color,
            u_over_z: self.u_over_z + rhs.u_over_z,
            v_over_z: self.v_over_z + rhs.v_over_z,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Varying;

    fn mul(self, k: f32) -> Varying {
        Varying {
            inv_z: self.inv_z * k,
            color: self.color * k,
            u_over_z: self.u_over_z * k,
            v_over_z: self.v_over_z * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::interpolation::lerp;

    #[test]
    fn shading_names_parse() {
        assert_eq!("FLAT".parse::<Shading>(), Ok(Shading::Flat));
        assert_eq!("gouraud".parse::<Shading>(), Ok(Shading::Gouraud));
        assert_eq!("const".parse::<Shading>(), Ok(Shading::Const));
        assert!("phong".parse::<Shading>().is_err());
    }

    #[test]
    fn texcoords_interpolate_perspective_correctly() {
        // Halfway across the screen between z = 1 and z = 3 is z = 1.5 in
        // camera space, a quarter of the way along u.
        let a = Varying::new(1.0, Color::BLACK, 0.0, 0.0);
        let b = Varying::new(3.0, Color::BLACK, 8.0, 0.0);
        let mid = lerp(a, b, 0.5);
        let (u, _) = mid.texcoord();
        assert!((1.0 / mid.inv_z - 1.5).abs() < 1e-5);
        assert!((u - 2.0).abs() < 1e-5);
    }
}
