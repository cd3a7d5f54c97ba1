use crate::core::color::Color;
use crate::core::math::matrix::{transform_direction, transform_point};
use crate::core::math::vector::try_normalize;
use nalgebra::{Matrix4, Point3, Vector3};

/// Represents a light source in the scene.
///
/// Colors are 0..255 per channel and act as a filter on the surface color.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Lights every surface equally.
    Ambient { color: Color, intensity: f32 },
    /// A light source that is infinitely far away (e.g., Sun).
    /// `direction` is the way the rays travel.
    Infinite {
        direction: Vector3<f32>,
        color: Color,
        intensity: f32,
    },
    /// A light source at a specific position that radiates in all directions.
    Point {
        position: Point3<f32>,
        color: Color,
        intensity: f32,
        /// Attenuation coefficients: (constant, linear, quadratic)
        attenuation: (f32, f32, f32),
    },
}

impl Light {
    pub fn new_ambient(color: Color, intensity: f32) -> Self {
        Self::Ambient { color, intensity }
    }

    /// Creates a simple infinite light. A zero direction is kept as is and lights nothing.
    pub fn new_infinite(direction: Vector3<f32>, color: Color, intensity: f32) -> Self {
        Self::Infinite {
            direction: try_normalize(&direction).unwrap_or(direction),
            color,
            intensity,
        }
    }

    pub fn new_point(
        position: Point3<f32>,
        color: Color,
        intensity: f32,
        attenuation: (f32, f32, f32),
    ) -> Self {
        Self::Point {
            position,
            color,
            intensity,
            attenuation,
        }
    }

    /// Light arriving at `point` with unit surface normal `normal`, already
    /// multiplied into `base`. `normal` is `None` for surfaces without a usable
    /// normal; only ambient light reaches those.
    pub fn contribution(
        &self,
        base: &Color,
        point: &Point3<f32>,
        normal: Option<&Vector3<f32>>,
    ) -> Color {
        match self {
            Light::Ambient { color, intensity } => base.modulate(color).scaled(*intensity),

            Light::Infinite {
                direction,
                color,
                intensity,
            } => match normal {
                Some(n) => {
                    let k = (-n.dot(direction)).max(0.0);
                    base.modulate(color).scaled(intensity * k)
                }
                None => Color::BLACK,
            },

            Light::Point {
                position,
                color,
                intensity,
                attenuation,
            } => {
                let Some(n) = normal else {
                    return Color::BLACK;
                };
                let to_light = position - point;
                let distance = to_light.norm();
                let Ok(l) = try_normalize(&to_light) else {
                    // Light sits on the surface; no defined direction.
                    return Color::BLACK;
                };
                let k = n.dot(&l).max(0.0);
                let (c, lin, q) = *attenuation;
                let denom = (c + lin * distance + q * distance * distance).max(1.0);
                base.modulate(color).scaled(intensity * k / denom)
            }
        }
    }

    /// Same light expressed through `m` (positions move, directions rotate).
    pub fn transformed(&self, m: &Matrix4<f32>) -> Light {
        match self {
            Light::Ambient { .. } => self.clone(),
            Light::Infinite {
                direction,
                color,
                intensity,
            } => Light::Infinite {
                direction: transform_direction(m, direction),
                color: *color,
                intensity: *intensity,
            },
            Light::Point {
                position,
                color,
                intensity,
                attenuation,
            } => Light::Point {
                position: transform_point(m, position),
                color: *color,
                intensity: *intensity,
                attenuation: *attenuation,
            },
        }
    }
}

/// The scene's lights in world space plus their camera-space copies.
#[derive(Debug, Clone, Default)]
pub struct Lights {
    pub world: Vec<Light>,
    camera: Vec<Light>,
}

impl Lights {
    pub fn new(world: Vec<Light>) -> Self {
        let camera = world.clone();
        Self { world, camera }
    }

    pub fn push(&mut self, light: Light) {
        self.camera.push(light.clone());
        self.world.push(light);
    }

    /// Refreshes the camera-space copies; called once per frame.
    pub fn world_to_camera(&mut self, world_to_camera: &Matrix4<f32>) {
        self.camera.clear();
        self.camera
            .extend(self.world.iter().map(|l| l.transformed(world_to_camera)));
    }

    pub fn in_camera(&self) -> &[Light] {
        &self.camera
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}
