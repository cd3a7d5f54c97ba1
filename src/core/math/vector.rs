use nalgebra::{Point3, Vector3, Vector4};
use std::fmt;

/// Tolerance used for "is this float zero" checks across the pipeline.
pub const EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// A direction was requested from a vector with (almost) no length.
    ZeroLengthVector,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::ZeroLengthVector => write!(f, "cannot normalize a zero-length vector"),
        }
    }
}

impl std::error::Error for MathError {}

#[inline]
pub fn is_normalized(v: &Vector3<f32>) -> bool {
    (v.norm_squared() - 1.0).abs() < EPSILON
}

/// Returns the unit vector pointing along `v`.
///
/// Vectors that are already unit length are returned untouched so repeated
/// normalization in the lighting loop does not drift.
pub fn try_normalize(v: &Vector3<f32>) -> Result<Vector3<f32>, MathError> {
    if is_normalized(v) {
        return Ok(*v);
    }
    let length = v.norm();
    if length < EPSILON {
        return Err(MathError::ZeroLengthVector);
    }
    Ok(v * (1.0 / length))
}

/// Homogeneous point: w = 1, translatable by a 4x4 matrix.
#[inline]
pub fn point_to_homogeneous(p: &Point3<f32>) -> Vector4<f32> {
    Vector4::new(p.x, p.y, p.z, 1.0)
}

/// Divides x, y, z by w. A w of (almost) zero is a direction and is returned as is.
#[inline]
pub fn from_homogeneous(v: &Vector4<f32>) -> Point3<f32> {
    if v.w.abs() > EPSILON {
        let inv_w = 1.0 / v.w;
        Point3::new(v.x * inv_w, v.y * inv_w, v.z * inv_w)
    } else {
        Point3::new(v.x, v.y, v.z)
    }
}
