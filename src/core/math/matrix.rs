use crate::core::math::vector::{EPSILON, from_homogeneous, point_to_homogeneous};
use nalgebra::{Matrix2, Matrix3, Matrix4, Point3, Vector3};

//=================================
// Determinants (closed form)
//=================================

#[inline]
pub fn determinant2(m: &Matrix2<f32>) -> f32 {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

#[inline]
pub fn determinant3(m: &Matrix3<f32>) -> f32 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(2, 1)] * m[(1, 2)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(2, 0)] * m[(1, 2)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(2, 0)] * m[(1, 1)])
}

//=================================
// Inverses
//=================================
//
// All inverses report a singular matrix with `None` instead of an error so that
// hot-path callers (camera, projection) decide locally what to skip.

pub fn inverse2(m: &Matrix2<f32>) -> Option<Matrix2<f32>> {
    let det = determinant2(m);
    if det.abs() < EPSILON {
        return None;
    }
    let inv = 1.0 / det;
    Some(Matrix2::new(
        m[(1, 1)] * inv,
        -m[(0, 1)] * inv,
        -m[(1, 0)] * inv,
        m[(0, 0)] * inv,
    ))
}

#[rustfmt::skip]
pub fn inverse3(m: &Matrix3<f32>) -> Option<Matrix3<f32>> {
    let det = determinant3(m);
    if det.abs() < EPSILON {
        return None;
    }
    let inv = 1.0 / det;
    Some(Matrix3::new(
        (m[(1, 1)] * m[(2, 2)] - m[(2, 1)] * m[(1, 2)]) * inv,
        (m[(0, 1)] * m[(2, 2)] - m[(2, 1)] * m[(0, 2)]) * -inv,
        (m[(0, 1)] * m[(1, 2)] - m[(1, 1)] * m[(0, 2)]) * inv,

        (m[(1, 0)] * m[(2, 2)] - m[(2, 0)] * m[(1, 2)]) * -inv,
        (m[(0, 0)] * m[(2, 2)] - m[(2, 0)] * m[(0, 2)]) * inv,
        (m[(0, 0)] * m[(1, 2)] - m[(1, 0)] * m[(0, 2)]) * -inv,

        (m[(1, 0)] * m[(2, 1)] - m[(2, 0)] * m[(1, 1)]) * inv,
        (m[(0, 0)] * m[(2, 1)] - m[(2, 0)] * m[(0, 1)]) * -inv,
        (m[(0, 0)] * m[(1, 1)] - m[(1, 0)] * m[(0, 1)]) * inv,
    ))
}

/// General 4x4 inverse. The determinant is checked with the same tolerance
/// as the closed-form versions before delegating to nalgebra.
pub fn inverse4(m: &Matrix4<f32>) -> Option<Matrix4<f32>> {
    if m.determinant().abs() < EPSILON {
        return None;
    }
    m.try_inverse()
}

//=================================
// Application
//=================================

/// Transforms a point (w = 1) and divides back to 3D.
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    from_homogeneous(&(m * point_to_homogeneous(p)))
}

/// Transforms a direction (w = 0); translation is ignored.
#[inline]
pub fn transform_direction(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    m.fixed_view::<3, 3>(0, 0) * v
}
