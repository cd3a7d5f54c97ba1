use crate::core::math::trig::TrigTable;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the matrices the pipeline needs.
///
/// Column vectors, left-handed space: +x right, +y up, +z into the screen.
/// Rotation angles are degrees and are looked up in a [`TrigTable`].
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Rotation around the X axis. Positive angles turn +z toward -y.
    pub fn rotation_x(trig: &TrigTable, degrees: f32) -> Matrix4<f32> {
        let (s, c) = trig.sin_cos(degrees);
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y axis. Positive angles turn +z toward +x.
    pub fn rotation_y(trig: &TrigTable, degrees: f32) -> Matrix4<f32> {
        let (s, c) = trig.sin_cos(degrees);
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Z axis.
    pub fn rotation_z(trig: &TrigTable, degrees: f32) -> Matrix4<f32> {
        let (s, c) = trig.sin_cos(degrees);
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// X first, then Y, then Z.
    pub fn rotation_xyz(trig: &TrigTable, degrees: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_z(trig, degrees.z)
            * Self::rotation_y(trig, degrees.y)
            * Self::rotation_x(trig, degrees.x)
    }

    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// World to camera for an Euler camera: move the camera to the origin, then
    /// undo its rotation with the negated angles in reverse order (Z, Y, X).
    pub fn euler_camera(
        trig: &TrigTable,
        position: &Point3<f32>,
        degrees: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Self::rotation_x(trig, -degrees.x)
            * Self::rotation_y(trig, -degrees.y)
            * Self::rotation_z(trig, -degrees.z)
            * Self::translation(&-position.coords)
    }

    /// World to camera for a UVN camera: translation then the transposed basis.
    pub fn uvn_camera(
        position: &Point3<f32>,
        u: &Vector3<f32>,
        v: &Vector3<f32>,
        n: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let basis = Matrix4::new(
            u.x, u.y, u.z, 0.0,
            v.x, v.y, v.z, 0.0,
            n.x, n.y, n.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        basis * Self::translation(&-position.coords)
    }
}

/// Recovers the (x, y, z) angles in degrees of a rotation built X -> Y -> Z,
/// i.e. `R = Rz * Ry * Rx`.
///
/// At gimbal lock (y = +-90 degrees) x and z rotate about the same axis; z is
/// reported as 0 and the whole turn is folded into x.
pub fn rotation_matrix_to_euler(m: &Matrix3<f32>) -> Vector3<f32> {
    let sy = -m[(2, 0)];
    let (x, y, z) = if sy >= 1.0 - 1e-6 {
        (m[(0, 1)].atan2(m[(0, 2)]), std::f32::consts::FRAC_PI_2, 0.0)
    } else if sy <= -1.0 + 1e-6 {
        ((-m[(0, 1)]).atan2(-m[(0, 2)]), -std::f32::consts::FRAC_PI_2, 0.0)
    } else {
        (
            m[(2, 1)].atan2(m[(2, 2)]),
            sy.asin(),
            m[(1, 0)].atan2(m[(0, 0)]),
        )
    };
    Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

//=================================
// Projection Helpers
//=================================

/// Width of the projection plane at distance `dov` for a horizontal field of view.
#[inline]
pub fn width_of_view(fov_degrees: f32, dov: f32) -> f32 {
    2.0 * dov * (fov_degrees.to_radians() * 0.5).tan()
}

/// Camera space -> projection plane. z is kept for depth.
///
/// Callers guarantee `p.z > 0` (the near clip runs first).
#[inline]
pub fn camera_to_perspective(p: &Point3<f32>, dov: f32, aspect: f32) -> Point3<f32> {
    let k = dov / p.z;
    Point3::new(p.x * k, p.y * k * aspect, p.z)
}

/// Projection plane -> pixels. Top-left origin, y grows downward, z kept.
#[inline]
pub fn perspective_to_screen(p: &Point3<f32>, wov: f32, width: f32, height: f32) -> Point3<f32> {
    let half = wov * 0.5;
    Point3::new(
        (p.x + half) * (width / wov),
        (half - p.y) * (height / wov),
        p.z,
    )
}
