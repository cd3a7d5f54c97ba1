use crate::core::math::matrix::inverse4;
use crate::core::math::transform::{TransformFactory, rotation_matrix_to_euler, width_of_view};
use crate::core::math::trig::TrigTable;
use crate::core::math::vector::{MathError, try_normalize};
use crate::ui::input::CameraInput;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

const MIN_FOV: f32 = 10.0;
const MAX_FOV: f32 = 150.0;

/// How the camera stores its orientation.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraMode {
    /// Rotation angles in degrees, applied X, then Y, then Z.
    Euler { angles: Vector3<f32> },
    /// Explicit basis, rebuilt from `target` by [`Camera::look_at`].
    Uvn {
        u: Vector3<f32>,
        v: Vector3<f32>,
        n: Vector3<f32>,
        target: Point3<f32>,
        /// Aim in degrees, accumulated across rotation input so that deltas
        /// smaller than a table step still add up.
        heading: Vector3<f32>,
    },
}

/// Which [`CameraMode`] variant to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    Euler,
    Uvn,
}

/// Pinhole camera looking down +z of its own frame.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub mode: CameraMode,
    /// World up used to rebuild the UVN basis.
    pub up: Vector3<f32>,

    // --- Projection ---
    /// Horizontal field of view, degrees.
    pub fov: f32,
    /// Distance to the projection plane.
    pub dov: f32,
    pub near: f32,
    pub far: f32,
    pub width: usize,
    pub height: usize,

    // --- Derived ---
    /// Width of the projection plane (same units as `dov`).
    wov: f32,
    aspect: f32,
}

impl Camera {
    pub fn new_euler(
        position: Point3<f32>,
        angles: Vector3<f32>,
        fov: f32,
        dov: f32,
        near: f32,
        far: f32,
        width: usize,
        height: usize,
    ) -> Self {
        let mut cam = Self {
            position,
            mode: CameraMode::Euler { angles },
            up: Vector3::y(),
            fov,
            dov,
            near,
            far,
            width,
            height,
            wov: 0.0,
            aspect: 1.0,
        };
        cam.update_projection();
        cam
    }

    /// UVN camera aimed at `target`; fails when target and position coincide
    /// or the view runs parallel to `up`.
    pub fn new_uvn(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov: f32,
        dov: f32,
        near: f32,
        far: f32,
        width: usize,
        height: usize,
    ) -> Result<Self, MathError> {
        let mut cam = Self::new_euler(position, Vector3::zeros(), fov, dov, near, far, width, height);
        cam.up = up;
        cam.mode = CameraMode::Uvn {
            u: Vector3::x(),
            v: Vector3::y(),
            n: Vector3::z(),
            target,
            heading: Vector3::zeros(),
        };
        cam.look_at(&target)?;
        Ok(cam)
    }

    /// Recomputes the projection-plane extents after fov, dov or viewport changes.
    pub fn update_projection(&mut self) {
        self.fov = self.fov.clamp(MIN_FOV, MAX_FOV);
        self.wov = width_of_view(self.fov, self.dov);
        self.aspect = if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        };
    }

    pub fn wov(&self) -> f32 {
        self.wov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn kind(&self) -> CameraKind {
        match self.mode {
            CameraMode::Euler { .. } => CameraKind::Euler,
            CameraMode::Uvn { .. } => CameraKind::Uvn,
        }
    }

    /// Camera axes in world space: (right, up, forward).
    pub fn basis(&self, trig: &TrigTable) -> [Vector3<f32>; 3] {
        match &self.mode {
            CameraMode::Euler { angles } => {
                let r = TransformFactory::rotation_xyz(trig, angles);
                [
                    r.fixed_view::<3, 1>(0, 0).into(),
                    r.fixed_view::<3, 1>(0, 1).into(),
                    r.fixed_view::<3, 1>(0, 2).into(),
                ]
            }
            CameraMode::Uvn { u, v, n, .. } => [*u, *v, *n],
        }
    }

    /// Euler angles equivalent to the current orientation.
    pub fn angles(&self, trig: &TrigTable) -> Vector3<f32> {
        match &self.mode {
            CameraMode::Euler { angles } => *angles,
            CameraMode::Uvn { .. } => {
                let [u, v, n] = self.basis(trig);
                rotation_matrix_to_euler(&Matrix3::from_columns(&[u, v, n]))
            }
        }
    }

    pub fn forward(&self, trig: &TrigTable) -> Vector3<f32> {
        self.basis(trig)[2]
    }

    /// World -> camera matrix for the current frame.
    pub fn world_to_camera(&self, trig: &TrigTable) -> Matrix4<f32> {
        match &self.mode {
            CameraMode::Euler { angles } => {
                TransformFactory::euler_camera(trig, &self.position, angles)
            }
            CameraMode::Uvn { u, v, n, .. } => TransformFactory::uvn_camera(&self.position, u, v, n),
        }
    }

    /// Camera -> world, `None` if the view matrix has collapsed.
    pub fn camera_to_world(&self, trig: &TrigTable) -> Option<Matrix4<f32>> {
        inverse4(&self.world_to_camera(trig))
    }

    /// Turns the camera toward `target`.
    ///
    /// UVN rebuilds its basis: N = target - position, V = up with its N part
    /// removed, U = V x N. Euler derives yaw and pitch and keeps roll.
    pub fn look_at(&mut self, target: &Point3<f32>) -> Result<(), MathError> {
        let n = self.aim_at(target)?;
        let pitch = (-n.y).atan2((n.x * n.x + n.z * n.z).sqrt()).to_degrees();
        let yaw = n.x.atan2(n.z).to_degrees();
        match &mut self.mode {
            CameraMode::Uvn { heading, .. } => *heading = Vector3::new(pitch, yaw, 0.0),
            CameraMode::Euler { angles } => {
                angles.x = pitch;
                angles.y = yaw;
            }
        }
        Ok(())
    }

    /// Rebuilds the UVN basis toward `target` without touching the heading.
    fn aim_at(&mut self, target: &Point3<f32>) -> Result<Vector3<f32>, MathError> {
        let n = try_normalize(&(target - self.position))?;
        if let CameraMode::Uvn {
            u,
            v,
            n: n_axis,
            target: t,
            ..
        } = &mut self.mode
        {
            let v_new = try_normalize(&(self.up - n * self.up.dot(&n)))?;
            *u = v_new.cross(&n);
            *v = v_new;
            *n_axis = n;
            *t = *target;
        }
        Ok(n)
    }

    /// Applies one frame of already-resolved input deltas.
    ///
    /// Movement is along the camera's own axes; rotation is in degrees; zoom
    /// changes the field of view.
    pub fn process_input(&mut self, input: &CameraInput, trig: &TrigTable) {
        let [right, up, forward] = self.basis(trig);
        let delta = right * input.movement.x + up * input.movement.y + forward * input.movement.z;
        self.position += delta;

        match &mut self.mode {
            CameraMode::Euler { angles } => {
                *angles += input.rotation;
            }
            CameraMode::Uvn {
                target, heading, ..
            } => {
                *target += delta;
                if input.rotation != Vector3::zeros() {
                    *heading += input.rotation;
                    let r = TransformFactory::rotation_xyz(trig, heading);
                    let dir: Vector3<f32> = r.fixed_view::<3, 1>(0, 2).into();
                    *target = self.position + dir;
                }
                let target = *target;
                // A degenerate aim keeps the previous basis.
                let _ = self.aim_at(&target);
            }
        }

        if input.zoom != 0.0 {
            self.fov += input.zoom;
            self.update_projection();
        }
    }

    /// Places an Euler camera relative to a moving object.
    ///
    /// `position_offset` is expressed in the object's frame (e.g. behind and
    /// above), `direction_offset` is added to the object's angles.
    pub fn follow(
        &mut self,
        object_position: &Point3<f32>,
        object_angles: &Vector3<f32>,
        position_offset: &Vector3<f32>,
        direction_offset: &Vector3<f32>,
        trig: &TrigTable,
    ) {
        let r = TransformFactory::rotation_xyz(trig, object_angles);
        let offset: Vector3<f32> = r.fixed_view::<3, 3>(0, 0) * position_offset;
        self.position = object_position + offset;
        self.mode = CameraMode::Euler {
            angles: object_angles + direction_offset,
        };
    }

    /// Switches representation, keeping position. The new orientation is the
    /// closest equivalent of the old one.
    pub fn set_mode(&mut self, kind: CameraKind, trig: &TrigTable) {
        if kind == self.kind() {
            return;
        }
        match kind {
            CameraKind::Euler => {
                let angles = self.angles(trig);
                self.mode = CameraMode::Euler { angles };
            }
            CameraKind::Uvn => {
                let heading = self.angles(trig);
                let [u, v, n] = self.basis(trig);
                self.mode = CameraMode::Uvn {
                    u,
                    v,
                    n,
                    target: self.position + n,
                    heading,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::matrix::transform_point;

    const EPS: f32 = 1e-3;

    fn euler_cam(position: Point3<f32>, angles: Vector3<f32>) -> Camera {
        Camera::new_euler(position, angles, 90.0, 1.0, 1.0, 100.0, 640, 480)
    }

    #[test]
    fn world_camera_world_round_trip() {
        let trig = TrigTable::default();
        let cams = [
            euler_cam(Point3::new(1.0, 2.0, 3.0), Vector3::new(10.0, 45.0, 5.0)),
            Camera::new_uvn(
                Point3::new(-4.0, 1.0, 0.5),
                Point3::new(3.0, 0.0, 8.0),
                Vector3::y(),
                90.0,
                1.0,
                1.0,
                100.0,
                640,
                480,
            )
            .unwrap(),
        ];
        let p = Point3::new(7.0, -3.0, 12.0);
        for cam in cams {
            let to_cam = cam.world_to_camera(&trig);
            let to_world = cam.camera_to_world(&trig).unwrap();
            let back = transform_point(&to_world, &transform_point(&to_cam, &p));
            assert!((back - p).norm() < EPS, "{:?} -> {:?}", p, back);
        }
    }

    #[test]
    fn uvn_basis_is_orthonormal_and_looks_at_target() {
        let trig = TrigTable::default();
        let cam = Camera::new_uvn(
            Point3::origin(),
            Point3::new(0.0, 0.0, 10.0),
            Vector3::y(),
            90.0,
            1.0,
            1.0,
            100.0,
            100,
            100,
        )
        .unwrap();
        let [u, v, n] = cam.basis(&trig);
        assert!((u - Vector3::x()).norm() < EPS);
        assert!((v - Vector3::y()).norm() < EPS);
        assert!((n - Vector3::z()).norm() < EPS);

        let p = transform_point(&cam.world_to_camera(&trig), &Point3::new(0.0, 0.0, 10.0));
        assert!((p - Point3::new(0.0, 0.0, 10.0)).norm() < EPS);
    }

    #[test]
    fn look_at_degenerate_target_fails() {
        let mut cam = euler_cam(Point3::origin(), Vector3::zeros());
        assert_eq!(
            cam.look_at(&Point3::origin()),
            Err(MathError::ZeroLengthVector)
        );
    }

    #[test]
    fn euler_look_at_points_forward_axis_at_target() {
        let trig = TrigTable::default();
        let mut cam = euler_cam(Point3::origin(), Vector3::zeros());
        cam.look_at(&Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((cam.forward(&trig) - Vector3::x()).norm() < EPS);
    }

    #[test]
    fn switching_modes_keeps_position_and_view() {
        let trig = TrigTable::default();
        let mut cam = euler_cam(Point3::new(1.0, 1.0, 1.0), Vector3::new(0.0, 30.0, 0.0));
        let before = cam.forward(&trig);

        cam.set_mode(CameraKind::Uvn, &trig);
        assert_eq!(cam.kind(), CameraKind::Uvn);
        assert_eq!(cam.position, Point3::new(1.0, 1.0, 1.0));
        assert!((cam.forward(&trig) - before).norm() < EPS);

        cam.set_mode(CameraKind::Euler, &trig);
        assert_eq!(cam.position, Point3::new(1.0, 1.0, 1.0));
        assert!((cam.angles(&trig) - Vector3::new(0.0, 30.0, 0.0)).norm() < 0.1);
    }

    #[test]
    fn input_moves_along_view_and_zooms() {
        let trig = TrigTable::default();
        let mut cam = euler_cam(Point3::origin(), Vector3::new(0.0, 90.0, 0.0));
        let input = CameraInput {
            movement: Vector3::new(0.0, 0.0, 2.0),
            rotation: Vector3::new(0.0, 5.0, 0.0),
            zoom: -30.0,
        };
        cam.process_input(&input, &trig);
        assert!((cam.position - Point3::new(2.0, 0.0, 0.0)).norm() < EPS);
        assert_eq!(cam.angles(&trig), Vector3::new(0.0, 95.0, 0.0));
        assert_eq!(cam.fov, 60.0);
        assert!((cam.wov() - width_of_view(60.0, 1.0)).abs() < EPS);
    }

    #[test]
    fn uvn_turn_adds_up_small_deltas() {
        let trig = TrigTable::default();
        let mut cam = Camera::new_uvn(
            Point3::origin(),
            Point3::new(0.0, 0.0, 10.0),
            Vector3::y(),
            90.0,
            1.0,
            1.0,
            100.0,
            100,
            100,
        )
        .unwrap();
        // 20 degrees per second at 50 frames per second.
        let input = CameraInput {
            movement: Vector3::zeros(),
            rotation: Vector3::new(0.0, 20.0, 0.0) * 0.02,
            zoom: 0.0,
        };
        for _ in 0..50 {
            cam.process_input(&input, &trig);
        }
        let expected = Vector3::new(20.0_f32.to_radians().sin(), 0.0, 20.0_f32.to_radians().cos());
        assert!((cam.forward(&trig) - expected).norm() < EPS, "{:?}", cam.forward(&trig));
        assert!((cam.angles(&trig).y - 20.0).abs() < 0.1);
    }

    #[test]
    fn follow_places_camera_behind_object() {
        let trig = TrigTable::default();
        let mut cam = euler_cam(Point3::origin(), Vector3::zeros());
        cam.follow(
            &Point3::new(0.0, 0.0, 20.0),
            &Vector3::new(0.0, 90.0, 0.0),
            &Vector3::new(0.0, 2.0, -6.0),
            &Vector3::new(10.0, 0.0, 0.0),
            &trig,
        );
        // Object faces +x, so "behind" is -x.
        assert!((cam.position - Point3::new(-6.0, 2.0, 20.0)).norm() < EPS);
        assert_eq!(cam.angles(&trig), Vector3::new(10.0, 90.0, 0.0));
    }
}
