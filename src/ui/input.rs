use nalgebra::Vector3;

/// Per-frame camera deltas, already resolved from whatever device produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInput {
    /// Along the camera's (right, up, forward) axes.
    pub movement: Vector3<f32>,
    /// Degrees around X, Y, Z.
    pub rotation: Vector3<f32>,
    /// Field-of-view change in degrees.
    pub zoom: f32,
}

impl Default for CameraInput {
    fn default() -> Self {
        Self {
            movement: Vector3::zeros(),
            rotation: Vector3::zeros(),
            zoom: 0.0,
        }
    }
}

impl CameraInput {
    pub fn is_idle(&self) -> bool {
        self.movement == Vector3::zeros() && self.rotation == Vector3::zeros() && self.zoom == 0.0
    }
}

/// Replays constant velocities as per-frame input, standing in for a keyboard
/// when rendering offline.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Units per second along the camera axes.
    pub velocity: Vector3<f32>,
    /// Degrees per second.
    pub angular_velocity: Vector3<f32>,
    /// Degrees of FOV per second.
    pub zoom_speed: f32,
}

impl CameraController {
    pub fn new(velocity: Vector3<f32>, angular_velocity: Vector3<f32>, zoom_speed: f32) -> Self {
        Self {
            velocity,
            angular_velocity,
            zoom_speed,
        }
    }

    /// Input for a frame lasting `dt` seconds.
    pub fn update(&self, dt: f32) -> CameraInput {
        CameraInput {
            movement: self.velocity * dt,
            rotation: self.angular_velocity * dt,
            zoom: self.zoom_speed * dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_scales_by_frame_time() {
        let ctl = CameraController::new(Vector3::new(0.0, 0.0, 4.0), Vector3::new(0.0, 90.0, 0.0), 0.0);
        let input = ctl.update(0.5);
        assert_eq!(input.movement, Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(input.rotation, Vector3::new(0.0, 45.0, 0.0));
        assert!(!input.is_idle());
        assert!(CameraInput::default().is_idle());
    }
}
