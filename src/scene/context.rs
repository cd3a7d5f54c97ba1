use crate::core::math::trig::TrigTable;
use crate::scene::camera::Camera;
use crate::scene::light::Lights;
use crate::scene::object::Object;

/// Holds all scene resources required for rendering a frame.
pub struct SceneContext {
    /// Built once, read by every rotating stage.
    pub trig: TrigTable,
    pub camera: Camera,
    pub lights: Lights,
    pub objects: Vec<Object>,
}

impl SceneContext {
    pub fn new(trig: TrigTable, camera: Camera, lights: Lights, objects: Vec<Object>) -> Self {
        Self {
            trig,
            camera,
            lights,
            objects,
        }
    }

    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }
}
