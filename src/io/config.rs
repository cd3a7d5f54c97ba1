use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![
                LightConfig {
                    r#type: "ambient".to_string(),
                    color: [60.0, 60.0, 70.0],
                    intensity: 1.0,
                    direction: None,
                    position: None,
                    attenuation: None,
                },
                LightConfig {
                    r#type: "infinite".to_string(),
                    color: [255.0, 240.0, 220.0],
                    intensity: 0.8,
                    direction: Some([-1.0, -2.0, 1.0]),
                    position: None,
                    attenuation: None,
                },
                LightConfig {
                    r#type: "point".to_string(),
                    color: [255.0, 180.0, 120.0],
                    intensity: 1.0,
                    direction: None,
                    position: Some([-3.0, 3.0, -3.0]),
                    attenuation: Some([1.0, 0.05, 0.01]),
                },
            ],
            objects: vec![
                ObjectConfig {
                    mesh: "plane".to_string(),
                    size: 20.0,
                    position: [0.0, -1.0, 0.0],
                    color: [120.0, 130.0, 120.0],
                    ..ObjectConfig::default()
                },
                ObjectConfig {
                    mesh: "cube".to_string(),
                    size: 2.0,
                    rotation: [0.0, 30.0, 0.0],
                    spin: [0.0, 2.0, 0.0],
                    shading: "gouraud".to_string(),
                    color: [200.0, 90.0, 60.0],
                    ..ObjectConfig::default()
                },
                ObjectConfig {
                    mesh: "cube".to_string(),
                    size: 0.6,
                    position: [0.0, -0.7, 0.0],
                    color: [80.0, 140.0, 220.0],
                    instances: 12,
                    spread: 7.0,
                    seed: 7,
                    ..ObjectConfig::default()
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Seconds per frame; camera velocities and spins are scaled by it.
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    #[serde(default = "default_background")]
    pub background: [f32; 3],

    // --- Rasterizer ---
    #[serde(default = "default_true")]
    pub zbuffer: bool,
    #[serde(default = "default_false")]
    pub wireframe: bool,
    /// Anti-aliased wireframe edges.
    #[serde(default = "default_false")]
    pub smooth_lines: bool,
    #[serde(default = "default_true")]
    pub bifiltering: bool,
    #[serde(default = "default_true")]
    pub mipmapping: bool,
    #[serde(default = "default_mipmap_distance")]
    pub mipmap_distance: f32,

    // --- Pipeline ---
    /// Angle table steps per degree.
    #[serde(default = "default_trig_resolution")]
    pub trig_resolution: usize,
    #[serde(default = "default_true")]
    pub sort_triangles: bool,
    /// "world" lights objects before the camera transform, "camera" lights
    /// the triangle list with camera-space lights.
    #[serde(default = "default_light_space")]
    pub light_space: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            frame_time: default_frame_time(),
            background: default_background(),
            zbuffer: true,
            wireframe: false,
            smooth_lines: false,
            bifiltering: true,
            mipmapping: true,
            mipmap_distance: default_mipmap_distance(),
            trig_resolution: default_trig_resolution(),
            sort_triangles: true,
            light_space: default_light_space(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_frame_time() -> f32 {
    1.0
}
fn default_background() -> [f32; 3] {
    [20.0, 20.0, 30.0]
}
fn default_mipmap_distance() -> f32 {
    10.0
}
fn default_trig_resolution() -> usize {
    1
}
fn default_light_space() -> String {
    "world".to_string()
}
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_mode")]
    pub mode: String, // "euler", "uvn"
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Euler angles in degrees, X then Y then Z.
    #[serde(default)]
    pub direction: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_dov")]
    pub dov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,

    // --- Motion ---
    /// Units per second along (right, up, forward).
    #[serde(default)]
    pub velocity: [f32; 3],
    /// Degrees per second.
    #[serde(default)]
    pub angular_velocity: [f32; 3],
    /// FOV degrees per second.
    #[serde(default)]
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: default_camera_mode(),
            position: default_camera_position(),
            direction: [0.0, 0.0, 0.0],
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            dov: default_dov(),
            near: default_near(),
            far: default_far(),
            velocity: [0.0, 0.0, 0.0],
            angular_velocity: [0.0, 0.0, 0.0],
            zoom_speed: 0.0,
        }
    }
}

fn default_camera_mode() -> String {
    "uvn".to_string()
}
fn default_camera_position() -> [f32; 3] {
    [4.0, 4.0, -8.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    90.0
}
fn default_dov() -> f32 {
    1.0
}
fn default_near() -> f32 {
    0.5
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LightConfig {
    pub r#type: String, // "ambient", "infinite", "point"
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<[f32; 3]>,
}

fn default_light_color() -> [f32; 3] {
    [255.0, 255.0, 255.0]
}
fn default_intensity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObjectConfig {
    /// "cube", "plane", "triangle" or a path to an .obj file.
    #[serde(default = "default_mesh")]
    pub mesh: String,
    /// Edge length of built-in meshes; OBJ models are fitted to it.
    #[serde(default = "default_size")]
    pub size: f32,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// Degrees per second added to the local rotation.
    #[serde(default)]
    pub spin: [f32; 3],

    // --- Appearance ---
    #[serde(default = "default_shading")]
    pub shading: String, // "const", "flat", "gouraud"
    #[serde(default = "default_object_color")]
    pub color: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default = "default_mip_levels")]
    pub mip_levels: usize,

    // --- Scattering ---
    #[serde(default = "default_instances")]
    pub instances: usize,
    /// Copies land within +-spread of `position` on X and Z.
    #[serde(default)]
    pub spread: f32,
    #[serde(default)]
    pub seed: u64,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            mesh: default_mesh(),
            size: default_size(),
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: default_scale(),
            spin: [0.0, 0.0, 0.0],
            shading: default_shading(),
            color: default_object_color(),
            texture: None,
            mip_levels: default_mip_levels(),
            instances: default_instances(),
            spread: 0.0,
            seed: 0,
        }
    }
}

fn default_mesh() -> String {
    "cube".to_string()
}
fn default_size() -> f32 {
    1.0
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_shading() -> String {
    "flat".to_string()
}
fn default_object_color() -> [f32; 3] {
    [200.0, 200.0, 200.0]
}
fn default_mip_levels() -> usize {
    4
}
fn default_instances() -> usize {
    1
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    /// Writes the configuration as a TOML scene file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))
    }
}
