use crate::core::color::Color;
use crate::core::math::trig::TrigTable;
use crate::core::pipeline::Shading;
use crate::core::rasterizer::RasterSettings;
use crate::io::config::{CameraConfig, Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::objects;
use crate::pipeline::renderer::RenderSettings;
use crate::scene::camera::Camera;
use crate::scene::context::SceneContext;
use crate::scene::light::{Light, Lights};
use crate::scene::mesh::Mesh;
use crate::scene::object::{Coords, Object};
use crate::scene::texture::Texture;
use crate::scene::utils::normalize_and_center_mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Renderer switches from the `[render]` section. Fails on an unknown light space.
pub fn render_settings_from_config(config: &Config) -> Result<RenderSettings, String> {
    let r = &config.render;
    Ok(RenderSettings {
        raster: RasterSettings {
            zbuffer: r.zbuffer,
            wireframe: r.wireframe,
            smooth_lines: r.smooth_lines,
            bifiltering: r.bifiltering,
            mipmapping: r.mipmapping,
            mipmap_distance: r.mipmap_distance,
        },
        background: Color::from_array(r.background),
        sort_triangles: r.sort_triangles,
        light_space: r.light_space.parse()?,
    })
}

pub fn build_camera_from_config(config: &Config) -> Result<Camera, String> {
    let c: &CameraConfig = &config.camera;
    let (width, height) = (config.render.width, config.render.height);
    let position = Point3::from(c.position);

    match c.mode.as_str() {
        "euler" => Ok(Camera::new_euler(
            position,
            Vector3::from(c.direction),
            c.fov,
            c.dov,
            c.near,
            c.far,
            width,
            height,
        )),
        "uvn" => Camera::new_uvn(
            position,
            Point3::from(c.target),
            Vector3::from(c.up),
            c.fov,
            c.dov,
            c.near,
            c.far,
            width,
            height,
        )
        .map_err(|e| format!("Invalid UVN camera: {}", e)),
        other => Err(format!("Unknown camera mode '{}'", other)),
    }
}

/// Light list from the `[[lights]]` tables. Incomplete entries are skipped with a warning.
pub fn build_lights_from_config(config: &Config) -> Lights {
    let mut lights = Lights::default();

    for (i, l) in config.lights.iter().enumerate() {
        let color = Color::from_array(l.color);
        match l.r#type.as_str() {
            "ambient" => lights.push(Light::new_ambient(color, l.intensity)),
            "infinite" | "directional" => match l.direction {
                Some(dir) => {
                    lights.push(Light::new_infinite(Vector3::from(dir), color, l.intensity))
                }
                None => warn!("Light {}: infinite light without direction, skipped", i),
            },
            "point" => match l.position {
                Some(pos) => {
                    let a = l.attenuation.unwrap_or([1.0, 0.0, 0.0]);
                    lights.push(Light::new_point(
                        Point3::from(pos),
                        color,
                        l.intensity,
                        (a[0], a[1], a[2]),
                    ));
                }
                None => warn!("Light {}: point light without position, skipped", i),
            },
            other => warn!("Light {}: unknown type '{}', skipped", i, other),
        }
    }
    lights
}

/// Built-in mesh by name, otherwise an OBJ file fitted to `size`. A missing or
/// broken OBJ falls back to the cube.
fn load_mesh(obj: &ObjectConfig) -> Mesh {
    if let Some(mesh) = Mesh::builtin(&obj.mesh, obj.size) {
        return mesh;
    }
    match load_obj(&obj.mesh) {
        Ok(mut mesh) => {
            let (center, scale) = normalize_and_center_mesh(&mut mesh, obj.size);
            info!("Model normalized. Center: {:?}, Scale: {:.4}", center, scale);
            mesh
        }
        Err(e) => {
            warn!("Failed to load model '{}': {}. Using a cube.", obj.mesh, e);
            Mesh::create_cube(obj.size)
        }
    }
}

fn load_texture(path: &str, mip_levels: usize, mipmapping: bool) -> Option<Arc<Texture>> {
    match Texture::load(path) {
        Ok(mut tex) => {
            if mipmapping {
                tex.generate_mipmaps(mip_levels.max(1));
            }
            Some(Arc::new(tex))
        }
        Err(e) => {
            warn!("{}. Rendering untextured.", e);
            None
        }
    }
}

/// Every object an `[[objects]]` entry expands to: the first copy at
/// `position`, the rest scattered around it with a seeded RNG.
pub fn build_objects(
    obj_config: &ObjectConfig,
    config: &Config,
    trig: &TrigTable,
) -> Result<Vec<Object>, String> {
    let shading: Shading = obj_config.shading.parse()?;
    let color = Color::from_array(obj_config.color);
    let mesh = load_mesh(obj_config);
    let texture = obj_config
        .texture
        .as_deref()
        .and_then(|p| load_texture(p, obj_config.mip_levels, config.render.mipmapping));

    let mut prototype = Object::new(&obj_config.mesh, mesh, color, shading)?;
    prototype.set_coords(Coords::Local);
    objects::scale(&mut prototype, &Vector3::from(obj_config.scale));
    objects::rotate(&mut prototype, trig, &Vector3::from(obj_config.rotation));
    prototype.spin = Vector3::from(obj_config.spin) * config.render.frame_time;
    if let Some(tex) = texture {
        prototype = prototype.with_texture(tex);
    }

    let base = Point3::from(obj_config.position);
    let count = obj_config.instances.max(1);
    let mut rng = StdRng::seed_from_u64(obj_config.seed);
    let spread = obj_config.spread.abs();

    let mut result = Vec::with_capacity(count);
    for i in 0..count {
        let position = if i == 0 {
            base
        } else {
            base + Vector3::new(
                rng.random_range(-spread..=spread),
                0.0,
                rng.random_range(-spread..=spread),
            )
        };
        let mut obj = prototype.clone().at(position);
        if count > 1 {
            obj.name = format!("{}#{}", obj_config.mesh, i);
        }
        result.push(obj);
    }
    Ok(result)
}

/// Builds the whole scene: angle table, camera, lights and objects.
///
/// Asset problems fall back with a warning; bad meshes, shading names and
/// camera setups are errors.
pub fn build_scene(config: &Config) -> Result<SceneContext, String> {
    let trig = TrigTable::new(config.render.trig_resolution.max(1));
    let camera = build_camera_from_config(config)?;
    let lights = build_lights_from_config(config);

    let mut scene_objects = Vec::new();
    for obj_config in &config.objects {
        scene_objects.extend(build_objects(obj_config, config, &trig)?);
    }

    let scene = SceneContext::new(trig, camera, lights, scene_objects);
    info!(
        "Scene built: {} object(s), {} face(s), {} light(s)",
        scene.objects.len(),
        scene.face_count(),
        scene.lights.len()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::lighting::LightSpace;

    #[test]
    fn default_scene_builds() {
        let scene = build_scene(&Config::default()).unwrap();
        // plane + spinning cube + 12 scattered cubes
        assert_eq!(scene.objects.len(), 14);
        assert_eq!(scene.lights.len(), 3);
    }

    #[test]
    fn scattering_is_reproducible() {
        let config = Config::default();
        let trig = TrigTable::default();
        let a = build_objects(&config.objects[2], &config, &trig).unwrap();
        let b = build_objects(&config.objects[2], &config, &trig).unwrap();
        let pa: Vec<_> = a.iter().map(|o| o.world_pos).collect();
        let pb: Vec<_> = b.iter().map(|o| o.world_pos).collect();
        assert_eq!(pa, pb);
        assert!(pa.iter().all(|p| p.x.abs() <= 7.0 && p.z.abs() <= 7.0));
        assert!(pa.iter().all(|p| (p.y + 0.7).abs() < 1e-6));
    }

    #[test]
    fn missing_assets_fall_back() {
        let mut config = Config::default();
        config.objects = vec![ObjectConfig {
            mesh: "no/such/model.obj".to_string(),
            texture: Some("no/such/texture.png".to_string()),
            ..ObjectConfig::default()
        }];
        let scene = build_scene(&config).unwrap();
        assert_eq!(scene.objects[0].faces.len(), 12);
        assert!(scene.objects[0].texture.is_none());
    }

    #[test]
    fn render_section_maps_to_settings() {
        let mut config = Config::default();
        config.render.light_space = "camera".to_string();
        config.render.smooth_lines = true;
        let settings = render_settings_from_config(&config).unwrap();
        assert_eq!(settings.light_space, LightSpace::Camera);
        assert!(settings.raster.smooth_lines);

        config.render.light_space = "tangent".to_string();
        assert!(render_settings_from_config(&config).is_err());
    }

    #[test]
    fn unknown_shading_is_an_error() {
        let mut config = Config::default();
        config.objects[0].shading = "phong".to_string();
        assert!(build_scene(&config).is_err());
    }

    #[test]
    fn incomplete_lights_are_skipped() {
        let mut config = Config::default();
        config.lights[1].direction = None;
        config.lights.push(crate::io::config::LightConfig {
            r#type: "spot".to_string(),
            color: [255.0, 255.0, 255.0],
            intensity: 1.0,
            direction: None,
            position: None,
            attenuation: None,
        });
        assert_eq!(build_lights_from_config(&config).len(), 2);
    }

    #[test]
    fn initial_transform_goes_into_local_coordinates() {
        let config = Config::default();
        let trig = TrigTable::default();
        let plain_cfg = ObjectConfig {
            mesh: "triangle".to_string(),
            ..ObjectConfig::default()
        };
        let scaled_cfg = ObjectConfig {
            scale: [2.0, 2.0, 2.0],
            ..plain_cfg.clone()
        };
        let plain = build_objects(&plain_cfg, &config, &trig).unwrap();
        let scaled = build_objects(&scaled_cfg, &config, &trig).unwrap();
        let a = plain[0].local[1].position;
        let b = scaled[0].local[1].position;
        assert!((b - a * 2.0).norm() < 1e-5);
    }
}
