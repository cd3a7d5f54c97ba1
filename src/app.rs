use crate::io::config::Config;
use crate::io::image::{frame_path, save_color_buffer};
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::{build_scene, render_settings_from_config};
use crate::ui::input::CameraController;
use log::{debug, info};
use nalgebra::Vector3;
use std::time::Instant;

/// Renders `config.render.frames` frames offline.
///
/// Each frame after the first replays the configured camera motion before the
/// pipeline runs. With several frames and a `{frame}` placeholder in the output
/// path every frame is saved; otherwise only the last one.
pub fn run(config: &Config) -> Result<(), String> {
    let width = config.render.width;
    let height = config.render.height;
    let frames = config.render.frames.max(1);
    let save_every_frame = frames > 1 && config.render.output.contains("{frame}");

    info!("Rendering {} frame(s) at {}x{}...", frames, width, height);

    let settings = render_settings_from_config(config)?;
    let mut scene = build_scene(config)?;
    let mut renderer = Renderer::new(width, height, settings);
    let controller = CameraController::new(
        Vector3::from(config.camera.velocity),
        Vector3::from(config.camera.angular_velocity),
        config.camera.zoom_speed,
    );

    let start_time = Instant::now();
    for frame in 0..frames {
        if frame > 0 {
            let input = controller.update(config.render.frame_time);
            if !input.is_idle() {
                scene.camera.process_input(&input, &scene.trig);
            }
        }

        let stats = renderer.render_frame(&mut scene);
        debug!(
            "Frame {}: {} object(s) culled, {} face(s) hidden, {} triangle(s) drawn",
            frame,
            stats.geometry.objects_culled,
            stats.geometry.faces_hidden,
            stats.raster.triangles_drawn
        );

        if save_every_frame {
            save_color_buffer(
                renderer.color_buffer(),
                width,
                height,
                &frame_path(&config.render.output, frame),
            )?;
        }
    }

    let stats = &renderer.stats;
    info!(
        "Render completed in {:.2?}: {} triangle(s) drawn, {} skipped, {} pixel(s)",
        start_time.elapsed(),
        stats.raster.triangles_drawn,
        stats.raster.triangles_skipped,
        stats.raster.pixels_drawn
    );

    if !save_every_frame {
        let output = frame_path(&config.render.output, frames - 1);
        save_color_buffer(renderer.color_buffer(), width, height, &output)?;
    }
    info!("Done.");
    Ok(())
}
