use clap::Parser;
use log::{error, info, warn};
use scanline::app;
use scanline::io::config::Config;
use std::path::Path;

/// TOML-driven software rasterizer.
#[derive(Parser, Debug)]
#[command(name = "scanline")]
#[command(about = "Renders a TOML scene file to PNG with a software 3D pipeline")]
struct Cli {
    /// Scene file (TOML). Falls back to the built-in scene when missing.
    #[arg(short, long, value_name = "FILE", default_value = "scene.toml")]
    config: String,

    /// Overrides `render.output`; `{frame}` is replaced by the frame number.
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Overrides `render.frames`.
    #[arg(short, long, value_name = "N")]
    frames: Option<usize>,

    /// Writes the built-in scene as TOML to FILE and exits.
    #[arg(long, value_name = "FILE")]
    example_config: Option<String>,
}

fn load_config(path: &str) -> Result<Config, String> {
    if Path::new(path).exists() {
        info!("Loading config: {}", path);
        Config::load(path)
    } else {
        warn!("Config file '{}' not found. Using the built-in scene.", path);
        Ok(Config::default())
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.example_config {
        Config::default().save(path).inspect_err(|e| error!("{}", e))?;
        info!("Wrote example config to '{}'", path);
        return Ok(());
    }

    let mut config = load_config(&cli.config).inspect_err(|e| error!("{}", e))?;
    if let Some(output) = cli.output {
        config.render.output = output;
    }
    if let Some(frames) = cli.frames {
        config.render.frames = frames;
    }

    app::run(&config).inspect_err(|e| error!("Render failed: {}", e))
}
