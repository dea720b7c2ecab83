use anyhow::{Context, Result};
use renderer::{Antialiasing, BlobSettings, Renderer, RendererConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::settings::{self, Settings};

/// Effective configuration after merging CLI flags over the settings file
/// over the built-in defaults. Serialized verbatim by `--print-config`.
#[derive(Debug, Serialize)]
struct ResolvedConfig {
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fps: Option<f32>,
    antialias: String,
    front_color: String,
    background_color: String,
    reduced_motion: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    init_tracing();

    let settings = match &cli.settings {
        Some(path) => settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let defaults = RendererConfig::default();
    let blob_defaults = BlobSettings::default();

    let (width, height) = cli
        .size
        .or_else(|| {
            settings
                .window
                .map(|window| (window.width, window.height))
        })
        .unwrap_or(defaults.window_size);
    let fps = cli.fps.or(settings.fps).filter(|fps| *fps > 0.0);
    let antialias = cli
        .antialias
        .or(settings.antialias)
        .unwrap_or(defaults.antialiasing);
    let front_color = cli
        .front_color
        .or(settings.front_color)
        .unwrap_or(blob_defaults.front_color);
    let background_color = cli
        .background_color
        .or(settings.background_color)
        .unwrap_or(blob_defaults.background_color);
    let reduced_motion = cli.reduced_motion || settings.reduced_motion.unwrap_or(false);

    let resolved = ResolvedConfig {
        width,
        height,
        fps,
        antialias: antialias_label(antialias),
        front_color: front_color.to_hex(),
        background_color: background_color.to_hex(),
        reduced_motion,
    };

    if cli.print_config {
        print!(
            "{}",
            toml::to_string_pretty(&resolved).context("failed to serialize configuration")?
        );
        return Ok(());
    }

    info!(
        width,
        height,
        fps = ?fps,
        antialias = %resolved.antialias,
        front_color = %resolved.front_color,
        background_color = %resolved.background_color,
        reduced_motion,
        "starting blobwall"
    );

    let config = RendererConfig {
        window_size: (width, height),
        fps_cap: fps,
        antialiasing: antialias,
        effects_enabled: !reduced_motion,
        blob: BlobSettings {
            front_color,
            background_color,
            ..BlobSettings::default()
        },
    };

    Renderer::new(config).run()
}

fn antialias_label(antialias: Antialiasing) -> String {
    match antialias {
        Antialiasing::Auto => "auto".to_string(),
        Antialiasing::Off => "off".to_string(),
        Antialiasing::Samples(count) => count.to_string(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
