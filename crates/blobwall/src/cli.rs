use std::path::PathBuf;

use clap::Parser;
use renderer::{Antialiasing, Rgb};

#[derive(Parser, Debug)]
#[command(
    name = "blobwall",
    author,
    version,
    about = "Animated blob shader background",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Highlight color of the blob gradient (`#rrggbb` or `r,g,b`).
    #[arg(long, value_name = "COLOR", value_parser = parse_color)]
    pub front_color: Option<Rgb>,

    /// Background color of the blob gradient (`#rrggbb` or `r,g,b`).
    #[arg(long, value_name = "COLOR", value_parser = parse_color)]
    pub background_color: Option<Rgb>,

    /// Keep the stylized post-processing chain switched off.
    #[arg(long)]
    pub reduced_motion: bool,

    /// Settings file; can also be supplied via the `BLOBWALL_SETTINGS` env var.
    #[arg(long, value_name = "PATH", env = "BLOBWALL_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Resolve the effective configuration, print it as TOML, and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 0 || samples == 1 {
                return Ok(Antialiasing::Off);
            }
            if !samples.is_power_of_two() {
                return Err(format!(
                    "anti-alias sample count {samples} must be a power of two"
                ));
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{value}'; expected WIDTHxHEIGHT"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size '{value}' must be non-zero"));
    }
    Ok((width, height))
}

fn parse_color(value: &str) -> Result<Rgb, String> {
    Rgb::parse(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_width_by_height() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("800X600"), Ok((800, 600)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn antialias_accepts_modes_and_sample_counts() {
        assert_eq!(parse_antialias("auto"), Ok(Antialiasing::Auto));
        assert_eq!(parse_antialias("off"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("1"), Ok(Antialiasing::Off));
        assert_eq!(parse_antialias("4"), Ok(Antialiasing::Samples(4)));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("fast").is_err());
    }

    #[test]
    fn color_flag_reuses_the_renderer_parser() {
        assert_eq!(parse_color("#336699"), Ok(Rgb::parse("#336699").unwrap()));
        assert!(parse_color("nope").is_err());
    }
}
