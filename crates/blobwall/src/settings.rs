use std::path::Path;

use renderer::{Antialiasing, Rgb};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::cli::parse_antialias;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional TOML settings file; every field the CLI can also set, with the
/// CLI taking precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub window: Option<WindowSettings>,
    #[serde(default)]
    pub fps: Option<f32>,
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<Antialiasing>,
    #[serde(default, deserialize_with = "deserialize_color_opt")]
    pub front_color: Option<Rgb>,
    #[serde(default, deserialize_with = "deserialize_color_opt")]
    pub background_color: Option<Rgb>,
    #[serde(default)]
    pub reduced_motion: Option<bool>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
}

pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

fn deserialize_color_opt<'de, D>(deserializer: D) -> Result<Option<Rgb>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|raw| Rgb::parse(&raw).map_err(|err| de::Error::custom(err.to_string())))
        .transpose()
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<Antialiasing>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Count(u32),
        Mode(String),
    }

    let value: Option<Repr> = Option::deserialize(deserializer)?;
    value
        .map(|repr| {
            let raw = match repr {
                Repr::Count(count) => count.to_string(),
                Repr::Mode(mode) => mode,
            };
            parse_antialias(&raw).map_err(de::Error::custom)
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_settings_file_round_trips() {
        let settings: Settings = toml::from_str(
            r##"
            fps = 30.0
            antialias = 4
            front_color = "#336699"
            background_color = "0.1, 0.2, 0.3"
            reduced_motion = true

            [window]
            width = 640
            height = 360
            "##,
        )
        .unwrap();

        let window = settings.window.unwrap();
        assert_eq!((window.width, window.height), (640, 360));
        assert_eq!(settings.fps, Some(30.0));
        assert_eq!(settings.antialias, Some(Antialiasing::Samples(4)));
        assert_eq!(settings.front_color, Some(Rgb::parse("#336699").unwrap()));
        assert_eq!(
            settings.background_color,
            Some(Rgb::new(0.1, 0.2, 0.3))
        );
        assert_eq!(settings.reduced_motion, Some(true));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.window.is_none());
        assert!(settings.fps.is_none());
        assert!(settings.antialias.is_none());
        assert!(settings.front_color.is_none());
        assert!(settings.reduced_motion.is_none());
    }

    #[test]
    fn antialias_accepts_mode_strings() {
        let settings: Settings = toml::from_str("antialias = \"off\"").unwrap();
        assert_eq!(settings.antialias, Some(Antialiasing::Off));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Settings>("colour = \"#ffffff\"").is_err());
    }

    #[test]
    fn malformed_colors_surface_as_parse_errors() {
        assert!(toml::from_str::<Settings>("front_color = \"#12\"").is_err());
    }
}
