use anyhow::Result;
use winit::dpi::PhysicalSize;

/// Linear RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` / `rrggbb` hex notation or a `r,g,b` float triple.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            anyhow::bail!("color must not be empty");
        }

        if trimmed.contains(',') {
            let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                anyhow::bail!("expected three comma-separated components in '{trimmed}'");
            }
            let mut components = [0.0f32; 3];
            for (slot, part) in components.iter_mut().zip(&parts) {
                let parsed: f32 = part
                    .parse()
                    .map_err(|_| anyhow::anyhow!("invalid color component '{part}'"))?;
                if !(0.0..=1.0).contains(&parsed) {
                    anyhow::bail!("color component {parsed} is outside [0, 1]");
                }
                *slot = parsed;
            }
            return Ok(Self::new(components[0], components[1], components[2]));
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 {
            anyhow::bail!("expected 6 hex digits in '{trimmed}'");
        }
        let byte = |range: std::ops::Range<usize>| -> Result<f32> {
            let value = u8::from_str_radix(&hex[range], 16)
                .map_err(|_| anyhow::anyhow!("invalid hex color '{trimmed}'"))?;
            Ok(value as f32 / 255.0)
        };
        Ok(Self::new(byte(0..2)?, byte(2..4)?, byte(4..6)?))
    }

    /// Formats the color as `#rrggbb`.
    pub fn to_hex(self) -> String {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Shape and color controls for the blob field shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobSettings {
    /// UV scale divisor feeding the noise field.
    pub scale: f32,
    /// Threshold bias reserved by the shader contract.
    pub threshold: f32,
    /// Multiplier applied to elapsed seconds before sampling the noise.
    pub time_scale: f32,
    /// Gradient color where the field saturates high.
    pub front_color: Rgb,
    /// Gradient color where the field stays low.
    pub background_color: Rgb,
}

impl Default for BlobSettings {
    fn default() -> Self {
        Self {
            scale: 1.2,
            threshold: 0.0,
            time_scale: 0.03,
            front_color: Rgb::new(0.9, 0.9, 0.9),
            background_color: Rgb::new(0.980_392, 0.980_392, 0.980_392),
        }
    }
}

/// Anti-aliasing policy for the scene pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Logical viewport dimensions plus the pixel density reported by the
/// windowing system. Logical units drive the shader's `u_resolution`; the
/// pixel size drives the surface and the render targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    /// Derives the logical viewport from a physical window size.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let width = (size.width as f64 / scale).round() as u32;
        let height = (size.height as f64 / scale).round() as u32;
        Self::new(width, height, scale)
    }

    /// Physical pixel size of the drawable surface and the render targets.
    pub fn pixel_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            ((self.width as f64 * self.scale_factor).round() as u32).max(1),
            ((self.height as f64 * self.scale_factor).round() as u32).max(1),
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Logical window size.
    pub window_size: (u32, u32),
    /// Optional FPS cap; `None` renders on every redraw callback.
    pub fps_cap: Option<f32>,
    /// Anti-aliasing policy for the scene pass.
    pub antialiasing: Antialiasing,
    /// Whether the stylized post-processing chain starts enabled.
    pub effects_enabled: bool,
    /// Blob field shape and color controls.
    pub blob: BlobSettings,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window_size: (1280, 720),
            fps_cap: None,
            antialiasing: Antialiasing::default(),
            effects_enabled: true,
            blob: BlobSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let color = Rgb::parse("#fafafa").unwrap();
        assert!((color.r - 0.980_392).abs() < 1e-5);
        assert_eq!(color.r, color.g);
        assert_eq!(color.g, color.b);

        let bare = Rgb::parse("336699").unwrap();
        assert!((bare.r - 0.2).abs() < 1e-5);
        assert!((bare.g - 0.4).abs() < 1e-5);
        assert!((bare.b - 0.6).abs() < 1e-5);
    }

    #[test]
    fn parses_float_triples() {
        let color = Rgb::parse("0.9, 0.9, 0.9").unwrap();
        assert_eq!(color, Rgb::new(0.9, 0.9, 0.9));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Rgb::parse("").is_err());
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("1.0,0.5").is_err());
        assert!(Rgb::parse("2.0,0.0,0.0").is_err());
        assert!(Rgb::parse("#zzzzzz").is_err());
    }

    #[test]
    fn hex_round_trips() {
        let color = Rgb::parse("#fafafa").unwrap();
        assert_eq!(color.to_hex(), "#fafafa");
    }

    #[test]
    fn viewport_scales_pixel_size_by_density() {
        let viewport = Viewport::new(800, 600, 2.0);
        assert_eq!(viewport.pixel_size(), PhysicalSize::new(1600, 1200));
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < f32::EPSILON);
    }

    #[test]
    fn viewport_from_physical_recovers_logical_units() {
        let viewport = Viewport::from_physical(PhysicalSize::new(1600, 1200), 2.0);
        assert_eq!((viewport.width, viewport.height), (800, 600));
        assert_eq!(viewport.pixel_size(), PhysicalSize::new(1600, 1200));
    }

    #[test]
    fn viewport_guards_degenerate_input() {
        let viewport = Viewport::new(0, 0, 0.0);
        assert_eq!((viewport.width, viewport.height), (1, 1));
        assert_eq!(viewport.scale_factor, 1.0);
    }
}
