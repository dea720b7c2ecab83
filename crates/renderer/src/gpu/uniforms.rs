use bytemuck::{Pod, Zeroable};

use crate::types::{BlobSettings, Rgb};

/// Forces a vec3-sized slot to occupy a full 16 bytes, per std140 rules.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct Std140Vec3 {
    value: [f32; 3],
    _pad: f32,
}

unsafe impl Zeroable for Std140Vec3 {}
unsafe impl Pod for Std140Vec3 {}

impl Std140Vec3 {
    fn new(value: [f32; 3]) -> Self {
        Self { value, _pad: 0.0 }
    }
}

impl From<Rgb> for Std140Vec3 {
    fn from(color: Rgb) -> Self {
        Self::new([color.r, color.g, color.b])
    }
}

/// CPU-side mirror of the blob shader's `BlobParams` block.
///
/// The layout must observe std140 alignment: the two vec2 slots pack into the
/// first 16 bytes, each vec3 color occupies a padded 16-byte slot, and the
/// trailing floats are followed by enough padding to round the struct up to a
/// multiple of 16.
///
/// Time, resolution, mouse, and scroll fields are refreshed every frame and
/// on resize; the color and shape fields persist until a caller overwrites
/// them.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct BlobUniforms {
    pub resolution: [f32; 2],
    pub mouse: [f32; 2],
    pub max_color: Std140Vec3,
    pub min_color: Std140Vec3,
    pub time: f32,
    pub scale: f32,
    pub threshold: f32,
    pub time_scale: f32,
    pub scroll_offset: f32,
    _pad: [f32; 3],
}

unsafe impl Zeroable for BlobUniforms {}
unsafe impl Pod for BlobUniforms {}

impl BlobUniforms {
    /// Prepares a fully populated block sized to the current viewport.
    pub fn new(width: f32, height: f32, settings: &BlobSettings) -> Self {
        Self {
            resolution: [width, height],
            mouse: [0.0, 0.0],
            max_color: settings.front_color.into(),
            min_color: settings.background_color.into(),
            time: 0.0,
            scale: settings.scale,
            threshold: settings.threshold,
            time_scale: settings.time_scale,
            scroll_offset: 0.0,
            _pad: [0.0; 3],
        }
    }

    /// Writes the current logical viewport dimensions into `u_resolution`.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    /// Overwrites the gradient's front (high) color.
    pub fn set_front_color(&mut self, color: Rgb) {
        self.max_color = color.into();
    }

    /// Overwrites the gradient's background (low) color.
    pub fn set_background_color(&mut self, color: Rgb) {
        self.min_color = color.into();
    }

    /// Refreshes the per-frame fields from the clock and the smoothed inputs.
    /// Colors and shape controls are left untouched.
    pub fn refresh(&mut self, time_seconds: f32, mouse: [f32; 2], scroll_offset: f32) {
        self.time = time_seconds;
        self.mouse = mouse;
        self.scroll_offset = scroll_offset;
    }
}

/// CPU-side mirror of the feedback pass's `BlendParams` block.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct BlendUniforms {
    pub mix_ratio: f32,
    _pad: [f32; 3],
}

unsafe impl Zeroable for BlendUniforms {}
unsafe impl Pod for BlendUniforms {}

impl BlendUniforms {
    pub fn new(mix_ratio: f32) -> Self {
        Self {
            mix_ratio,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    fn defaults() -> BlobSettings {
        BlobSettings::default()
    }

    /// Sanity-checks that the CPU mirror matches the std140 layout declared
    /// in the GLSL block.
    #[test]
    fn blob_uniforms_follow_std140_layout() {
        let uniforms = BlobUniforms::new(1920.0, 1080.0, &defaults());
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<BlobUniforms>(), 16);
        assert_eq!(size_of::<BlobUniforms>(), 80);
        assert_eq!((&uniforms.resolution as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.mouse as *const _ as usize) - base, 8);
        assert_eq!((&uniforms.max_color as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.min_color as *const _ as usize) - base, 32);
        assert_eq!((&uniforms.time as *const _ as usize) - base, 48);
        assert_eq!((&uniforms.scale as *const _ as usize) - base, 52);
        assert_eq!((&uniforms.threshold as *const _ as usize) - base, 56);
        assert_eq!((&uniforms.time_scale as *const _ as usize) - base, 60);
        assert_eq!((&uniforms.scroll_offset as *const _ as usize) - base, 64);
    }

    #[test]
    fn blend_uniforms_fill_one_std140_slot() {
        assert_eq!(align_of::<BlendUniforms>(), 16);
        assert_eq!(size_of::<BlendUniforms>(), 16);
    }

    #[test]
    fn refresh_touches_only_per_frame_fields() {
        let mut uniforms = BlobUniforms::new(800.0, 600.0, &defaults());
        uniforms.set_front_color(Rgb::new(0.1, 0.2, 0.3));
        uniforms.set_background_color(Rgb::new(0.4, 0.5, 0.6));

        uniforms.refresh(12.5, [0.25, 0.75], 0.4);

        assert_eq!(uniforms.time, 12.5);
        assert_eq!(uniforms.mouse, [0.25, 0.75]);
        assert_eq!(uniforms.scroll_offset, 0.4);
        // Colors and shape controls persist across frames.
        assert_eq!(uniforms.max_color.value, [0.1, 0.2, 0.3]);
        assert_eq!(uniforms.min_color.value, [0.4, 0.5, 0.6]);
        assert_eq!(uniforms.scale, defaults().scale);
        assert_eq!(uniforms.time_scale, defaults().time_scale);
        assert_eq!(uniforms.resolution, [800.0, 600.0]);
    }

    #[test]
    fn resize_updates_resolution_only() {
        let mut uniforms = BlobUniforms::new(640.0, 480.0, &defaults());
        uniforms.refresh(3.0, [0.5, 0.5], 0.1);
        uniforms.set_resolution(800.0, 600.0);

        assert_eq!(uniforms.resolution, [800.0, 600.0]);
        assert_eq!(uniforms.time, 3.0);
        assert_eq!(uniforms.mouse, [0.5, 0.5]);
    }
}
