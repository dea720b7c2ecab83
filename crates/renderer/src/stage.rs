use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::camera::{Camera, CameraSettings};
use crate::clock::Clock;
use crate::gpu::EffectChain;
use crate::types::{RendererConfig, Rgb, Viewport};

/// Owns one surface's worth of render state: viewport snapshot, clock,
/// camera, and effect chain.
///
/// The stage is an explicit context object: the caller constructs exactly one
/// per window and the event loop drives it through direct method calls, so
/// there is no hidden global state and dropping the stage releases every GPU
/// resource it owns.
pub struct Stage {
    window: Arc<Window>,
    viewport: Viewport,
    clock: Clock,
    camera: Camera,
    chain: EffectChain,
}

impl Stage {
    /// Builds the full render state for the supplied window.
    ///
    /// Fails if the drawable surface cannot be acquired; no camera or chain
    /// is allocated past that point. Performs one immediate resize pass so
    /// the camera and the resolution uniforms start in sync with the window.
    pub fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        let chain = EffectChain::new(window.as_ref(), viewport, config)
            .context("failed to build the effect chain")?;
        let camera = Camera::new(CameraSettings::default(), &viewport);

        let mut stage = Self {
            window,
            viewport,
            clock: Clock::new(),
            camera,
            chain,
        };
        let initial_size = stage.window.inner_size();
        stage.resize(initial_size);
        Ok(stage)
    }

    pub fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fans a viewport change out to the camera and the effect chain.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.viewport = Viewport::from_physical(new_size, self.window.scale_factor());
        self.camera.resize(&self.viewport);
        self.chain.resize(self.viewport);
    }

    /// Runs one tick: clock, then camera, then the effect chain.
    pub fn update(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.clock.tick();
        self.camera.update();
        self.chain.advance(&self.clock)
    }

    /// Re-applies the surface configuration after a lost or outdated surface.
    pub fn recover_surface(&mut self) {
        self.chain.recover_surface();
    }

    /// Stores the latest raw pointer sample (normalized, y-up).
    pub fn pointer_moved(&mut self, normalized: [f32; 2]) {
        self.chain.pointer_moved(normalized);
    }

    /// Stores the latest raw scroll fraction.
    pub fn set_scroll_fraction(&mut self, fraction: f32) {
        self.chain.set_scroll_fraction(fraction);
    }

    /// Toggles the stylized post-processing passes as a unit.
    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.chain.set_effects_enabled(enabled);
    }

    pub fn set_front_color(&mut self, color: Rgb) {
        self.chain.set_front_color(color);
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.chain.set_background_color(color);
    }
}
