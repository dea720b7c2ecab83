//! Renderer crate for blobwall, the animated blob shader background.
//!
//! The crate wires a winit window, a `wgpu` post-processing chain, and the
//! input smoothing that drives the blob field's uniforms. The overall flow:
//!
//! ```text
//!   CLI / blobwall
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ Stage ──▶ winit event loop ──▶ Stage::update()
//!          ▲                               │
//!          │                               └─▶ EffectChain::advance()
//!          │                                     smooth inputs ─▶ uniforms ─▶ pass chain
//! ```
//!
//! [`Stage`] owns the camera, clock, and effect chain for one surface; the
//! chain executes the fixed pass order (scene render, blob shader, feedback
//! blend, frame save, copy to screen) with per-pass enable flags so the
//! stylized stages can be switched off as a unit.

mod camera;
mod clock;
mod gpu;
mod shaders;
mod stage;
mod window;

pub mod input;
pub mod types;

pub use camera::{Camera, CameraSettings, ControlMode};
pub use clock::Clock;
pub use stage::Stage;
pub use types::{Antialiasing, BlobSettings, RendererConfig, Rgb, Viewport};

use anyhow::Result;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside [`Stage`]; `Renderer` simply opens the
/// window and hands the stage to the event loop.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the effect window and blocks until it closes.
    pub fn run(&self) -> Result<()> {
        window::run(&self.config)
    }
}
