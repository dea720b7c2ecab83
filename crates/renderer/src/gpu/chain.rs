use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;

use crate::clock::Clock;
use crate::input::{PointerTracker, ScrollTracker};
use crate::shaders;
use crate::types::{RendererConfig, Rgb, Viewport};

use super::context::GpuContext;
use super::passes::{BlendPass, BlobPass, CopyPass, PassToggles, ScenePass, SourceSlot};
use super::targets::ChainTargets;
use super::uniforms::BlobUniforms;

/// Fixed mix ratio between the fresh frame and the saved previous frame.
const FEEDBACK_MIX_RATIO: f32 = 0.5;

/// Post-processing chain for the blob background effect.
///
/// Owns the GPU context, the render targets, the five passes, the uniform
/// state, and the pointer/scroll trackers. Pass order is significant: scene
/// render, blob shader, blend with the saved previous frame, save the current
/// frame, copy to screen; each enabled pass reads the previous stage's target
/// and writes its own.
pub(crate) struct EffectChain {
    context: GpuContext,
    sampler: wgpu::Sampler,
    targets: ChainTargets,
    scene: ScenePass,
    blob: BlobPass,
    blend: BlendPass,
    save: CopyPass,
    output: CopyPass,
    toggles: PassToggles,
    uniforms: BlobUniforms,
    pointer: PointerTracker,
    scroll: ScrollTracker,
    viewport: Viewport,
    /// Random phase added to elapsed time so concurrent instances stay
    /// decorrelated; chosen once at construction.
    phase_offset: f32,
    last_stats: Instant,
    frames_since_stats: u32,
}

impl EffectChain {
    pub(crate) fn new<T>(target: &T, viewport: Viewport, config: &RendererConfig) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, viewport.pixel_size(), config.antialiasing)?;

        let sampler = super::passes::create_chain_sampler(&context.device);
        let vertex_module = shaders::compile_vertex_shader(&context.device);
        let targets = ChainTargets::new(
            &context.device,
            context.surface_format,
            context.size,
            context.sample_count,
        );

        let uniforms = BlobUniforms::new(
            viewport.width as f32,
            viewport.height as f32,
            &config.blob,
        );

        let scene = ScenePass::new(wgpu::Color::TRANSPARENT);
        let blob = BlobPass::new(
            &context.device,
            &vertex_module,
            context.surface_format,
            &uniforms,
            targets.pair(),
            &sampler,
        );
        let blend = BlendPass::new(
            &context.device,
            &vertex_module,
            context.surface_format,
            FEEDBACK_MIX_RATIO,
            targets.pair(),
            &targets.save.view,
            &sampler,
        );
        let save = CopyPass::new(
            &context.device,
            &vertex_module,
            context.surface_format,
            targets.pair(),
            &sampler,
            "frame save pass",
        );
        let output = CopyPass::new(
            &context.device,
            &vertex_module,
            context.surface_format,
            targets.pair(),
            &sampler,
            "output pass",
        );

        // The stylized passes stay off until the caller activates the effect;
        // the blob pass itself comes back up immediately so activation only
        // has to flip the composite stages.
        let mut toggles = PassToggles::all_off();
        toggles.blob = true;

        Ok(Self {
            context,
            sampler,
            targets,
            scene,
            blob,
            blend,
            save,
            output,
            toggles,
            uniforms,
            pointer: PointerTracker::default(),
            scroll: ScrollTracker::default(),
            viewport,
            phase_offset: rand::random::<f32>() * 100.0,
            last_stats: Instant::now(),
            frames_since_stats: 0,
        })
    }

    /// Batch-toggles the blob, blend, save, and output passes.
    pub(crate) fn set_effects_enabled(&mut self, enabled: bool) {
        self.toggles.set_effects(enabled);
    }

    /// Overwrites the gradient's front color; visible on the next frame.
    pub(crate) fn set_front_color(&mut self, color: Rgb) {
        self.uniforms.set_front_color(color);
    }

    /// Overwrites the gradient's background color; visible on the next frame.
    pub(crate) fn set_background_color(&mut self, color: Rgb) {
        self.uniforms.set_background_color(color);
    }

    /// Stores the latest raw pointer sample (normalized, y-up).
    pub(crate) fn pointer_moved(&mut self, normalized: [f32; 2]) {
        self.pointer.set_raw(normalized);
    }

    /// Stores the latest raw scroll fraction from the fixed-interval sampler.
    pub(crate) fn set_scroll_fraction(&mut self, fraction: f32) {
        self.scroll.set_raw(fraction);
    }

    /// Propagates a viewport change to the surface, the render targets, and
    /// the resolution uniforms. Skipping this after a resize leaves the
    /// shader sampling a stale resolution and visibly distorts the field.
    pub(crate) fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.uniforms
            .set_resolution(viewport.width as f32, viewport.height as f32);

        let pixel_size = viewport.pixel_size();
        self.context.resize(pixel_size);
        self.targets = ChainTargets::new(
            &self.context.device,
            self.context.surface_format,
            self.context.size,
            self.context.sample_count,
        );
        self.blob
            .rebind(&self.context.device, self.targets.pair(), &self.sampler);
        self.blend.rebind(
            &self.context.device,
            self.targets.pair(),
            &self.targets.save.view,
            &self.sampler,
        );
        self.save
            .rebind(&self.context.device, self.targets.pair(), &self.sampler);
        self.output
            .rebind(&self.context.device, self.targets.pair(), &self.sampler);
        self.blob.write_uniforms(&self.context.queue, &self.uniforms);
    }

    /// Re-applies the surface configuration after a lost/outdated surface.
    pub(crate) fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Runs one frame: smooth the inputs, refresh the uniforms, then execute
    /// the enabled passes front-to-back and present.
    pub(crate) fn advance(&mut self, clock: &Clock) -> Result<(), wgpu::SurfaceError> {
        // Smoothing first; the passes read the uniforms synchronously at
        // render time.
        self.pointer.advance();
        self.scroll.advance();
        self.uniforms.refresh(
            clock.elapsed_seconds() + self.phase_offset,
            self.pointer.smoothed(),
            self.scroll.smoothed(),
        );
        self.blob.write_uniforms(&self.context.queue, &self.uniforms);

        let frame = self.context.surface.get_current_texture()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("chain encoder"),
                });

        let pair = self.targets.pair();
        let msaa = self.targets.multisample.as_ref().map(|target| &target.view);

        // The base scene render clears the head of the chain.
        if self.toggles.scene() {
            self.scene.encode(&mut encoder, msaa, pair[0]);
        }
        let mut source = SourceSlot::Ping;

        if self.toggles.blob {
            self.blob
                .encode(&mut encoder, pair[source.other() as usize], source);
            source = source.other();
        }
        if self.toggles.blend {
            self.blend
                .encode(&mut encoder, pair[source.other() as usize], source);
            source = source.other();
        }
        if self.toggles.save {
            self.save
                .encode(&mut encoder, &self.targets.save.view, source);
        }
        if self.toggles.output {
            self.output.encode(&mut encoder, &frame_view, source);
        } else {
            // With the composite stages off the visible surface only ever
            // shows the clear color.
            self.scene.encode(&mut encoder, None, &frame_view);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        self.frames_since_stats += 1;
        let now = Instant::now();
        let since_stats = now.saturating_duration_since(self.last_stats);
        if since_stats >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_stats as f32 / since_stats.as_secs_f32()).round(),
                time = self.uniforms.time,
                mouse_x = self.uniforms.mouse[0],
                mouse_y = self.uniforms.mouse[1],
                scroll = self.uniforms.scroll_offset,
                width = self.viewport.width,
                height = self.viewport.height,
                "render stats"
            );
            self.frames_since_stats = 0;
            self.last_stats = now;
        }

        Ok(())
    }
}
