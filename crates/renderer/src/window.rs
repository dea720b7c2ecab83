use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{error, warn};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::input::{
    accumulate_scroll, normalized_pointer, SCROLL_LINE_HEIGHT, SCROLL_SAMPLE_INTERVAL,
};
use crate::stage::Stage;
use crate::types::RendererConfig;

/// Opens the effect window and drives the stage through the winit event loop.
///
/// Events map onto the stage's explicit API: cursor motion writes raw pointer
/// samples, wheel input accumulates the scroll offset (snapshotted on a fixed
/// interval), resizes fan out through `Stage::resize`, and each redraw runs
/// one `Stage::update` tick, optionally paced by the FPS cap.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window = WindowBuilder::new()
        .with_title("blobwall")
        .with_inner_size(LogicalSize::new(config.window_size.0, config.window_size.1))
        .with_transparent(true)
        .build(&event_loop)
        .context("failed to create window")?;
    let window = Arc::new(window);

    let mut stage = Stage::new(window, config)?;
    stage.set_effects_enabled(config.effects_enabled);
    stage.window().request_redraw();

    let target_interval = config
        .fps_cap
        .filter(|fps| *fps > 0.0)
        .map(|fps| Duration::from_secs_f32(1.0 / fps));
    let mut accumulator = Duration::ZERO;
    let mut last_pace_tick = Instant::now();

    let mut scroll_offset_px = 0.0f32;
    let mut last_scroll_sample = Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            match event {
                Event::WindowEvent { window_id, event } if window_id == stage.window().id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            elwt.exit();
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.state == ElementState::Pressed
                                && matches!(event.logical_key, Key::Named(NamedKey::Escape))
                            {
                                elwt.exit();
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            let size = stage.window().inner_size();
                            stage.pointer_moved(normalized_pointer(position, size));
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let delta_px = match delta {
                                MouseScrollDelta::LineDelta(_, lines) => {
                                    lines * SCROLL_LINE_HEIGHT
                                }
                                MouseScrollDelta::PixelDelta(position) => position.y as f32,
                            };
                            scroll_offset_px = accumulate_scroll(scroll_offset_px, delta_px);
                        }
                        WindowEvent::Resized(new_size) => {
                            stage.resize(new_size);
                        }
                        WindowEvent::ScaleFactorChanged {
                            mut inner_size_writer,
                            ..
                        } => {
                            // Keep the current logical size when the scale factor changes.
                            let _ = inner_size_writer.request_inner_size(stage.window().inner_size());
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            if now.saturating_duration_since(last_scroll_sample)
                                >= SCROLL_SAMPLE_INTERVAL
                            {
                                let height = stage.viewport().height.max(1) as f32;
                                stage.set_scroll_fraction(scroll_offset_px / height);
                                last_scroll_sample = now;
                            }

                            let mut should_render = true;
                            if let Some(interval) = target_interval {
                                let delta = now.saturating_duration_since(last_pace_tick);
                                last_pace_tick = now;
                                accumulator = accumulator.saturating_add(delta);
                                if accumulator + Duration::from_micros(250) < interval {
                                    should_render = false;
                                } else {
                                    // Subtract only one interval to avoid a burst after long gaps.
                                    accumulator = accumulator.saturating_sub(interval);
                                }
                            }

                            if should_render {
                                match stage.update() {
                                    Ok(()) => {}
                                    Err(
                                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                                    ) => {
                                        stage.recover_surface();
                                    }
                                    Err(wgpu::SurfaceError::OutOfMemory) => {
                                        error!("surface out of memory; exiting");
                                        elwt.exit();
                                    }
                                    Err(wgpu::SurfaceError::Timeout) => {
                                        warn!("surface timeout; retrying next frame");
                                    }
                                    Err(other) => {
                                        warn!(error = ?other, "surface error; retrying next frame");
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    // Schedule the next frame once winit is about to wait again.
                    stage.window().request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|err| anyhow!("window event loop error: {err}"))
}
