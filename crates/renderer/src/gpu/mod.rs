//! GPU orchestration for the blob background effect.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `targets` materialises the off-screen buffers the chain ping-pongs
//!   between, plus the frame-save target feeding the feedback blend.
//! - `passes` compiles the embedded GLSL into one pipeline per stage and
//!   carries the per-pass enable flags.
//! - `uniforms` mirrors the shader parameter blocks and writes changes
//!   straight through the queue each frame.
//! - `chain` glues everything together and exposes the `EffectChain` API the
//!   stage drives.

mod chain;
mod context;
mod passes;
mod targets;
mod uniforms;

pub(crate) use chain::EffectChain;
