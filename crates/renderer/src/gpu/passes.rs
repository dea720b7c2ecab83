use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::shaders;

use super::uniforms::{BlendUniforms, BlobUniforms};

/// Identifies which half of the ping-pong pair a pass reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceSlot {
    Ping = 0,
    Pong = 1,
}

impl SourceSlot {
    pub fn other(self) -> Self {
        match self {
            SourceSlot::Ping => SourceSlot::Pong,
            SourceSlot::Pong => SourceSlot::Ping,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Enable flags for the chain's passes.
///
/// The scene pass is unconditionally enabled; only the stylized passes can be
/// toggled, and they toggle as a unit so the effect can be switched off (for
/// example for a reduced-motion mode) without rebuilding the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PassToggles {
    pub blob: bool,
    pub blend: bool,
    pub save: bool,
    pub output: bool,
}

impl PassToggles {
    /// Construction state: everything off pending explicit activation.
    pub fn all_off() -> Self {
        Self {
            blob: false,
            blend: false,
            save: false,
            output: false,
        }
    }

    /// Batch-toggles the blob, blend, save, and output passes.
    pub fn set_effects(&mut self, enabled: bool) {
        self.blob = enabled;
        self.blend = enabled;
        self.save = enabled;
        self.output = enabled;
    }

    /// The base scene render can never be disabled.
    pub fn scene(&self) -> bool {
        true
    }
}

/// Linear clamp-to-edge sampler shared by every texture-input pass.
pub(crate) fn create_chain_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("chain sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_uniform_buffer<T: Pod>(device: &wgpu::Device, contents: &T, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(contents),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Builds a full-screen triangle pipeline with a single bind group.
fn fullscreen_pipeline(
    device: &wgpu::Device,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}

fn encode_fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    dest: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: dest,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

/// Base scene render: clears its target to the chain's clear color, resolving
/// through the MSAA buffer when one is configured. Scene geometry would draw
/// here; the background effect keeps the scene graph empty.
pub(crate) struct ScenePass {
    pub clear_color: wgpu::Color,
}

impl ScenePass {
    pub fn new(clear_color: wgpu::Color) -> Self {
        Self { clear_color }
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        multisample: Option<&wgpu::TextureView>,
        dest: &wgpu::TextureView,
    ) {
        let (attachment, resolve_target) = match multisample {
            Some(msaa) => (msaa, Some(dest)),
            None => (dest, None),
        };
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: attachment,
                depth_slice: None,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
    }
}

/// The blob field shader pass.
pub(crate) struct BlobPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
}

impl BlobPass {
    pub fn new(
        device: &wgpu::Device,
        vertex_module: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        uniforms: &BlobUniforms,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
    ) -> Self {
        let fragment_module =
            shaders::compile_fragment_shader(device, shaders::BLOB_FRAGMENT, "blob fragment");
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blob pass layout"),
            entries: &[
                uniform_layout_entry(0),
                texture_layout_entry(1),
                sampler_layout_entry(2),
            ],
        });
        let uniform_buffer = create_uniform_buffer(device, uniforms, "blob uniforms");
        let pipeline = fullscreen_pipeline(
            device,
            vertex_module,
            &fragment_module,
            &layout,
            format,
            "blob pipeline",
        );
        let bind_groups = Self::build_bind_groups(device, &layout, &uniform_buffer, sources, sampler);

        Self {
            pipeline,
            layout,
            uniform_buffer,
            bind_groups,
        }
    }

    fn build_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
    ) -> [wgpu::BindGroup; 2] {
        sources.map(|source| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("blob bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }

    /// Rebuilds the source bind groups after the targets were reallocated.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
    ) {
        self.bind_groups =
            Self::build_bind_groups(device, &self.layout, &self.uniform_buffer, sources, sampler);
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &BlobUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest: &wgpu::TextureView,
        source: SourceSlot,
    ) {
        encode_fullscreen(
            encoder,
            "blob pass",
            dest,
            &self.pipeline,
            &self.bind_groups[source.index()],
        );
    }
}

/// Feedback blend pass mixing the chain with the saved previous frame.
pub(crate) struct BlendPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; 2],
}

impl BlendPass {
    pub fn new(
        device: &wgpu::Device,
        vertex_module: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        mix_ratio: f32,
        sources: [&wgpu::TextureView; 2],
        history: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let fragment_module =
            shaders::compile_fragment_shader(device, shaders::BLEND_FRAGMENT, "blend fragment");
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blend pass layout"),
            entries: &[
                uniform_layout_entry(0),
                texture_layout_entry(1),
                texture_layout_entry(2),
                sampler_layout_entry(3),
            ],
        });
        let uniform_buffer =
            create_uniform_buffer(device, &BlendUniforms::new(mix_ratio), "blend uniforms");
        let pipeline = fullscreen_pipeline(
            device,
            vertex_module,
            &fragment_module,
            &layout,
            format,
            "blend pipeline",
        );
        let bind_groups =
            Self::build_bind_groups(device, &layout, &uniform_buffer, sources, history, sampler);

        Self {
            pipeline,
            layout,
            uniform_buffer,
            bind_groups,
        }
    }

    fn build_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        sources: [&wgpu::TextureView; 2],
        history: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> [wgpu::BindGroup; 2] {
        sources.map(|source| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("blend bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(history),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }

    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        sources: [&wgpu::TextureView; 2],
        history: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) {
        self.bind_groups = Self::build_bind_groups(
            device,
            &self.layout,
            &self.uniform_buffer,
            sources,
            history,
            sampler,
        );
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest: &wgpu::TextureView,
        source: SourceSlot,
    ) {
        encode_fullscreen(
            encoder,
            "blend pass",
            dest,
            &self.pipeline,
            &self.bind_groups[source.index()],
        );
    }
}

/// Identity copy pass; one instance saves the frame into the history target,
/// another writes the final image to the screen.
pub(crate) struct CopyPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    bind_groups: [wgpu::BindGroup; 2],
    label: &'static str,
}

impl CopyPass {
    pub fn new(
        device: &wgpu::Device,
        vertex_module: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
        label: &'static str,
    ) -> Self {
        let fragment_module =
            shaders::compile_fragment_shader(device, shaders::COPY_FRAGMENT, "copy fragment");
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[texture_layout_entry(0), sampler_layout_entry(1)],
        });
        let pipeline =
            fullscreen_pipeline(device, vertex_module, &fragment_module, &layout, format, label);
        let bind_groups = Self::build_bind_groups(device, &layout, sources, sampler);

        Self {
            pipeline,
            layout,
            bind_groups,
            label,
        }
    }

    fn build_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
    ) -> [wgpu::BindGroup; 2] {
        sources.map(|source| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("copy bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(source),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
        })
    }

    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        sources: [&wgpu::TextureView; 2],
        sampler: &wgpu::Sampler,
    ) {
        self.bind_groups = Self::build_bind_groups(device, &self.layout, sources, sampler);
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        dest: &wgpu::TextureView,
        source: SourceSlot,
    ) {
        encode_fullscreen(
            encoder,
            self.label,
            dest,
            &self.pipeline,
            &self.bind_groups[source.index()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_start_disabled_and_switch_as_a_unit() {
        let mut toggles = PassToggles::all_off();
        assert!(!toggles.blob && !toggles.blend && !toggles.save && !toggles.output);
        assert!(toggles.scene());

        toggles.set_effects(true);
        assert!(toggles.blob && toggles.blend && toggles.save && toggles.output);

        toggles.set_effects(false);
        assert!(!toggles.blob && !toggles.blend && !toggles.save && !toggles.output);
        // The base render stays on regardless.
        assert!(toggles.scene());
    }

    #[test]
    fn source_slots_alternate() {
        assert_eq!(SourceSlot::Ping.other(), SourceSlot::Pong);
        assert_eq!(SourceSlot::Pong.other(), SourceSlot::Ping);
        assert_eq!(SourceSlot::Ping.other().other(), SourceSlot::Ping);
    }
}
