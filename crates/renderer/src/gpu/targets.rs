use winit::dpi::PhysicalSize;

/// Off-screen color buffer a pass renders into and a later pass samples.
pub(crate) struct OffscreenTarget {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Multisampled color buffer the scene pass resolves from when MSAA is on.
pub(crate) struct MultisampleTarget {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl MultisampleTarget {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// The effect chain's target set: a ping-pong pair the passes alternate
/// between, the frame-save target feeding the feedback blend, and the
/// optional MSAA buffer for the scene pass.
pub(crate) struct ChainTargets {
    pub ping: OffscreenTarget,
    pub pong: OffscreenTarget,
    pub save: OffscreenTarget,
    pub multisample: Option<MultisampleTarget>,
}

impl ChainTargets {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        Self {
            ping: OffscreenTarget::new(device, format, size, "chain target a"),
            pong: OffscreenTarget::new(device, format, size, "chain target b"),
            save: OffscreenTarget::new(device, format, size, "frame save target"),
            multisample: (sample_count > 1)
                .then(|| MultisampleTarget::new(device, format, size, sample_count)),
        }
    }

    /// Views of the ping-pong pair, indexable by [`super::chain::SourceSlot`].
    pub fn pair(&self) -> [&wgpu::TextureView; 2] {
        [&self.ping.view, &self.pong.view]
    }
}
