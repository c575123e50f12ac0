//! Texture resource management for wgpu
//!
//! Depth buffers, the shadow map and the multisampled color target.

/// GPU texture with its default view
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn create_render_texture(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        sample_count: u32,
        usage: wgpu::TextureUsages,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Creates the depth buffer for the main pass.
    ///
    /// `sample_count` must match the color target.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let (texture, view) = Self::create_render_texture(
            device,
            label,
            (width, height),
            Self::DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        Self { texture, view }
    }

    /// Multisampled color buffer resolved into the surface texture
    pub fn create_msaa_target(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let (texture, view) = Self::create_render_texture(
            device,
            "MSAA Color Target",
            (width, height),
            format,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        Self { texture, view }
    }

    /// Square depth texture written by the shadow pass and sampled by the lit pass
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        let (texture, view) = Self::create_render_texture(
            device,
            "Shadow Map",
            (size, size),
            Self::DEPTH_FORMAT,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );

        Self { texture, view }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}
