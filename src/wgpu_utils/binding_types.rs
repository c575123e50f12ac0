//! Shorthands for the binding types used by the render pipelines

pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

pub fn sampler(filtering: wgpu::SamplerBindingType) -> wgpu::BindingType {
    wgpu::BindingType::Sampler(filtering)
}

/// Depth texture sampled with a comparison sampler
pub fn depth_texture_2d() -> wgpu::BindingType {
    wgpu::BindingType::Texture {
        sample_type: wgpu::TextureSampleType::Depth,
        view_dimension: wgpu::TextureViewDimension::D2,
        multisampled: false,
    }
}
