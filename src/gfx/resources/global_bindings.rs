//! Global uniform bindings for camera and scene lighting
//!
//! Bind group 0 holds the per-frame [`GlobalUniform`]; bind group 2 holds
//! the shadow map and its comparison sampler. Both are shared by every
//! object drawn in a frame.

use crate::{
    gfx::{
        camera::{orbit_camera::OPENGL_TO_WGPU_MATRIX, Camera, OrbitCamera},
        resources::texture_resource::TextureResource,
        scene::Scene,
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Per-frame global data. MUST match `Globals` in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// Camera eye, w = 1
    pub view_position: [f32; 4],
    /// Unit vector pointing towards the directional light
    pub light_direction: [f32; 4],
    /// Linear light color premultiplied by intensity
    pub light_color: [f32; 4],
    pub ambient_color: [f32; 4],
    /// x: shadows enabled, y: shadow map texel size, z: depth bias
    pub shadow_params: [f32; 4],
}

impl GlobalUniform {
    pub const SHADOW_BIAS: f32 = 0.002;

    pub fn new(camera: &OrbitCamera, scene: &Scene, shadow_map_size: Option<u32>) -> Self {
        let light = &scene.directional_light;
        let direction = light.direction_to_light();
        let shadows_enabled = light.cast_shadow && shadow_map_size.is_some();
        let texel_size = shadow_map_size.map_or(0.0, |size| 1.0 / size.max(1) as f32);

        Self {
            view_proj: camera.build_view_projection_matrix().into(),
            light_view_proj: (OPENGL_TO_WGPU_MATRIX * light.view_projection()).into(),
            view_position: [camera.eye.x, camera.eye.y, camera.eye.z, 1.0],
            light_direction: [direction.x, direction.y, direction.z, 0.0],
            light_color: rgb_to_vec4(light.color.to_linear_scaled(light.intensity)),
            ambient_color: rgb_to_vec4(
                scene
                    .ambient_light
                    .color
                    .to_linear_scaled(scene.ambient_light.intensity),
            ),
            shadow_params: [
                if shadows_enabled { 1.0 } else { 0.0 },
                texel_size,
                Self::SHADOW_BIAS,
                0.0,
            ],
        }
    }
}

fn rgb_to_vec4([r, g, b]: [f32; 3]) -> [f32; 4] {
    [r, g, b, 1.0]
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layouts and bind groups for the shared frame state
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    shadow_layout: wgpu::BindGroupLayout,
    ubo: GlobalUBO,
    bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, shadow_map: &TextureResource) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::depth_texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let ubo = GlobalUBO::new(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        // Shadow maps need a comparison sampler
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });
        let shadow_bind_group =
            Self::create_shadow_bind_group(device, &shadow_layout, shadow_map, &shadow_sampler);

        Self {
            layout,
            shadow_layout,
            ubo,
            bind_group,
            shadow_bind_group,
        }
    }

    fn create_shadow_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        shadow_map: &TextureResource,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUniform) {
        self.ubo.update_content(queue, content);
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn shadow_layout(&self) -> &wgpu::BindGroupLayout {
        &self.shadow_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn shadow_bind_group(&self) -> &wgpu::BindGroup {
        &self.shadow_bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SceneConfig,
        setup::{build_camera, build_scene},
    };

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 208);
    }

    #[test]
    fn test_uniform_from_demo_scene() {
        let config = SceneConfig::default();
        let scene = build_scene(&config);
        let camera = build_camera(&config, 1.5).camera;
        let globals = GlobalUniform::new(&camera, &scene, Some(2048));

        assert_eq!(globals.shadow_params[0], 1.0);
        assert!((globals.shadow_params[1] - 1.0 / 2048.0).abs() < 1e-9);
        // White light at intensity 1, white ambient at 0.5
        for (actual, expected) in globals.light_color.iter().zip([1.0, 1.0, 1.0, 1.0]) {
            assert!((actual - expected).abs() < 1e-5);
        }
        for (actual, expected) in globals.ambient_color.iter().zip([0.5, 0.5, 0.5, 1.0]) {
            assert!((actual - expected).abs() < 1e-5);
        }
        assert!(globals.light_direction[1] > 0.0);
    }

    #[test]
    fn test_shadows_disabled_without_shadow_map() {
        let config = SceneConfig::default();
        let scene = build_scene(&config);
        let camera = build_camera(&config, 1.5).camera;
        assert_eq!(GlobalUniform::new(&camera, &scene, None).shadow_params[0], 0.0);
    }
}
