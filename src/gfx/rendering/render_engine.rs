//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource that is not tied to a
//! single object: depth and MSAA targets, the shadow map, shared bind groups
//! and the two pipelines. A frame is a depth-only pass from the directional
//! light followed by the lit pass into the surface.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    config::RenderSettings,
    error::RenderError,
    frame::RenderTarget,
    gfx::{
        camera::OrbitCamera,
        resources::{
            global_bindings::{GlobalBindings, GlobalUniform},
            texture_resource::TextureResource,
        },
        scene::{object::DrawObject, Scene},
    },
    wgpu_utils::binding_types,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const LIT_PIPELINE: &str = "Lit";
const SHADOW_PIPELINE: &str = "Shadow";

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    sample_count: u32,
    settings: RenderSettings,
    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    shadow_map: TextureResource,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
}

impl RenderEngine {
    /// Creates a render engine for the given window.
    ///
    /// `width` and `height` are physical pixels. The surface prefers an sRGB
    /// format so that lighting is computed in linear space.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: RenderSettings,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let info = adapter.get_info();
        log::info!("using adapter '{}' ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);

        let sample_count = if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(settings.sample_count)
        {
            settings.sample_count
        } else {
            log::warn!(
                "{}x MSAA unsupported for {:?}, rendering without anti-aliasing",
                settings.sample_count,
                format
            );
            1
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            sample_count,
            "depth_texture",
        );
        let msaa_target = (sample_count > 1).then(|| {
            TextureResource::create_msaa_target(
                &device,
                format,
                config.width,
                config.height,
                sample_count,
            )
        });

        // A disabled shadow map stays bound but is never written
        let shadow_size = if settings.shadows_enabled {
            settings.shadow_map_size
        } else {
            1
        };
        let shadow_map = TextureResource::create_shadow_map(&device, shadow_size);

        let global_bindings = GlobalBindings::new(&device, &shadow_map);
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("lit", include_str!("shaders/lit.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shaders/shadow.wgsl"));

        // No culling in the shadow pass so thin geometry still casts
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_vertex_only()
                .with_cull_mode(None)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(2, 2.0)
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    object_layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            LIT_PIPELINE,
            PipelineConfig::default()
                .with_label("LIT")
                .with_shader("lit")
                .with_color_format(format)
                .with_sample_count(sample_count)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    object_layout.clone(),
                    global_bindings.shadow_layout().clone(),
                ]),
        );

        if let Err(e) = pipeline_manager.create_all_pipelines() {
            log::error!("pipeline creation failed: {}", e);
        }

        log::info!(
            "renderer ready: {}x{} {:?}, {}x MSAA, shadows {}",
            config.width,
            config.height,
            format,
            sample_count,
            if settings.shadows_enabled { "on" } else { "off" }
        );

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            sample_count,
            settings,
            depth_texture,
            msaa_target,
            shadow_map,
            pipeline_manager,
            global_bindings,
            object_layout,
        })
    }

    /// Uploads new objects and refreshes per-object and global uniforms.
    fn prepare(&mut self, scene: &mut Scene, camera: &OrbitCamera) {
        scene.init_gpu_resources(&self.device, &self.object_layout);
        scene.sync_gpu(&self.queue);

        let shadow_map_size = self
            .settings
            .shadows_enabled
            .then_some(self.settings.shadow_map_size);
        self.global_bindings
            .update(&self.queue, GlobalUniform::new(camera, scene, shadow_map_size));
    }

    /// Draws one frame: shadow depth pass, then the lit pass.
    pub fn render_frame(&mut self, scene: &mut Scene, camera: &OrbitCamera) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::info!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.prepare(scene, camera);

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if self.settings.shadows_enabled && scene.directional_light.cast_shadow {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline(SHADOW_PIPELINE) {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                for object in scene.objects.iter().filter(|o| o.visible && o.cast_shadow) {
                    shadow_pass.draw_object(object);
                }
            }
        }

        {
            let (view, resolve_target) = match &self.msaa_target {
                Some(msaa) => (&msaa.view, Some(&surface_texture_view)),
                None => (&surface_texture_view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.pipeline(LIT_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
                render_pass.set_bind_group(2, self.global_bindings.shadow_bind_group(), &[]);
                for object in scene.objects.iter().filter(|o| o.visible) {
                    render_pass.draw_object(object);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the size-dependent targets.
    ///
    /// Zero-sized requests (minimised windows) are ignored. The shadow map
    /// keeps its fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            width,
            height,
            self.sample_count,
            "depth_texture",
        );
        if self.msaa_target.is_some() {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                self.format,
                width,
                height,
                self.sample_count,
            ));
        }
        log::debug!("surface resized to {}x{}", width, height);
    }
}

impl RenderTarget for RenderEngine {
    fn render(&mut self, scene: &mut Scene, camera: &OrbitCamera) -> Result<(), RenderError> {
        self.render_frame(scene, camera)
    }

    fn resize(&mut self, width: u32, height: u32) {
        RenderEngine::resize(self, width, height);
    }
}
