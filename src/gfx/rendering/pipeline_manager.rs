//! Render pipeline management for wgpu
//!
//! Shaders are registered by name, pipelines are described by a
//! [`PipelineConfig`] and created together once all layouts exist.

use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("shader '{0}' not found")]
    MissingShader(String),
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub depth_bias: DepthBiasState,
    pub multisample: MultisampleState,
    pub color_targets: Vec<Option<ColorTargetState>>,
    pub vertex_only: bool, // for the shadow pass
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "lit".to_string(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth_format: None,
            depth_bias: DepthBiasState::default(),
            multisample: MultisampleState::default(),
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8UnormSrgb,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            vertex_only: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Depth-only pipeline without a fragment stage
    pub fn with_vertex_only(mut self) -> Self {
        self.vertex_only = true;
        self.color_targets.clear();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth_stencil(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Slope-scaled bias against shadow acne
    pub fn with_depth_bias(mut self, constant: i32, slope_scale: f32) -> Self {
        self.depth_bias = DepthBiasState {
            constant,
            slope_scale,
            clamp: 0.0,
        };
        self
    }

    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.multisample = MultisampleState {
            count,
            ..Default::default()
        };
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];
        self
    }
}

/// Owns shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    /// Compiles a WGSL shader module under `name`.
    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });

        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
        self.pipelines.remove(name);
    }

    /// Creates every registered pipeline that does not exist yet.
    pub fn create_all_pipelines(&mut self) -> Result<(), PipelineError> {
        let pending: Vec<(String, PipelineConfig)> = self
            .pipeline_configs
            .iter()
            .filter(|(name, _)| !self.pipelines.contains_key(*name))
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();

        for (name, config) in pending {
            let pipeline = self.create_pipeline_from_config(&name, &config)?;
            log::debug!("created pipeline '{}'", name);
            self.pipelines.insert(name, pipeline);
        }

        Ok(())
    }

    pub fn pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    pub fn has_pipeline(&self, name: &str) -> bool {
        self.pipeline_configs.contains_key(name)
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, PipelineError> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| PipelineError::MissingShader(config.shader.clone()))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let fragment_state = if config.vertex_only {
            None
        } else {
            Some(FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &config.color_targets,
                compilation_options: PipelineCompilationOptions::default(),
            })
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: config.depth_bias,
        });

        Ok(self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: fragment_state,
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: config.multisample,
                multiview: None,
                cache: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_config_is_depth_only() {
        let config = PipelineConfig::default()
            .with_shader("shadow")
            .with_vertex_only()
            .with_cull_mode(None)
            .with_depth_stencil(TextureFormat::Depth32Float);

        assert!(config.vertex_only);
        assert!(config.color_targets.is_empty());
        assert_eq!(config.cull_mode, None);
        assert_eq!(config.depth_format, Some(TextureFormat::Depth32Float));
    }

    #[test]
    fn test_sample_count_and_format() {
        let config = PipelineConfig::default()
            .with_sample_count(4)
            .with_color_format(TextureFormat::Rgba8UnormSrgb);

        assert_eq!(config.multisample.count, 4);
        let target = config.color_targets[0].as_ref().unwrap();
        assert_eq!(target.format, TextureFormat::Rgba8UnormSrgb);
    }
}
